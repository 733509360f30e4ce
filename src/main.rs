//! podcast-media CLI
//!
//! Thin glue over the library. Every command resolves an app root
//! (`--root`, default `.`), loads `siteconfig.toml` from it, and then calls
//! into `podcast_media::core`.
//!
//! - `inspect`: probe one media file (and optionally dump its tags)
//! - `setup`:   create the cache directory and an empty state file
//! - `process`: sync one episode's media and print the enclosure
//! - `feed`:    sync a directory of episodes and print an RSS document

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use podcast_media::core::feed::{self, resolve_url};
use podcast_media::core::tags::read_embedded_tags;
use podcast_media::core::{library, load_episodes};
use podcast_media::{
    EpisodeMetadata, FeedChannel, FeedItem, MediaInspector, Settings, attach_enclosure,
};

const BASE_URL_ENV: &str = "SITE_BASE_URL";

#[derive(Parser, Debug)]
#[command(name = "podcast-media", version, about = "Podcast media sync and feed tooling")]
struct Cli {
    /// Log at debug level (RUST_LOG still wins when set)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Report size, MIME type and duration of a media file
    Inspect {
        file: PathBuf,
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
        /// Also print embedded ID3 tags
        #[arg(long)]
        tags: bool,
    },
    /// Create the tag cache location under the app root
    Setup {
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Sync the media of one episode front-matter file
    Process {
        episode: PathBuf,
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
    /// Sync every episode under a directory and print the podcast feed
    Feed {
        #[arg(long)]
        channel: PathBuf,
        episodes: PathBuf,
        #[arg(long, default_value = ".")]
        root: PathBuf,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Command::Inspect { file, json, tags } => inspect(&file, json, tags),
        Command::Setup { root } => setup(&root),
        Command::Process { episode, root } => process(&episode, &root),
        Command::Feed {
            channel,
            episodes,
            root,
        } => build_feed(&channel, &episodes, &root),
    }
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(std::io::stderr)
        .init();
}

fn load_settings(root: &Path) -> Result<Settings> {
    let base_url = std::env::var(BASE_URL_ENV).ok();
    Settings::load(root, base_url)
        .with_context(|| format!("Failed to load settings from {}", root.display()))
}

fn inspect(file: &Path, json: bool, with_tags: bool) -> Result<()> {
    let info = MediaInspector::new()
        .inspect(file)
        .with_context(|| format!("Failed to inspect {}", file.display()))?;
    let tags = if with_tags { read_embedded_tags(file) } else { None };

    if json {
        let doc = serde_json::json!({ "media": info, "tags": tags });
        println!("{}", serde_json::to_string_pretty(&doc)?);
        return Ok(());
    }

    println!("size:     {}", info.size);
    println!("type:     {}", info.mime_type);
    println!("duration: {}", info.duration);

    if with_tags {
        match tags {
            Some(t) => {
                let show = |v: &Option<String>| v.clone().unwrap_or_default();
                println!("title:    {}", show(&t.title));
                println!("artist:   {}", show(&t.artist));
                println!("album:    {}", show(&t.album));
                println!("year:     {}", t.year.map(|y| y.to_string()).unwrap_or_default());
                println!("track:    {}", t.track.map(|n| n.to_string()).unwrap_or_default());
                println!("genre:    {}", show(&t.genre));
                println!("comment:  {}", show(&t.comment));
                println!("artwork:  {}", t.artwork_count);
            }
            None => println!("(no embedded tags)"),
        }
    }

    Ok(())
}

fn setup(root: &Path) -> Result<()> {
    let settings = load_settings(root)?;
    let cache = settings.cache_path();

    if let Some(dir) = cache.parent() {
        if dir.is_dir() {
            info!("Cache directory {} already exists", dir.display());
        } else {
            fs::create_dir_all(dir)
                .with_context(|| format!("Failed to create {}", dir.display()))?;
            info!("Created cache directory {}", dir.display());
        }
    }

    if cache.exists() {
        info!("State file {} already exists", cache.display());
    } else {
        fs::write(&cache, "{}").with_context(|| format!("Failed to create {}", cache.display()))?;
        info!("Created state file {}", cache.display());
    }

    Ok(())
}

fn process(episode: &Path, root: &Path) -> Result<()> {
    let settings = load_settings(root)?;
    let meta = library::load_episode(episode)
        .with_context(|| format!("Failed to load {}", episode.display()))?;

    let dirs = settings.dirs();
    let mut service = settings.sync_service();

    match service.process_media(&meta, &dirs.source, &dirs.output)? {
        Some(enclosure) => println!("{}", serde_json::to_string_pretty(&enclosure)?),
        None => println!("No podcast media for {}", episode.display()),
    }

    Ok(())
}

fn build_feed(channel_path: &Path, episodes: &Path, root: &Path) -> Result<()> {
    let settings = load_settings(root)?;

    let raw = fs::read_to_string(channel_path)
        .with_context(|| format!("Failed to read {}", channel_path.display()))?;
    let channel: FeedChannel = serde_json::from_str(&raw)
        .with_context(|| format!("Failed to parse {}", channel_path.display()))?;

    let loaded = load_episodes(episodes)
        .with_context(|| format!("Failed to scan {}", episodes.display()))?;
    if loaded.is_empty() {
        bail!("No episode files under {}", episodes.display());
    }

    let dirs = settings.dirs();
    let mut service = settings.sync_service();
    let base_url = settings.base_url();

    let items: Vec<FeedItem> = loaded
        .into_iter()
        .map(|(path, meta)| {
            let mut item = feed_item(&path, meta, base_url, &channel.link);
            attach_enclosure(&mut service, &mut item, &dirs, base_url);
            item
        })
        .collect();

    let itunes = settings.itunes();
    let rss = feed::build_rss(&channel, &items, &[&itunes]);

    println!("{}", rss.render_document().context("Failed to render feed")?);
    Ok(())
}

/// Map episode front matter onto the builder's item fields.
///
/// The item link is `link` when given, else the file stem under the site root.
fn feed_item(path: &Path, meta: EpisodeMetadata, base_url: &str, site_link: &str) -> FeedItem {
    let link = meta.non_empty("link").unwrap_or_else(|| {
        let stem = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        format!("/{stem}/")
    });

    FeedItem {
        title: meta.text("title").unwrap_or_default(),
        link: resolve_url(&link, base_url, site_link),
        description: meta.non_empty("description"),
        author: meta.non_empty("author"),
        content: meta.non_empty("content"),
        metadata: meta,
        enclosure: None,
    }
}

use std::fs;
use std::path::PathBuf;

use podcast_media::core::cache::TagCache;
use podcast_media::{
    ContentDirs, EpisodeMetadata, FeedItem, MediaInspector, MediaSyncService, TagWriter,
    attach_enclosure, enrich_page, process_all,
};
use tempfile::TempDir;

fn setup() -> (TempDir, ContentDirs, MediaSyncService) {
    let tmp = TempDir::new().unwrap();
    let dirs = ContentDirs {
        source: tmp.path().join("content"),
        output: tmp.path().join("public"),
    };
    fs::create_dir_all(dirs.source.join("media")).unwrap();
    fs::write(dirs.source.join("media/ep1.mp3"), b"plain bytes standing in for audio").unwrap();

    let service = MediaSyncService::new(
        MediaInspector::new(),
        TagWriter::new("Show"),
        TagCache::load(tmp.path().join("cache/state.json")),
    );
    (tmp, dirs, service)
}

fn local_episode() -> EpisodeMetadata {
    EpisodeMetadata::new()
        .with("title", "Ep 1")
        .with("audio_file", "media/ep1.mp3")
}

#[test]
fn feed_hook_attaches_absolute_enclosure() {
    let (_tmp, dirs, mut service) = setup();
    let mut item = FeedItem {
        title: "Ep 1".into(),
        description: Some("Short".into()),
        content: Some("<nav/><div class=\"content-body\"><p>Notes</p></div>".into()),
        metadata: local_episode(),
        ..FeedItem::default()
    };

    attach_enclosure(&mut service, &mut item, &dirs, "https://site.test/");

    let enclosure = item.enclosure.unwrap();
    assert_eq!(enclosure.url, "https://site.test/media/ep1.mp3");
    assert_eq!(enclosure.mime_type, "audio/mpeg");
    assert_eq!(item.content.as_deref(), Some("<p>Notes</p>"));
}

#[test]
fn feed_hook_ignores_items_without_media() {
    let (_tmp, dirs, mut service) = setup();
    let mut item = FeedItem {
        title: "Text post".into(),
        content: Some("<p>unchanged</p>".into()),
        ..FeedItem::default()
    };

    attach_enclosure(&mut service, &mut item, &dirs, "https://site.test");

    assert!(item.enclosure.is_none());
    assert_eq!(item.content.as_deref(), Some("<p>unchanged</p>"));
}

#[test]
fn feed_hook_swallows_failures() {
    let (tmp, _, mut service) = setup();
    // Output "directory" is a regular file, so publishing cannot create it.
    let blocker = tmp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let dirs = ContentDirs {
        source: tmp.path().join("content"),
        output: blocker,
    };

    let mut item = FeedItem {
        title: "Ep 1".into(),
        metadata: local_episode(),
        ..FeedItem::default()
    };
    attach_enclosure(&mut service, &mut item, &dirs, "https://site.test");
    assert!(item.enclosure.is_none());
}

#[test]
fn page_hook_exposes_media_to_templates() {
    let (_tmp, dirs, mut service) = setup();
    let mut meta = local_episode();

    enrich_page(&mut service, &mut meta, &dirs);

    assert_eq!(meta.text("audio_url").as_deref(), Some("/media/ep1.mp3"));
    assert_eq!(meta.text("media_type").as_deref(), Some("audio/mpeg"));
    let published = dirs.output.join("media/ep1.mp3");
    assert_eq!(
        meta.text("media_length"),
        Some(fs::metadata(published).unwrap().len().to_string())
    );
    assert!(!meta.contains("video_url"));
}

#[test]
fn page_hook_uses_video_url_for_video() {
    let (_tmp, dirs, mut service) = setup();
    let mut meta = EpisodeMetadata::new()
        .with("video_file", "https://cdn.example.com/ep1.mp4")
        .with("audio_type", "video/mp4");

    enrich_page(&mut service, &mut meta, &dirs);

    assert_eq!(
        meta.text("video_url").as_deref(),
        Some("https://cdn.example.com/ep1.mp4")
    );
    assert!(!meta.contains("audio_url"));
}

#[test]
fn batch_isolates_failures() {
    let (tmp, _, mut service) = setup();
    let blocker: PathBuf = tmp.path().join("blocker");
    fs::write(&blocker, "x").unwrap();
    let dirs = ContentDirs {
        source: tmp.path().join("content"),
        output: blocker,
    };

    let items = vec![
        EpisodeMetadata::new().with("audio_file", "https://cdn.example.com/a.mp3"),
        local_episode(),
        EpisodeMetadata::new().with("title", "Text only"),
    ];

    let (enclosures, failures) = process_all(&mut service, &items, &dirs);

    assert_eq!(failures, 1);
    assert_eq!(enclosures.len(), 3);
    assert!(enclosures[0].is_some());
    assert!(enclosures[1].is_none());
    assert!(enclosures[2].is_none());
}

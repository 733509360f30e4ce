//! core/mod.rs
//!
//! The brain of the crate:
//! - Sync episode media from the content tree into the publish tree
//! - Keep embedded tags in step with front matter (cached by fingerprint)
//! - Project podcast front matter into an RSS feed
//!
//! Batch pipeline, kept explicit:
//!   (A) discover episode files -> Vec<PathBuf>
//!   (B) load front matter      -> Vec<EpisodeMetadata>
//!   (C) process media          -> Vec<Option<Enclosure>> + failure count
//!
//! The CLI and host hooks only call into these stages; no IO lives outside `core`.

pub mod cache;
pub mod error;
pub mod feed;
pub mod fields;
pub mod hooks;
pub mod inspect;
pub mod library;
pub mod sync;
pub mod tags;
pub mod types;

use std::path::{Path, PathBuf};

use tracing::{error, info, instrument, warn};

use hooks::ContentDirs;
use sync::MediaSyncService;
use types::{Enclosure, EpisodeMetadata};

/// Load every episode file under `root`.
///
/// - Unparseable files are logged and skipped, never fatal
/// - Returns (path, metadata) pairs in path order
pub fn load_episodes(root: &Path) -> error::Result<Vec<(PathBuf, EpisodeMetadata)>> {
    let paths = library::scan_episode_files(root)?;
    let mut out = Vec::with_capacity(paths.len());

    for path in paths {
        match library::load_episode(&path) {
            Ok(meta) => out.push((path, meta)),
            Err(e) => warn!("Skipping {}: {e}", path.display()),
        }
    }

    Ok(out)
}

/// Process media for a batch of items.
///
/// - One item's failure never aborts the batch
/// - Returns (enclosures in item order, failures)
#[instrument(level = "debug", skip_all, fields(items = items.len()))]
pub fn process_all(
    service: &mut MediaSyncService,
    items: &[EpisodeMetadata],
    dirs: &ContentDirs,
) -> (Vec<Option<Enclosure>>, usize) {
    let mut enclosures = Vec::with_capacity(items.len());
    let mut failures = 0usize;

    for meta in items {
        match service.process_media(meta, &dirs.source, &dirs.output) {
            Ok(enclosure) => enclosures.push(enclosure),
            Err(e) => {
                let title = meta.text("title").unwrap_or_default();
                error!("Failed to process podcast media for {title}: {e}");
                failures += 1;
                enclosures.push(None);
            }
        }
    }

    info!(
        "Processed {} items ({} with media, {failures} failed)",
        items.len(),
        enclosures.iter().filter(|e| e.is_some()).count()
    );
    (enclosures, failures)
}

//! core/sync.rs
//! Resolve an item's media, tag it, publish it, describe it.
//!
//! Pipeline for ONE content item:
//!   (A) no reference            -> None
//!   (B) remote URL              -> enclosure from cached front-matter facts, no IO
//!   (C) local, missing on disk  -> None
//!   (D) local, present          -> tag source if fingerprint changed
//!                               -> copy to output if stale
//!                               -> inspect the published copy
//!
//! Tags go on the SOURCE before publishing so the published copy inherits them.
//! Nothing here is transactional: a crash mid-copy can leave a partial target.

use std::fs;
use std::path::{Component, Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, info, instrument, warn};

use super::cache::TagCache;
use super::error::{MediaError, Result};
use super::fields;
use super::inspect::{MediaInspector, guess_mime};
use super::tags::{TagOutcome, TagWriter};
use super::types::{Enclosure, EpisodeMetadata, MediaReference};

/// MIME type assumed for remote media and for local files we can't identify.
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Where published media lands under the output directory.
///
/// The enclosure URL is derived from the same layout, so switching it moves
/// every episode URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PublishLayout {
    /// `<output>/<reference as written>`, e.g. `media/2024/ep1.mp3`.
    #[default]
    Mirrored,
    /// `<output>/assets/media/<basename>`.
    Flat,
}

impl PublishLayout {
    /// Target path relative to the output directory.
    pub fn target_for(self, relative: &Path) -> PathBuf {
        match self {
            Self::Mirrored => relative.to_path_buf(),
            Self::Flat => {
                let name = relative.file_name().unwrap_or(relative.as_os_str());
                Path::new("assets").join("media").join(name)
            }
        }
    }
}

/// Owns the tag cache; the only writer of it.
#[derive(Debug)]
pub struct MediaSyncService {
    inspector: MediaInspector,
    tags: TagWriter,
    cache: TagCache,
    layout: PublishLayout,
}

impl MediaSyncService {
    pub fn new(inspector: MediaInspector, tags: TagWriter, cache: TagCache) -> Self {
        Self {
            inspector,
            tags,
            cache,
            layout: PublishLayout::default(),
        }
    }

    pub fn with_layout(mut self, layout: PublishLayout) -> Self {
        self.layout = layout;
        self
    }

    pub fn layout(&self) -> PublishLayout {
        self.layout
    }

    pub fn cache(&self) -> &TagCache {
        &self.cache
    }

    /// Sync one item's media and return its enclosure.
    ///
    /// `Ok(None)` means "not a podcast item" (no reference, or the local file is
    /// missing). Errors are item-level: callers log them and carry on.
    #[instrument(level = "debug", skip_all)]
    pub fn process_media(
        &mut self,
        meta: &EpisodeMetadata,
        source_dir: &Path,
        output_dir: &Path,
    ) -> Result<Option<Enclosure>> {
        let Some(reference) = meta.media_reference() else {
            return Ok(None);
        };

        let raw = match reference {
            MediaReference::Remote(url) => return Ok(Some(remote_enclosure(url, meta))),
            MediaReference::Local(raw) => raw,
        };

        let Some(relative) = safe_relative(&raw) else {
            warn!("Media reference {raw:?} escapes the content tree; ignoring");
            return Ok(None);
        };

        let source = source_dir.join(&relative);
        if !source.is_file() {
            debug!("Media file {} not found; no enclosure", source.display());
            return Ok(None);
        }

        let target_rel = self.layout.target_for(&relative);
        let target = output_dir.join(&target_rel);

        if let Some(dir) = target.parent() {
            fs::create_dir_all(dir).map_err(|source| MediaError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        if self.ensure_tags(&source, meta, source_dir)? {
            info!("Tagged {}", source.display());
        }

        if copy_if_stale(&source, &target)? {
            info!("Published {} -> {}", source.display(), target.display());
        }

        let (length, mime_type) = match self.inspector.inspect(&target) {
            Ok(info) => (info.size, info.mime_type),
            Err(e) => {
                warn!("{e}; falling back to file size and extension");
                let size = fs::metadata(&target)?.len();
                let mime = guess_mime(&target).unwrap_or(DEFAULT_AUDIO_MIME);
                (size, mime.to_string())
            }
        };

        Ok(Some(Enclosure {
            url: site_url(&target_rel),
            length,
            mime_type,
        }))
    }

    /// Rewrite tags on `source` when its fingerprint differs from the cached one.
    ///
    /// Returns whether anything was written.
    fn ensure_tags(&mut self, source: &Path, meta: &EpisodeMetadata, art_root: &Path) -> Result<bool> {
        let fields = self.tags.fields_for(meta);
        let fingerprint = fields.fingerprint();
        let resolved = fs::canonicalize(source).unwrap_or_else(|_| source.to_path_buf());
        let identity = TagCache::identity(&resolved);

        if self.cache.get(&identity) == Some(fingerprint.as_str()) {
            debug!("Tags for {} are current", source.display());
            return Ok(false);
        }

        let outcome = self.tags.write_fields(source, &fields, art_root)?;

        // A cache that can't be saved only costs a redundant rewrite next run.
        if let Err(e) = self.cache.put(identity, fingerprint) {
            warn!("Could not persist tag cache {}: {e}", self.cache.path().display());
        }

        Ok(outcome == TagOutcome::Written)
    }
}

fn remote_enclosure(url: String, meta: &EpisodeMetadata) -> Enclosure {
    let length = meta
        .get("audio_size")
        .and_then(fields::coerce_int)
        .map(|n| n.max(0) as u64)
        .unwrap_or(0);
    let mime_type = meta
        .non_empty("audio_type")
        .unwrap_or_else(|| DEFAULT_AUDIO_MIME.to_string());

    Enclosure {
        url,
        length,
        mime_type,
    }
}

/// Reference as a plain relative path: leading separators dropped, no `..`.
fn safe_relative(raw: &str) -> Option<PathBuf> {
    let trimmed = raw.trim().trim_start_matches(['/', '\\']);
    let path = PathBuf::from(trimmed.replace('\\', "/"));

    let plain = path
        .components()
        .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
    (plain && path.file_name().is_some()).then_some(path)
}

/// Copy only when the target is missing or older than the source.
fn copy_if_stale(source: &Path, target: &Path) -> Result<bool> {
    let stale = match fs::metadata(target) {
        Ok(existing) => fs::metadata(source)?.modified()? > existing.modified()?,
        Err(_) => true,
    };

    if stale {
        fs::copy(source, target)?;
    }
    Ok(stale)
}

/// `/`-rooted URL path for a target relative to the output directory.
fn site_url(relative: &Path) -> String {
    let parts: Vec<_> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(s) => Some(s.to_string_lossy()),
            _ => None,
        })
        .collect();
    format!("/{}", parts.join("/"))
}

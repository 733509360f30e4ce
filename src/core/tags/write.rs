//! Write episode tags into a media file, in place.
//!
//! Two containers, for player compatibility:
//! - ID3v2.3 (modern) through the `id3` crate
//! - ID3v1.1 trailer (legacy) for MPEG streams
//!
//! WAV/AIFF get the ID3v2 chunk only. Other containers are skipped with a warning.

use std::path::Path;

use id3::frame::{Comment, Picture, PictureType};
use id3::{Tag, TagLike, Version};
use tracing::{debug, warn};

use super::super::error::{MediaError, Result};
use super::super::types::EpisodeMetadata;
use super::art::load_cover_art;
use super::fingerprint::{PODCAST_GENRE, TagFields};
use super::util::{TagContainer, parse_slash_pair_u32};
use super::v1::{self, V1Tag};

/// What a write actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagOutcome {
    Written,
    /// The container has no tag format we write.
    Skipped,
}

/// Stateless tag writer. Holds the site name, which every episode uses as album.
#[derive(Debug, Clone)]
pub struct TagWriter {
    site_name: String,
}

impl TagWriter {
    pub fn new(site_name: impl Into<String>) -> Self {
        Self {
            site_name: site_name.into(),
        }
    }

    pub fn site_name(&self) -> &str {
        &self.site_name
    }

    /// The tag values this writer would put into a file for `meta`.
    pub fn fields_for(&self, meta: &EpisodeMetadata) -> TagFields {
        TagFields::from_metadata(meta, &self.site_name)
    }

    /// Tag `path` from front matter. Art paths resolve under `art_root`.
    pub fn write(&self, path: &Path, meta: &EpisodeMetadata, art_root: &Path) -> Result<TagOutcome> {
        self.write_fields(path, &self.fields_for(meta), art_root)
    }

    pub fn write_fields(&self, path: &Path, fields: &TagFields, art_root: &Path) -> Result<TagOutcome> {
        let container = TagContainer::from_path(path);
        if container == TagContainer::Unsupported {
            warn!("No writable tag format for {}; skipping tags", path.display());
            return Ok(TagOutcome::Skipped);
        }

        let fail = |reason: String| MediaError::TagWrite {
            path: path.to_path_buf(),
            reason,
        };

        // id3 picks the layout from content; a mislabelled WAV/AIFF is refused.
        if !container.matches_content(path).map_err(|e| fail(e.to_string()))? {
            return Err(fail(format!("not a {} stream", container.describe())));
        }

        // Load existing tag if possible; otherwise start fresh.
        let mut tag = Tag::read_from_path(path).unwrap_or_else(|_| Tag::new());

        apply_fields(&mut tag, fields, art_root);

        tag.write_to_path(path, Version::Id3v23)
            .map_err(|e| fail(e.to_string()))?;

        if container == TagContainer::Mpeg {
            v1::write_to_path(path, &V1Tag::from_fields(fields))
                .map_err(|e| fail(format!("ID3v1: {e}")))?;
        }

        debug!("Wrote tags to {}", path.display());
        Ok(TagOutcome::Written)
    }
}

/// Helper: set/remove a plain text frame (T***)
fn set_text_opt(tag: &mut Tag, id: &str, v: &str) {
    match v.trim() {
        "" => {
            let _ = tag.remove(id); // TagLike::remove returns Vec<Frame>; discard it
        }
        s => tag.set_text(id, s.to_string()),
    }
}

fn apply_fields(tag: &mut Tag, fields: &TagFields, art_root: &Path) {
    set_text_opt(tag, "TIT2", &fields.title);
    set_text_opt(tag, "TPE1", &fields.artist);
    set_text_opt(tag, "TALB", &fields.album);
    tag.set_genre(PODCAST_GENRE);

    match fields.year.trim().parse::<i32>() {
        Ok(y) => tag.set_year(y),
        Err(_) => tag.remove_year(),
    }

    match parse_slash_pair_u32(Some(&fields.track)) {
        (Some(n), _) => tag.set_track(n),
        _ => tag.remove_track(),
    }

    // Comment (COMM): replace with a single "eng" comment
    let _ = tag.remove("COMM");
    if !fields.comment.trim().is_empty() {
        let _ = tag.add_frame(Comment {
            lang: "eng".to_string(),
            description: String::new(),
            text: fields.comment.trim().to_string(),
        });
    }

    tag.remove_picture_by_type(PictureType::CoverFront);
    if let Some(art) = load_cover_art(&fields.image_path, art_root) {
        let _ = tag.add_frame(Picture {
            mime_type: art.mime_type,
            picture_type: PictureType::CoverFront,
            description: "Cover Art".to_string(),
            data: art.data,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn unsupported_container_is_skipped_untouched() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ep.m4a");
        std::fs::write(&path, b"opaque").unwrap();

        let meta = EpisodeMetadata::new().with("title", "Ep");
        let outcome = TagWriter::new("Show").write(&path, &meta, dir.path()).unwrap();

        assert_eq!(outcome, TagOutcome::Skipped);
        assert_eq!(std::fs::read(&path).unwrap(), b"opaque");
    }

    #[test]
    fn mislabelled_wav_is_a_tag_write_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("ep.wav");
        std::fs::write(&path, b"plain text wearing a .wav name").unwrap();

        let meta = EpisodeMetadata::new().with("title", "Ep");
        let err = TagWriter::new("Show").write(&path, &meta, dir.path()).unwrap_err();

        match err {
            MediaError::TagWrite { reason, .. } => assert!(reason.contains("RIFF/WAVE")),
            other => panic!("unexpected error: {other}"),
        }
        assert_eq!(std::fs::read(&path).unwrap(), b"plain text wearing a .wav name");
    }
}

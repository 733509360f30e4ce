//! core/tags/fingerprint.rs
//! The tag-relevant slice of an episode, and its fingerprint.
//!
//! Only fields that end up inside the file's tags take part. Editing anything else in
//! the front matter (slug, layout, summary, ...) must leave the fingerprint alone.

use serde::Serialize;
use sha2::{Digest, Sha256};

use super::super::types::EpisodeMetadata;
use super::util::year_prefix;

/// Genre written to every episode.
pub const PODCAST_GENRE: &str = "Podcast";

/// Tag values derived from front matter + site name.
///
/// Field order is the serialization order, which is the fingerprint input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TagFields {
    pub title: String,
    pub artist: String,
    pub album: String,
    pub year: String,
    pub track: String,
    pub comment: String,
    pub image_path: String,
}

impl TagFields {
    pub fn from_metadata(meta: &EpisodeMetadata, site_name: &str) -> Self {
        let text = |key: &str| meta.text(key).unwrap_or_default();

        Self {
            title: text("title"),
            artist: text("itunes_author"),
            album: site_name.to_string(),
            year: year_prefix(&text("date")),
            track: text("itunes_episode"),
            comment: text("description"),
            image_path: text("itunes_image"),
        }
    }

    /// Hex SHA-256 over the canonical JSON form of these fields.
    pub fn fingerprint(&self) -> String {
        // Serializing a plain struct of Strings cannot fail.
        let canonical = serde_json::to_vec(self).unwrap_or_default();
        format!("{:x}", Sha256::digest(&canonical))
    }
}

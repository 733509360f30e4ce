//! Core data types shared between the sync service, the tag layer and the feed extension.
//!
//! Rule of thumb:
//! - These structs should be "boring bags of data"
//! - No filesystem code
//! - No tag writing code
//! - No XML code
//!
//! `EpisodeMetadata` is the raw front matter of ONE content item (or of the channel).
//! `Enclosure` is what the feed ends up pointing at.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::fields;

/// Structural facts about a media file, as reported by the inspector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaMetadata {
    /// Byte size of the file.
    pub size: u64,

    /// MIME type, `application/octet-stream` when the probe can't tell.
    #[serde(rename = "type")]
    pub mime_type: String,

    /// `MM:SS` below one hour, `HH:MM:SS` above.
    pub duration: String,
}

/// Publish-ready RSS enclosure.
///
/// `url` is either the original remote URL verbatim, or a site-relative path
/// (`/media/ep1.mp3`). It is never a filesystem path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Enclosure {
    pub url: String,
    pub length: u64,
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl Enclosure {
    pub fn is_remote(&self) -> bool {
        is_remote_url(&self.url)
    }

    pub fn is_video(&self) -> bool {
        self.mime_type.contains("video")
    }
}

/// Where an item's media lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MediaReference {
    /// Absolute http(s) URL. Never downloaded, inspected or tagged here.
    Remote(String),
    /// Path relative to the content source tree.
    Local(String),
}

impl MediaReference {
    /// Classify a raw front-matter value. Blank strings are "no media".
    pub fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        if is_remote_url(raw) {
            Some(Self::Remote(raw.to_string()))
        } else {
            Some(Self::Local(raw.to_string()))
        }
    }
}

/// `http://` or `https://`, case-insensitive.
pub fn is_remote_url(s: &str) -> bool {
    let lower = s.get(..8).unwrap_or(s).to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Flat key/value front matter.
///
/// Values stay as JSON values because front matter is loosely typed:
/// `itunes_episode` may be `3` or `"3"`, `itunes_category` a string or a list,
/// `itunes_explicit` a bool or a string.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EpisodeMetadata(Map<String, Value>);

impl EpisodeMetadata {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert, handy for tests and the CLI.
    pub fn with(mut self, key: &str, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.0.insert(key.to_string(), value.into());
    }

    /// Raw value; JSON `null` counts as absent.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key).filter(|v| !v.is_null())
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Scalar value rendered as text (numbers and bools included).
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(fields::scalar_text)
    }

    /// Like `text`, but empty/"0"/false values are treated as missing.
    pub fn non_empty(&self, key: &str) -> Option<String> {
        self.get(key)
            .filter(|v| fields::is_truthy(v))
            .and_then(fields::scalar_text)
    }

    /// `audio_file`, else `video_file`.
    pub fn media_reference(&self) -> Option<MediaReference> {
        fields::first_text(self, fields::MEDIA_REFERENCE).and_then(|s| MediaReference::parse(&s))
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.0
    }
}

impl From<Map<String, Value>> for EpisodeMetadata {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn remote_detection_is_case_insensitive() {
        assert!(is_remote_url("HTTPS://cdn.example.com/a.mp3"));
        assert!(is_remote_url("http://x"));
        assert!(!is_remote_url("media/ep1.mp3"));
        assert!(!is_remote_url("/https/ep1.mp3"));
    }

    #[test]
    fn audio_file_wins_over_video_file() {
        let meta = EpisodeMetadata::new()
            .with("audio_file", "media/ep1.mp3")
            .with("video_file", "media/ep1.mp4");

        assert_eq!(
            meta.media_reference(),
            Some(MediaReference::Local("media/ep1.mp3".into()))
        );
    }

    #[test]
    fn blank_reference_is_no_media() {
        let meta = EpisodeMetadata::new().with("audio_file", "  ");
        assert_eq!(meta.media_reference(), None);

        let meta = EpisodeMetadata::new().with("audio_file", Value::Null);
        assert_eq!(meta.media_reference(), None);
    }

    #[test]
    fn enclosure_serializes_type_key() {
        let e = Enclosure {
            url: "/a.mp3".into(),
            length: 3,
            mime_type: "audio/mpeg".into(),
        };
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["type"], "audio/mpeg");
    }
}

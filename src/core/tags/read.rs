//! core/tags/read.rs
//! Read back what the writer put into a file.
//!
//! Used by `inspect --tags` and by tests. Reading never fails hard:
//! no tag / unreadable tag is just `None`.

use std::path::Path;

use id3::frame::{Content, PictureType};
use id3::{Tag, TagLike};
use serde::Serialize;

use super::v1::{self, V1Tag};

/// Embedded descriptive tags of one file.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct EmbeddedTags {
    pub title: Option<String>,
    pub artist: Option<String>,
    pub album: Option<String>,
    pub year: Option<i32>,
    pub track: Option<u32>,
    pub genre: Option<String>,
    pub comment: Option<String>,

    /// MIME type of the front cover, if one is embedded.
    pub cover_mime: Option<String>,

    /// Count of APIC frames (any picture type).
    pub artwork_count: usize,
}

/// Read the ID3v2 tag of `path`.
pub fn read_embedded_tags(path: &Path) -> Option<EmbeddedTags> {
    let tag = Tag::read_from_path(path).ok()?;

    Some(build_from_tag(&tag))
}

/// Read the ID3v1 trailer of `path`.
pub fn read_legacy_tags(path: &Path) -> Option<V1Tag> {
    v1::read_from_path(path).ok().flatten()
}

fn build_from_tag(tag: &Tag) -> EmbeddedTags {
    let pictures: Vec<_> = tag
        .frames()
        .filter_map(|f| match f.content() {
            Content::Picture(p) => Some(p),
            _ => None,
        })
        .collect();

    let cover_mime = pictures
        .iter()
        .find(|p| p.picture_type == PictureType::CoverFront)
        .map(|p| p.mime_type.clone());

    EmbeddedTags {
        title: tag.title().map(str::to_owned),
        artist: tag.artist().map(str::to_owned),
        album: tag.album().map(str::to_owned),
        year: tag.year(),
        track: tag.track(),
        genre: tag.genre().map(str::to_owned),
        comment: tag.comments().next().map(|c| c.text.clone()),
        cover_mime,
        artwork_count: pictures.len(),
    }
}

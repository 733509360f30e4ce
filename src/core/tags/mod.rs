//! core/tags/mod.rs
//!
//! Embedded tag utilities.
//! Public API:
//! - [`TagWriter`] writes episode tags into a media file (ID3v2.3 + ID3v1).
//! - [`TagFields`] is the tag-relevant slice of front matter; its fingerprint drives the cache.
//! - [`read_embedded_tags`] reads them back (non-fatal on failure).

mod art;
mod fingerprint;
mod read;
mod util;
mod v1;
mod write;

pub use art::{CoverArt, load_cover_art, resolve_art_path, sniff_image_mime};
pub use fingerprint::{PODCAST_GENRE, TagFields};
pub use read::{EmbeddedTags, read_embedded_tags, read_legacy_tags};
pub use util::TagContainer;
pub use v1::{GENRE_PODCAST, V1Tag};
pub use write::{TagOutcome, TagWriter};

//! podcast-media
//!
//! Podcast media sync for a static site:
//! - copies episode media from the content tree to the publish tree
//! - keeps embedded ID3 tags in step with front matter
//! - adds the iTunes podcast namespace to the site feed
//!
//! See `core` for the pipeline and `config` for site settings.

pub mod config;
pub mod core;

pub use crate::config::Settings;
pub use crate::core::error::{MediaError, Result};
pub use crate::core::feed::{FeedChannel, FeedExtension, FeedItem, ItunesExtension, XmlElement};
pub use crate::core::hooks::{ContentDirs, attach_enclosure, enrich_page};
pub use crate::core::inspect::MediaInspector;
pub use crate::core::process_all;
pub use crate::core::sync::{MediaSyncService, PublishLayout};
pub use crate::core::tags::TagWriter;
pub use crate::core::types::{Enclosure, EpisodeMetadata, MediaMetadata};

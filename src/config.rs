//! config.rs
//! Site settings and the conventional paths under an app root.
//!
//! `<root>/siteconfig.toml`:
//! ```toml
//! [site]
//! name = "My Show"
//! base_url = "https://example.com"
//!
//! [podcast]
//! layout = "mirrored"   # or "flat"
//! ```
//! Every key is optional. A missing file means all defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::debug;

use crate::core::cache::{DEFAULT_CACHE_FILE, TagCache};
use crate::core::error::{MediaError, Result};
use crate::core::feed::ItunesExtension;
use crate::core::hooks::ContentDirs;
use crate::core::inspect::MediaInspector;
use crate::core::sync::{MediaSyncService, PublishLayout};
use crate::core::tags::TagWriter;

pub const CONFIG_FILE: &str = "siteconfig.toml";
pub const DEFAULT_SITE_NAME: &str = "Podcast";

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteSection {
    pub name: String,
    pub base_url: String,
}

impl Default for SiteSection {
    fn default() -> Self {
        Self {
            name: DEFAULT_SITE_NAME.to_string(),
            base_url: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PodcastSection {
    pub layout: PublishLayout,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    pub site: SiteSection,
    pub podcast: PodcastSection,
}

impl SiteConfig {
    pub fn from_toml(raw: &str) -> Result<Self> {
        toml::from_str(raw).map_err(|e| MediaError::Config(format!("Failed to parse config: {e}")))
    }
}

/// Loaded config plus the app root it was loaded from.
#[derive(Debug, Clone)]
pub struct Settings {
    root: PathBuf,
    config: SiteConfig,
}

impl Settings {
    /// Read `<root>/siteconfig.toml`. `base_url_override` (usually the
    /// `SITE_BASE_URL` environment variable) wins over the file when non-empty.
    pub fn load(root: impl Into<PathBuf>, base_url_override: Option<String>) -> Result<Self> {
        let root = root.into();
        let path = root.join(CONFIG_FILE);

        let mut config = match fs::read_to_string(&path) {
            Ok(raw) => SiteConfig::from_toml(&raw)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No {} under {}; using defaults", CONFIG_FILE, root.display());
                SiteConfig::default()
            }
            Err(e) => {
                return Err(MediaError::Config(format!(
                    "Failed to read config file {}: {e}",
                    path.display()
                )));
            }
        };

        if let Some(url) = base_url_override.filter(|u| !u.trim().is_empty()) {
            config.site.base_url = url;
        }

        Ok(Self { root, config })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn site_name(&self) -> &str {
        &self.config.site.name
    }

    pub fn base_url(&self) -> &str {
        &self.config.site.base_url
    }

    pub fn layout(&self) -> PublishLayout {
        self.config.podcast.layout
    }

    pub fn cache_path(&self) -> PathBuf {
        self.root.join(DEFAULT_CACHE_FILE)
    }

    pub fn dirs(&self) -> ContentDirs {
        ContentDirs {
            source: self.root.join("content"),
            output: self.root.join("public"),
        }
    }

    /// A sync service wired to this site's cache, name and layout.
    pub fn sync_service(&self) -> MediaSyncService {
        MediaSyncService::new(
            MediaInspector::new(),
            TagWriter::new(self.site_name()),
            TagCache::load(self.cache_path()),
        )
        .with_layout(self.layout())
    }

    pub fn itunes(&self) -> ItunesExtension {
        ItunesExtension::new(self.base_url())
    }
}

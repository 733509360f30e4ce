//! core/cache.rs
//! Persistent "which tags did we already write" map.
//!
//! - Key: identity of a source file (hash of its resolved path)
//! - Value: the tag fingerprint last written to it
//!
//! Loaded once when the cache is constructed, rewritten in full on every `put`.
//! A missing file is an empty cache. An unreadable file is ALSO an empty cache:
//! worst case we rewrite tags once more, we never stop the pipeline.
//!
//! One writer per process. Two processes sharing a file is last-write-wins.
//! Entries for deleted files are never pruned.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use sha2::{Digest, Sha256};
use tracing::{debug, warn};

use super::error::{MediaError, Result};

/// Conventional location under an app root.
pub const DEFAULT_CACHE_FILE: &str = "cache/podcast_media_state.json";

#[derive(Debug)]
pub struct TagCache {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl TagCache {
    /// Load the cache document at `path` (see module docs for the degrade rules).
    pub fn load(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(raw) => match serde_json::from_str::<BTreeMap<String, String>>(&raw) {
                Ok(map) => map,
                Err(e) => {
                    let err = MediaError::CacheCorrupt {
                        path: path.clone(),
                        reason: e.to_string(),
                    };
                    warn!("{err}; starting with an empty cache");
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => {
                warn!("Could not read tag cache {}: {e}; starting empty", path.display());
                BTreeMap::new()
            }
        };

        debug!("Tag cache {} loaded with {} entries", path.display(), entries.len());
        Self { path, entries }
    }

    /// Stable identity for a source file path.
    pub fn identity(path: &Path) -> String {
        let digest = Sha256::digest(path.to_string_lossy().as_bytes());
        format!("{digest:x}")
    }

    pub fn get(&self, identity: &str) -> Option<&str> {
        self.entries.get(identity).map(String::as_str)
    }

    /// Record a fingerprint and flush the whole document.
    pub fn put(&mut self, identity: String, fingerprint: String) -> Result<()> {
        self.entries.insert(identity, fingerprint);
        self.save()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|source| MediaError::Directory {
                path: dir.to_path_buf(),
                source,
            })?;
        }

        let json = serde_json::to_string_pretty(&self.entries)?;
        fs::write(&self.path, json)?;
        Ok(())
    }
}

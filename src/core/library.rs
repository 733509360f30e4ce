//! core/library.rs
//! Discover episode front-matter files on disk.
//!
//! An episode file is a JSON object of front-matter keys (`*.json`).

use std::fs;
use std::path::{Path, PathBuf};

use super::error::{MediaError, Result};
use super::types::EpisodeMetadata;

/// All `*.json` files under `root`, sorted.
pub fn scan_episode_files(root: &Path) -> Result<Vec<PathBuf>> {
    if !root.is_dir() {
        return Err(MediaError::NotFound(root.to_path_buf()));
    }

    let mut out = Vec::new();
    walk_dir(root, &mut out)?;
    out.sort();
    Ok(out)
}

/// Parse one episode file.
pub fn load_episode(path: &Path) -> Result<EpisodeMetadata> {
    let raw = fs::read_to_string(path).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => MediaError::NotFound(path.to_path_buf()),
        _ => MediaError::Io(e),
    })?;
    Ok(serde_json::from_str(&raw)?)
}

fn walk_dir(dir: &Path, out: &mut Vec<PathBuf>) -> Result<()> {
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();

        if path.is_dir() {
            walk_dir(&path, out)?;
        } else if is_json(&path) {
            out.push(path);
        }
    }

    Ok(())
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|ext| ext.eq_ignore_ascii_case("json"))
        .unwrap_or(false)
}

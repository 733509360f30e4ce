//! core/tags/art.rs
//! Cover art lookup for `itunes_image`.
//!
//! Art is optional: any problem here (remote URL, missing file, unreadable file)
//! means "write tags without art", never a failed write.

use std::path::{Path, PathBuf};

use tracing::{debug, warn};

use super::super::types::is_remote_url;

/// Cover art ready to embed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoverArt {
    pub data: Vec<u8>,
    pub mime_type: String,
}

/// Resolve an `itunes_image` value to an existing file under `root`.
pub fn resolve_art_path(image: &str, root: &Path) -> Option<PathBuf> {
    let image = image.trim();
    if image.is_empty() || is_remote_url(image) {
        return None;
    }

    let relative = image.trim_start_matches(['/', '\\']);
    let full = root.join(relative);
    full.is_file().then_some(full)
}

/// Load cover art for `image` (see `resolve_art_path`).
pub fn load_cover_art(image: &str, root: &Path) -> Option<CoverArt> {
    let Some(path) = resolve_art_path(image, root) else {
        debug!("No local cover art for {image:?} under {}", root.display());
        return None;
    };

    match std::fs::read(&path) {
        Ok(data) => {
            let mime_type = sniff_image_mime(&data, &path).to_string();
            Some(CoverArt { data, mime_type })
        }
        Err(e) => {
            warn!("Could not read cover art {}: {e}", path.display());
            None
        }
    }
}

/// MIME from magic bytes, then from the extension.
pub fn sniff_image_mime(data: &[u8], path: &Path) -> &'static str {
    if data.starts_with(&[0x89, b'P', b'N', b'G']) {
        return "image/png";
    }
    if data.starts_with(&[0xFF, 0xD8, 0xFF]) {
        return "image/jpeg";
    }
    if data.starts_with(b"GIF8") {
        return "image/gif";
    }
    if data.len() >= 12 && &data[0..4] == b"RIFF" && &data[8..12] == b"WEBP" {
        return "image/webp";
    }

    match path
        .extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn resolves_relative_and_rooted_paths() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir_all(dir.path().join("img")).unwrap();
        std::fs::write(dir.path().join("img/cover.png"), b"x").unwrap();

        assert!(resolve_art_path("img/cover.png", dir.path()).is_some());
        assert!(resolve_art_path("/img/cover.png", dir.path()).is_some());
        assert!(resolve_art_path("img/missing.png", dir.path()).is_none());
        assert!(resolve_art_path("https://cdn.example.com/c.png", dir.path()).is_none());
        assert!(resolve_art_path("img", dir.path()).is_none());
    }

    #[test]
    fn sniff_prefers_magic_bytes() {
        let png = [0x89, b'P', b'N', b'G', 0x0D, 0x0A];
        assert_eq!(sniff_image_mime(&png, Path::new("cover.jpg")), "image/png");
        assert_eq!(sniff_image_mime(&[0xFF, 0xD8, 0xFF, 0xE0], Path::new("c")), "image/jpeg");
        assert_eq!(sniff_image_mime(b"????", Path::new("c.gif")), "image/gif");
        assert_eq!(sniff_image_mime(b"????", Path::new("c.bin")), "image/jpeg");
    }
}

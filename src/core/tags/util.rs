//! core/tags/util.rs
//! Small parsing helpers shared by tag reading/writing.

use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Which tag container we can write for a given file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TagContainer {
    /// MPEG audio: ID3v2 at the front, ID3v1 trailer at the back.
    Mpeg,
    /// RIFF/WAVE with an `ID3 ` chunk.
    Wav,
    /// AIFF with an `ID3 ` chunk.
    Aiff,
    /// Anything else (MP4, FLAC, OGG, ...). Not tagged.
    Unsupported,
}

impl TagContainer {
    pub fn from_path(path: &Path) -> Self {
        let ext = path
            .extension()
            .and_then(|s| s.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match ext.as_str() {
            "mp3" | "mp2" | "mpga" => Self::Mpeg,
            "wav" | "wave" => Self::Wav,
            "aif" | "aiff" | "aifc" => Self::Aiff,
            _ => Self::Unsupported,
        }
    }

    /// Whether the file's leading bytes agree with its extension.
    ///
    /// MPEG streams have no reliable magic (a bare frame sync or an ID3 header), so
    /// they always pass. RIFF/AIFF must carry their form header.
    pub fn matches_content(self, path: &Path) -> std::io::Result<bool> {
        let mut header = [0u8; 12];
        let read = match self {
            Self::Mpeg | Self::Unsupported => return Ok(true),
            Self::Wav | Self::Aiff => File::open(path)?.read(&mut header)?,
        };
        if read < header.len() {
            return Ok(false);
        }

        let (form, kind) = (&header[0..4], &header[8..12]);
        Ok(match self {
            Self::Wav => form == b"RIFF" && kind == b"WAVE",
            _ => form == b"FORM" && (kind == b"AIFF" || kind == b"AIFC"),
        })
    }

    pub fn describe(self) -> &'static str {
        match self {
            Self::Mpeg => "MPEG",
            Self::Wav => "RIFF/WAVE",
            Self::Aiff => "AIFF",
            Self::Unsupported => "unsupported",
        }
    }
}

/// First 4 characters of a date-ish string ("2024-05-01" -> "2024").
pub(crate) fn year_prefix(date: &str) -> String {
    date.trim().chars().take(4).collect()
}

/// Parse strings like:
/// - "3" -> (Some(3), None)
/// - "3/12" -> (Some(3), Some(12))
pub(crate) fn parse_slash_pair_u32(s: Option<&str>) -> (Option<u32>, Option<u32>) {
    let Some(s) = s else { return (None, None) };
    let s = s.trim();
    if s.is_empty() {
        return (None, None);
    }

    let mut parts = s.split('/');
    let a = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    let b = parts.next().and_then(|p| p.trim().parse::<u32>().ok());
    (a, b)
}

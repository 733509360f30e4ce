//! core/inspect.rs
//! Probe a media file for size, MIME type and duration (Symphonia).
//!
//! Only the container is probed; nothing is decoded.
//! A missing file or a probe error (unknown/corrupt container) is an `Analysis` error.
//! Missing optional facts are not: size falls back to 0, type to
//! `application/octet-stream`, duration to zero seconds.

use std::fs::File;
use std::path::Path;

use symphonia::core::codecs::{
    CODEC_TYPE_AAC, CODEC_TYPE_ALAC, CODEC_TYPE_FLAC, CODEC_TYPE_MP1, CODEC_TYPE_MP2,
    CODEC_TYPE_MP3, CODEC_TYPE_OPUS, CODEC_TYPE_VORBIS, CodecType,
};
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::{MediaSourceStream, MediaSourceStreamOptions};
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use symphonia::core::units::TimeBase;
use tracing::debug;

use super::error::{MediaError, Result};
use super::types::MediaMetadata;

pub const OCTET_STREAM: &str = "application/octet-stream";

/// Stateless media prober.
#[derive(Debug, Clone, Copy, Default)]
pub struct MediaInspector;

impl MediaInspector {
    pub fn new() -> Self {
        Self
    }

    pub fn inspect(&self, path: &Path) -> Result<MediaMetadata> {
        let analysis = |reason: String| MediaError::Analysis {
            path: path.to_path_buf(),
            reason,
        };

        if !path.is_file() {
            return Err(analysis("file not found".to_string()));
        }

        let file = File::open(path).map_err(|e| analysis(format!("open failed: {e}")))?;
        let size = file.metadata().map(|m| m.len()).unwrap_or(0);
        let mss = MediaSourceStream::new(Box::new(file), MediaSourceStreamOptions::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(
                &hint,
                mss,
                &FormatOptions::default(),
                &MetadataOptions::default(),
            )
            .map_err(|e| analysis(format!("format probe failed: {e}")))?;

        let (codec, seconds) = match probed.format.default_track() {
            Some(track) => {
                let params = &track.codec_params;
                (
                    Some(params.codec),
                    duration_secs(params.time_base, params.n_frames).unwrap_or(0.0),
                )
            }
            None => (None, 0.0),
        };

        let mime_type = codec
            .and_then(|c| mime_for_codec(c, path))
            .or_else(|| guess_mime(path))
            .unwrap_or(OCTET_STREAM)
            .to_string();

        debug!(
            "Inspected {}: {size} bytes, {mime_type}, {seconds:.2}s",
            path.display()
        );

        Ok(MediaMetadata {
            size,
            mime_type,
            duration: format_duration(seconds),
        })
    }
}

fn duration_secs(time_base: Option<TimeBase>, n_frames: Option<u64>) -> Option<f64> {
    let tb = time_base?;
    let frames = n_frames?;

    let t = tb.calc_time(frames);
    // Time is { seconds: u64, frac: f64 } in symphonia 0.5.x.
    Some(t.seconds as f64 + t.frac)
}

/// `MM:SS` below one hour, `HH:MM:SS` from one hour up. Fractions round to nearest.
pub fn format_duration(seconds: f64) -> String {
    let total = if seconds.is_finite() && seconds > 0.0 {
        seconds.round() as u64
    } else {
        0
    };

    let hours = total / 3600;
    let minutes = (total % 3600) / 60;
    let secs = total % 60;

    if hours > 0 {
        format!("{hours:02}:{minutes:02}:{secs:02}")
    } else {
        format!("{minutes:02}:{secs:02}")
    }
}

fn mime_for_codec(codec: CodecType, path: &Path) -> Option<&'static str> {
    let video_container = matches!(extension(path).as_deref(), Some("mp4" | "m4v" | "mov"));

    match codec {
        CODEC_TYPE_MP3 | CODEC_TYPE_MP2 | CODEC_TYPE_MP1 => Some("audio/mpeg"),
        CODEC_TYPE_FLAC => Some("audio/flac"),
        CODEC_TYPE_VORBIS | CODEC_TYPE_OPUS => Some("audio/ogg"),
        CODEC_TYPE_AAC | CODEC_TYPE_ALAC if video_container => Some("video/mp4"),
        CODEC_TYPE_AAC | CODEC_TYPE_ALAC => Some("audio/mp4"),
        _ => None,
    }
}

/// Best-effort MIME type from the file extension alone.
pub fn guess_mime(path: &Path) -> Option<&'static str> {
    let mime = match extension(path)?.as_str() {
        "mp3" | "mp2" | "mpga" => "audio/mpeg",
        "m4a" | "aac" => "audio/mp4",
        "wav" | "wave" => "audio/wav",
        "flac" => "audio/flac",
        "ogg" | "oga" | "opus" => "audio/ogg",
        "aif" | "aiff" | "aifc" => "audio/aiff",
        "mp4" | "m4v" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        _ => return None,
    };
    Some(mime)
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(str::to_ascii_lowercase)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    /// Minimal PCM WAV: 8 kHz, mono, 8-bit.
    fn write_wav(path: &Path, seconds: u32) {
        let rate: u32 = 8000;
        let data_len = rate * seconds;
        let mut bytes = Vec::with_capacity(44 + data_len as usize);
        bytes.extend_from_slice(b"RIFF");
        bytes.extend_from_slice(&(36 + data_len).to_le_bytes());
        bytes.extend_from_slice(b"WAVEfmt ");
        bytes.extend_from_slice(&16u32.to_le_bytes());
        bytes.extend_from_slice(&1u16.to_le_bytes()); // PCM
        bytes.extend_from_slice(&1u16.to_le_bytes()); // mono
        bytes.extend_from_slice(&rate.to_le_bytes());
        bytes.extend_from_slice(&rate.to_le_bytes()); // byte rate
        bytes.extend_from_slice(&1u16.to_le_bytes()); // block align
        bytes.extend_from_slice(&8u16.to_le_bytes()); // bits per sample
        bytes.extend_from_slice(b"data");
        bytes.extend_from_slice(&data_len.to_le_bytes());
        bytes.resize(44 + data_len as usize, 0x80);
        std::fs::write(path, bytes).unwrap();
    }

    #[test]
    fn duration_formatting() {
        assert_eq!(format_duration(125.0), "02:05");
        assert_eq!(format_duration(3725.0), "01:02:05");
        assert_eq!(format_duration(59.5), "01:00");
        assert_eq!(format_duration(3599.4), "59:59");
        assert_eq!(format_duration(3599.5), "01:00:00");
        assert_eq!(format_duration(0.0), "00:00");
        assert_eq!(format_duration(f64::NAN), "00:00");
    }

    #[test]
    fn inspects_pcm_wav() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("tone.wav");
        write_wav(&path, 2);

        let meta = MediaInspector::new().inspect(&path).unwrap();
        assert_eq!(meta.size, 44 + 16_000);
        assert_eq!(meta.mime_type, "audio/wav");
        assert_eq!(meta.duration, "00:02");
    }

    #[test]
    fn missing_file_is_analysis_error() {
        let err = MediaInspector::new()
            .inspect(Path::new("/definitely/not/here.mp3"))
            .unwrap_err();
        assert!(matches!(err, MediaError::Analysis { .. }));
    }

    #[test]
    fn garbage_is_analysis_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("noise.bin");
        std::fs::write(&path, b"this is not a media container at all").unwrap();

        let err = MediaInspector::new().inspect(&path).unwrap_err();
        assert!(matches!(err, MediaError::Analysis { .. }));
    }

    #[test]
    fn guess_by_extension() {
        assert_eq!(guess_mime(Path::new("a.MP3")), Some("audio/mpeg"));
        assert_eq!(guess_mime(Path::new("a.mp4")), Some("video/mp4"));
        assert_eq!(guess_mime(Path::new("a.xyz")), None);
    }
}

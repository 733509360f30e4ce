//! core/error.rs
//! Error kinds for the media pipeline.
//!
//! "No media" and "file not there" are not errors: those come back as `Ok(None)`.
//! Everything in here is a genuine failure for ONE item; callers log it and move on.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum MediaError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),

    #[error("Failed to analyze {path}: {reason}")]
    Analysis { path: PathBuf, reason: String },

    #[error("Failed to write tags to {path}: {reason}")]
    TagWrite { path: PathBuf, reason: String },

    #[error("Directory \"{path}\" was not created: {source}")]
    Directory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Never returned by the cache itself; kept so the degrade path has a name in logs.
    #[error("Tag cache {path} is unreadable: {reason}")]
    CacheCorrupt { path: PathBuf, reason: String },

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("XML error: {0}")]
    Xml(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, MediaError>;

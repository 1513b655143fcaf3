//! Error types shared across Playblast crates.

use std::path::PathBuf;

/// Top-level error type for Playblast operations.
#[derive(Debug, thiserror::Error)]
pub enum PlayblastError {
    #[error("Capture error: {message}")]
    Capture { message: String },

    #[error("Host error: {message}")]
    Host { message: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Invalid frame range: start frame {start} is after end frame {end}")]
    InvalidFrameRange { start: u32, end: u32 },

    #[error("Session error at {path}: {message}")]
    Session { path: PathBuf, message: String },

    #[error("File not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias using PlayblastError.
pub type PlayblastResult<T> = Result<T, PlayblastError>;

impl PlayblastError {
    pub fn capture(msg: impl Into<String>) -> Self {
        Self::Capture {
            message: msg.into(),
        }
    }

    pub fn host(msg: impl Into<String>) -> Self {
        Self::Host {
            message: msg.into(),
        }
    }

    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    pub fn session(path: impl Into<PathBuf>, msg: impl Into<String>) -> Self {
        Self::Session {
            path: path.into(),
            message: msg.into(),
        }
    }
}

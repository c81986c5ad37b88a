//! Error taxonomy for a scan run
//!
//! Every failure is fatal: there is no retry and no partial output.
//! Each variant maps to a distinct process exit code.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("request to {url} failed: {message}")]
    Transport { url: String, message: String },

    #[error("malformed response from {url}: {message}")]
    MalformedResponse { url: String, message: String },

    #[error("page limit of {limit} reached while the API still advertised a next page")]
    PageLimit { limit: u32 },

    #[error("I/O error: {source} (path: {path})")]
    Io {
        source: std::io::Error,
        path: PathBuf,
    },
}

pub type Result<T> = std::result::Result<T, ScanError>;

impl ScanError {
    pub fn transport(url: &str, message: impl std::fmt::Display) -> Self {
        ScanError::Transport {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn malformed(url: &str, message: impl std::fmt::Display) -> Self {
        ScanError::MalformedResponse {
            url: url.to_string(),
            message: message.to_string(),
        }
    }

    pub fn io(source: std::io::Error, path: impl Into<PathBuf>) -> Self {
        ScanError::Io {
            source,
            path: path.into(),
        }
    }

    /// Process exit code for this failure (0 is reserved for success)
    pub fn exit_code(&self) -> u8 {
        match self {
            ScanError::Config(_) => 2,
            ScanError::Transport { .. } => 3,
            ScanError::MalformedResponse { .. } => 4,
            ScanError::PageLimit { .. } => 5,
            ScanError::Io { .. } => 6,
        }
    }
}

//! Error types for annotation file operations.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or writing annotation files.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// The document parsed as JSON but matches no known annotation layout
    #[error("Invalid format: {message}")]
    InvalidFormat {
        /// Description of the format error
        message: String,
    },

    /// Writing the annotation failed at a specific path
    #[error("Failed to write annotation {path:?}: {source}")]
    Write {
        /// Target annotation path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

impl FormatError {
    /// Create an invalid format error with a message.
    pub fn invalid_format(message: impl Into<String>) -> Self {
        Self::InvalidFormat {
            message: message.into(),
        }
    }
}

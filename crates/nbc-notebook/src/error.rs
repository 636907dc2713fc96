//! Error types for notebook reading.

use std::path::PathBuf;

/// Error returned when a notebook cannot be read or parsed.
#[derive(Debug, thiserror::Error)]
pub enum NotebookError {
    /// Notebook file could not be read.
    #[error("Failed to read notebook {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Notebook is not valid JSON.
    #[error("Failed to parse notebook JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON is valid but does not describe a notebook.
    #[error("Invalid notebook structure: {0}")]
    InvalidFormat(String),

    /// Notebook declares a format version this reader does not understand.
    #[error("Unsupported notebook version: {major}.{minor} (expected 3.x)")]
    UnsupportedVersion { major: u64, minor: u64 },
}

/// Result alias for notebook operations.
pub type Result<T> = std::result::Result<T, NotebookError>;

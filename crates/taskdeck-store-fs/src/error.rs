//! Error types for taskdeck file storage.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur during `JsonFileStore` operations.
#[derive(Error, Debug)]
pub enum FsStoreError {
    /// Reading the state file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        /// File that could not be read.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// Writing the state file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        /// File that could not be written.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The state file exists but is not a valid board document.
    #[error("Failed to parse {path}: {source}")]
    Parse {
        /// File holding the invalid document.
        path: PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// The board could not be serialized.
    #[error("Failed to serialize board: {0}")]
    Serialize(#[from] serde_json::Error),
}

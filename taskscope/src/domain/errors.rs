//! Structured error types for taskscope
//!
//! Using thiserror for automatic Display implementation and error chaining.

use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("Failed to serialize report: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Failed to write {}: {source}", path.display())]
    WriteFailed { path: PathBuf, source: std::io::Error },

    #[error("Failed to read {}: {source}", path.display())]
    ReadFailed { path: PathBuf, source: std::io::Error },

    #[error("Invalid report {}: {source}", path.display())]
    InvalidReport { path: PathBuf, source: serde_json::Error },
}

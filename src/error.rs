//! Error types for metscreation operations.

use thiserror::Error;

/// Errors that can occur while loading, populating or saving a record.
#[derive(Error, Debug)]
pub enum Error {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid ruleset: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Cannot read record: {0}")]
    Read(String),

    #[error("Record storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Cannot write record: {0}")]
    Write(String),

    #[error("Cannot resolve ruleset definitions for '{node_type}': {reason}")]
    Resolution { node_type: String, reason: String },
}

impl Error {
    pub(crate) fn resolution(node_type: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::Resolution {
            node_type: node_type.into(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

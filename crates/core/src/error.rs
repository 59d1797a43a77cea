//! Error types shared by every factlog crate
//!
//! Only faults that fail an operation live here. Decode faults on read
//! (malformed log lines) and validation faults (unparsable time bounds) are
//! recovered where they happen and reported through `tracing` instead.

use thiserror::Error;

/// Result alias used across the workspace.
pub type FactlogResult<T> = std::result::Result<T, FactlogError>;

/// Errors surfaced by store operations
#[derive(Debug, Error)]
pub enum FactlogError {
    /// Filesystem fault on a write or open path
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A record or document could not be encoded
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Invalid store configuration
    #[error("invalid configuration: {0}")]
    Config(String),
}

impl FactlogError {
    /// Build a serialization error from any displayable cause.
    pub fn serialization(reason: impl Into<String>) -> Self {
        FactlogError::Serialization(reason.into())
    }

    /// Build a configuration error from any displayable cause.
    pub fn config(reason: impl Into<String>) -> Self {
        FactlogError::Config(reason.into())
    }

    /// True for filesystem faults.
    pub fn is_io(&self) -> bool {
        matches!(self, FactlogError::Io(_))
    }
}

impl From<serde_json::Error> for FactlogError {
    fn from(e: serde_json::Error) -> Self {
        if e.is_io() {
            FactlogError::Io(e.into())
        } else {
            FactlogError::Serialization(e.to_string())
        }
    }
}

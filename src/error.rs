//! Error types for Quire
//!
//! The store is a narrow-waist component: it never logs or swallows
//! failures, everything bubbles to the caller.

use std::path::PathBuf;
use thiserror::Error;

/// The main error type for store operations
#[derive(Debug, Error)]
pub enum Error {
    // ==========================================================================
    // Decode Errors
    // ==========================================================================
    #[error("Failed to decode record '{path}': {message}")]
    Decode { path: PathBuf, message: String },

    // ==========================================================================
    // IO Errors
    // ==========================================================================
    #[error("Failed to read '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to write '{path}': {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ==========================================================================
    // Concurrency Errors
    // ==========================================================================
    #[error("Record '{path}' was changed by a concurrent write")]
    Conflict { path: PathBuf },

    // ==========================================================================
    // Path Errors
    // ==========================================================================
    #[error("Invalid store path '{path}': {reason}")]
    InvalidPath { path: String, reason: &'static str },
}

/// Result type alias for store operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    pub(crate) fn read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Read {
            path: path.into(),
            source,
        }
    }

    pub(crate) fn write(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Write {
            path: path.into(),
            source,
        }
    }

    /// Returns true if a retry with a fresh read-merge-write cycle may succeed
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}

// =============================================================================
// Conversions from module-level error types
// =============================================================================

impl From<crate::validation::ValidationError> for Error {
    fn from(err: crate::validation::ValidationError) -> Self {
        match err {
            crate::validation::ValidationError::InvalidSegment(path, reason) => {
                Error::InvalidPath { path, reason }
            }
            crate::validation::ValidationError::Empty => Error::InvalidPath {
                path: String::new(),
                reason: "cannot be empty",
            },
            crate::validation::ValidationError::Reserved(path) => Error::InvalidPath {
                path,
                reason: "is a reserved name",
            },
        }
    }
}

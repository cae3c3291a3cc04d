//! Error types for catalog construction, persistence and tag extraction.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort a catalog operation.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// Document-level problem: missing or null header field, unknown `type`,
    /// or a required section of the wrong shape.
    #[error("Catalog format error: {0}")]
    Format(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    /// Raised by command surfaces only; the verifier itself reports a bool.
    #[error("Catalog verification failed for {0}")]
    Verification(PathBuf),
}

impl CatalogError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        CatalogError::Io {
            path: path.into(),
            source,
        }
    }
}

impl From<config::ConfigError> for CatalogError {
    fn from(err: config::ConfigError) -> Self {
        CatalogError::Config(err.to_string())
    }
}

/// Failure to derive a tag set from one file during reindexing.
///
/// Never surfaced from `DirectoryCatalog::update`; the record is dropped instead.
#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("{0} is not a regular file")]
    NotReadable(PathBuf),

    #[error("malformed header in {path}: {reason}")]
    Malformed { path: PathBuf, reason: String },
}

/// One element of a catalog document that could not be turned into a record.
///
/// Decoders log it and continue with the next element.
#[derive(Debug, Error)]
#[error("skipping catalog entry at {location}: {reason}")]
pub struct RecordParseError {
    pub location: String,
    pub reason: String,
}

impl RecordParseError {
    pub fn new(location: impl Into<String>, reason: impl ToString) -> Self {
        Self {
            location: location.into(),
            reason: reason.to_string(),
        }
    }
}

//! Core error types for literacy-core.
//!
//! This module defines the error hierarchy using thiserror. Every failure
//! path in the survey pipeline maps onto one of these enums so callers can
//! decide whether to surface, log, or silently recover.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for literacy-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Persisted-progress errors
    #[error("Store error: {0}")]
    Store(#[from] StoreError),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// The analysis collaborator rejected the request
    #[error("Analysis error: {0}")]
    Analysis(#[from] AnalysisError),

    /// Report export errors
    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Progress store errors.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to open the key-value database
    #[error("Failed to open database at {path}: {source}")]
    OpenFailed {
        path: PathBuf,
        #[source]
        source: rusqlite::Error,
    },

    /// Query execution failed
    #[error("Query failed: {0}")]
    QueryFailed(String),

    /// Database is locked by another writer
    #[error("Database is locked")]
    Locked,

    /// A persisted record could not be parsed
    #[error("Corrupt saved state in '{key}': {message}")]
    Corrupt { key: String, message: String },
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Unknown configuration key
    #[error("unknown config key: {0}")]
    UnknownKey(String),

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// The data directory could not be resolved or created
    #[error("Data directory unavailable: {0}")]
    DataDir(String),
}

/// Validation errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Likert answer outside 1..=5
    #[error("Answer {0} is outside the 1-5 scale")]
    LikertOutOfRange(i64),

    /// Question id not present in the catalog
    #[error("Unknown question id: {0}")]
    UnknownQuestion(String),

    /// Empty collection
    #[error("Empty collection: {0}")]
    EmptyCollection(String),

    /// The same question id appears twice in a catalog
    #[error("Duplicate question id: {0}")]
    DuplicateQuestion(String),
}

/// Failure reported by an [`crate::analysis::Analyzer`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    /// The collaborator rejected the request
    #[error("{0}")]
    Rejected(String),
}

/// Report export errors.
#[derive(Error, Debug)]
pub enum ExportError {
    /// Capabilities are still being probed; the export action is disabled
    #[error("Export is not ready yet")]
    NotReady,

    /// Capabilities failed to become available within the probe ceiling
    #[error("Export libraries could not be loaded ({0}). Check your installation and try again after restarting.")]
    CapabilityUnavailable(String),

    /// Snapshotting the report failed
    #[error("Failed to rasterize the report: {0}")]
    Rasterize(String),

    /// Building the document failed
    #[error("Failed to assemble the document: {0}")]
    Assemble(String),

    /// Writing the document failed
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl From<rusqlite::Error> for StoreError {
    fn from(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(err, _msg) => {
                if err.code == rusqlite::ErrorCode::DatabaseLocked {
                    StoreError::Locked
                } else {
                    StoreError::QueryFailed(err.to_string())
                }
            }
            _ => StoreError::QueryFailed(err.to_string()),
        }
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;

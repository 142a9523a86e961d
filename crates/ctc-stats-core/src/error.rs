//! Error types for ctc-stats-core

use thiserror::Error;

/// Main error type for ctc-stats operations
///
/// Parsing and comparison never fail; malformed entries are dropped instead.
/// These variants cover the fallible edges: files, JSON and CSV input,
/// name lookups during aggregation, export and configuration.
#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("Unknown {kind}: {name:?}")]
    UnknownName { kind: &'static str, name: String },

    #[error("Invalid division: {0:?}")]
    InvalidDivision(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for ctc-stats operations
pub type Result<T> = std::result::Result<T, Error>;

//! Error types for LeadQuery.
//!
//! The engine itself is total (extraction, scoring, and ranking never
//! fail); errors only arise at the edges: configuration loading and the
//! learning-history repositories.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum LeadQueryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, LeadQueryError>;

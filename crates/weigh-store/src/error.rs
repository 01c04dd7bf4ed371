//! Error types for weigh-store.

use std::path::PathBuf;

/// Result type for weigh-store operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in weigh-store.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Database error from SQLite.
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// Failed to create a directory for a database or document.
    #[error("Failed to create directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Invalid timestamp.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// A configuration key has no row.
    #[error("Config entry not found: {0}")]
    ConfigNotFound(String),

    /// A configuration value could not be interpreted.
    #[error("Invalid value '{value}' for config entry {key}")]
    InvalidConfigValue { key: String, value: String },

    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

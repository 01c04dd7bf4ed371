//! Error types for weigh-core.
//!
//! None of these errors are caused by the client: a failing scale or printer
//! is an internal failure of the station.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when reading the scale or printing a receipt.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum Error {
    /// The receipt output directory could not be created.
    #[error("Failed to create receipt directory {path}: {source}")]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A receipt could not be written.
    #[error("Failed to write receipt {path}: {source}")]
    WriteReceipt {
        path: PathBuf,
        source: std::io::Error,
    },

    /// A timestamp could not be formatted for a receipt.
    #[error("Failed to format receipt timestamp: {0}")]
    FormatTimestamp(#[from] time::error::Format),

    /// A device was configured with impossible parameters.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type alias using weigh-core's Error type.
pub type Result<T> = std::result::Result<T, Error>;

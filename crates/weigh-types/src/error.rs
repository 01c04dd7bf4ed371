//! Error types for ticket field normalization in weigh-types.

use thiserror::Error;

/// Errors that can occur when normalizing client-submitted ticket text.
///
/// Every variant describes bad client input; callers surface these as
/// client errors rather than internal failures.
///
/// This enum is marked `#[non_exhaustive]` to allow adding new error variants
/// in future versions without breaking downstream code.
#[derive(Debug, Clone, PartialEq, Error)]
#[non_exhaustive]
pub enum ParseError {
    /// The monetary text is not a number once currency formatting is removed.
    #[error("Invalid total value '{0}': expected a number such as 'R$ 12,50'")]
    InvalidAmount(String),

    /// The monetary text describes a negative amount.
    #[error("Invalid total value '{0}': amount cannot be negative")]
    NegativeAmount(String),

    /// The weight is not a positive, finite number of kilograms.
    #[error("Invalid weight {0}: expected a positive number of kilograms")]
    InvalidWeight(f64),

    /// The timestamp text is not an ISO-8601 date-time.
    #[error("Invalid timestamp '{0}': expected ISO-8601 such as '2024-01-01T10:00:00Z'")]
    InvalidTimestamp(String),

    /// A range bound is neither a calendar date nor a date-time.
    #[error("Invalid date '{0}': expected YYYY-MM-DD or an ISO-8601 date-time")]
    InvalidDate(String),
}

/// Result type alias using weigh-types' ParseError type.
pub type ParseResult<T> = std::result::Result<T, ParseError>;

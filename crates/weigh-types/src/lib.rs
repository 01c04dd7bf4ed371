//! Domain types for a retail weighing-and-billing station.
//!
//! This crate provides the types shared by the scale and printer
//! capabilities (weigh-core), the persistence layer (weigh-store) and the
//! HTTP service (weigh-service).
//!
//! # Features
//!
//! - Sale data as submitted by the kiosk ([`Ticket`]) and as persisted
//!   ([`WeightRecord`])
//! - Scale readings, receipts and printer settings
//! - Normalizers for currency and timestamp display text
//!
//! # Example
//!
//! ```
//! use time::UtcOffset;
//! use weigh_types::{WeightRecord, parse_currency, parse_timestamp};
//!
//! let total = parse_currency("R$ 12,50")?;
//! let timestamp = parse_timestamp("2024-01-01T10:00:00Z", UtcOffset::UTC)?;
//! let record = WeightRecord::new(1.25, total, timestamp);
//! assert!(record.printed);
//! # Ok::<(), weigh_types::ParseError>(())
//! ```

pub mod error;
pub mod parse;
pub mod types;

pub use error::{ParseError, ParseResult};
pub use parse::{CURRENCY_SYMBOL, RangeBound, parse_currency, parse_range_bound, parse_timestamp};
pub use types::{
    DailyStats, Margins, PrinterSettings, Receipt, Ticket, WEIGHT_DECIMALS, WeightReading,
    WeightRecord, round_weight,
};

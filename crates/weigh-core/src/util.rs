//! Utility functions for weigh-core.
//!
//! Station-local time is always derived from an explicit [`UtcOffset`] so
//! that tests and services can pin it.

use chrono::{Local, Offset};
use time::macros::format_description;
use time::{OffsetDateTime, UtcOffset};

use crate::error::Result;

/// The host's current UTC offset, falling back to UTC when it cannot be
/// represented.
pub fn system_utc_offset() -> UtcOffset {
    let seconds = Local::now().offset().fix().local_minus_utc();
    UtcOffset::from_whole_seconds(seconds).unwrap_or(UtcOffset::UTC)
}

/// The current time in the given offset.
pub fn now_in(offset: UtcOffset) -> OffsetDateTime {
    OffsetDateTime::now_utc().to_offset(offset)
}

/// Receipt file stem for a moment in time, e.g. `20240101_103000`.
pub fn receipt_stem(at: OffsetDateTime) -> Result<String> {
    Ok(at.format(format_description!(
        "[year][month][day]_[hour][minute][second]"
    ))?)
}

/// Date and time as printed on a page, e.g. `2024-01-01 10:30:00`.
pub fn print_time(at: OffsetDateTime) -> Result<String> {
    Ok(at.format(format_description!(
        "[year]-[month]-[day] [hour]:[minute]:[second]"
    ))?)
}

//! Normalizers for the display text a kiosk submits with a ticket.
//!
//! Totals arrive formatted for the customer (`"R$ 1.234,56"`) and timestamps
//! arrive as ISO-8601 text, with or without a UTC offset. These functions turn
//! that text into canonical values or a [`ParseError`].

use time::format_description::well_known::{Iso8601, Rfc3339};
use time::macros::{format_description, time};
use time::{Date, OffsetDateTime, PrimitiveDateTime, Time, UtcOffset};

use crate::error::{ParseError, ParseResult};

/// Currency symbol stripped from monetary text.
pub const CURRENCY_SYMBOL: &str = "R$";

/// Parse monetary display text into a non-negative amount.
///
/// The currency symbol is optional. Either `,` or `.` may be the decimal
/// separator; when both appear, the last one is the decimal separator and the
/// other groups thousands.
///
/// # Examples
///
/// ```
/// use weigh_types::parse_currency;
///
/// assert_eq!(parse_currency("R$ 12,50").unwrap(), 12.5);
/// assert_eq!(parse_currency("R$ 1.234,56").unwrap(), 1234.56);
/// assert_eq!(parse_currency("7.5").unwrap(), 7.5);
/// assert!(parse_currency("abc").is_err());
/// ```
pub fn parse_currency(text: &str) -> ParseResult<f64> {
    let trimmed = text.trim();
    let body = trimmed
        .strip_prefix(CURRENCY_SYMBOL)
        .unwrap_or(trimmed)
        .trim_start();

    let (negative, amount) = match body.strip_prefix('-') {
        Some(rest) => (true, rest.trim_start()),
        None => (false, body),
    };

    let normalized = normalize_separators(amount);
    let well_formed = normalized.chars().any(|c| c.is_ascii_digit())
        && normalized.chars().all(|c| c.is_ascii_digit() || c == '.')
        && normalized.matches('.').count() <= 1;
    if !well_formed {
        return Err(ParseError::InvalidAmount(text.to_string()));
    }

    let value: f64 = normalized
        .parse()
        .map_err(|_| ParseError::InvalidAmount(text.to_string()))?;

    if negative && value > 0.0 {
        return Err(ParseError::NegativeAmount(text.to_string()));
    }

    Ok(value)
}

/// Rewrite an amount so that `.` is the only (decimal) separator.
fn normalize_separators(amount: &str) -> String {
    match (amount.rfind(','), amount.rfind('.')) {
        // 1.234,56
        (Some(comma), Some(dot)) if comma > dot => amount.replace('.', "").replace(',', "."),
        // 1,234.56
        (Some(_), Some(_)) => amount.replace(',', ""),
        (Some(_), None) => amount.replace(',', "."),
        _ => amount.to_string(),
    }
}

/// Parse ISO-8601 date-time text.
///
/// A trailing `Z` means UTC. Text without an offset is interpreted in
/// `local_offset`, the station's offset. A space may separate date and time,
/// and a bare `YYYY-MM-DD` date means midnight of that day.
///
/// # Examples
///
/// ```
/// use time::UtcOffset;
/// use weigh_types::parse_timestamp;
///
/// let zulu = parse_timestamp("2024-01-01T10:00:00Z", UtcOffset::UTC).unwrap();
/// let explicit = parse_timestamp("2024-01-01T10:00:00+00:00", UtcOffset::UTC).unwrap();
/// assert_eq!(zulu, explicit);
/// ```
pub fn parse_timestamp(text: &str, local_offset: UtcOffset) -> ParseResult<OffsetDateTime> {
    let normalized = normalize_iso(text);

    if let Ok(parsed) = OffsetDateTime::parse(&normalized, &Rfc3339) {
        return Ok(parsed);
    }
    if let Ok(parsed) = OffsetDateTime::parse(&normalized, &Iso8601::DEFAULT) {
        return Ok(parsed);
    }

    if let Ok(naive) = PrimitiveDateTime::parse(&normalized, &Iso8601::DEFAULT) {
        return Ok(naive.assume_offset(local_offset));
    }

    Date::parse(&normalized, format_description!("[year]-[month]-[day]"))
        .map(|date| date.midnight().assume_offset(local_offset))
        .map_err(|_| ParseError::InvalidTimestamp(text.to_string()))
}

fn normalize_iso(text: &str) -> String {
    let trimmed = text.trim();
    let mut normalized = match trimmed.strip_suffix(['Z', 'z']) {
        Some(rest) => format!("{rest}+00:00"),
        None => trimmed.to_string(),
    };

    if normalized.len() > 10 && normalized.as_bytes()[10] == b' ' {
        normalized.replace_range(10..11, "T");
    }

    normalized
}

/// Which end of a date range a bound closes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RangeBound {
    Start,
    End,
}

/// Parse one bound of a date range.
///
/// A bare calendar date (`YYYY-MM-DD`) covers the whole station-local day:
/// it expands to the first instant of the day for [`RangeBound::Start`] and
/// the last instant for [`RangeBound::End`]. Anything else must be a
/// date-time accepted by [`parse_timestamp`].
pub fn parse_range_bound(
    text: &str,
    bound: RangeBound,
    local_offset: UtcOffset,
) -> ParseResult<OffsetDateTime> {
    let trimmed = text.trim();

    if let Ok(date) = Date::parse(trimmed, format_description!("[year]-[month]-[day]")) {
        let time_of_day = match bound {
            RangeBound::Start => Time::MIDNIGHT,
            RangeBound::End => time!(23:59:59.999999999),
        };
        return Ok(PrimitiveDateTime::new(date, time_of_day).assume_offset(local_offset));
    }

    parse_timestamp(trimmed, local_offset).map_err(|_| ParseError::InvalidDate(text.to_string()))
}

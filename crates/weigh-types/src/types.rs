//! Core types for weighing and billing data.

use core::fmt;

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::error::{ParseError, ParseResult};

/// Number of decimal places a stabilized weight is reported with.
pub const WEIGHT_DECIMALS: i32 = 3;

/// Round a weight in kilograms to gram precision.
///
/// # Examples
///
/// ```
/// use weigh_types::round_weight;
///
/// assert_eq!(round_weight(1.23456), 1.235);
/// assert_eq!(round_weight(0.1), 0.1);
/// ```
#[must_use]
pub fn round_weight(kg: f64) -> f64 {
    let factor = 10f64.powi(WEIGHT_DECIMALS);
    (kg * factor).round() / factor
}

/// A stabilized reading produced by a scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightReading {
    /// Weight in kilograms, rounded to gram precision.
    pub weight: f64,
    /// When the reading stabilized.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
}

impl WeightReading {
    /// Create a reading, rounding the weight to gram precision.
    pub fn new(weight: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            weight: round_weight(weight),
            timestamp,
        }
    }
}

/// Sale data submitted by the kiosk when a ticket is printed.
///
/// The monetary and timestamp fields arrive as display text and are only
/// normalized when the ticket is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Ticket {
    /// Weight in kilograms.
    pub weight: f64,
    /// Total value as shown to the customer, e.g. `"R$ 12,50"`.
    pub total_value: String,
    /// Sale date-time as shown to the customer.
    pub timestamp: String,
}

impl Ticket {
    /// Check that the weight is a positive, finite number.
    pub fn validate_weight(&self) -> ParseResult<f64> {
        if self.weight.is_finite() && self.weight > 0.0 {
            Ok(self.weight)
        } else {
            Err(ParseError::InvalidWeight(self.weight))
        }
    }
}

/// Plain-text receipt rendered for a ticket.
#[derive(Debug, Clone, PartialEq)]
pub struct Receipt {
    /// Timestamp text, verbatim from the ticket.
    pub timestamp: String,
    /// Weight in kilograms.
    pub weight: f64,
    /// Total value text, verbatim from the ticket.
    pub total_value: String,
}

impl From<&Ticket> for Receipt {
    fn from(ticket: &Ticket) -> Self {
        Self {
            timestamp: ticket.timestamp.clone(),
            weight: ticket.weight,
            total_value: ticket.total_value.clone(),
        }
    }
}

impl fmt::Display for Receipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Date/Time: {}", self.timestamp)?;
        writeln!(f, "Weight: {:.3} kg", self.weight)?;
        writeln!(f, "Total: {}", self.total_value)
    }
}

/// A completed sale as persisted in the record store.
///
/// Records are append-only: once stored they are never updated or deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeightRecord {
    /// Row identifier, assigned on insert.
    pub id: Option<i64>,
    /// Weight in kilograms.
    pub weight: f64,
    /// Total value in currency units.
    pub total_value: f64,
    /// Sale date-time.
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Whether a receipt was printed for this sale.
    #[serde(default = "default_printed")]
    pub printed: bool,
}

fn default_printed() -> bool {
    true
}

impl WeightRecord {
    /// Create an unsaved, printed record.
    pub fn new(weight: f64, total_value: f64, timestamp: OffsetDateTime) -> Self {
        Self {
            id: None,
            weight,
            total_value,
            timestamp,
            printed: true,
        }
    }
}

/// Aggregate over the sales of the current day.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DailyStats {
    /// Number of sales recorded today.
    pub today_count: u64,
    /// Sum of today's total values.
    pub today_total: f64,
    /// Average weight of today's sales.
    pub avg_weight: f64,
}

/// Print margins.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Margins {
    /// Space above the receipt body.
    pub top: f64,
    /// Space below the receipt body.
    pub bottom: f64,
    /// Space left of the receipt body.
    pub left: f64,
    /// Space right of the receipt body.
    pub right: f64,
}

/// Receipt printer settings, persisted as a single document.
///
/// The default (empty name, zero margins) is what a station reports before
/// any settings have been saved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PrinterSettings {
    /// Name of the selected printer.
    pub printer_name: String,
    /// Print margins.
    pub margins: Margins,
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_round_weight_to_grams() {
        assert_eq!(round_weight(2.3456), 2.346);
        assert_eq!(round_weight(4.9999), 5.0);
        assert_eq!(round_weight(0.0004), 0.0);
    }

    #[test]
    fn test_weight_reading_rounds() {
        let reading = WeightReading::new(1.23449, datetime!(2024-01-01 10:00 UTC));
        assert_eq!(reading.weight, 1.234);
    }

    #[test]
    fn test_ticket_validate_weight() {
        let mut ticket = Ticket {
            weight: 1.5,
            total_value: "R$ 10,00".to_string(),
            timestamp: "2024-01-01T10:00:00Z".to_string(),
        };
        assert_eq!(ticket.validate_weight(), Ok(1.5));

        ticket.weight = 0.0;
        assert!(ticket.validate_weight().is_err());

        ticket.weight = f64::NAN;
        assert!(ticket.validate_weight().is_err());
    }

    #[test]
    fn test_receipt_text() {
        let ticket = Ticket {
            weight: 1.5,
            total_value: "R$ 12,50".to_string(),
            timestamp: "2024-01-01T10:00:00Z".to_string(),
        };
        let text = Receipt::from(&ticket).to_string();
        assert_eq!(
            text,
            "Date/Time: 2024-01-01T10:00:00Z\nWeight: 1.500 kg\nTotal: R$ 12,50\n"
        );
    }

    #[test]
    fn test_weight_record_printed_defaults_to_true() {
        let json = r#"{"id":null,"weight":1.0,"total_value":2.5,"timestamp":"2024-01-01T10:00:00Z"}"#;
        let record: WeightRecord = serde_json::from_str(json).unwrap();
        assert!(record.printed);
        assert_eq!(record.timestamp, datetime!(2024-01-01 10:00 UTC));
    }

    #[test]
    fn test_printer_settings_default() {
        let settings = PrinterSettings::default();
        assert!(settings.printer_name.is_empty());
        assert_eq!(settings.margins, Margins::default());
        assert_eq!(settings.margins.top, 0.0);
    }

    #[test]
    fn test_printer_settings_json_shape() {
        let settings = PrinterSettings {
            printer_name: "X".to_string(),
            margins: Margins {
                top: 1.0,
                bottom: 2.0,
                left: 3.0,
                right: 4.0,
            },
        };
        let value = serde_json::to_value(&settings).unwrap();
        assert_eq!(value["printer_name"], "X");
        assert_eq!(value["margins"]["left"], 3.0);
    }
}

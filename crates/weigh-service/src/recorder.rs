//! Ticket recording.
//!
//! Recording a ticket prints its receipt, normalizes the display text the
//! kiosk sent and appends a [`WeightRecord`]. The receipt is printed before
//! the text is parsed, so a ticket with a malformed total still leaves a
//! receipt file behind but no record.

use std::path::PathBuf;
use std::sync::Arc;

use serde::Serialize;
use tracing::{info, warn};

use weigh_types::{ParseError, Receipt, Ticket, WeightRecord, parse_currency, parse_timestamp};

use crate::state::AppState;

/// Errors from recording a ticket.
#[derive(Debug, thiserror::Error)]
pub enum RecordError {
    /// The ticket's content could not be normalized.
    #[error(transparent)]
    Invalid(#[from] ParseError),
    /// The receipt could not be printed.
    #[error("Print failed: {0}")]
    Print(#[from] weigh_core::Error),
    /// The record could not be stored.
    #[error(transparent)]
    Store(#[from] weigh_store::Error),
}

/// A ticket that was printed and recorded.
#[derive(Debug, Clone, Serialize)]
pub struct RecordedTicket {
    /// Always `"printed"`.
    pub status: &'static str,
    /// Receipt file written by the printer.
    pub file: PathBuf,
    /// The stored record.
    pub record: WeightRecord,
}

/// Prints and records tickets submitted by the kiosk.
pub struct TicketRecorder {
    state: Arc<AppState>,
}

impl TicketRecorder {
    /// Create a new recorder.
    pub fn new(state: Arc<AppState>) -> Self {
        Self { state }
    }

    /// Print the ticket's receipt and append its record.
    pub async fn record(&self, ticket: &Ticket) -> Result<RecordedTicket, RecordError> {
        let weight = ticket.validate_weight()?;

        let job = self.state.printer.print(&Receipt::from(ticket)).await?;

        let normalized = parse_currency(&ticket.total_value).and_then(|total| {
            parse_timestamp(&ticket.timestamp, self.state.utc_offset).map(|at| (total, at))
        });
        let (total_value, timestamp) = normalized.inspect_err(|e| {
            warn!(
                "Receipt {} printed but ticket not recorded: {}",
                job.file.display(),
                e
            );
        })?;

        let record = {
            let store = self.state.store.lock().await;
            store.save_record(&WeightRecord::new(weight, total_value, timestamp))?
        };

        info!(
            "Recorded sale {:?}: {:.3} kg, total {:.2}",
            record.id, record.weight, record.total_value
        );

        Ok(RecordedTicket {
            status: "printed",
            file: job.file,
            record,
        })
    }
}

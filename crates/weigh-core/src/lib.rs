//! Scale and receipt printer capabilities for the weigh station.
//!
//! The station hardware is modeled as two traits, [`ScaleReader`] and
//! [`PrinterDriver`], with simulated implementations:
//!
//! - [`SimulatedScale`]: uniform pseudo-random weights after a stabilization
//!   delay
//! - [`FilePrinter`]: receipts written as timestamp-named text files
//!
//! # Quick Start
//!
//! ```no_run
//! use time::UtcOffset;
//! use weigh_core::{FilePrinter, PrinterDriver, ScaleReader, SimulatedScale};
//! use weigh_types::Receipt;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let scale = SimulatedScale::new(UtcOffset::UTC);
//!     let reading = scale.read_weight().await?;
//!
//!     let printer = FilePrinter::new("tickets", UtcOffset::UTC);
//!     let job = printer
//!         .print(&Receipt {
//!             timestamp: reading.timestamp.to_string(),
//!             weight: reading.weight,
//!             total_value: "R$ 10,00".to_string(),
//!         })
//!         .await?;
//!     println!("Printed to {}", job.file.display());
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod printer;
pub mod scale;
pub mod traits;
pub mod util;

pub use error::{Error, Result};
pub use printer::{FilePrinter, SIMULATED_PRINTERS};
pub use scale::SimulatedScale;
pub use traits::{PrintJob, PrinterDriver, ScaleReader};
pub use util::{now_in, system_utc_offset};

// Re-export the domain types for convenience
pub use weigh_types as types;

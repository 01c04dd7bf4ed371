//! Trait abstractions for station hardware.
//!
//! The service only talks to a [`ScaleReader`] and a [`PrinterDriver`], so a
//! real scale or printer backend can replace the simulated ones without
//! touching the HTTP layer.

use std::path::PathBuf;

use async_trait::async_trait;

use weigh_types::{Receipt, WeightReading};

use crate::error::Result;

/// Trait abstracting a weighing scale.
///
/// # Example
///
/// ```ignore
/// use weigh_core::{ScaleReader, Result};
///
/// async fn print_weight<S: ScaleReader>(scale: &S) -> Result<()> {
///     let reading = scale.read_weight().await?;
///     println!("{:.3} kg", reading.weight);
///     Ok(())
/// }
/// ```
#[async_trait]
pub trait ScaleReader: Send + Sync {
    /// Wait for the load to stabilize and return the reading.
    ///
    /// Implementations suspend only the calling task while waiting.
    async fn read_weight(&self) -> Result<WeightReading>;
}

/// Outcome of a printed receipt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrintJob {
    /// File the receipt was written to.
    pub file: PathBuf,
}

/// Trait abstracting a receipt printer.
#[async_trait]
pub trait PrinterDriver: Send + Sync {
    /// Names of the printers this driver can reach.
    fn printers(&self) -> Vec<String>;

    /// Check if the printer is connected.
    async fn is_connected(&self) -> bool;

    /// Print a receipt.
    async fn print(&self, receipt: &Receipt) -> Result<PrintJob>;

    /// Send a test page.
    async fn test_print(&self) -> Result<()>;
}

//! Application state shared across handlers.
//!
//! The store and the printer settings document are each behind a
//! [`Mutex`], so concurrent requests serialize their writes. Scale reads and
//! printing run outside any lock; a slow scale only delays its own request.

use std::sync::Arc;

use time::UtcOffset;
use tokio::sync::Mutex;

use weigh_core::{FilePrinter, PrinterDriver, ScaleReader, SimulatedScale};
use weigh_store::{PrinterSettingsStore, Store};

use crate::config::{Config, ConfigError, ValidationError};

/// Shared application state.
pub struct AppState {
    /// The record store (wrapped in Mutex for thread-safe access).
    pub store: Mutex<Store>,
    /// The printer settings document.
    pub printer_settings: Mutex<PrinterSettingsStore>,
    /// Scale used by the weight endpoint.
    pub scale: Arc<dyn ScaleReader>,
    /// Printer receipts are sent to.
    pub printer: Arc<dyn PrinterDriver>,
    /// The station's UTC offset.
    pub utc_offset: UtcOffset,
    /// Configuration the state was built from.
    pub config: Config,
}

impl AppState {
    /// Create application state with the simulated scale and file printer.
    ///
    /// The station offset, scale range and stabilization delay are taken
    /// from `config`.
    pub fn new(store: Store, config: Config) -> Result<Arc<Self>, ConfigError> {
        let utc_offset = config.station.resolve_offset()?;

        let scale = SimulatedScale::new(utc_offset)
            .with_range(config.scale.min_weight_kg, config.scale.max_weight_kg)
            .map_err(|e| {
                ConfigError::Validation(vec![ValidationError {
                    field: "scale".to_string(),
                    message: e.to_string(),
                }])
            })?
            .with_stabilization(config.scale.stabilization());
        let printer = FilePrinter::new(&config.storage.receipts_dir, utc_offset);

        Ok(Self::with_hardware(
            store,
            config,
            utc_offset,
            Arc::new(scale),
            Arc::new(printer),
        ))
    }

    /// Create application state around custom scale and printer backends.
    pub fn with_hardware(
        store: Store,
        config: Config,
        utc_offset: UtcOffset,
        scale: Arc<dyn ScaleReader>,
        printer: Arc<dyn PrinterDriver>,
    ) -> Arc<Self> {
        let printer_settings = PrinterSettingsStore::new(&config.storage.printer_settings);
        Arc::new(Self {
            store: Mutex::new(store),
            printer_settings: Mutex::new(printer_settings),
            scale,
            printer,
            utc_offset,
            config,
        })
    }
}

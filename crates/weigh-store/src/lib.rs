//! Local data persistence for the weigh station.
//!
//! This crate provides SQLite-based storage for recorded sales and the price
//! per kilogram, plus a JSON document for printer settings.
//!
//! # Features
//!
//! - Append-only weight records with date range queries
//! - Daily aggregate (count, total value, average weight)
//! - Price per kilogram in a key-value config table
//! - Printer settings document with defaults
//!
//! # Example
//!
//! ```no_run
//! use weigh_store::{RecordQuery, Store};
//!
//! let store = Store::open_default()?;
//!
//! let price = store.get_price()?;
//! let records = store.list_records(&RecordQuery::new())?;
//! println!("{} sales at {:.2}/kg", records.len(), price);
//! # Ok::<(), weigh_store::Error>(())
//! ```

mod error;
mod printer_settings;
mod queries;
mod schema;
mod store;

use std::path::PathBuf;

pub use error::{Error, Result};
pub use printer_settings::PrinterSettingsStore;
pub use queries::RecordQuery;
pub use schema::{DEFAULT_PRICE_PER_KG, PRICE_PER_KG_KEY};
pub use store::Store;

/// Directory holding the station's persisted state.
///
/// - Linux: `~/.local/share/weighstation`
/// - macOS: `~/Library/Application Support/weighstation`
/// - Windows: `C:\Users\<user>\AppData\Local\weighstation`
pub fn default_data_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("weighstation")
}

/// Default database path following platform conventions.
pub fn default_db_path() -> PathBuf {
    default_data_dir().join("data.db")
}

/// Default printer settings document path.
pub fn default_printer_settings_path() -> PathBuf {
    default_data_dir().join("printer_config.json")
}

/// Default directory for printed receipts.
pub fn default_receipts_dir() -> PathBuf {
    default_data_dir().join("tickets")
}

//! HTTP API for a weigh-and-print point-of-sale station.
//!
//! This crate provides a service that:
//! - Reads stabilized weights from a scale
//! - Prints receipts and records each sale in the local database
//! - Reports sales by date range and today's aggregate
//! - Manages the price per kilogram and printer settings
//!
//! # REST API Endpoints
//!
//! - `GET /api/health` - Service health check
//! - `GET /weight` - Stabilized scale reading
//! - `POST /print_ticket` - Print a receipt and record the sale
//! - `GET /weight_records` - Sales, optionally filtered by `start_date`/`end_date`
//! - `GET /weight_stats` - Today's sales count, total and average weight
//! - `GET|POST /admin/price` - Price per kilogram
//! - `GET /admin/printers` - Available printers
//! - `GET|POST /admin/printer_settings` - Printer settings document
//! - `POST /admin/test_print` - Send a test page
//! - `GET /admin/printer_status` - Printer connection status
//!
//! # Configuration
//!
//! The service reads configuration from `~/.config/weighstation/server.toml`:
//!
//! ```toml
//! [server]
//! bind = "127.0.0.1:8000"
//!
//! [storage]
//! path = "~/.local/share/weighstation/data.db"
//! printer_settings = "~/.local/share/weighstation/printer_config.json"
//! receipts_dir = "~/.local/share/weighstation/tickets"
//!
//! [scale]
//! min_weight_kg = 0.1
//! max_weight_kg = 5.0
//! stabilization_ms = 2000
//!
//! [station]
//! utc_offset = "-03:00"
//! ```

pub mod api;
pub mod config;
pub mod recorder;
pub mod state;

pub use config::{
    Config, ConfigError, ScaleConfig, ServerConfig, StationConfig, StorageConfig, ValidationError,
};
pub use recorder::{RecordError, RecordedTicket, TicketRecorder};
pub use state::AppState;

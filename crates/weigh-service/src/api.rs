//! REST API endpoints for the weigh station.
//!
//! # Concurrency and Lock Acquisition
//!
//! - **`state.store`** (Mutex): acquired for database operations and held
//!   only for the duration of a single statement.
//! - **`state.printer_settings`** (Mutex): serializes settings writes.
//!
//! No handler holds both locks, and neither lock is held while waiting on
//! the scale or the printer.
//!
//! ## Error Handling
//!
//! All endpoints return structured JSON errors via [`AppError`]. Malformed
//! client input returns HTTP 400; store, filesystem and hardware failures
//! return HTTP 500 with the underlying error text.
//!
//! # Example
//!
//! ```ignore
//! use weigh_service::api;
//!
//! let app = api::router().with_state(state);
//! ```

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use tracing::{info, warn};

use weigh_store::RecordQuery;
use weigh_types::{
    DailyStats, ParseError, PrinterSettings, RangeBound, Ticket, WeightReading, WeightRecord,
    parse_range_bound,
};

use crate::recorder::{RecordError, RecordedTicket, TicketRecorder};
use crate::state::AppState;

/// Create the API router.
pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/health", get(health))
        // Kiosk
        .route("/weight", get(get_weight))
        .route("/print_ticket", post(print_ticket))
        .route("/weight_records", get(get_weight_records))
        .route("/weight_stats", get(get_weight_stats))
        // Administration
        .route("/admin/price", get(get_price).post(set_price))
        .route("/admin/printers", get(list_printers))
        .route(
            "/admin/printer_settings",
            get(get_printer_settings).post(update_printer_settings),
        )
        .route("/admin/test_print", post(test_print))
        .route("/admin/printer_status", get(printer_status))
}

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub version: &'static str,
    #[serde(with = "time::serde::rfc3339")]
    pub timestamp: OffsetDateTime,
    /// Number of recorded sales, absent if the database is unreadable.
    pub records: Option<u64>,
}

/// Health check endpoint.
async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let records = state.store.lock().await.count_records();
    let (status, records) = match records {
        Ok(count) => ("ok", Some(count)),
        Err(e) => {
            warn!("Health check could not count records: {}", e);
            ("degraded", None)
        }
    };

    Json(HealthResponse {
        status,
        version: env!("CARGO_PKG_VERSION"),
        timestamp: OffsetDateTime::now_utc(),
        records,
    })
}

/// Read a stabilized weight from the scale.
async fn get_weight(State(state): State<Arc<AppState>>) -> Result<Json<WeightReading>, AppError> {
    let reading = state.scale.read_weight().await?;
    Ok(Json(reading))
}

/// Print a ticket's receipt and record the sale.
async fn print_ticket(
    State(state): State<Arc<AppState>>,
    Json(ticket): Json<Ticket>,
) -> Result<Json<RecordedTicket>, AppError> {
    let recorded = TicketRecorder::new(state).record(&ticket).await?;
    Ok(Json(recorded))
}

/// Date range parameters for record listing.
///
/// Each bound is a `YYYY-MM-DD` date (covering the whole station-local day)
/// or an ISO-8601 date-time. Empty values are ignored.
#[derive(Debug, Default, Deserialize)]
pub struct RecordsQuery {
    pub start_date: Option<String>,
    pub end_date: Option<String>,
}

impl RecordsQuery {
    /// Convert the parameters into a store query.
    pub fn to_record_query(
        &self,
        offset: time::UtcOffset,
    ) -> Result<RecordQuery, ParseError> {
        let mut query = RecordQuery::new();

        if let Some(start) = non_empty(&self.start_date) {
            query = query.since(parse_range_bound(start, RangeBound::Start, offset)?);
        }
        if let Some(end) = non_empty(&self.end_date) {
            query = query.until(parse_range_bound(end, RangeBound::End, offset)?);
        }

        Ok(query)
    }
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// Records list response.
#[derive(Debug, Serialize)]
pub struct RecordsResponse {
    pub records: Vec<WeightRecord>,
}

/// List recorded sales, newest first.
async fn get_weight_records(
    State(state): State<Arc<AppState>>,
    Query(params): Query<RecordsQuery>,
) -> Result<Json<RecordsResponse>, AppError> {
    let query = params.to_record_query(state.utc_offset)?;
    let records = state.store.lock().await.list_records(&query)?;
    Ok(Json(RecordsResponse { records }))
}

/// Aggregate of today's sales in station-local time.
async fn get_weight_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<DailyStats>, AppError> {
    let stats = state.store.lock().await.today_stats(state.utc_offset)?;
    Ok(Json(stats))
}

/// Price per kilogram.
#[derive(Debug, Serialize, Deserialize)]
pub struct Price {
    pub price_per_kg: f64,
}

/// Response to a price update.
#[derive(Debug, Serialize)]
pub struct PriceUpdateResponse {
    pub status: &'static str,
    pub price_per_kg: f64,
}

async fn get_price(State(state): State<Arc<AppState>>) -> Result<Json<Price>, AppError> {
    let price_per_kg = state.store.lock().await.get_price()?;
    Ok(Json(Price { price_per_kg }))
}

async fn set_price(
    State(state): State<Arc<AppState>>,
    Json(request): Json<Price>,
) -> Result<Json<PriceUpdateResponse>, AppError> {
    if !request.price_per_kg.is_finite() || request.price_per_kg < 0.0 {
        return Err(AppError::BadRequest(format!(
            "Invalid price per kg: {}",
            request.price_per_kg
        )));
    }

    let price_per_kg = {
        let store = state.store.lock().await;
        store.set_price(request.price_per_kg)?;
        store.get_price()?
    };

    Ok(Json(PriceUpdateResponse {
        status: "ok",
        price_per_kg,
    }))
}

/// Printers list response.
#[derive(Debug, Serialize)]
pub struct PrintersResponse {
    pub printers: Vec<String>,
}

async fn list_printers(State(state): State<Arc<AppState>>) -> Json<PrintersResponse> {
    Json(PrintersResponse {
        printers: state.printer.printers(),
    })
}

async fn get_printer_settings(
    State(state): State<Arc<AppState>>,
) -> Result<Json<PrinterSettings>, AppError> {
    let settings = state.printer_settings.lock().await.load()?;
    Ok(Json(settings))
}

/// Response to a printer settings update.
#[derive(Debug, Serialize)]
pub struct SettingsUpdateResponse {
    pub status: &'static str,
    pub settings: PrinterSettings,
}

async fn update_printer_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<PrinterSettings>,
) -> Result<Json<SettingsUpdateResponse>, AppError> {
    state.printer_settings.lock().await.save(&settings)?;
    Ok(Json(SettingsUpdateResponse {
        status: "success",
        settings,
    }))
}

/// Response to a test print.
#[derive(Debug, Serialize)]
pub struct TestPrintResponse {
    pub status: &'static str,
    pub message: String,
}

async fn test_print(State(state): State<Arc<AppState>>) -> Result<Json<TestPrintResponse>, AppError> {
    state.printer.test_print().await?;
    info!("Test print sent");
    Ok(Json(TestPrintResponse {
        status: "success",
        message: "Test print sent".to_string(),
    }))
}

/// Printer connection status.
#[derive(Debug, Serialize)]
pub struct PrinterStatusResponse {
    pub is_connected: bool,
}

async fn printer_status(State(state): State<Arc<AppState>>) -> Json<PrinterStatusResponse> {
    Json(PrinterStatusResponse {
        is_connected: state.printer.is_connected().await,
    })
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest(String),
    Store(weigh_store::Error),
    Hardware(weigh_core::Error),
}

impl From<weigh_store::Error> for AppError {
    fn from(e: weigh_store::Error) -> Self {
        AppError::Store(e)
    }
}

impl From<weigh_core::Error> for AppError {
    fn from(e: weigh_core::Error) -> Self {
        AppError::Hardware(e)
    }
}

impl From<ParseError> for AppError {
    fn from(e: ParseError) -> Self {
        AppError::BadRequest(e.to_string())
    }
}

impl From<RecordError> for AppError {
    fn from(e: RecordError) -> Self {
        match e {
            RecordError::Invalid(e) => e.into(),
            RecordError::Print(e) => AppError::Hardware(e),
            RecordError::Store(e) => AppError::Store(e),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match self {
            AppError::BadRequest(msg) => {
                warn!("Rejected request: {}", msg);
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::Store(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
            AppError::Hardware(e) => (StatusCode::INTERNAL_SERVER_ERROR, e.to_string()),
        };

        let body = serde_json::json!({
            "error": message,
        });

        (status, Json(body)).into_response()
    }
}

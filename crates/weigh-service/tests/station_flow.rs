//! End-to-end tests for the weigh station service.
//!
//! These drive the HTTP router built from a [`Config`] against a file-backed
//! database, the way the binary wires it up.

use std::path::Path;
use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use tower::ServiceExt;

use weigh_service::{AppState, Config, ScaleConfig, StationConfig, api};
use weigh_store::Store;

fn station_config(dir: &Path) -> Config {
    let mut config = Config::default();
    config.storage.path = dir.join("data.db");
    config.storage.printer_settings = dir.join("printer_config.json");
    config.storage.receipts_dir = dir.join("tickets");
    config.scale = ScaleConfig {
        min_weight_kg: 2.0,
        max_weight_kg: 2.0,
        stabilization_ms: 0,
    };
    config.station = StationConfig {
        utc_offset: Some("-03:00".to_string()),
    };
    config
}

fn start_station(config: &Config) -> Arc<AppState> {
    config.validate().unwrap();
    let store = Store::open(&config.storage.path).unwrap();
    AppState::new(store, config.clone()).unwrap()
}

async fn call(
    state: &Arc<AppState>,
    method: &str,
    uri: &str,
    body: Option<serde_json::Value>,
) -> (StatusCode, serde_json::Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            request = request.header("content-type", "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = api::router()
        .with_state(Arc::clone(state))
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_weigh_price_and_print_flow() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = station_config(temp_dir.path());
    let state = start_station(&config);

    let (status, _) = call(
        &state,
        "POST",
        "/admin/price",
        Some(serde_json::json!({ "price_per_kg": 6.25 })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let (_, reading) = call(&state, "GET", "/weight", None).await;
    assert_eq!(reading["weight"], 2.0);

    let (status, printed) = call(
        &state,
        "POST",
        "/print_ticket",
        Some(serde_json::json!({
            "weight": 2.0,
            "total_value": "R$ 12,50",
            "timestamp": "2024-03-10 14:05:00",
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(printed["record"]["total_value"], 12.5);
    assert_eq!(printed["record"]["timestamp"], "2024-03-10T14:05:00-03:00");

    let file = printed["file"].as_str().unwrap();
    assert!(Path::new(file).starts_with(temp_dir.path().join("tickets")));
    let receipt = std::fs::read_to_string(file).unwrap();
    assert!(receipt.contains("Weight: 2.000 kg"));
    assert!(receipt.contains("Total: R$ 12,50"));
}

#[tokio::test]
async fn test_state_survives_restart() {
    let temp_dir = tempfile::tempdir().unwrap();
    let config = station_config(temp_dir.path());

    {
        let state = start_station(&config);
        call(
            &state,
            "POST",
            "/admin/price",
            Some(serde_json::json!({ "price_per_kg": 7.5 })),
        )
        .await;
        call(
            &state,
            "POST",
            "/admin/printer_settings",
            Some(serde_json::json!({
                "printer_name": "Thermal Printer 2",
                "margins": { "top": 5.0, "bottom": 5.0, "left": 2.0, "right": 2.0 },
            })),
        )
        .await;
        call(
            &state,
            "POST",
            "/print_ticket",
            Some(serde_json::json!({
                "weight": 1.25,
                "total_value": "R$ 9,38",
                "timestamp": "2024-03-10T09:00:00-03:00",
            })),
        )
        .await;
    }

    let state = start_station(&config);

    let (_, price) = call(&state, "GET", "/admin/price", None).await;
    assert_eq!(price["price_per_kg"], 7.5);

    let (_, settings) = call(&state, "GET", "/admin/printer_settings", None).await;
    assert_eq!(settings["printer_name"], "Thermal Printer 2");
    assert_eq!(settings["margins"]["left"], 2.0);

    let (_, records) = call(
        &state,
        "GET",
        "/weight_records?start_date=2024-03-10&end_date=2024-03-10",
        None,
    )
    .await;
    let records = records["records"].as_array().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0]["weight"], 1.25);
    assert_eq!(records[0]["total_value"], 9.38);

    let (_, health) = call(&state, "GET", "/api/health", None).await;
    assert_eq!(health["records"], 1);
}

#[tokio::test]
async fn test_rejected_ticket_is_not_recorded() {
    let temp_dir = tempfile::tempdir().unwrap();
    let state = start_station(&station_config(temp_dir.path()));

    let (status, body) = call(
        &state,
        "POST",
        "/print_ticket",
        Some(serde_json::json!({
            "weight": 1.0,
            "total_value": "R$ 1,00",
            "timestamp": "not a date",
        })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("not a date"));

    let (_, records) = call(&state, "GET", "/weight_records", None).await;
    assert!(records["records"].as_array().unwrap().is_empty());
}

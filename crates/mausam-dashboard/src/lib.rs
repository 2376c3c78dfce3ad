use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use axum::{
    extract::{Query, State},
    http::{header, StatusCode},
    response::IntoResponse,
    routing::{get, post},
    Json, Router,
};
use mausam_core::{Coordinates, Geocoder, Location, LocationError};
use opentelemetry::metrics::{Counter, MeterProvider};
use opentelemetry::KeyValue;
use opentelemetry_prometheus::exporter;
use opentelemetry_sdk::metrics::SdkMeterProvider;
use prometheus::{Encoder, Registry, TextEncoder};
use serde::Deserialize;

pub mod dashboard;
pub mod loader;
pub mod state;
pub mod view;

pub use dashboard::{Dashboard, DashboardSettings, Services};
pub use loader::FixedPosition;
pub use state::{Action, DashboardState, Phase};
pub use view::DashboardView;

/// Search queries shorter than this (after trimming) are not sent upstream
pub const MIN_QUERY_CHARS: usize = 3;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("metrics exporter: {0}")]
    Metrics(String),
}

pub struct AppState {
    ready: AtomicBool,
    registry: Registry,
    #[allow(dead_code)]
    provider: SdkMeterProvider,
    requests_total: Counter<u64>,
    dashboard: Dashboard,
}

impl AppState {
    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    fn count(&self, route: &'static str) {
        self.requests_total.add(1, &[KeyValue::new("route", route)]);
    }
}

pub fn build_app(
    services: Services,
    settings: DashboardSettings,
) -> Result<(Router, Arc<AppState>), DashboardError> {
    // Prometheus exporter via OpenTelemetry
    let registry = Registry::new();
    let reader = exporter()
        .with_registry(registry.clone())
        .build()
        .map_err(|e| DashboardError::Metrics(e.to_string()))?;
    let provider = SdkMeterProvider::builder().with_reader(reader).build();
    let meter = provider.meter("mausam");

    let requests_total = meter
        .u64_counter("mausam_requests_total")
        .with_description("Total HTTP requests served")
        .init();

    let state = Arc::new(AppState {
        ready: AtomicBool::new(false),
        registry,
        provider,
        requests_total,
        dashboard: Dashboard::new(services, settings),
    });

    let router = Router::new()
        .route("/healthz", get(healthz))
        .route("/readyz", get(readyz))
        .route("/metrics", get(metrics))
        .route("/api/v1/dashboard", get(dashboard_view))
        .route("/api/v1/forecast/daily", get(daily_forecast))
        .route("/api/v1/search", get(search))
        .route("/api/v1/location", post(select_location))
        .route("/api/v1/device-location", post(device_location))
        .route("/api/v1/units/toggle", post(toggle_units))
        .route("/api/v1/retry", post(retry))
        .with_state(Arc::clone(&state));

    Ok((router, state))
}

pub fn set_ready(state: &Arc<AppState>, is_ready: bool) {
    state.ready.store(is_ready, Ordering::Relaxed);
}

async fn healthz(State(state): State<Arc<AppState>>) -> StatusCode {
    state.count("healthz");
    StatusCode::OK
}

async fn readyz(State(state): State<Arc<AppState>>) -> StatusCode {
    if state.ready.load(Ordering::Relaxed) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

async fn metrics(
    State(state): State<Arc<AppState>>,
) -> (
    [(axum::http::header::HeaderName, axum::http::HeaderValue); 1],
    String,
) {
    let encoder = TextEncoder::new();
    let metric_families = state.registry.gather();
    let mut buf = Vec::new();
    if let Err(e) = encoder.encode(&metric_families, &mut buf) {
        tracing::warn!(error=?e, "failed to encode metrics");
    }
    let body = String::from_utf8(buf).unwrap_or_default();
    let header = (
        header::CONTENT_TYPE,
        axum::http::HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
    );
    ([header], body)
}

fn error_body(status: StatusCode, message: impl Into<String>) -> axum::response::Response {
    (status, Json(serde_json::json!({ "error": message.into() }))).into_response()
}

async fn dashboard_view(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    state.count("dashboard");
    Json(DashboardView::from_state(&state.dashboard.state().await))
}

async fn daily_forecast(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    state.count("forecast_daily");
    let current = state.dashboard.state().await;
    match current.phase.snapshot() {
        Some(snapshot) => (StatusCode::OK, Json(snapshot.daily.clone())).into_response(),
        None => StatusCode::NO_CONTENT.into_response(),
    }
}

#[derive(Deserialize)]
struct SearchQuery {
    #[serde(default)]
    q: String,
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> impl IntoResponse {
    state.count("search");
    let q = query.q.trim();
    if q.chars().count() < MIN_QUERY_CHARS {
        return (StatusCode::OK, Json(Vec::<Location>::new())).into_response();
    }
    match state.dashboard.services().geocoder.search(q).await {
        Ok(found) => (StatusCode::OK, Json(found)).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, query = q, "search failed");
            error_body(StatusCode::BAD_GATEWAY, e.to_string())
        }
    }
}

#[derive(Debug, Deserialize)]
struct LocationRequest {
    lat: f64,
    lon: f64,
    name: Option<String>,
    #[serde(default)]
    country: String,
    state: Option<String>,
}

fn valid_coordinates(lat: f64, lon: f64) -> bool {
    (-90.0..=90.0).contains(&lat) && (-180.0..=180.0).contains(&lon)
}

async fn select_location(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LocationRequest>,
) -> impl IntoResponse {
    state.count("location");
    if !valid_coordinates(req.lat, req.lon) {
        return error_body(StatusCode::BAD_REQUEST, "coordinates out of range");
    }
    let location = Location {
        name: req
            .name
            .unwrap_or_else(|| format!("{:.2}, {:.2}", req.lat, req.lon)),
        country: req.country,
        state: req.state,
        lat: req.lat,
        lon: req.lon,
    };
    let next = state
        .dashboard
        .dispatch(Action::SelectLocation(location))
        .await;
    Json(DashboardView::from_state(&next)).into_response()
}

/// What the browser reports after asking for the device position
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum DeviceReport {
    Position { lat: f64, lon: f64 },
    Failure { error_code: u16 },
}

async fn device_location(
    State(state): State<Arc<AppState>>,
    Json(report): Json<DeviceReport>,
) -> impl IntoResponse {
    state.count("device_location");
    let action = match report {
        DeviceReport::Position { lat, lon } => {
            if !valid_coordinates(lat, lon) {
                return error_body(StatusCode::BAD_REQUEST, "coordinates out of range");
            }
            Action::DeviceLocated(Coordinates::new(lat, lon))
        }
        DeviceReport::Failure { error_code } => {
            Action::DeviceLocationFailed(LocationError::from_code(error_code))
        }
    };
    let next = state.dashboard.dispatch(action).await;
    Json(DashboardView::from_state(&next)).into_response()
}

async fn toggle_units(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    state.count("units_toggle");
    let next = state.dashboard.dispatch(Action::ToggleUnits).await;
    Json(DashboardView::from_state(&next))
}

async fn retry(State(state): State<Arc<AppState>>) -> Json<DashboardView> {
    state.count("retry");
    let next = state.dashboard.dispatch(Action::Retry).await;
    Json(DashboardView::from_state(&next))
}

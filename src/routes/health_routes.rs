//! Health check endpoints.

use axum::extract::State;
use axum::response::IntoResponse;
use axum::{routing::get, Json, Router};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use crate::state::AppState;

/// Registers health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    timestamp: String,
    service: &'static str,
    uptime: f64,
}

/// Simple health check endpoint.
///
/// Always returns 200 with the service name, the current time, and how
/// long the process has been up.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse {
        status: "ok",
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
        service: "bands-api",
        uptime: state.started_at.elapsed().as_secs_f64(),
    })
}

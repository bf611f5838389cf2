//! HTTP route definitions and handlers.
//!
//! This module organizes all HTTP endpoints into logical groups: the bands
//! resource, health checks, and the metrics exposition endpoint.

mod band_routes;
mod health_routes;
mod metrics_routes;

use axum::middleware;
use axum::Router;

use crate::metrics::track_requests;
use crate::state::AppState;

/// Creates the application router with all configured routes.
///
/// Band and health routes pass through the request-timing layer; the
/// metrics route is merged outside it so scraping never shows up in its
/// own series.
pub fn create_router(state: AppState) -> Router {
    Router::new()
        .merge(band_routes::routes())
        .merge(health_routes::routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), track_requests))
        .merge(metrics_routes::routes())
        .with_state(state)
}

//! Request-timing middleware.

use std::time::Instant;

use axum::extract::{MatchedPath, Request, State};
use axum::middleware::Next;
use axum::response::Response;

use super::recorder::MetricsRecorder;
use crate::state::AppState;

/// The exposition endpoint itself, which must never show up as a series.
const METRICS_PATH: &str = "/metrics";

/// Records one counter increment and one histogram observation per
/// completed request, labeled with `{method, path, status}`.
///
/// The path label uses the matched route template (e.g. `/bands/:id`) when
/// one is available, falling back to the raw request path, so path
/// parameters cannot explode label cardinality. A request whose response
/// future is dropped before completion goes unrecorded; that request is
/// simply undercounted.
pub async fn track_requests(
    State(state): State<AppState>,
    request: Request,
    next: Next,
) -> Response {
    let method = request.method().to_string();
    let raw_path = request.uri().path().to_string();
    let path = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched| matched.as_str().to_string())
        .unwrap_or_else(|| raw_path.clone());

    let start = Instant::now();
    let response = next.run(request).await;

    // Scraping /metrics must not feed back into the request series.
    if raw_path != METRICS_PATH {
        let duration_secs = start.elapsed().as_secs_f64();
        let status = response.status().as_u16();
        state.metrics.record_request(&method, &path, status);
        state
            .metrics
            .record_request_duration(&method, &path, status, duration_secs);
    }

    response
}

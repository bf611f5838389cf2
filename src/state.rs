//! Shared application state.
//!
//! Contains the state that is shared across all request handlers,
//! including configuration, the band service, and the metrics bundle.

use std::sync::Arc;
use std::time::Instant;

use crate::bands::BandService;
use crate::config::Config;
use crate::metrics::Metrics;

/// Application state shared across all HTTP handlers.
///
/// This state is cloned for each request handler and contains references
/// to the configuration, band service, and the metrics registry bundle.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration loaded at startup.
    pub config: Arc<Config>,
    /// Band business logic over the configured store.
    pub bands: BandService,
    /// Metrics registry plus request counter/histogram handles, shared by
    /// the timing middleware and the exposition endpoint.
    pub metrics: Metrics,
    /// Process start, for the health endpoint's uptime field.
    pub started_at: Instant,
}

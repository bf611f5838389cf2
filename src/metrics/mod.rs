//! Metrics collection and exposition for Prometheus.
//!
//! Counter, histogram, lazily-collected gauge, a name-unique registry
//! rendering the text exposition format, and the request-timing middleware
//! that feeds it.

mod counter;
mod gauge;
mod histogram;
mod labels;
mod memory;
mod middleware;
mod recorder;
mod registry;

pub use counter::Counter;
pub use gauge::{Gauge, GaugeCollector};
pub use histogram::{Histogram, HistogramSeries, DEFAULT_DURATION_BUCKETS};
pub use labels::LabelSet;
pub use middleware::track_requests;
pub use recorder::{Metrics, MetricsRecorder};
pub use registry::Registry;

use thiserror::Error;

/// Errors surfaced by the metrics subsystem. Registration failures are
/// programming errors and treated as startup-fatal by callers; recording
/// failures are logged and never propagate into the request path.
#[derive(Debug, Error)]
pub enum MetricsError {
    #[error("metric '{metric}' is already registered")]
    DuplicateMetric { metric: String },

    #[error("metric '{metric}' has invalid bucket boundaries: boundaries must be finite and strictly ascending")]
    InvalidBuckets { metric: String },

    #[error("metric '{metric}' rejected value {value}: {reason}")]
    InvalidValue {
        metric: String,
        value: f64,
        reason: &'static str,
    },

    #[error("collection for metric '{metric}' failed: {reason}")]
    Collection { metric: String, reason: String },
}

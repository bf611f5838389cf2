//! Metrics recording for the HTTP request path.

use std::sync::Arc;

use tracing::warn;

use super::counter::Counter;
use super::histogram::Histogram;
use super::labels::LabelSet;
use super::memory;
use super::registry::Registry;
use super::DEFAULT_DURATION_BUCKETS;

/// Trait for recording per-request metrics.
pub trait MetricsRecorder: Clone + Send + Sync + 'static {
    /// Records one completed HTTP request.
    fn record_request(&self, method: &str, path: &str, status: u16);

    /// Records the duration of one completed HTTP request.
    fn record_request_duration(&self, method: &str, path: &str, status: u16, duration_secs: f64);
}

/// The application metrics bundle: an explicitly constructed registry plus
/// handles to the request counter and duration histogram.
#[derive(Clone)]
pub struct Metrics {
    registry: Arc<Registry>,

    http_requests_total: Arc<Counter>,
    http_request_duration_seconds: Arc<Histogram>,
}

impl Metrics {
    /// Creates the registry and registers every application metric.
    /// Registration happens once at startup, so a duplicate name is a
    /// programming error and panics.
    pub fn new() -> Self {
        let registry = Arc::new(Registry::new());

        let http_requests_total = registry
            .register_counter("http_requests_total", "Total number of HTTP requests")
            .expect("Failed to register http_requests_total");

        let http_request_duration_seconds = registry
            .register_histogram(
                "http_request_duration_seconds",
                "HTTP request duration in seconds",
                DEFAULT_DURATION_BUCKETS,
            )
            .expect("Failed to register http_request_duration_seconds");

        registry
            .register_gauge(
                memory::PROCESS_MEMORY_METRIC,
                "Memory usage of the process by region",
                Box::new(memory::collect_memory_usage),
            )
            .expect("Failed to register process_memory_usage_bytes");

        Metrics {
            registry,
            http_requests_total,
            http_request_duration_seconds,
        }
    }

    /// Renders all metrics in Prometheus text format.
    pub fn render(&self) -> String {
        self.registry.render()
    }

    /// Current request count for one {method, path, status} combination.
    pub fn request_count(&self, method: &str, path: &str, status: u16) -> f64 {
        self.http_requests_total
            .value(&request_labels(method, path, status))
    }
}

impl Default for Metrics {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsRecorder for Metrics {
    fn record_request(&self, method: &str, path: &str, status: u16) {
        self.http_requests_total
            .inc(request_labels(method, path, status));
    }

    fn record_request_duration(&self, method: &str, path: &str, status: u16, duration_secs: f64) {
        if let Err(e) = self
            .http_request_duration_seconds
            .observe(request_labels(method, path, status), duration_secs)
        {
            warn!(error = %e, "dropping invalid duration observation");
        }
    }
}

fn request_labels(method: &str, path: &str, status: u16) -> LabelSet {
    LabelSet::from_pairs([
        ("method", method.to_string()),
        ("path", path.to_string()),
        ("status", status.to_string()),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_recording() {
        let metrics = Metrics::new();
        metrics.record_request("GET", "/bands", 200);
        metrics.record_request("GET", "/bands", 200);
        metrics.record_request_duration("GET", "/bands", 200, 0.02);

        assert_eq!(metrics.request_count("GET", "/bands", 200), 2.0);
        assert_eq!(metrics.request_count("GET", "/bands", 500), 0.0);

        let text = metrics.render();
        assert!(text.contains(
            "http_requests_total{method=\"GET\",path=\"/bands\",status=\"200\"} 2\n"
        ));
        assert!(text.contains(
            "http_request_duration_seconds_count{method=\"GET\",path=\"/bands\",status=\"200\"} 1\n"
        ));
    }

    #[test]
    fn test_invalid_duration_does_not_panic() {
        let metrics = Metrics::new();
        metrics.record_request_duration("GET", "/bands", 200, f64::NAN);
        let text = metrics.render();
        assert!(!text.contains("http_request_duration_seconds_count{"));
    }
}

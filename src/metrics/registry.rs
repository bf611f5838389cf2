use std::collections::BTreeMap;
use std::fmt::Write as _;
use std::sync::{Arc, RwLock};

use tracing::warn;

use super::counter::Counter;
use super::gauge::{Gauge, GaugeCollector};
use super::histogram::Histogram;
use super::labels::LabelSet;
use super::MetricsError;

enum Metric {
    Counter(Arc<Counter>),
    Histogram(Arc<Histogram>),
    Gauge(Arc<Gauge>),
}

impl Metric {
    fn type_name(&self) -> &'static str {
        match self {
            Metric::Counter(_) => "counter",
            Metric::Histogram(_) => "histogram",
            Metric::Gauge(_) => "gauge",
        }
    }

    fn help(&self) -> &str {
        match self {
            Metric::Counter(c) => c.help(),
            Metric::Histogram(h) => h.help(),
            Metric::Gauge(g) => g.help(),
        }
    }
}

/// Owns all metric instances for one process and renders the exposition
/// snapshot. Constructed explicitly at startup and passed by reference to
/// whoever records or serves metrics; there is no process-global registry.
pub struct Registry {
    metrics: RwLock<BTreeMap<String, Metric>>,
}

impl Registry {
    pub fn new() -> Self {
        Registry {
            metrics: RwLock::new(BTreeMap::new()),
        }
    }

    /// Registers a counter under a unique name and returns a shared handle.
    pub fn register_counter(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
    ) -> Result<Arc<Counter>, MetricsError> {
        let counter = Arc::new(Counter::new(name, help));
        self.insert(counter.name().to_string(), Metric::Counter(counter.clone()))?;
        Ok(counter)
    }

    /// Registers a histogram with fixed ascending bucket boundaries.
    pub fn register_histogram(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
        boundaries: &[f64],
    ) -> Result<Arc<Histogram>, MetricsError> {
        let histogram = Arc::new(Histogram::new(name, help, boundaries)?);
        self.insert(
            histogram.name().to_string(),
            Metric::Histogram(histogram.clone()),
        )?;
        Ok(histogram)
    }

    /// Registers a gauge whose values are produced by `collector` at
    /// snapshot time.
    pub fn register_gauge(
        &self,
        name: impl Into<String>,
        help: impl Into<String>,
        collector: GaugeCollector,
    ) -> Result<Arc<Gauge>, MetricsError> {
        let gauge = Arc::new(Gauge::new(name, help, collector));
        self.insert(gauge.name().to_string(), Metric::Gauge(gauge.clone()))?;
        Ok(gauge)
    }

    fn insert(&self, name: String, metric: Metric) -> Result<(), MetricsError> {
        let mut metrics = self
            .metrics
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if metrics.contains_key(&name) {
            return Err(MetricsError::DuplicateMetric { metric: name });
        }
        metrics.insert(name, metric);
        Ok(())
    }

    /// Renders every registered metric in the Prometheus text format,
    /// ordered by metric name with series ordered by label set. Gauge
    /// collectors run here; a failing collector drops only its own metric
    /// from the output.
    pub fn render(&self) -> String {
        let metrics = self
            .metrics
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        let mut out = String::new();
        for (name, metric) in metrics.iter() {
            let body = match metric {
                Metric::Counter(counter) => render_counter(name, counter),
                Metric::Histogram(histogram) => render_histogram(name, histogram),
                Metric::Gauge(gauge) => match gauge.collect() {
                    Ok(values) => render_gauge(name, &values),
                    Err(e) => {
                        warn!(metric = %name, error = %e, "gauge collection failed, omitting from snapshot");
                        continue;
                    }
                },
            };
            let _ = write!(
                out,
                "# HELP {} {}\n# TYPE {} {}\n{}",
                name,
                metric.help(),
                name,
                metric.type_name(),
                body
            );
        }
        out
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}

fn series_line(out: &mut String, name: &str, labels: &LabelSet, value: f64) {
    if labels.is_empty() {
        let _ = writeln!(out, "{} {}", name, value);
    } else {
        let _ = writeln!(out, "{}{{{}}} {}", name, labels.render(), value);
    }
}

fn render_counter(name: &str, counter: &Counter) -> String {
    let mut out = String::new();
    for (labels, value) in counter.snapshot() {
        series_line(&mut out, name, &labels, value);
    }
    out
}

fn render_gauge(name: &str, values: &[(LabelSet, f64)]) -> String {
    let mut out = String::new();
    for (labels, value) in values {
        series_line(&mut out, name, labels, *value);
    }
    out
}

fn render_histogram(name: &str, histogram: &Histogram) -> String {
    let mut out = String::new();
    for (labels, series) in histogram.snapshot() {
        let rendered = labels.render();
        for (boundary, count) in histogram.boundaries().iter().zip(&series.bucket_counts) {
            bucket_line(&mut out, name, &rendered, &boundary.to_string(), *count);
        }
        bucket_line(&mut out, name, &rendered, "+Inf", series.count);
        series_line(&mut out, &format!("{}_sum", name), &labels, series.sum);
        let _ = if labels.is_empty() {
            writeln!(out, "{}_count {}", name, series.count)
        } else {
            writeln!(out, "{}_count{{{}}} {}", name, rendered, series.count)
        };
    }
    out
}

fn bucket_line(out: &mut String, name: &str, rendered_labels: &str, le: &str, count: u64) {
    let _ = if rendered_labels.is_empty() {
        writeln!(out, "{}_bucket{{le=\"{}\"}} {}", name, le, count)
    } else {
        writeln!(
            out,
            "{}_bucket{{{},le=\"{}\"}} {}",
            name, rendered_labels, le, count
        )
    };
}

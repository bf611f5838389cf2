use super::labels::LabelSet;
use super::MetricsError;

/// A collector invoked at snapshot time, returning one value per label
/// combination. Plain function values keep collectors free of shared
/// mutable state.
pub type GaugeCollector =
    Box<dyn Fn() -> Result<Vec<(LabelSet, f64)>, MetricsError> + Send + Sync>;

/// A metric whose values are computed on demand rather than pushed.
///
/// Nothing is recorded from the request path; only a registry snapshot
/// invokes the collector. A failing collector is reported to the caller,
/// leaving other metrics unaffected.
pub struct Gauge {
    name: String,
    help: String,
    collector: GaugeCollector,
}

impl Gauge {
    pub(super) fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        collector: GaugeCollector,
    ) -> Self {
        Gauge {
            name: name.into(),
            help: help.into(),
            collector,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Runs the collector, returning values sorted by label set.
    pub fn collect(&self) -> Result<Vec<(LabelSet, f64)>, MetricsError> {
        let mut values = (self.collector)()?;
        values.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(values)
    }
}

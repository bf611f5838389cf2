use std::sync::Mutex;

use dashmap::DashMap;

use super::labels::LabelSet;
use super::MetricsError;

/// Bucket boundaries matching the defaults of common Prometheus clients,
/// tuned for request durations in seconds.
pub const DEFAULT_DURATION_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0,
];

/// A bucketed observation accumulator keyed by label set.
///
/// Buckets are cumulative: the count for boundary `b` includes every
/// observation `<= b`. The implicit `+Inf` bucket equals the series count.
pub struct Histogram {
    name: String,
    help: String,
    boundaries: Vec<f64>,
    series: DashMap<LabelSet, Mutex<HistogramSeries>>,
}

/// The mutable state of one histogram series. Updated under a per-series
/// mutex so a snapshot never sees a half-applied observation.
#[derive(Debug, Clone, PartialEq)]
pub struct HistogramSeries {
    /// Cumulative count per boundary, parallel to `Histogram::boundaries`.
    pub bucket_counts: Vec<u64>,
    pub sum: f64,
    pub count: u64,
}

impl HistogramSeries {
    fn new(buckets: usize) -> Self {
        HistogramSeries {
            bucket_counts: vec![0; buckets],
            sum: 0.0,
            count: 0,
        }
    }
}

impl Histogram {
    /// Boundaries must be finite and strictly ascending. An empty slice is
    /// allowed and leaves only the implicit `+Inf` bucket.
    pub(super) fn new(
        name: impl Into<String>,
        help: impl Into<String>,
        boundaries: &[f64],
    ) -> Result<Self, MetricsError> {
        let name = name.into();
        for window in boundaries.windows(2) {
            if window[0] >= window[1] {
                return Err(MetricsError::InvalidBuckets { metric: name });
            }
        }
        if boundaries.iter().any(|b| !b.is_finite()) {
            return Err(MetricsError::InvalidBuckets { metric: name });
        }
        Ok(Histogram {
            name,
            help: help.into(),
            boundaries: boundaries.to_vec(),
            series: DashMap::new(),
        })
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    pub fn boundaries(&self) -> &[f64] {
        &self.boundaries
    }

    /// Records `value` into the series for `labels`: every bucket whose
    /// boundary is `>= value` is incremented, along with the count and sum.
    ///
    /// Duration-style histograms have no meaningful negative or non-finite
    /// observations, so those are rejected and the series is left untouched.
    pub fn observe(&self, labels: LabelSet, value: f64) -> Result<(), MetricsError> {
        if !value.is_finite() || value < 0.0 {
            return Err(MetricsError::InvalidValue {
                metric: self.name.clone(),
                value,
                reason: "observations must be finite and non-negative",
            });
        }

        let entry = self
            .series
            .entry(labels)
            .or_insert_with(|| Mutex::new(HistogramSeries::new(self.boundaries.len())));
        let mut series = entry
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        for (i, boundary) in self.boundaries.iter().enumerate() {
            if value <= *boundary {
                series.bucket_counts[i] += 1;
            }
        }
        series.sum += value;
        series.count += 1;
        Ok(())
    }

    /// Point-in-time copy of one series, or `None` if it was never observed.
    pub fn series(&self, labels: &LabelSet) -> Option<HistogramSeries> {
        self.series.get(labels).map(|entry| {
            entry
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner())
                .clone()
        })
    }

    /// Point-in-time copy of all series, sorted by label set for
    /// deterministic rendering.
    pub fn snapshot(&self) -> Vec<(LabelSet, HistogramSeries)> {
        let mut out: Vec<(LabelSet, HistogramSeries)> = self
            .series
            .iter()
            .map(|entry| {
                (
                    entry.key().clone(),
                    entry
                        .value()
                        .lock()
                        .unwrap_or_else(|poisoned| poisoned.into_inner())
                        .clone(),
                )
            })
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn labels() -> LabelSet {
        LabelSet::from_pairs([("method", "GET"), ("path", "/bands")])
    }

    #[test]
    fn test_boundaries_must_ascend() {
        assert!(Histogram::new("h", "help", &[0.5, 0.1]).is_err());
        assert!(Histogram::new("h", "help", &[0.1, 0.1]).is_err());
        assert!(Histogram::new("h", "help", &[0.1, f64::NAN]).is_err());
        assert!(Histogram::new("h", "help", &[]).is_ok());
    }

    #[test]
    fn test_observation_arithmetic() {
        let histogram = Histogram::new("d", "help", &[0.1, 0.5, 1.0]).unwrap();
        for value in [0.05, 0.3, 0.3, 0.9, 2.0] {
            histogram.observe(labels(), value).unwrap();
        }

        let series = histogram.series(&labels()).unwrap();
        assert_eq!(series.count, 5);
        assert!((series.sum - 3.55).abs() < 1e-9);
        // Cumulative: |{v <= 0.1}| = 1, |{v <= 0.5}| = 3, |{v <= 1.0}| = 4.
        assert_eq!(series.bucket_counts, vec![1, 3, 4]);
    }

    #[test]
    fn test_buckets_are_monotonically_non_decreasing() {
        let histogram = Histogram::new("d", "help", DEFAULT_DURATION_BUCKETS).unwrap();
        for value in [0.001, 0.02, 0.02, 0.3, 7.5, 42.0] {
            histogram.observe(labels(), value).unwrap();
        }
        let series = histogram.series(&labels()).unwrap();
        for window in series.bucket_counts.windows(2) {
            assert!(window[0] <= window[1]);
        }
        // The +Inf bucket (the count) covers the 42.0 observation too.
        assert_eq!(series.count, 6);
        assert_eq!(*series.bucket_counts.last().unwrap(), 5);
    }

    #[test]
    fn test_invalid_observations_rejected() {
        let histogram = Histogram::new("d", "help", &[1.0]).unwrap();
        histogram.observe(labels(), 0.5).unwrap();
        assert!(histogram.observe(labels(), -0.5).is_err());
        assert!(histogram.observe(labels(), f64::NAN).is_err());
        assert!(histogram.observe(labels(), f64::INFINITY).is_err());

        let series = histogram.series(&labels()).unwrap();
        assert_eq!(series.count, 1);
        assert_eq!(series.sum, 0.5);
    }

    #[test]
    fn test_boundary_value_lands_in_its_bucket() {
        let histogram = Histogram::new("d", "help", &[0.5, 1.0]).unwrap();
        histogram.observe(labels(), 0.5).unwrap();
        let series = histogram.series(&labels()).unwrap();
        assert_eq!(series.bucket_counts, vec![1, 1]);
    }
}

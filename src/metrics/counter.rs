use std::sync::atomic::{AtomicU64, Ordering};

use dashmap::DashMap;

use super::labels::LabelSet;
use super::MetricsError;

/// A monotonically increasing metric keyed by label set.
///
/// Each series is an atomic cell, so increments from concurrent request
/// paths never lose updates and snapshot reads are never torn.
pub struct Counter {
    name: String,
    help: String,
    series: DashMap<LabelSet, AtomicCell>,
}

/// An f64 stored as its bit pattern in an `AtomicU64`, updated with a CAS
/// loop. Exposition values are float-typed, while increments stay lock-free.
struct AtomicCell(AtomicU64);

impl AtomicCell {
    fn zero() -> Self {
        AtomicCell(AtomicU64::new(0f64.to_bits()))
    }

    fn add(&self, delta: f64) {
        let mut current = self.0.load(Ordering::Relaxed);
        loop {
            let next = (f64::from_bits(current) + delta).to_bits();
            match self
                .0
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Acquire)
            {
                Ok(_) => return,
                Err(observed) => current = observed,
            }
        }
    }

    fn get(&self) -> f64 {
        f64::from_bits(self.0.load(Ordering::Acquire))
    }
}

impl Counter {
    pub(super) fn new(name: impl Into<String>, help: impl Into<String>) -> Self {
        Counter {
            name: name.into(),
            help: help.into(),
            series: DashMap::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn help(&self) -> &str {
        &self.help
    }

    /// Increments the series for `labels` by one, creating it at zero first
    /// if it has not been observed yet.
    pub fn inc(&self, labels: LabelSet) {
        self.series
            .entry(labels)
            .or_insert_with(AtomicCell::zero)
            .add(1.0);
    }

    /// Adds `delta` to the series for `labels`. Counters are monotonic, so
    /// a negative or non-finite delta is rejected and the series is left
    /// untouched.
    pub fn add(&self, labels: LabelSet, delta: f64) -> Result<(), MetricsError> {
        if !delta.is_finite() || delta < 0.0 {
            return Err(MetricsError::InvalidValue {
                metric: self.name.clone(),
                value: delta,
                reason: "counter deltas must be finite and non-negative",
            });
        }
        self.series
            .entry(labels)
            .or_insert_with(AtomicCell::zero)
            .add(delta);
        Ok(())
    }

    /// Current total for `labels`, or 0 if the series has never been seen.
    pub fn value(&self, labels: &LabelSet) -> f64 {
        self.series.get(labels).map(|cell| cell.get()).unwrap_or(0.0)
    }

    /// Point-in-time copy of all series, sorted by label set for
    /// deterministic rendering.
    pub fn snapshot(&self) -> Vec<(LabelSet, f64)> {
        let mut out: Vec<(LabelSet, f64)> = self
            .series
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().get()))
            .collect();
        out.sort_by(|a, b| a.0.cmp(&b.0));
        out
    }
}

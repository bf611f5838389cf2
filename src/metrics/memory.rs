//! Process memory collector backing the `process_memory_usage_bytes` gauge.

use super::labels::LabelSet;
use super::MetricsError;

pub const PROCESS_MEMORY_METRIC: &str = "process_memory_usage_bytes";

/// Reads current process memory by region, one entry per `type` label.
///
/// Values come from `/proc/self/status`, so collection fails on platforms
/// without procfs; the registry omits the gauge from the snapshot in that
/// case instead of failing the whole exposition.
#[cfg(target_os = "linux")]
pub fn collect_memory_usage() -> Result<Vec<(LabelSet, f64)>, MetricsError> {
    let status = std::fs::read_to_string("/proc/self/status").map_err(|e| {
        MetricsError::Collection {
            metric: PROCESS_MEMORY_METRIC.to_string(),
            reason: format!("failed to read /proc/self/status: {}", e),
        }
    })?;

    let mut values = Vec::new();
    for (field, label) in [
        ("VmRSS:", "resident"),
        ("VmSize:", "virtual"),
        ("VmData:", "data"),
    ] {
        if let Some(bytes) = parse_kb_line(&status, field) {
            values.push((LabelSet::single("type", label), bytes));
        }
    }

    if values.is_empty() {
        return Err(MetricsError::Collection {
            metric: PROCESS_MEMORY_METRIC.to_string(),
            reason: "no memory fields found in /proc/self/status".to_string(),
        });
    }
    Ok(values)
}

#[cfg(not(target_os = "linux"))]
pub fn collect_memory_usage() -> Result<Vec<(LabelSet, f64)>, MetricsError> {
    Err(MetricsError::Collection {
        metric: PROCESS_MEMORY_METRIC.to_string(),
        reason: "process memory statistics are only available on Linux".to_string(),
    })
}

/// Parses a `/proc/self/status` line of the form `VmRSS:   1234 kB` into
/// bytes.
#[cfg(target_os = "linux")]
fn parse_kb_line(status: &str, field: &str) -> Option<f64> {
    let line = status.lines().find(|line| line.starts_with(field))?;
    let kb: f64 = line
        .trim_start_matches(field)
        .trim()
        .trim_end_matches("kB")
        .trim()
        .parse()
        .ok()?;
    Some(kb * 1024.0)
}

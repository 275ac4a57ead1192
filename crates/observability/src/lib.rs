use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use tracing::{info, warn};

static LOADS_COMPLETED_TOTAL: AtomicU64 = AtomicU64::new(0);
static LOAD_FAILURES_TOTAL: AtomicU64 = AtomicU64::new(0);
static REPORTS_COMPLETED_TOTAL: AtomicU64 = AtomicU64::new(0);

fn duration_ms(duration: Duration) -> f64 {
    duration.as_secs_f64() * 1000.0
}

/// Records fixture-load latency and increments the loads completed counter.
pub fn record_load_latency(backend: &str, duration: Duration, rows: usize) {
    let total = LOADS_COMPLETED_TOTAL.fetch_add(1, Ordering::Relaxed) + 1;
    info!(
        metric = "fixture_load_latency_ms",
        backend,
        latency_ms = duration_ms(duration),
        rows,
        loads_completed_total = total
    );
}

/// Marks a fixture-load failure for observability logs.
pub fn record_load_failure(backend: &str, reason: &str) {
    let total = LOAD_FAILURES_TOTAL.fetch_add(1, Ordering::Relaxed) + 1;
    warn!(
        metric = "fixture_load_failure",
        backend,
        reason,
        load_failures_total = total
    );
}

/// Records report-query latency and the number of rows returned.
pub fn record_report_latency(backend: &str, duration: Duration, rows: usize) {
    let total = REPORTS_COMPLETED_TOTAL.fetch_add(1, Ordering::Relaxed) + 1;
    info!(
        metric = "sales_report_latency_ms",
        backend,
        latency_ms = duration_ms(duration),
        rows,
        reports_completed_total = total
    );
}

/// Marks a report-query failure for observability logs.
pub fn record_report_failure(backend: &str, reason: &str) {
    warn!(metric = "sales_report_failure", backend, reason);
}

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use bookstockdb_core::config::PublisherFilter;
use bookstockdb_core::fixture::read_fixture_file;
use bookstockdb_core::records::SaleReportRow;
use bookstockdb_observability as observability;
use bookstockdb_sql::{LoadSummary, Store};

/// Configuration for running the `report` command.
pub struct ReportConfig {
    /// Connection string (postgres://… or sqlite:…).
    pub dsn: String,
    /// Path to the fixture file.
    pub fixture_path: PathBuf,
    /// Which publisher to report on.
    pub filter: PublisherFilter,
}

/// Result of a successful report run.
#[derive(Debug)]
pub struct ReportOutcome {
    /// Per-model counts from the fixture load.
    pub loaded: LoadSummary,
    /// Report rows, in database order.
    pub rows: Vec<SaleReportRow>,
}

/// Executes the reset → load → query pipeline end-to-end.
pub fn run_report(config: ReportConfig) -> Result<ReportOutcome> {
    let store = Store::connect(&config.dsn)
        .with_context(|| format!("failed to connect to {}", config.dsn))?;
    let backend = store.backend();

    store.reset_schema().context("schema reset failed")?;

    let records = read_fixture_file(&config.fixture_path).with_context(|| {
        format!(
            "unable to read fixture file {}",
            config.fixture_path.display()
        )
    })?;
    info!(records = records.len(), "fixture file decoded");

    let started = Instant::now();
    let loaded = match store.load_fixtures(&records) {
        Ok(summary) => summary,
        Err(err) => {
            observability::record_load_failure(backend, &err.to_string());
            return Err(err).context("fixture load failed");
        }
    };
    observability::record_load_latency(backend, started.elapsed(), loaded.total());

    let started = Instant::now();
    let rows = match store.sales_for_publisher(&config.filter) {
        Ok(rows) => rows,
        Err(err) => {
            observability::record_report_failure(backend, &err.to_string());
            return Err(err).context("sales report query failed");
        }
    };
    observability::record_report_latency(backend, started.elapsed(), rows.len());

    Ok(ReportOutcome { loaded, rows })
}

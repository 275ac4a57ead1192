use std::fs;

use anyhow::Result;
use bookstockdb_cli::{run_report, ReportConfig};
use bookstockdb_core::config::PublisherFilter;
use serde_json::json;
use tempfile::{tempdir, NamedTempFile};

fn fixture_json() -> serde_json::Value {
    json!([
        {"model": "publisher", "pk": 1, "fields": {"name": "Acme"}},
        {"model": "book", "pk": 1, "fields": {"title": "Go Deep", "id_publisher": 1}},
        {"model": "shop", "pk": 1, "fields": {"name": "Corner Store"}},
        {"model": "stock", "pk": 1, "fields": {"id_book": 1, "id_shop": 1, "count": 5}},
        {"model": "sale", "pk": 1, "fields": {
            "price": "9.99",
            "date_sale": "2020-01-01T10:00:00.000000Z",
            "id_stock": 1,
            "count": 1
        }}
    ])
}

#[test]
fn report_pipeline_end_to_end() -> Result<()> {
    let dir = tempdir()?;
    let fixture_path = dir.path().join("tests_data.json");
    fs::write(&fixture_path, fixture_json().to_string())?;

    let db = NamedTempFile::new()?;
    let dsn = format!("sqlite://{}", db.path().display());

    let outcome = run_report(ReportConfig {
        dsn: dsn.clone(),
        fixture_path: fixture_path.clone(),
        filter: PublisherFilter::ById(1),
    })?;
    assert_eq!(outcome.loaded.total(), 5);
    let lines: Vec<String> = outcome.rows.iter().map(|row| row.report_line()).collect();
    assert_eq!(lines, vec!["Go Deep | Corner Store | 9.99 | 2020-01-01 10:00:00"]);

    // Same database, filtered by name: each run resets and reloads.
    let outcome = run_report(ReportConfig {
        dsn,
        fixture_path,
        filter: PublisherFilter::ByName("Acme".into()),
    })?;
    assert_eq!(outcome.rows.len(), 1);
    assert_eq!(
        outcome.rows[0].report_line(),
        "Go Deep | Corner Store | 9.99 | 2020-01-01 10:00:00"
    );
    Ok(())
}

#[test]
fn missing_fixture_file_fails() -> Result<()> {
    let db = NamedTempFile::new()?;
    let dsn = format!("sqlite://{}", db.path().display());

    let err = run_report(ReportConfig {
        dsn,
        fixture_path: "/nonexistent/tests_data.json".into(),
        filter: PublisherFilter::ById(1),
    })
    .unwrap_err();
    assert!(err.to_string().contains("unable to read fixture file"));
    Ok(())
}

#[test]
fn unknown_publisher_reports_zero_rows() -> Result<()> {
    let dir = tempdir()?;
    let fixture_path = dir.path().join("tests_data.json");
    fs::write(&fixture_path, fixture_json().to_string())?;

    let db = NamedTempFile::new()?;
    let dsn = format!("sqlite://{}", db.path().display());

    let outcome = run_report(ReportConfig {
        dsn,
        fixture_path,
        filter: PublisherFilter::ByName("Nobody Press".into()),
    })?;
    assert!(outcome.rows.is_empty());
    Ok(())
}

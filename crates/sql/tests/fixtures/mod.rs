//! Shared fixtures for store integration tests.

use anyhow::Result;
use bookstockdb_core::fixture::FixtureRecord;
use bookstockdb_sql::Store;
use serde_json::json;
use tempfile::NamedTempFile;

/// Connect a store to a fresh temp-file SQLite database.
///
/// The temp file must outlive the store, so it is handed back to the caller.
pub fn connect_temp_store() -> Result<(Store, NamedTempFile)> {
    let db = NamedTempFile::new()?;
    let dsn = format!("sqlite://{}", db.path().display());
    let store = Store::connect(&dsn)?;
    Ok((store, db))
}

/// Two publishers, three books, two shops, four stock rows, four sales.
///
/// "Carry On" has stock but no sales, so publisher 1's report must contain
/// exactly three rows rather than a full cross product.
pub fn sample_records() -> Vec<FixtureRecord> {
    serde_json::from_value(json!([
        {"model": "publisher", "pk": 1, "fields": {"name": "Acme"}},
        {"model": "publisher", "pk": 2, "fields": {"name": "Apex House"}},
        {"model": "book", "pk": 1, "fields": {"title": "Go Deep", "id_publisher": 1}},
        {"model": "book", "pk": 2, "fields": {"title": "Carry On", "id_publisher": 1}},
        {"model": "book", "pk": 3, "fields": {"title": "Night Trains", "id_publisher": 2}},
        {"model": "shop", "pk": 1, "fields": {"name": "Corner Store"}},
        {"model": "shop", "pk": 2, "fields": {"name": "Main Street Books"}},
        {"model": "stock", "pk": 1, "fields": {"id_book": 1, "id_shop": 1, "count": 5}},
        {"model": "stock", "pk": 2, "fields": {"id_book": 1, "id_shop": 2, "count": 3}},
        {"model": "stock", "pk": 3, "fields": {"id_book": 3, "id_shop": 2, "count": 7}},
        {"model": "stock", "pk": 4, "fields": {"id_book": 2, "id_shop": 1, "count": 2}},
        {"model": "sale", "pk": 1, "fields": {
            "price": "9.99",
            "date_sale": "2020-01-01T10:00:00.000000Z",
            "id_stock": 1,
            "count": 1
        }},
        {"model": "sale", "pk": 2, "fields": {
            "price": "10.50",
            "date_sale": "2020-02-14T18:30:05.123456Z",
            "id_stock": 2,
            "count": 2
        }},
        {"model": "sale", "pk": 3, "fields": {
            "price": "8.75",
            "date_sale": "2020-03-03T09:15:00.000000Z",
            "id_stock": 1,
            "count": 1
        }},
        {"model": "sale", "pk": 4, "fields": {
            "price": "14.00",
            "date_sale": "2021-06-01T12:00:00.000000Z",
            "id_stock": 3,
            "count": 1
        }}
    ]))
    .expect("sample fixture decodes")
}

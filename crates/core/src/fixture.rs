//! Fixture-file record types.
//!
//! The fixture file is a JSON array of tagged records, each shaped
//! `{ "model": <tag>, "pk": <integer>, "fields": { … } }`. Records are
//! decoded into [`FixtureRecord`]s here and inserted by the store in the
//! fixed dependency order of [`ModelKind::LOAD_ORDER`].

use std::fmt;
use std::fs;
use std::path::Path;

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{StoreError, StoreResult};

/// Textual pattern sale timestamps use in the fixture file.
pub const SALE_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.fZ";

/// Model tag carried by each fixture record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelKind {
    /// A `publisher` row.
    Publisher,
    /// A `book` row.
    Book,
    /// A `shop` row.
    Shop,
    /// A `stock` row.
    Stock,
    /// A `sale` row.
    Sale,
}

impl ModelKind {
    /// Insert order satisfying every foreign-key dependency.
    pub const LOAD_ORDER: [ModelKind; 5] = [
        ModelKind::Publisher,
        ModelKind::Book,
        ModelKind::Shop,
        ModelKind::Stock,
        ModelKind::Sale,
    ];

    /// The table name this tag maps to.
    pub fn as_str(&self) -> &'static str {
        match self {
            ModelKind::Publisher => "publisher",
            ModelKind::Book => "book",
            ModelKind::Shop => "shop",
            ModelKind::Stock => "stock",
            ModelKind::Sale => "sale",
        }
    }
}

impl fmt::Display for ModelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One tagged record from the fixture file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureRecord {
    /// Which table the record belongs to.
    pub model: ModelKind,
    /// Primary key, used verbatim on insert.
    pub pk: i64,
    /// Model-specific field payload.
    pub fields: Value,
}

impl FixtureRecord {
    /// Decode the field payload into the typed struct for this model.
    pub fn fields_as<T: DeserializeOwned>(&self) -> StoreResult<T> {
        serde_json::from_value(self.fields.clone()).map_err(|err| {
            StoreError::fixture(format!(
                "invalid fields for {} record pk={}: {}",
                self.model, self.pk, err
            ))
        })
    }
}

/// Field payload of a `publisher` record.
#[derive(Debug, Clone, Deserialize)]
pub struct PublisherFields {
    /// Publisher name.
    pub name: String,
}

/// Field payload of a `book` record.
#[derive(Debug, Clone, Deserialize)]
pub struct BookFields {
    /// Book title.
    pub title: String,
    /// Owning publisher id.
    pub id_publisher: i64,
}

/// Field payload of a `shop` record.
#[derive(Debug, Clone, Deserialize)]
pub struct ShopFields {
    /// Shop name.
    pub name: String,
}

/// Field payload of a `stock` record.
#[derive(Debug, Clone, Deserialize)]
pub struct StockFields {
    /// Book id.
    pub id_book: i64,
    /// Shop id.
    pub id_shop: i64,
    /// Quantity on hand.
    pub count: i64,
}

/// Field payload of a `sale` record.
#[derive(Debug, Clone, Deserialize)]
pub struct SaleFields {
    /// Sale price, decimal-as-text.
    pub price: String,
    /// Sale timestamp in the [`SALE_TIMESTAMP_FORMAT`] pattern.
    pub date_sale: String,
    /// Stock row sold from.
    pub id_stock: i64,
    /// Quantity sold.
    pub count: i64,
}

/// Read and decode a fixture file.
///
/// Fails on unreadable files, JSON that is not an array of records, and
/// unknown model tags.
pub fn read_fixture_file(path: impl AsRef<Path>) -> StoreResult<Vec<FixtureRecord>> {
    let path = path.as_ref();
    let raw = fs::read_to_string(path)?;
    let records: Vec<FixtureRecord> = serde_json::from_str(&raw).map_err(|err| {
        StoreError::fixture(format!("{} is not a valid fixture file: {}", path.display(), err))
    })?;
    Ok(records)
}

/// Parse a sale timestamp from the fixed fixture pattern into UTC.
pub fn parse_sale_timestamp(raw: &str, pk: i64) -> StoreResult<DateTime<Utc>> {
    let naive = NaiveDateTime::parse_from_str(raw, SALE_TIMESTAMP_FORMAT)
        .map_err(|source| StoreError::Timestamp { pk, source })?;
    Ok(Utc.from_utc_datetime(&naive))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;
    use serde_json::json;

    #[test]
    fn test_decode_tagged_records() {
        let raw = json!([
            {"model": "publisher", "pk": 1, "fields": {"name": "Acme"}},
            {"model": "book", "pk": 2, "fields": {"title": "Go Deep", "id_publisher": 1}},
            {"model": "sale", "pk": 3, "fields": {
                "price": "9.99",
                "date_sale": "2020-01-01T10:00:00.000000Z",
                "id_stock": 1,
                "count": 1
            }}
        ]);
        let records: Vec<FixtureRecord> = serde_json::from_value(raw).unwrap();
        assert_eq!(records.len(), 3);
        assert_eq!(records[0].model, ModelKind::Publisher);
        assert_eq!(records[1].pk, 2);

        let fields: BookFields = records[1].fields_as().unwrap();
        assert_eq!(fields.title, "Go Deep");
        assert_eq!(fields.id_publisher, 1);
    }

    #[test]
    fn test_unknown_model_tag_is_rejected() {
        let raw = r#"[{"model": "author", "pk": 1, "fields": {}}]"#;
        assert!(serde_json::from_str::<Vec<FixtureRecord>>(raw).is_err());
    }

    #[test]
    fn test_mismatched_fields_are_rejected() {
        let record = FixtureRecord {
            model: ModelKind::Stock,
            pk: 9,
            fields: json!({"id_book": 1}),
        };
        let err = record.fields_as::<StockFields>().unwrap_err();
        assert!(err.to_string().contains("stock record pk=9"));
    }

    #[test]
    fn test_parse_sale_timestamp() {
        let ts = parse_sale_timestamp("2020-01-01T10:00:00.000000Z", 1).unwrap();
        assert_eq!(ts, Utc.with_ymd_and_hms(2020, 1, 1, 10, 0, 0).unwrap());

        let ts = parse_sale_timestamp("2022-11-05T14:30:59.987654Z", 2).unwrap();
        assert_eq!(ts.nanosecond(), 987_654_000);
    }

    #[test]
    fn test_malformed_timestamp_reports_pk() {
        let err = parse_sale_timestamp("05/11/2022 14:30", 42).unwrap_err();
        assert!(err.to_string().contains("pk=42"));
    }

    #[test]
    fn test_load_order_covers_every_model() {
        assert_eq!(
            ModelKind::LOAD_ORDER.map(|m| m.as_str()),
            ["publisher", "book", "shop", "stock", "sale"]
        );
    }

    #[test]
    fn test_read_fixture_file_missing_path() {
        let err = read_fixture_file("/nonexistent/tests_data.json").unwrap_err();
        assert!(matches!(err, StoreError::Io(_)));
    }
}

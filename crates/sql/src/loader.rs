//! Fixture loading.
//!
//! Records are inserted model by model in the fixed dependency order
//! publisher → book → shop → stock → sale, with the fixture-supplied primary
//! keys used verbatim. The whole load runs inside one transaction: a record
//! that violates a constraint aborts the load and leaves the schema exactly
//! as the reset left it.

use sqlx::{Postgres, Sqlite, Transaction};
use tracing::debug;

use bookstockdb_core::error::{StoreError, StoreResult};
use bookstockdb_core::fixture::{
    parse_sale_timestamp, BookFields, FixtureRecord, ModelKind, PublisherFields, SaleFields,
    ShopFields, StockFields,
};

use crate::connection::StoreConnection;

/// Per-model row counts from a completed load.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LoadSummary {
    /// Publisher rows inserted.
    pub publishers: usize,
    /// Book rows inserted.
    pub books: usize,
    /// Shop rows inserted.
    pub shops: usize,
    /// Stock rows inserted.
    pub stocks: usize,
    /// Sale rows inserted.
    pub sales: usize,
}

impl LoadSummary {
    /// Total rows inserted across all five tables.
    pub fn total(&self) -> usize {
        self.publishers + self.books + self.shops + self.stocks + self.sales
    }

    fn bump(&mut self, model: ModelKind) {
        match model {
            ModelKind::Publisher => self.publishers += 1,
            ModelKind::Book => self.books += 1,
            ModelKind::Shop => self.shops += 1,
            ModelKind::Stock => self.stocks += 1,
            ModelKind::Sale => self.sales += 1,
        }
    }
}

/// Insert all fixture records inside one transaction.
pub(crate) async fn load(
    conn: &StoreConnection,
    records: &[FixtureRecord],
) -> StoreResult<LoadSummary> {
    let summary = match conn {
        StoreConnection::Postgres(pool) => {
            let mut tx = pool.begin().await?;
            let summary = load_into_postgres(&mut tx, records).await?;
            tx.commit().await?;
            summary
        }
        StoreConnection::Sqlite(pool) => {
            let mut tx = pool.begin().await?;
            let summary = load_into_sqlite(&mut tx, records).await?;
            tx.commit().await?;
            summary
        }
    };
    debug!(rows = summary.total(), "fixture load committed");
    Ok(summary)
}

async fn load_into_postgres(
    tx: &mut Transaction<'_, Postgres>,
    records: &[FixtureRecord],
) -> StoreResult<LoadSummary> {
    let mut summary = LoadSummary::default();
    for model in ModelKind::LOAD_ORDER {
        for record in records.iter().filter(|record| record.model == model) {
            insert_postgres_record(tx, record).await?;
            summary.bump(model);
        }
    }
    Ok(summary)
}

async fn insert_postgres_record(
    tx: &mut Transaction<'_, Postgres>,
    record: &FixtureRecord,
) -> StoreResult<()> {
    let query = match record.model {
        ModelKind::Publisher => {
            let fields: PublisherFields = record.fields_as()?;
            sqlx::query("INSERT INTO publisher (id, name) VALUES ($1, $2)")
                .bind(record.pk)
                .bind(fields.name)
        }
        ModelKind::Book => {
            let fields: BookFields = record.fields_as()?;
            sqlx::query("INSERT INTO book (id, title, id_publisher) VALUES ($1, $2, $3)")
                .bind(record.pk)
                .bind(fields.title)
                .bind(fields.id_publisher)
        }
        ModelKind::Shop => {
            let fields: ShopFields = record.fields_as()?;
            sqlx::query("INSERT INTO shop (id, name) VALUES ($1, $2)")
                .bind(record.pk)
                .bind(fields.name)
        }
        ModelKind::Stock => {
            let fields: StockFields = record.fields_as()?;
            sqlx::query("INSERT INTO stock (id, id_book, id_shop, count) VALUES ($1, $2, $3, $4)")
                .bind(record.pk)
                .bind(fields.id_book)
                .bind(fields.id_shop)
                .bind(fields.count)
        }
        ModelKind::Sale => {
            let fields: SaleFields = record.fields_as()?;
            let date_sale = parse_sale_timestamp(&fields.date_sale, record.pk)?;
            sqlx::query(
                "INSERT INTO sale (id, price, date_sale, id_stock, count) \
                 VALUES ($1, $2, $3, $4, $5)",
            )
            .bind(record.pk)
            .bind(fields.price)
            .bind(date_sale)
            .bind(fields.id_stock)
            .bind(fields.count)
        }
    };

    query
        .execute(&mut **tx)
        .await
        .map_err(|source| StoreError::load(record.model, record.pk, source))?;
    Ok(())
}

async fn load_into_sqlite(
    tx: &mut Transaction<'_, Sqlite>,
    records: &[FixtureRecord],
) -> StoreResult<LoadSummary> {
    let mut summary = LoadSummary::default();
    for model in ModelKind::LOAD_ORDER {
        for record in records.iter().filter(|record| record.model == model) {
            insert_sqlite_record(tx, record).await?;
            summary.bump(model);
        }
    }
    Ok(summary)
}

async fn insert_sqlite_record(
    tx: &mut Transaction<'_, Sqlite>,
    record: &FixtureRecord,
) -> StoreResult<()> {
    let query = match record.model {
        ModelKind::Publisher => {
            let fields: PublisherFields = record.fields_as()?;
            sqlx::query("INSERT INTO publisher (id, name) VALUES (?, ?)")
                .bind(record.pk)
                .bind(fields.name)
        }
        ModelKind::Book => {
            let fields: BookFields = record.fields_as()?;
            sqlx::query("INSERT INTO book (id, title, id_publisher) VALUES (?, ?, ?)")
                .bind(record.pk)
                .bind(fields.title)
                .bind(fields.id_publisher)
        }
        ModelKind::Shop => {
            let fields: ShopFields = record.fields_as()?;
            sqlx::query("INSERT INTO shop (id, name) VALUES (?, ?)")
                .bind(record.pk)
                .bind(fields.name)
        }
        ModelKind::Stock => {
            let fields: StockFields = record.fields_as()?;
            sqlx::query("INSERT INTO stock (id, id_book, id_shop, count) VALUES (?, ?, ?, ?)")
                .bind(record.pk)
                .bind(fields.id_book)
                .bind(fields.id_shop)
                .bind(fields.count)
        }
        ModelKind::Sale => {
            let fields: SaleFields = record.fields_as()?;
            let date_sale = parse_sale_timestamp(&fields.date_sale, record.pk)?;
            sqlx::query(
                "INSERT INTO sale (id, price, date_sale, id_stock, count) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(record.pk)
            .bind(fields.price)
            .bind(date_sale.to_rfc3339())
            .bind(fields.id_stock)
            .bind(fields.count)
        }
    };

    query
        .execute(&mut **tx)
        .await
        .map_err(|source| StoreError::load(record.model, record.pk, source))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_summary_totals() {
        let mut summary = LoadSummary::default();
        summary.bump(ModelKind::Publisher);
        summary.bump(ModelKind::Book);
        summary.bump(ModelKind::Book);
        summary.bump(ModelKind::Sale);
        assert_eq!(summary.publishers, 1);
        assert_eq!(summary.books, 2);
        assert_eq!(summary.sales, 1);
        assert_eq!(summary.total(), 4);
    }
}

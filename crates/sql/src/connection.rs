//! Database connections and the blocking store facade.

use std::future::Future;
use std::str::FromStr;
use std::sync::Arc;

use sqlx::postgres::PgPoolOptions;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{PgPool, SqlitePool};
use tokio::runtime::{Builder, Runtime};
use tracing::debug;

use bookstockdb_core::config::PublisherFilter;
use bookstockdb_core::error::{StoreError, StoreResult};
use bookstockdb_core::fixture::FixtureRecord;
use bookstockdb_core::records::{Book, Publisher, Sale, SaleReportRow, Shop, Stock};

use crate::loader::{self, LoadSummary};
use crate::query;
use crate::schema;

/// Live connection to one of the supported backends.
#[derive(Debug)]
pub(crate) enum StoreConnection {
    /// PostgreSQL connection pool.
    Postgres(PgPool),
    /// SQLite connection pool.
    Sqlite(SqlitePool),
}

impl StoreConnection {
    async fn establish(dsn: &str) -> StoreResult<Self> {
        if dsn.starts_with("postgres://") || dsn.starts_with("postgresql://") {
            let pool = PgPoolOptions::new()
                .max_connections(5)
                .connect(dsn)
                .await
                .map_err(|err| {
                    StoreError::connection(format!("failed to connect to Postgres: {err}"))
                })?;
            Ok(StoreConnection::Postgres(pool))
        } else if dsn.starts_with("sqlite:") {
            let options = SqliteConnectOptions::from_str(dsn)
                .map_err(|err| StoreError::connection(format!("invalid SQLite DSN: {err}")))?
                .create_if_missing(true)
                .foreign_keys(true);
            let pool = SqlitePoolOptions::new()
                .max_connections(1)
                .connect_with(options)
                .await
                .map_err(|err| {
                    StoreError::connection(format!("failed to connect to SQLite: {err}"))
                })?;
            Ok(StoreConnection::Sqlite(pool))
        } else {
            Err(StoreError::UnsupportedDatabase(dsn.to_string()))
        }
    }

    pub(crate) fn backend(&self) -> &'static str {
        match self {
            StoreConnection::Postgres(_) => "postgres",
            StoreConnection::Sqlite(_) => "sqlite",
        }
    }
}

/// Blocking store over the publisher/book/shop/stock/sale schema.
///
/// Every method blocks the caller until the database operation completes; the
/// store owns a current-thread runtime and drives the async sqlx internals
/// itself. One store means one session; there is no shared state to lock.
#[derive(Debug)]
pub struct Store {
    runtime: Arc<Runtime>,
    conn: StoreConnection,
}

impl Store {
    /// Connect to the backend named by the DSN scheme
    /// (`postgres://`/`postgresql://` or `sqlite:`).
    pub fn connect(dsn: &str) -> StoreResult<Self> {
        let runtime = Arc::new(build_runtime()?);
        let conn = runtime.block_on(StoreConnection::establish(dsn))?;
        debug!(backend = conn.backend(), "store connected");
        Ok(Self { runtime, conn })
    }

    fn block_on<F, R>(&self, fut: F) -> R
    where
        F: Future<Output = R>,
    {
        self.runtime.block_on(fut)
    }

    /// Which backend this store talks to (`postgres` or `sqlite`).
    pub fn backend(&self) -> &'static str {
        self.conn.backend()
    }

    /// Drop and recreate the five schema tables.
    ///
    /// Destructive: discards all prior data. Safe to run repeatedly.
    pub fn reset_schema(&self) -> StoreResult<()> {
        self.block_on(schema::reset(&self.conn))
    }

    /// Insert fixture records in dependency order, one transaction for the
    /// whole load.
    pub fn load_fixtures(&self, records: &[FixtureRecord]) -> StoreResult<LoadSummary> {
        self.block_on(loader::load(&self.conn, records))
    }

    /// All sales of books belonging to the matched publisher.
    pub fn sales_for_publisher(
        &self,
        filter: &PublisherFilter,
    ) -> StoreResult<Vec<SaleReportRow>> {
        self.block_on(query::sales_for_publisher(&self.conn, filter))
    }

    /// All publisher rows, ordered by id.
    pub fn publishers(&self) -> StoreResult<Vec<Publisher>> {
        self.block_on(query::fetch_publishers(&self.conn))
    }

    /// All book rows, ordered by id.
    pub fn books(&self) -> StoreResult<Vec<Book>> {
        self.block_on(query::fetch_books(&self.conn))
    }

    /// All shop rows, ordered by id.
    pub fn shops(&self) -> StoreResult<Vec<Shop>> {
        self.block_on(query::fetch_shops(&self.conn))
    }

    /// All stock rows, ordered by id.
    pub fn stocks(&self) -> StoreResult<Vec<Stock>> {
        self.block_on(query::fetch_stocks(&self.conn))
    }

    /// All sale rows, ordered by id.
    pub fn sales(&self) -> StoreResult<Vec<Sale>> {
        self.block_on(query::fetch_sales(&self.conn))
    }
}

fn build_runtime() -> StoreResult<Runtime> {
    Builder::new_current_thread()
        .enable_all()
        .build()
        .map_err(|err| StoreError::connection(format!("failed to build tokio runtime: {err}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_unknown_scheme() {
        let err = Store::connect("mysql://root@localhost/books").unwrap_err();
        assert!(matches!(err, StoreError::UnsupportedDatabase(_)));
    }
}

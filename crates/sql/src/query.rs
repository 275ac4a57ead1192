//! Report and read-back queries.

use chrono::{DateTime, Utc};
use sqlx::{PgPool, Row, SqlitePool};
use tracing::trace;

use bookstockdb_core::config::PublisherFilter;
use bookstockdb_core::error::{StoreError, StoreResult};
use bookstockdb_core::records::{Book, Publisher, Sale, SaleReportRow, Shop, Stock};

use crate::connection::StoreConnection;

const SALES_BY_PUBLISHER_ID_POSTGRES: &str = r#"
    SELECT book.title AS title,
           shop.name AS shop_name,
           sale.price AS price,
           sale.date_sale AS date_sale
    FROM publisher
    JOIN book ON book.id_publisher = publisher.id
    JOIN stock ON stock.id_book = book.id
    JOIN shop ON shop.id = stock.id_shop
    JOIN sale ON sale.id_stock = stock.id
    WHERE publisher.id = $1
"#;

const SALES_BY_PUBLISHER_NAME_POSTGRES: &str = r#"
    SELECT book.title AS title,
           shop.name AS shop_name,
           sale.price AS price,
           sale.date_sale AS date_sale
    FROM publisher
    JOIN book ON book.id_publisher = publisher.id
    JOIN stock ON stock.id_book = book.id
    JOIN shop ON shop.id = stock.id_shop
    JOIN sale ON sale.id_stock = stock.id
    WHERE publisher.name = $1
"#;

const SALES_BY_PUBLISHER_ID_SQLITE: &str = r#"
    SELECT book.title AS title,
           shop.name AS shop_name,
           sale.price AS price,
           sale.date_sale AS date_sale
    FROM publisher
    JOIN book ON book.id_publisher = publisher.id
    JOIN stock ON stock.id_book = book.id
    JOIN shop ON shop.id = stock.id_shop
    JOIN sale ON sale.id_stock = stock.id
    WHERE publisher.id = ?
"#;

const SALES_BY_PUBLISHER_NAME_SQLITE: &str = r#"
    SELECT book.title AS title,
           shop.name AS shop_name,
           sale.price AS price,
           sale.date_sale AS date_sale
    FROM publisher
    JOIN book ON book.id_publisher = publisher.id
    JOIN stock ON stock.id_book = book.id
    JOIN shop ON shop.id = stock.id_shop
    JOIN sale ON sale.id_stock = stock.id
    WHERE publisher.name = ?
"#;

/// Run the four-way publisher sales join.
///
/// No ordering clause; row order is whatever the database yields. An
/// unmatched publisher produces an empty result.
pub(crate) async fn sales_for_publisher(
    conn: &StoreConnection,
    filter: &PublisherFilter,
) -> StoreResult<Vec<SaleReportRow>> {
    trace!(backend = conn.backend(), ?filter, "running publisher sales report");
    match conn {
        StoreConnection::Postgres(pool) => sales_postgres(pool, filter).await,
        StoreConnection::Sqlite(pool) => sales_sqlite(pool, filter).await,
    }
}

async fn sales_postgres(
    pool: &PgPool,
    filter: &PublisherFilter,
) -> StoreResult<Vec<SaleReportRow>> {
    let query = match filter {
        PublisherFilter::ById(id) => sqlx::query(SALES_BY_PUBLISHER_ID_POSTGRES).bind(*id),
        PublisherFilter::ByName(name) => {
            sqlx::query(SALES_BY_PUBLISHER_NAME_POSTGRES).bind(name.as_str())
        }
    };
    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|err| StoreError::query(format!("publisher sales join failed: {err}")))?;

    let mut report = Vec::with_capacity(rows.len());
    for row in rows {
        report.push(SaleReportRow {
            title: row.try_get("title")?,
            shop: row.try_get("shop_name")?,
            price: row.try_get("price")?,
            sold_at: row.try_get("date_sale")?,
        });
    }
    Ok(report)
}

async fn sales_sqlite(
    pool: &SqlitePool,
    filter: &PublisherFilter,
) -> StoreResult<Vec<SaleReportRow>> {
    let query = match filter {
        PublisherFilter::ById(id) => sqlx::query(SALES_BY_PUBLISHER_ID_SQLITE).bind(*id),
        PublisherFilter::ByName(name) => {
            sqlx::query(SALES_BY_PUBLISHER_NAME_SQLITE).bind(name.as_str())
        }
    };
    let rows = query
        .fetch_all(pool)
        .await
        .map_err(|err| StoreError::query(format!("publisher sales join failed: {err}")))?;

    let mut report = Vec::with_capacity(rows.len());
    for row in rows {
        let raw: String = row.try_get("date_sale")?;
        let sold_at = DateTime::parse_from_rfc3339(&raw)
            .map_err(|err| StoreError::query(format!("invalid stored sale timestamp: {err}")))?
            .with_timezone(&Utc);
        report.push(SaleReportRow {
            title: row.try_get("title")?,
            shop: row.try_get("shop_name")?,
            price: row.try_get("price")?,
            sold_at,
        });
    }
    Ok(report)
}

pub(crate) async fn fetch_publishers(conn: &StoreConnection) -> StoreResult<Vec<Publisher>> {
    const SQL: &str = "SELECT id, name FROM publisher ORDER BY id";
    match conn {
        StoreConnection::Postgres(pool) => {
            Ok(sqlx::query_as::<_, Publisher>(SQL).fetch_all(pool).await?)
        }
        StoreConnection::Sqlite(pool) => {
            Ok(sqlx::query_as::<_, Publisher>(SQL).fetch_all(pool).await?)
        }
    }
}

pub(crate) async fn fetch_books(conn: &StoreConnection) -> StoreResult<Vec<Book>> {
    const SQL: &str = "SELECT id, title, id_publisher FROM book ORDER BY id";
    match conn {
        StoreConnection::Postgres(pool) => {
            Ok(sqlx::query_as::<_, Book>(SQL).fetch_all(pool).await?)
        }
        StoreConnection::Sqlite(pool) => Ok(sqlx::query_as::<_, Book>(SQL).fetch_all(pool).await?),
    }
}

pub(crate) async fn fetch_shops(conn: &StoreConnection) -> StoreResult<Vec<Shop>> {
    const SQL: &str = "SELECT id, name FROM shop ORDER BY id";
    match conn {
        StoreConnection::Postgres(pool) => {
            Ok(sqlx::query_as::<_, Shop>(SQL).fetch_all(pool).await?)
        }
        StoreConnection::Sqlite(pool) => Ok(sqlx::query_as::<_, Shop>(SQL).fetch_all(pool).await?),
    }
}

pub(crate) async fn fetch_stocks(conn: &StoreConnection) -> StoreResult<Vec<Stock>> {
    const SQL: &str = "SELECT id, id_book, id_shop, count FROM stock ORDER BY id";
    match conn {
        StoreConnection::Postgres(pool) => {
            Ok(sqlx::query_as::<_, Stock>(SQL).fetch_all(pool).await?)
        }
        StoreConnection::Sqlite(pool) => {
            Ok(sqlx::query_as::<_, Stock>(SQL).fetch_all(pool).await?)
        }
    }
}

pub(crate) async fn fetch_sales(conn: &StoreConnection) -> StoreResult<Vec<Sale>> {
    const SQL: &str = "SELECT id, price, date_sale, id_stock, count FROM sale ORDER BY id";
    match conn {
        StoreConnection::Postgres(pool) => {
            Ok(sqlx::query_as::<_, Sale>(SQL).fetch_all(pool).await?)
        }
        StoreConnection::Sqlite(pool) => Ok(sqlx::query_as::<_, Sale>(SQL).fetch_all(pool).await?),
    }
}

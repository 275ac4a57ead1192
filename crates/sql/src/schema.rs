//! Schema reset DDL for both backends.
//!
//! The reset drops the five tables in reverse dependency order and recreates
//! them empty. Constraints live in the database: fixture-supplied primary
//! keys, unique names/titles, and foreign keys between the tables.

use sqlx::{PgPool, SqlitePool};
use tracing::debug;

use bookstockdb_core::error::{StoreError, StoreResult};

use crate::connection::StoreConnection;

/// Tables in reverse dependency order, used for drops.
const DROP_ORDER: [&str; 5] = ["sale", "stock", "book", "shop", "publisher"];

const POSTGRES_CREATE: [&str; 5] = [
    r#"CREATE TABLE publisher (
            id BIGINT PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE
        )"#,
    r#"CREATE TABLE book (
            id BIGINT PRIMARY KEY,
            title VARCHAR(100) NOT NULL UNIQUE,
            id_publisher BIGINT NOT NULL REFERENCES publisher(id)
        )"#,
    r#"CREATE TABLE shop (
            id BIGINT PRIMARY KEY,
            name VARCHAR(100) NOT NULL UNIQUE
        )"#,
    r#"CREATE TABLE stock (
            id BIGINT PRIMARY KEY,
            id_book BIGINT NOT NULL REFERENCES book(id),
            id_shop BIGINT NOT NULL REFERENCES shop(id),
            count BIGINT NOT NULL
        )"#,
    r#"CREATE TABLE sale (
            id BIGINT PRIMARY KEY,
            price TEXT NOT NULL,
            date_sale TIMESTAMPTZ NOT NULL,
            id_stock BIGINT NOT NULL REFERENCES stock(id),
            count BIGINT NOT NULL
        )"#,
];

// SQLite keeps sale timestamps as RFC 3339 text.
const SQLITE_CREATE: [&str; 5] = [
    r#"CREATE TABLE publisher (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )"#,
    r#"CREATE TABLE book (
            id INTEGER PRIMARY KEY,
            title TEXT NOT NULL UNIQUE,
            id_publisher INTEGER NOT NULL REFERENCES publisher(id)
        )"#,
    r#"CREATE TABLE shop (
            id INTEGER PRIMARY KEY,
            name TEXT NOT NULL UNIQUE
        )"#,
    r#"CREATE TABLE stock (
            id INTEGER PRIMARY KEY,
            id_book INTEGER NOT NULL REFERENCES book(id),
            id_shop INTEGER NOT NULL REFERENCES shop(id),
            count INTEGER NOT NULL
        )"#,
    r#"CREATE TABLE sale (
            id INTEGER PRIMARY KEY,
            price TEXT NOT NULL,
            date_sale TEXT NOT NULL,
            id_stock INTEGER NOT NULL REFERENCES stock(id),
            count INTEGER NOT NULL
        )"#,
];

/// Drop and recreate all tables, yielding an empty schema.
pub(crate) async fn reset(conn: &StoreConnection) -> StoreResult<()> {
    debug!(backend = conn.backend(), "resetting schema");
    match conn {
        StoreConnection::Postgres(pool) => reset_postgres(pool).await,
        StoreConnection::Sqlite(pool) => reset_sqlite(pool).await,
    }
}

async fn reset_postgres(pool: &PgPool) -> StoreResult<()> {
    for table in DROP_ORDER {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table} CASCADE"))
            .execute(pool)
            .await
            .map_err(|err| StoreError::schema(format!("failed to drop {table}: {err}")))?;
    }
    for stmt in POSTGRES_CREATE {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|err| StoreError::schema(format!("failed to create table: {err}")))?;
    }
    Ok(())
}

async fn reset_sqlite(pool: &SqlitePool) -> StoreResult<()> {
    for table in DROP_ORDER {
        sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
            .execute(pool)
            .await
            .map_err(|err| StoreError::schema(format!("failed to drop {table}: {err}")))?;
    }
    for stmt in SQLITE_CREATE {
        sqlx::query(stmt)
            .execute(pool)
            .await
            .map_err(|err| StoreError::schema(format!("failed to create table: {err}")))?;
    }
    Ok(())
}

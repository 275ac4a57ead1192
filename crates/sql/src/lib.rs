//! bookstockdb-sql
//!
//! SQL store for the publisher/book/shop/stock/sale schema, backed by
//! Postgres or SQLite through sqlx behind a blocking facade.

#![warn(missing_docs)]

/// Connection handling and the blocking store facade.
pub mod connection;
/// Fixture loading.
pub mod loader;
/// Report and read-back queries.
pub mod query;
/// Schema reset DDL.
pub mod schema;

pub use connection::Store;
pub use loader::LoadSummary;

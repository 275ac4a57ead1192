//! Error types for store operations.

use thiserror::Error;

use crate::fixture::ModelKind;

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Errors that can occur while resetting, loading, or querying the store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Failed to establish a database connection.
    #[error("database connection error: {0}")]
    Connection(String),

    /// Schema reset failed.
    #[error("schema error: {0}")]
    Schema(String),

    /// A fixture record could not be inserted.
    #[error("failed to load {model} record pk={pk}: {source}")]
    Load {
        /// Model tag of the failing record.
        model: ModelKind,
        /// Primary key of the failing record.
        pk: i64,
        /// Underlying database error.
        #[source]
        source: sqlx::Error,
    },

    /// The report query failed.
    #[error("query error: {0}")]
    Query(String),

    /// The fixture file could not be read or its shape is invalid.
    #[error("fixture error: {0}")]
    Fixture(String),

    /// A sale record carried a timestamp outside the expected pattern.
    #[error("malformed sale timestamp for pk={pk}: {source}")]
    Timestamp {
        /// Primary key of the sale record.
        pk: i64,
        /// Underlying parse error.
        #[source]
        source: chrono::ParseError,
    },

    /// DSN scheme matched no supported backend.
    #[error("unsupported database DSN: {0}")]
    UnsupportedDatabase(String),

    /// SQLx error wrapped.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// Serialization/deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error from reading the fixture file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Create a connection error.
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a schema error.
    pub fn schema(message: impl Into<String>) -> Self {
        Self::Schema(message.into())
    }

    /// Create a load error for a specific fixture record.
    pub fn load(model: ModelKind, pk: i64, source: sqlx::Error) -> Self {
        Self::Load { model, pk, source }
    }

    /// Create a query error.
    pub fn query(message: impl Into<String>) -> Self {
        Self::Query(message.into())
    }

    /// Create a fixture error.
    pub fn fixture(message: impl Into<String>) -> Self {
        Self::Fixture(message.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connection_error_display() {
        let err = StoreError::connection("connection refused");
        assert!(matches!(err, StoreError::Connection(_)));
        assert_eq!(
            err.to_string(),
            "database connection error: connection refused"
        );
    }

    #[test]
    fn test_load_error_carries_record_context() {
        let err = StoreError::load(ModelKind::Stock, 7, sqlx::Error::RowNotFound);
        assert_eq!(
            err.to_string(),
            format!(
                "failed to load stock record pk=7: {}",
                sqlx::Error::RowNotFound
            )
        );
    }

    #[test]
    fn test_unsupported_database_error() {
        let err = StoreError::UnsupportedDatabase("mysql://localhost".into());
        assert_eq!(
            err.to_string(),
            "unsupported database DSN: mysql://localhost"
        );
    }

    #[test]
    fn test_serialization_error_conversion() {
        let json_err = serde_json::from_str::<serde_json::Value>("not json").unwrap_err();
        let err: StoreError = json_err.into();
        assert!(err.to_string().starts_with("serialization error"));
    }
}

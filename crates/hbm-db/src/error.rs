//! Error types for hbm-db

use thiserror::Error;

/// Database operation errors
#[derive(Error, Debug)]
pub enum DbError {
    /// Connection error (D001)
    #[error("[D001] Database connection failed: {0}")]
    ConnectionError(String),

    /// Statement execution error (D002)
    #[error("[D002] SQL execution failed: {0}")]
    ExecutionError(String),

    /// Query or row decoding error (D003)
    #[error("[D003] Query failed: {0}")]
    QueryError(String),

    /// BEGIN / COMMIT / ROLLBACK failed (D004)
    #[error("[D004] Transaction control failed: {0}")]
    TransactionError(String),

    /// Column absent from a result row (D005)
    #[error("[D005] Column '{column}' missing from result row")]
    ColumnMissing { column: String },

    /// Column present with an unexpected type (D006)
    #[error("[D006] Column '{column}' expected {expected}, found {found}")]
    TypeMismatch {
        column: String,
        expected: &'static str,
        found: String,
    },
}

/// Result type alias for DbError
pub type DbResult<T> = Result<T, DbError>;

impl From<duckdb::Error> for DbError {
    fn from(err: duckdb::Error) -> Self {
        DbError::ExecutionError(err.to_string())
    }
}

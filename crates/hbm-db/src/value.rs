//! Backend-neutral parameter and row values.

use crate::error::{DbError, DbResult};
use chrono::{DateTime, Utc};
use std::collections::BTreeMap;
use std::fmt;

/// A single SQL value, used both for bound parameters and for result cells.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Boolean(bool),
    Integer(i64),
    Float(f64),
    Text(String),
    Timestamp(DateTime<Utc>),
}

impl SqlValue {
    /// Short type label used in error messages
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Null => "NULL",
            SqlValue::Boolean(_) => "BOOLEAN",
            SqlValue::Integer(_) => "INTEGER",
            SqlValue::Float(_) => "FLOAT",
            SqlValue::Text(_) => "TEXT",
            SqlValue::Timestamp(_) => "TIMESTAMP",
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Null => f.write_str("null"),
            SqlValue::Boolean(b) => write!(f, "{b}"),
            SqlValue::Integer(n) => write!(f, "{n}"),
            SqlValue::Float(x) => write!(f, "{x}"),
            SqlValue::Text(s) => f.write_str(s),
            SqlValue::Timestamp(ts) => write!(f, "{}", ts.format("%Y-%m-%d %H:%M:%S%.6f")),
        }
    }
}

impl From<i64> for SqlValue {
    fn from(n: i64) -> Self {
        SqlValue::Integer(n)
    }
}

impl From<i32> for SqlValue {
    fn from(n: i32) -> Self {
        SqlValue::Integer(i64::from(n))
    }
}

impl From<bool> for SqlValue {
    fn from(b: bool) -> Self {
        SqlValue::Boolean(b)
    }
}

impl From<&str> for SqlValue {
    fn from(s: &str) -> Self {
        SqlValue::Text(s.to_string())
    }
}

impl From<String> for SqlValue {
    fn from(s: String) -> Self {
        SqlValue::Text(s)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(ts: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(ts)
    }
}

/// One result row, keyed by column name.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, SqlValue>,
}

impl Row {
    /// Build a row from `(column, value)` pairs
    pub fn from_pairs(pairs: impl IntoIterator<Item = (String, SqlValue)>) -> Self {
        Self {
            values: pairs.into_iter().collect(),
        }
    }

    pub fn get(&self, column: &str) -> Option<&SqlValue> {
        self.values.get(column)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.values.keys().map(String::as_str)
    }

    fn require(&self, column: &str) -> DbResult<&SqlValue> {
        self.values.get(column).ok_or_else(|| DbError::ColumnMissing {
            column: column.to_string(),
        })
    }

    fn mismatch(column: &str, expected: &'static str, found: &SqlValue) -> DbError {
        DbError::TypeMismatch {
            column: column.to_string(),
            expected,
            found: found.type_name().to_string(),
        }
    }

    /// Read an integer column
    pub fn try_i64(&self, column: &str) -> DbResult<i64> {
        match self.require(column)? {
            SqlValue::Integer(n) => Ok(*n),
            other => Err(Self::mismatch(column, "INTEGER", other)),
        }
    }

    /// Read a text column
    pub fn try_text(&self, column: &str) -> DbResult<&str> {
        match self.require(column)? {
            SqlValue::Text(s) => Ok(s),
            other => Err(Self::mismatch(column, "TEXT", other)),
        }
    }

    /// Read a timestamp column
    pub fn try_timestamp(&self, column: &str) -> DbResult<DateTime<Utc>> {
        match self.require(column)? {
            SqlValue::Timestamp(ts) => Ok(*ts),
            other => Err(Self::mismatch(column, "TIMESTAMP", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_row() -> Row {
        Row::from_pairs([
            ("id".to_string(), SqlValue::Integer(7)),
            ("file_name".to_string(), SqlValue::from("001_init.sql")),
            (
                "applied_at".to_string(),
                SqlValue::from(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()),
            ),
            ("note".to_string(), SqlValue::Null),
        ])
    }

    #[test]
    fn test_typed_accessors() {
        let row = sample_row();
        assert_eq!(row.try_i64("id").unwrap(), 7);
        assert_eq!(row.try_text("file_name").unwrap(), "001_init.sql");
        assert_eq!(
            row.try_timestamp("applied_at").unwrap(),
            Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()
        );
        assert!(row.get("note").unwrap().is_null());
    }

    #[test]
    fn test_missing_column() {
        let err = sample_row().try_i64("batch").unwrap_err();
        assert!(matches!(err, DbError::ColumnMissing { ref column } if column == "batch"));
    }

    #[test]
    fn test_type_mismatch() {
        let err = sample_row().try_i64("file_name").unwrap_err();
        assert!(
            matches!(err, DbError::TypeMismatch { expected: "INTEGER", ref found, .. } if found == "TEXT")
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SqlValue::Null.to_string(), "null");
        assert_eq!(SqlValue::from(42i64).to_string(), "42");
        assert_eq!(
            SqlValue::from(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap()).to_string(),
            "2024-01-02 03:04:05.000000"
        );
    }
}

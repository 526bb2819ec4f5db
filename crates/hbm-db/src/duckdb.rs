//! DuckDB database backend implementation

use crate::error::{DbError, DbResult};
use crate::traits::Database;
use crate::value::{Row, SqlValue};
use chrono::{DateTime, Utc};
use duckdb::types::{TimeUnit, Value};
use duckdb::Connection;
use std::path::Path;

/// URL scheme accepted in front of a DuckDB path.
const URL_SCHEME: &str = "duckdb://";

/// DuckDB database backend
///
/// Single-threaded: the engine drives one statement at a time, so the
/// connection is owned directly rather than behind a `Mutex`.
pub struct DuckDbBackend {
    conn: Connection,
}

impl DuckDbBackend {
    /// Create a new in-memory DuckDB connection
    pub fn in_memory() -> DbResult<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| DbError::ConnectionError(e.to_string()))?;
        Ok(Self { conn })
    }

    /// Create a new DuckDB connection from a file path
    pub fn from_path(path: &Path) -> DbResult<Self> {
        let conn = Connection::open(path)
            .map_err(|e| DbError::ConnectionError(format!("{e}: {}", path.display())))?;
        Ok(Self { conn })
    }

    /// Create from a connection string.
    ///
    /// Accepts `:memory:`, a file path, or either form behind `duckdb://`.
    pub fn new(url: &str) -> DbResult<Self> {
        let target = url.strip_prefix(URL_SCHEME).unwrap_or(url);
        if target.is_empty() || target == ":memory:" {
            Self::in_memory()
        } else {
            Self::from_path(Path::new(target))
        }
    }
}

impl Database for DuckDbBackend {
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize> {
        self.conn
            .execute(sql, duckdb::params_from_iter(params.iter().map(to_duckdb)))
            .map_err(|e| DbError::ExecutionError(format!("{e}: {sql}")))
    }

    fn execute_batch(&self, sql: &str) -> DbResult<()> {
        self.conn
            .execute_batch(sql)
            .map_err(|e| DbError::ExecutionError(e.to_string()))
    }

    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>> {
        let mut stmt = self
            .conn
            .prepare(sql)
            .map_err(|e| DbError::QueryError(format!("{e}: {sql}")))?;

        // Column metadata is only available once the statement has run, so
        // collect values first and read the names afterwards.
        let raw_rows: Vec<Vec<SqlValue>> = stmt
            .query_map(
                duckdb::params_from_iter(params.iter().map(to_duckdb)),
                |row| {
                    let col_count = row.as_ref().column_count();
                    (0..col_count)
                        .map(|i| row.get::<_, Value>(i).map(from_duckdb))
                        .collect()
                },
            )
            .map_err(|e| DbError::QueryError(format!("{e}: {sql}")))?
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| DbError::QueryError(format!("row error: {e}")))?;

        let column_names: Vec<String> = (0..stmt.column_count())
            .map(|i| {
                stmt.column_name(i)
                    .map_or("?".to_string(), |v| v.to_string())
            })
            .collect();

        Ok(raw_rows
            .into_iter()
            .map(|values| Row::from_pairs(column_names.iter().cloned().zip(values)))
            .collect())
    }

    fn relation_exists(&self, name: &str) -> DbResult<bool> {
        let (schema, table) = match name.rsplit_once('.') {
            Some((schema, table)) => (schema, table),
            None => ("main", name),
        };

        let rows = self.query(
            "SELECT COUNT(*) AS n FROM information_schema.tables \
             WHERE table_schema = ? AND table_name = ?",
            &[SqlValue::from(schema), SqlValue::from(table)],
        )?;

        let count = rows.first().map(|row| row.try_i64("n")).transpose()?;
        Ok(count.unwrap_or(0) > 0)
    }

    fn begin(&self) -> DbResult<()> {
        self.conn
            .execute_batch("BEGIN TRANSACTION")
            .map_err(|e| DbError::TransactionError(format!("BEGIN failed: {e}")))
    }

    fn commit(&self) -> DbResult<()> {
        self.conn
            .execute_batch("COMMIT")
            .map_err(|e| DbError::TransactionError(format!("COMMIT failed: {e}")))
    }

    fn rollback(&self) -> DbResult<()> {
        self.conn
            .execute_batch("ROLLBACK")
            .map_err(|e| DbError::TransactionError(format!("ROLLBACK failed: {e}")))
    }

    fn db_type(&self) -> &'static str {
        "duckdb"
    }
}

/// Convert a parameter for binding.
fn to_duckdb(value: &SqlValue) -> Value {
    match value {
        SqlValue::Null => Value::Null,
        SqlValue::Boolean(b) => Value::Boolean(*b),
        SqlValue::Integer(n) => Value::BigInt(*n),
        SqlValue::Float(x) => Value::Double(*x),
        SqlValue::Text(s) => Value::Text(s.clone()),
        SqlValue::Timestamp(ts) => Value::Timestamp(TimeUnit::Microsecond, ts.timestamp_micros()),
    }
}

/// Convert a result cell. Types without a [`SqlValue`] counterpart are
/// rendered as text.
fn from_duckdb(value: Value) -> SqlValue {
    match value {
        Value::Null => SqlValue::Null,
        Value::Boolean(b) => SqlValue::Boolean(b),
        Value::TinyInt(n) => SqlValue::Integer(i64::from(n)),
        Value::SmallInt(n) => SqlValue::Integer(i64::from(n)),
        Value::Int(n) => SqlValue::Integer(i64::from(n)),
        Value::BigInt(n) => SqlValue::Integer(n),
        Value::UTinyInt(n) => SqlValue::Integer(i64::from(n)),
        Value::USmallInt(n) => SqlValue::Integer(i64::from(n)),
        Value::UInt(n) => SqlValue::Integer(i64::from(n)),
        Value::Float(x) => SqlValue::Float(f64::from(x)),
        Value::Double(x) => SqlValue::Float(x),
        Value::Text(s) => SqlValue::Text(s),
        Value::Timestamp(unit, raw) => match timestamp_from_raw(unit, raw) {
            Some(ts) => SqlValue::Timestamp(ts),
            None => SqlValue::Text(raw.to_string()),
        },
        other => SqlValue::Text(format!("{other:?}")),
    }
}

fn timestamp_from_raw(unit: TimeUnit, raw: i64) -> Option<DateTime<Utc>> {
    let micros = match unit {
        TimeUnit::Second => raw.checked_mul(1_000_000)?,
        TimeUnit::Millisecond => raw.checked_mul(1_000)?,
        TimeUnit::Microsecond => raw,
        TimeUnit::Nanosecond => raw / 1_000,
    };
    DateTime::from_timestamp_micros(micros)
}

#[cfg(test)]
#[path = "duckdb_test.rs"]
mod tests;

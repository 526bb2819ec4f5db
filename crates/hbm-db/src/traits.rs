//! Database trait definition and scoped transactions

use crate::error::{DbError, DbResult};
use crate::value::{Row, SqlValue};

/// Database abstraction trait for hbm
///
/// Calls are blocking and made from a single thread; one transaction is open
/// at a time.
pub trait Database {
    /// Execute one statement with bound parameters, returns affected rows
    fn execute(&self, sql: &str, params: &[SqlValue]) -> DbResult<usize>;

    /// Execute a script of zero or more statements
    fn execute_batch(&self, sql: &str) -> DbResult<()>;

    /// Run a query and return every row keyed by column name
    fn query(&self, sql: &str, params: &[SqlValue]) -> DbResult<Vec<Row>>;

    /// Check if a table or view exists (`schema.name` or bare `name`)
    fn relation_exists(&self, name: &str) -> DbResult<bool>;

    /// Open a transaction
    fn begin(&self) -> DbResult<()>;

    /// Commit the open transaction
    fn commit(&self) -> DbResult<()>;

    /// Roll back the open transaction
    fn rollback(&self) -> DbResult<()>;

    /// Database type identifier for logging
    fn db_type(&self) -> &'static str;
}

/// Execute `body` within a `BEGIN` / `COMMIT` transaction, rolling back on
/// error.
///
/// A failed `COMMIT` is also rolled back and reported. Rollback failures are
/// logged; the original error is returned.
pub fn with_transaction<D, F, T, E>(db: &D, body: F) -> Result<T, E>
where
    D: Database + ?Sized,
    F: FnOnce(&D) -> Result<T, E>,
    E: From<DbError>,
{
    db.begin()?;

    match body(db) {
        Ok(value) => {
            if let Err(commit_err) = db.commit() {
                if let Err(e) = db.rollback() {
                    log::warn!("ROLLBACK after failed COMMIT also failed: {e}");
                }
                return Err(commit_err.into());
            }
            Ok(value)
        }
        Err(err) => {
            if let Err(e) = db.rollback() {
                log::warn!("ROLLBACK failed: {e}");
            }
            Err(err)
        }
    }
}

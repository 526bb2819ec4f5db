//! The migration ledger: the table recording which change-sets are applied.
//!
//! The table is bootstrapped on first use and holds one row per applied
//! change-set. Rows are inserted and deleted only inside the same transaction
//! as the change-set's own SQL, so the ledger never disagrees with the schema.

use crate::error::{MigrateError, MigrateResult};
use chrono::{DateTime, Utc};
use hbm_db::{Database, DbError, DbResult, Row, SqlValue};
use serde::Serialize;

/// One applied change-set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationRecord {
    /// Surrogate key assigned on insert
    pub id: i64,

    /// Name of the change-set file that was applied
    pub file_name: String,

    /// Apply run this record belongs to
    pub batch: i64,

    /// When the change-set was applied
    pub applied_at: DateTime<Utc>,

    /// SHA-256 of the file content at apply time. Audit metadata only.
    pub checksum: String,
}

impl MigrationRecord {
    fn from_row(row: &Row) -> DbResult<Self> {
        Ok(Self {
            id: row.try_i64("id")?,
            file_name: row.try_text("file_name")?.to_string(),
            batch: row.try_i64("batch")?,
            applied_at: row.try_timestamp("applied_at")?,
            checksum: row.try_text("checksum")?.to_string(),
        })
    }
}

/// Highest batch number among `records`, or 0 when empty.
pub fn last_batch(records: &[MigrationRecord]) -> i64 {
    records.iter().map(|r| r.batch).max().unwrap_or(0)
}

/// Access to the ledger table.
#[derive(Debug, Clone)]
pub struct Ledger {
    table: String,
}

impl Ledger {
    /// Ledger stored in `table`. The name must already be validated as a
    /// plain identifier (see `hbm_core::config::is_plain_identifier`).
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
        }
    }

    pub fn table(&self) -> &str {
        &self.table
    }

    /// True if the ledger table has been created.
    pub fn exists(&self, db: &dyn Database) -> MigrateResult<bool> {
        db.relation_exists(&self.table)
            .map_err(MigrateError::ledger("check for the ledger table"))
    }

    /// Create the ledger table if it does not exist. Safe to call on every
    /// startup.
    pub fn ensure_schema(&self, db: &dyn Database) -> MigrateResult<()> {
        if self.exists(db)? {
            return Ok(());
        }

        log::debug!("Creating ledger table {}", self.table);
        let table = &self.table;
        db.execute_batch(&format!(
            "CREATE SEQUENCE IF NOT EXISTS {table}_id_seq;
             CREATE TABLE IF NOT EXISTS {table} (
                 id         INTEGER PRIMARY KEY DEFAULT nextval('{table}_id_seq'),
                 file_name  VARCHAR NOT NULL,
                 batch      INTEGER NOT NULL,
                 applied_at TIMESTAMP NOT NULL DEFAULT now(),
                 checksum   VARCHAR NOT NULL
             );"
        ))
        .map_err(MigrateError::ledger("create the ledger table"))
    }

    /// All records, newest batch first; within a batch, most recently applied
    /// first.
    pub fn list_applied(&self, db: &dyn Database) -> MigrateResult<Vec<MigrationRecord>> {
        let rows = db
            .query(
                &format!(
                    "SELECT id, file_name, batch, applied_at, checksum FROM {} \
                     ORDER BY batch DESC, id DESC",
                    self.table
                ),
                &[],
            )
            .map_err(MigrateError::ledger("read applied migrations"))?;

        rows.iter()
            .map(MigrationRecord::from_row)
            .collect::<DbResult<Vec<_>>>()
            .map_err(MigrateError::ledger("decode ledger rows"))
    }

    /// Insert a record stamped with the current time. Call inside the
    /// transaction that ran the Up SQL.
    pub fn record_applied(
        &self,
        db: &dyn Database,
        file_name: &str,
        batch: i64,
        checksum: &str,
    ) -> MigrateResult<()> {
        db.execute(
            &format!(
                "INSERT INTO {} (file_name, batch, applied_at, checksum) VALUES (?, ?, ?, ?)",
                self.table
            ),
            &[
                SqlValue::from(file_name),
                SqlValue::from(batch),
                SqlValue::from(Utc::now()),
                SqlValue::from(checksum),
            ],
        )
        .map_err(MigrateError::ledger(format!("record {file_name}")))?;
        Ok(())
    }

    /// Delete a record. Call inside the transaction that ran the Down SQL.
    pub fn remove_record(&self, db: &dyn Database, id: i64) -> MigrateResult<()> {
        let deleted = db
            .execute(
                &format!("DELETE FROM {} WHERE id = ?", self.table),
                &[SqlValue::from(id)],
            )
            .map_err(MigrateError::ledger(format!("remove record {id}")))?;

        if deleted == 0 {
            return Err(MigrateError::Ledger {
                action: format!("remove record {id}"),
                source: DbError::QueryError(format!(
                    "no row with id {id} in {}",
                    self.table
                )),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "ledger_test.rs"]
mod tests;

//! Migration engine: diffs change-sets on disk against the ledger and applies
//! or reverts them one transaction per file.

use crate::error::{MigrateError, MigrateResult};
use crate::ledger::{last_batch, Ledger, MigrationRecord};
use chrono::{DateTime, Utc};
use hbm_core::{is_blank_sql, ChangeSetRepository, Direction};
use hbm_db::{with_transaction, Database};
use serde::Serialize;
use std::collections::{HashMap, HashSet};

/// Whether a run changed anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    /// At least one change-set was applied or reverted
    Applied,
    /// Nothing was pending (apply) or nothing was recorded (revert)
    NothingToDo,
}

/// What a run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunReport {
    pub direction: Direction,
    pub outcome: RunOutcome,

    /// Batch written (apply) or removed (revert). `None` when nothing ran.
    pub batch: Option<i64>,

    /// Change-set names in the order they were processed
    pub files: Vec<String>,
}

impl RunReport {
    fn nothing_to_do(direction: Direction) -> Self {
        Self {
            direction,
            outcome: RunOutcome::NothingToDo,
            batch: None,
            files: Vec::new(),
        }
    }

    /// True if the run touched no change-set.
    pub fn is_noop(&self) -> bool {
        self.outcome == RunOutcome::NothingToDo
    }
}

/// State of one change-set as shown by [`Migrator::status`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ChangeSetState {
    /// Recorded in the ledger and still present on disk
    Applied {
        batch: i64,
        applied_at: DateTime<Utc>,
        /// Content changed since it was applied. Informational only.
        modified: bool,
    },
    /// On disk, not yet applied
    Pending,
    /// Recorded in the ledger but the file is gone
    Missing {
        batch: i64,
        applied_at: DateTime<Utc>,
    },
}

/// One row of a status listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    pub name: String,
    #[serde(flatten)]
    pub state: ChangeSetState,
}

/// Drives apply and revert runs against one database.
pub struct Migrator<'a> {
    db: &'a dyn Database,
    repo: &'a dyn ChangeSetRepository,
    ledger: Ledger,
}

impl<'a> Migrator<'a> {
    pub fn new(db: &'a dyn Database, repo: &'a dyn ChangeSetRepository, ledger: Ledger) -> Self {
        Self { db, repo, ledger }
    }

    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Run in `direction`.
    pub fn run(&self, direction: Direction) -> MigrateResult<RunReport> {
        match direction {
            Direction::Apply => self.apply(),
            Direction::Revert => self.revert(),
        }
    }

    /// Apply every change-set without a ledger record, in name order, as one
    /// new batch.
    ///
    /// Each file is parsed before its transaction opens, so a malformed file
    /// stops the run without touching the database. Files applied earlier in
    /// the run stay committed.
    pub fn apply(&self) -> MigrateResult<RunReport> {
        self.ledger.ensure_schema(self.db)?;
        let applied = self.ledger.list_applied(self.db)?;
        let batch = last_batch(&applied) + 1;

        let applied_names: HashSet<&str> = applied.iter().map(|r| r.file_name.as_str()).collect();
        let pending: Vec<_> = self
            .repo
            .list()?
            .into_iter()
            .filter(|file| !applied_names.contains(file.name.as_str()))
            .collect();

        if pending.is_empty() {
            log::info!("No pending migrations");
            return Ok(RunReport::nothing_to_do(Direction::Apply));
        }

        let mut files = Vec::with_capacity(pending.len());
        for file in pending {
            let sql = file.parse()?;
            let checksum = file.checksum();

            with_transaction(self.db, |db| {
                execute_section(db, file.name.as_str(), Direction::Apply, &sql.up)?;
                self.ledger
                    .record_applied(db, file.name.as_str(), batch, &checksum)
            })?;

            log::info!("Applied {} (batch {batch})", file.name);
            files.push(file.name.into_inner());
        }

        Ok(RunReport {
            direction: Direction::Apply,
            outcome: RunOutcome::Applied,
            batch: Some(batch),
            files,
        })
    }

    /// Revert every record in the highest batch, most recently applied first.
    ///
    /// The Down SQL is read from the change-set file as it exists now; a
    /// record whose file was deleted fails the run with a discovery error.
    pub fn revert(&self) -> MigrateResult<RunReport> {
        self.ledger.ensure_schema(self.db)?;
        let applied = self.ledger.list_applied(self.db)?;

        let Some(batch) = applied.first().map(|r| r.batch) else {
            log::info!("No migrations to roll back");
            return Ok(RunReport::nothing_to_do(Direction::Revert));
        };

        let mut files = Vec::new();
        for record in applied.iter().take_while(|r| r.batch == batch) {
            self.revert_record(record)?;
            log::info!("Reverted {} (batch {batch})", record.file_name);
            files.push(record.file_name.clone());
        }

        Ok(RunReport {
            direction: Direction::Revert,
            outcome: RunOutcome::Applied,
            batch: Some(batch),
            files,
        })
    }

    fn revert_record(&self, record: &MigrationRecord) -> MigrateResult<()> {
        let file = self.repo.read(&record.file_name)?;
        let sql = file.parse()?;

        with_transaction(self.db, |db| {
            execute_section(db, &record.file_name, Direction::Revert, &sql.down)?;
            self.ledger.remove_record(db, record.id)
        })
    }

    /// Applied, pending, and missing change-sets in name order.
    ///
    /// Read-only: an absent ledger table is treated as empty rather than
    /// created.
    pub fn status(&self) -> MigrateResult<Vec<StatusEntry>> {
        let records = if self.ledger.exists(self.db)? {
            self.ledger.list_applied(self.db)?
        } else {
            Vec::new()
        };
        let mut by_name: HashMap<&str, &MigrationRecord> = records
            .iter()
            .map(|r| (r.file_name.as_str(), r))
            .collect();

        let mut entries: Vec<StatusEntry> = Vec::new();
        for file in self.repo.list()? {
            let state = match by_name.remove(file.name.as_str()) {
                Some(record) => ChangeSetState::Applied {
                    batch: record.batch,
                    applied_at: record.applied_at,
                    modified: record.checksum != file.checksum(),
                },
                None => ChangeSetState::Pending,
            };
            entries.push(StatusEntry {
                name: file.name.into_inner(),
                state,
            });
        }

        entries.extend(by_name.into_values().map(|record| StatusEntry {
            name: record.file_name.clone(),
            state: ChangeSetState::Missing {
                batch: record.batch,
                applied_at: record.applied_at,
            },
        }));
        entries.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(entries)
    }
}

/// Run one section of a change-set. Blank sections (whitespace and `--`
/// comments only) are skipped.
fn execute_section(
    db: &dyn Database,
    file: &str,
    direction: Direction,
    sql: &str,
) -> MigrateResult<()> {
    if is_blank_sql(sql) {
        log::debug!("Skipping empty {direction} section of {file}");
        return Ok(());
    }

    db.execute_batch(sql)
        .map_err(|source| MigrateError::Execution {
            file: file.to_string(),
            direction,
            source,
        })
}

#[cfg(test)]
#[path = "engine_test.rs"]
mod tests;

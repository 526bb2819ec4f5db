//! Migration ledger and engine for hbm.
//!
//! [`Ledger`] owns the tracking table; [`Migrator`] diffs change-sets from a
//! [`ChangeSetRepository`](hbm_core::ChangeSetRepository) against it and
//! applies or reverts them, one transaction per file.

pub mod engine;
pub mod error;
pub mod ledger;

pub use engine::{ChangeSetState, Migrator, RunOutcome, RunReport, StatusEntry};
pub use error::{MigrateError, MigrateResult};
pub use ledger::{last_batch, Ledger, MigrationRecord};

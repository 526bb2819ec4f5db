//! Error types for the migration engine.

use hbm_core::{CoreError, Direction};
use hbm_db::DbError;
use thiserror::Error;

/// Migration engine errors.
#[derive(Error, Debug)]
pub enum MigrateError {
    /// Migrations directory or a referenced change-set file is missing (M001).
    #[error("[M001] Migration discovery failed: {0}")]
    Discovery(CoreError),

    /// A change-set lacks the Up/Down sentinel structure (M002).
    #[error("[M002] Malformed migration: {0}")]
    Malformed(CoreError),

    /// Ledger bootstrap, read, or write failed (M003).
    #[error("[M003] Migration ledger failed to {action}: {source}")]
    Ledger {
        action: String,
        #[source]
        source: DbError,
    },

    /// The change-set's own SQL failed (M004).
    #[error("[M004] Migration '{file}' failed running {direction}: {source}")]
    Execution {
        file: String,
        direction: Direction,
        #[source]
        source: DbError,
    },

    /// BEGIN or COMMIT failed around a change-set (M005).
    #[error("[M005] Migration transaction failed: {0}")]
    Transaction(#[from] DbError),
}

impl MigrateError {
    pub(crate) fn ledger(action: impl Into<String>) -> impl FnOnce(DbError) -> Self {
        let action = action.into();
        move |source| MigrateError::Ledger { action, source }
    }
}

impl From<CoreError> for MigrateError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::MalformedChangeSet { .. } => MigrateError::Malformed(err),
            other => MigrateError::Discovery(other),
        }
    }
}

/// Result type alias for [`MigrateError`].
pub type MigrateResult<T> = Result<T, MigrateError>;

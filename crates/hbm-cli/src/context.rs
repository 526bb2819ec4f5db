//! Runtime context for commands that talk to the database

use anyhow::{Context, Result};
use hbm_core::{Config, DirectoryRepository};
use hbm_db::{Database, DuckDbBackend};
use hbm_migrate::{Ledger, Migrator};

use crate::cli::GlobalArgs;
use crate::commands::common::{load_config, migrations_dir};

/// Loaded configuration plus an open connection and change-set repository
pub(crate) struct MigrationContext {
    pub config: Config,
    pub repo: DirectoryRepository,
    db: DuckDbBackend,
}

impl MigrationContext {
    /// Resolve configuration and connect.
    ///
    /// A missing connection string fails here, before the ledger is touched.
    pub fn new(global: &GlobalArgs) -> Result<Self> {
        let config = load_config(global)?;
        let url = config
            .resolve_database_url(global.database_url.as_deref())
            .context("No database to migrate")?;

        let db = DuckDbBackend::new(&url)
            .with_context(|| format!("Failed to connect to database '{url}'"))?;
        log::debug!("Connected to {} at {url}", db.db_type());

        let repo = DirectoryRepository::new(migrations_dir(global, &config));
        Ok(Self { config, repo, db })
    }

    /// Engine over this context's database and repository
    pub fn migrator(&self) -> Migrator<'_> {
        Migrator::new(&self.db, &self.repo, Ledger::new(self.config.table.as_str()))
    }
}

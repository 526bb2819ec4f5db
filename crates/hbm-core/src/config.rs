//! Configuration types and parsing for hbm.yml

use crate::error::{CoreError, CoreResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project configuration from hbm.yml
///
/// Every field has a default, so a project without an `hbm.yml` behaves as if
/// the file were empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Directory containing change-set files, relative to the project root
    #[serde(default = "default_migrations_dir")]
    pub migrations_dir: String,

    /// Name of the ledger table that records applied change-sets
    #[serde(default = "default_table")]
    pub table: String,

    /// Database connection configuration
    #[serde(default)]
    pub database: DatabaseConfig,
}

/// Database connection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DatabaseConfig {
    /// Connection string (`:memory:`, a file path, or `duckdb://<path>`).
    ///
    /// Lowest precedence: `--database-url` and `DATABASE_URL` both win.
    #[serde(default)]
    pub url: Option<String>,
}

fn default_migrations_dir() -> String {
    "migrations".to_string()
}

fn default_table() -> String {
    "schema_migrations".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            migrations_dir: default_migrations_dir(),
            table: default_table(),
            database: DatabaseConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a file path
    pub fn load(path: &Path) -> CoreResult<Self> {
        if !path.exists() {
            return Err(CoreError::ConfigNotFound {
                path: path.display().to_string(),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = serde_yaml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a project directory.
    ///
    /// Looks for `hbm.yml`, then `hbm.yaml`; falls back to defaults when
    /// neither exists.
    pub fn load_from_dir(dir: &Path) -> CoreResult<Self> {
        let yml_path = dir.join("hbm.yml");
        let yaml_path = dir.join("hbm.yaml");

        if yml_path.exists() {
            Self::load(&yml_path)
        } else if yaml_path.exists() {
            Self::load(&yaml_path)
        } else {
            log::debug!("No hbm.yml in {}, using defaults", dir.display());
            Ok(Self::default())
        }
    }

    fn validate(&self) -> CoreResult<()> {
        if self.migrations_dir.trim().is_empty() {
            return Err(CoreError::ConfigInvalid {
                message: "migrations_dir cannot be empty".to_string(),
            });
        }

        if !is_plain_identifier(&self.table) {
            return Err(CoreError::ConfigInvalid {
                message: format!(
                    "table '{}' must be a plain SQL identifier ([A-Za-z_][A-Za-z0-9_]*)",
                    self.table
                ),
            });
        }

        Ok(())
    }

    /// Absolute path of the migrations directory under `root`
    pub fn migrations_dir_absolute(&self, root: &Path) -> PathBuf {
        root.join(&self.migrations_dir)
    }

    /// Resolve the connection string.
    ///
    /// `override_url` carries the CLI flag or `DATABASE_URL` (clap merges the
    /// two); the config file is consulted only when it is `None`. Empty
    /// strings count as unset.
    pub fn resolve_database_url(&self, override_url: Option<&str>) -> CoreResult<String> {
        let non_empty = |url: &str| -> Option<String> {
            let url = url.trim();
            (!url.is_empty()).then(|| url.to_string())
        };
        override_url
            .and_then(non_empty)
            .or_else(|| self.database.url.as_deref().and_then(non_empty))
            .ok_or(CoreError::MissingDatabaseUrl)
    }
}

/// True if `name` can be interpolated into SQL as an unquoted identifier.
pub fn is_plain_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;

//! Error types for hbm-core

use thiserror::Error;

/// Core error type for hbm
#[derive(Error, Debug)]
pub enum CoreError {
    /// E001: Configuration file not found
    #[error("[E001] Config file not found: {path}")]
    ConfigNotFound { path: String },

    /// E002: Failed to parse configuration file
    #[error("[E002] Failed to parse config: {0}")]
    ConfigParseError(#[from] serde_yaml::Error),

    /// E003: Invalid configuration value
    #[error("[E003] Invalid config: {message}")]
    ConfigInvalid { message: String },

    /// E004: No connection string from flag, environment, or config file
    #[error("[E004] No database connection configured. Set DATABASE_URL, pass --database-url, or set database.url in hbm.yml")]
    MissingDatabaseUrl,

    /// E005: Migrations directory does not exist
    #[error("[E005] Migrations directory not found: {path}")]
    MigrationsDirNotFound { path: String },

    /// E006: A named change-set file is not on disk
    #[error("[E006] Migration file '{name}' not found in {dir}")]
    ChangeSetNotFound { name: String, dir: String },

    /// E007: Change-set file lacks the Up/Down sentinel structure
    #[error("[E007] Invalid migration file '{name}': {source}")]
    MalformedChangeSet {
        name: String,
        source: crate::parser::SectionError,
    },

    /// E008: Change-set name rejected
    #[error("[E008] Invalid migration name '{name}': {reason}")]
    InvalidChangeSetName { name: String, reason: String },

    /// E009: Directory entry whose name is not valid UTF-8
    #[error("[E009] Migration file name is not valid UTF-8: {path}")]
    NonUtf8FileName { path: String },

    /// E010: IO error
    #[error("[E010] IO error: {0}")]
    Io(#[from] std::io::Error),

    /// E011: IO error with file path context
    #[error("[E011] Failed to access '{path}': {source}")]
    IoWithPath {
        path: String,
        source: std::io::Error,
    },
}

impl CoreError {
    /// True for errors raised while locating change-set files on disk.
    pub fn is_discovery(&self) -> bool {
        matches!(
            self,
            CoreError::MigrationsDirNotFound { .. }
                | CoreError::ChangeSetNotFound { .. }
                | CoreError::NonUtf8FileName { .. }
                | CoreError::IoWithPath { .. }
        )
    }
}

/// Result type alias for CoreError
pub type CoreResult<T> = Result<T, CoreError>;

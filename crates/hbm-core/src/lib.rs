//! hbm-core - Core library for hbm
//!
//! This crate provides configuration parsing, change-set discovery, Up/Down
//! section parsing, and scaffolding of new change-set files. It has no
//! database dependency; the ledger and engine live in `hbm-migrate`.

pub mod change_set;
pub mod checksum;
pub mod config;
pub mod error;
pub mod parser;
pub mod repository;
pub mod scaffold;

pub use change_set::{ChangeSetFile, ChangeSetName, ChangeSetSql, Direction, DOWN_MARKER, UP_MARKER};
pub use checksum::compute_checksum;
pub use config::{Config, DatabaseConfig};
pub use error::{CoreError, CoreResult};
pub use parser::{is_blank_sql, parse_sections, SectionError};
pub use repository::{ChangeSetRepository, DirectoryRepository};
pub use scaffold::{create_change_set, create_change_set_at};

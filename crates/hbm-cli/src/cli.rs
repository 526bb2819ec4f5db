//! CLI argument definitions using clap derive API

use clap::{Args, Parser, Subcommand, ValueEnum};
use hbm_core::Direction;

/// hbm - versioned, reversible SQL migrations
#[derive(Parser, Debug)]
#[command(name = "hbm")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Global options
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Global arguments available to all commands
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Path to project directory
    #[arg(short = 'p', long, global = true, default_value = ".")]
    pub project_dir: String,

    /// Override config file path
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    /// Database connection string (`:memory:`, a file path, or `duckdb://<path>`)
    #[arg(long, global = true, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,
}

/// Available subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Apply pending migrations or roll back the latest batch
    Migrate(MigrateArgs),

    /// Create a new, empty migration file
    Create(CreateArgs),

    /// Show applied and pending migrations
    Status(StatusArgs),
}

/// Arguments for the migrate command
#[derive(Args, Debug)]
pub struct MigrateArgs {
    /// `up` applies every pending migration as one batch; `down` rolls back
    /// the most recent batch
    #[arg(value_enum)]
    pub direction: MigrateDirection,
}

/// Migration directions accepted on the command line
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MigrateDirection {
    /// Apply pending migrations
    Up,
    /// Roll back the latest batch
    Down,
}

impl From<MigrateDirection> for Direction {
    fn from(direction: MigrateDirection) -> Self {
        match direction {
            MigrateDirection::Up => Direction::Apply,
            MigrateDirection::Down => Direction::Revert,
        }
    }
}

/// Arguments for the create command
#[derive(Args, Debug)]
pub struct CreateArgs {
    /// Descriptive name, e.g. `create_users`; prefixed with a UTC timestamp
    pub name: String,
}

/// Arguments for the status command
#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Print machine-readable JSON instead of a table
    #[arg(long)]
    pub json: bool,
}

#[cfg(test)]
#[path = "cli_test.rs"]
mod tests;

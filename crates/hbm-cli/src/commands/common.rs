//! Shared utilities for CLI commands

use anyhow::{Context, Result};
use hbm_core::Config;
use std::path::{Path, PathBuf};

use crate::cli::GlobalArgs;

/// Load `--config` if given, otherwise `hbm.yml` from the project directory
/// (defaults when absent).
pub(crate) fn load_config(global: &GlobalArgs) -> Result<Config> {
    match &global.config {
        Some(path) => Config::load(Path::new(path))
            .with_context(|| format!("Failed to load configuration file {path}")),
        None => Config::load_from_dir(Path::new(&global.project_dir))
            .context("Failed to load project configuration"),
    }
}

/// Migrations directory, resolved against the project directory.
pub(crate) fn migrations_dir(global: &GlobalArgs, config: &Config) -> PathBuf {
    config.migrations_dir_absolute(Path::new(&global.project_dir))
}

/// `"1 migration"`, `"2 migrations"`
pub(crate) fn plural(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

#[cfg(test)]
#[path = "common_test.rs"]
mod tests;

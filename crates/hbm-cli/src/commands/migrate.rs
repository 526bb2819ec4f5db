//! Migrate command implementation

use anyhow::{Context, Result};
use hbm_core::Direction;
use hbm_migrate::{RunOutcome, RunReport};

use crate::cli::{GlobalArgs, MigrateArgs};
use crate::commands::common::plural;
use crate::context::MigrationContext;

/// Execute the migrate command
pub(crate) fn execute(args: &MigrateArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = MigrationContext::new(global)?;
    let direction = Direction::from(args.direction);

    let report = ctx
        .migrator()
        .run(direction)
        .with_context(|| format!("migrate {direction} failed"))?;

    for line in summary_lines(&report) {
        println!("{line}");
    }
    Ok(())
}

/// Human-readable summary of a run.
pub(crate) fn summary_lines(report: &RunReport) -> Vec<String> {
    let (Some(batch), RunOutcome::Applied) = (report.batch, report.outcome) else {
        return vec![match report.direction {
            Direction::Apply => "Nothing to migrate.".to_string(),
            Direction::Revert => "Nothing to roll back.".to_string(),
        }];
    };

    let count = plural(report.files.len(), "migration");
    let header = match report.direction {
        Direction::Apply => format!("Applied {count} (batch {batch}):"),
        Direction::Revert => format!("Rolled back {count} (batch {batch}):"),
    };

    std::iter::once(header)
        .chain(report.files.iter().map(|file| format!("  {file}")))
        .collect()
}

#[cfg(test)]
#[path = "migrate_test.rs"]
mod tests;

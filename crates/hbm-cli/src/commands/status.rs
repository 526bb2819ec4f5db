//! Status command implementation

use anyhow::{Context, Result};
use hbm_migrate::{ChangeSetState, StatusEntry};
use serde::Serialize;

use crate::cli::{GlobalArgs, StatusArgs};
use crate::context::MigrationContext;

/// JSON output for `hbm status --json`
#[derive(Debug, Serialize)]
struct StatusReport<'a> {
    migrations_dir: String,
    table: &'a str,
    applied: usize,
    pending: usize,
    migrations: &'a [StatusEntry],
}

/// Execute the status command
pub(crate) fn execute(args: &StatusArgs, global: &GlobalArgs) -> Result<()> {
    let ctx = MigrationContext::new(global)?;
    let entries = ctx
        .migrator()
        .status()
        .context("Failed to read migration status")?;

    let report = StatusReport {
        migrations_dir: ctx.repo.dir().display().to_string(),
        table: &ctx.config.table,
        applied: count(&entries, |s| matches!(s, ChangeSetState::Applied { .. })),
        pending: count(&entries, |s| matches!(s, ChangeSetState::Pending)),
        migrations: &entries,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!(
        "Migrations in {} (ledger: {})",
        report.migrations_dir, report.table
    );
    if entries.is_empty() {
        println!("  (none)");
    }
    for entry in &entries {
        println!("  {}", format_entry(entry));
    }
    println!();
    println!("{} applied, {} pending", report.applied, report.pending);
    Ok(())
}

fn count(entries: &[StatusEntry], pred: impl Fn(&ChangeSetState) -> bool) -> usize {
    entries.iter().filter(|e| pred(&e.state)).count()
}

/// One table row: state, batch, applied time, name.
pub(crate) fn format_entry(entry: &StatusEntry) -> String {
    let (label, batch, applied_at) = match &entry.state {
        ChangeSetState::Applied {
            batch,
            applied_at,
            modified,
        } => (
            if *modified { "modified" } else { "applied" },
            batch.to_string(),
            applied_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
        ChangeSetState::Pending => ("pending", "-".to_string(), "-".to_string()),
        ChangeSetState::Missing { batch, applied_at } => (
            "missing",
            batch.to_string(),
            applied_at.format("%Y-%m-%d %H:%M:%S").to_string(),
        ),
    };
    format!("{label:<9} {batch:>5}  {applied_at:<19}  {}", entry.name)
}

#[cfg(test)]
#[path = "status_test.rs"]
mod tests;

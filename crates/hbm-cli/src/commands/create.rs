//! Create command implementation

use anyhow::{Context, Result};
use hbm_core::create_change_set;

use crate::cli::{CreateArgs, GlobalArgs};
use crate::commands::common::{load_config, migrations_dir};

/// Execute the create command
///
/// Needs no database connection.
pub(crate) fn execute(args: &CreateArgs, global: &GlobalArgs) -> Result<()> {
    let config = load_config(global)?;
    let dir = migrations_dir(global, &config);

    let filename = create_change_set(&dir, &args.name)
        .with_context(|| format!("Failed to create migration '{}'", args.name))?;

    println!("Created {}", dir.join(&filename).display());
    Ok(())
}

//! Scaffolding of new, empty change-set files.

use crate::change_set::{DOWN_MARKER, UP_MARKER};
use crate::error::{CoreError, CoreResult};
use chrono::{DateTime, Utc};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Timestamp prefix format; sorts lexicographically in chronological order.
pub const TIMESTAMP_FORMAT: &str = "%Y%m%d%H%M%S";

/// Body written into every new change-set.
pub fn template() -> String {
    format!(
        "{UP_MARKER}\n\
         -- SQL in section 'Up' is executed when this migration is applied\n\
         \n\
         {DOWN_MARKER}\n\
         -- SQL in section 'Down' is executed when this migration is rolled back\n"
    )
}

/// Create `<timestamp>_<name>.sql` in `dir` and return the file name.
///
/// The directory is created if needed. An existing file is never overwritten.
pub fn create_change_set(dir: &Path, name: &str) -> CoreResult<String> {
    create_change_set_at(dir, name, Utc::now())
}

/// [`create_change_set`] with an explicit clock.
pub fn create_change_set_at(dir: &Path, name: &str, now: DateTime<Utc>) -> CoreResult<String> {
    let slug = validate_name(name)?;
    let filename = format!("{}_{}.sql", now.format(TIMESTAMP_FORMAT), slug);

    fs::create_dir_all(dir).map_err(|e| CoreError::IoWithPath {
        path: dir.display().to_string(),
        source: e,
    })?;

    let path = dir.join(&filename);
    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&path)
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
    file.write_all(template().as_bytes())
        .map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;

    log::debug!("Wrote change-set template to {}", path.display());
    Ok(filename)
}

/// Reject names that would produce confusing or escaping file names, and
/// replace inner whitespace with underscores.
fn validate_name(name: &str) -> CoreResult<String> {
    let name = name.trim();
    let invalid = |reason: &str| CoreError::InvalidChangeSetName {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    if name.is_empty() {
        return Err(invalid("name cannot be empty"));
    }
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return Err(invalid("name must not contain '/', '\\', or '..'"));
    }
    if name.starts_with('.') || name.starts_with('-') {
        return Err(invalid("name must not start with '.' or '-'"));
    }

    Ok(name.split_whitespace().collect::<Vec<_>>().join("_"))
}

#[cfg(test)]
#[path = "scaffold_test.rs"]
mod tests;

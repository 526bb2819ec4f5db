//! Splitting change-set text into Up and Down SQL sections.
//!
//! A change-set file looks like:
//!
//! ```text
//! -- +hbm Up
//! CREATE TABLE users (id INTEGER);
//! -- +hbm Down
//! DROP TABLE users;
//! ```
//!
//! The Down sentinel is mandatory and must appear exactly once. The Up header
//! is optional; when present it must appear once, before the sentinel.

use crate::change_set::{ChangeSetSql, DOWN_MARKER, UP_MARKER};
use thiserror::Error;

/// Why a change-set's text could not be split into sections.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SectionError {
    /// The Down sentinel does not appear at all
    #[error("missing '{}'", DOWN_MARKER)]
    MissingDownMarker,

    /// The Down sentinel appears more than once
    #[error("'{}' appears {count} times, expected exactly once", DOWN_MARKER)]
    DuplicateDownMarker { count: usize },

    /// The Up header appears more than once
    #[error("'{}' appears {count} times, expected at most once", UP_MARKER)]
    DuplicateUpMarker { count: usize },

    /// The Up header follows the Down sentinel
    #[error("'{}' must come before '{}'", UP_MARKER, DOWN_MARKER)]
    UpMarkerAfterDown,
}

/// Split `content` into its Up and Down sections.
///
/// Both sections are trimmed of surrounding whitespace. Comment lines inside
/// a section are kept; use [`is_blank_sql`] to tell whether a section has
/// anything to execute.
pub fn parse_sections(content: &str) -> Result<ChangeSetSql, SectionError> {
    let down_count = content.matches(DOWN_MARKER).count();
    if down_count == 0 {
        return Err(SectionError::MissingDownMarker);
    }
    if down_count > 1 {
        return Err(SectionError::DuplicateDownMarker { count: down_count });
    }

    let Some((before, after)) = content.split_once(DOWN_MARKER) else {
        return Err(SectionError::MissingDownMarker);
    };

    if after.contains(UP_MARKER) {
        return Err(SectionError::UpMarkerAfterDown);
    }
    let up_count = before.matches(UP_MARKER).count();
    if up_count > 1 {
        return Err(SectionError::DuplicateUpMarker { count: up_count });
    }

    Ok(ChangeSetSql {
        up: before.replacen(UP_MARKER, "", 1).trim().to_string(),
        down: after.trim().to_string(),
    })
}

/// True if `sql` holds nothing but whitespace and `--` line comments.
pub fn is_blank_sql(sql: &str) -> bool {
    sql.lines().all(|line| {
        let line = line.trim();
        line.is_empty() || line.starts_with("--")
    })
}

#[cfg(test)]
#[path = "parser_test.rs"]
mod tests;

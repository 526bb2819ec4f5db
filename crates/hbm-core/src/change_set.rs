//! Change-set types: a named file of Up/Down SQL.

use crate::checksum::compute_checksum;
use crate::error::{CoreError, CoreResult};
use crate::parser::parse_sections;
use serde::{Deserialize, Serialize};
use std::borrow::Borrow;
use std::fmt;
use std::ops::Deref;
use std::path::PathBuf;

/// Header that opens the Up section of a change-set file.
pub const UP_MARKER: &str = "-- +hbm Up";

/// Sentinel separating the Up section from the Down section.
pub const DOWN_MARKER: &str = "-- +hbm Down";

/// Which way a change-set is executed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Run the Up section and record the change-set
    Apply,
    /// Run the Down section and remove the record
    Revert,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::Apply => write!(f, "up"),
            Direction::Revert => write!(f, "down"),
        }
    }
}

/// Strongly-typed change-set file name.
///
/// The name is the file's full name inside the migrations directory
/// (`20240101120000_create_users.sql`). It doubles as the ledger key and as
/// the ordering key: names sort lexicographically, so a sortable timestamp
/// prefix gives chronological order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChangeSetName(String);

impl ChangeSetName {
    /// Try to create a new `ChangeSetName`.
    ///
    /// Returns `None` for names that are empty or could escape the migrations
    /// directory (path separators, `.`/`..`).
    pub fn try_new(name: impl Into<String>) -> Option<Self> {
        let s = name.into();
        if s.is_empty() || s == "." || s == ".." || s.contains('/') || s.contains('\\') {
            None
        } else {
            Some(Self(s))
        }
    }

    /// Return the underlying name as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Consume the wrapper and return the inner `String`.
    pub fn into_inner(self) -> String {
        self.0
    }
}

impl fmt::Display for ChangeSetName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ChangeSetName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl Deref for ChangeSetName {
    type Target = str;

    fn deref(&self) -> &str {
        &self.0
    }
}

impl Borrow<str> for ChangeSetName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for ChangeSetName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for ChangeSetName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// A change-set discovered on disk.
#[derive(Debug, Clone)]
pub struct ChangeSetFile {
    /// File name, unique within the migrations directory
    pub name: ChangeSetName,

    /// Full path the content was read from
    pub path: PathBuf,

    /// Raw file text; split into sections by [`ChangeSetFile::parse`]
    pub content: String,
}

impl ChangeSetFile {
    /// Split the content into its Up and Down sections.
    pub fn parse(&self) -> CoreResult<ChangeSetSql> {
        parse_sections(&self.content).map_err(|source| CoreError::MalformedChangeSet {
            name: self.name.to_string(),
            source,
        })
    }

    /// SHA-256 checksum of the raw content.
    pub fn checksum(&self) -> String {
        compute_checksum(&self.content)
    }
}

/// The parsed SQL sections of a change-set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeSetSql {
    /// Forward SQL, run on apply
    pub up: String,

    /// Backward SQL, run on revert
    pub down: String,
}

impl ChangeSetSql {
    /// The section executed for `direction`.
    pub fn section(&self, direction: Direction) -> &str {
        match direction {
            Direction::Apply => &self.up,
            Direction::Revert => &self.down,
        }
    }
}

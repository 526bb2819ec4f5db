//! Change-set discovery.
//!
//! [`ChangeSetRepository`] is the seam between the engine and wherever
//! change-sets live. [`DirectoryRepository`] reads them from a directory on
//! disk; tests can substitute an in-memory implementation.

use crate::change_set::{ChangeSetFile, ChangeSetName};
use crate::error::{CoreError, CoreResult};
use std::fs;
use std::path::{Path, PathBuf};

/// Source of change-set files.
pub trait ChangeSetRepository {
    /// All change-sets, sorted ascending by name.
    ///
    /// Calling this twice without changes to the underlying store returns the
    /// same sequence.
    fn list(&self) -> CoreResult<Vec<ChangeSetFile>>;

    /// Read a single change-set by name.
    ///
    /// Fails with [`CoreError::ChangeSetNotFound`] if it no longer exists.
    fn read(&self, name: &str) -> CoreResult<ChangeSetFile>;
}

/// Change-sets stored as files in one directory.
#[derive(Debug, Clone)]
pub struct DirectoryRepository {
    dir: PathBuf,
}

impl DirectoryRepository {
    /// Create a repository over `dir`. The directory is not touched until
    /// [`list`](ChangeSetRepository::list) or [`read`](ChangeSetRepository::read).
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The directory this repository reads from
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn ensure_dir(&self) -> CoreResult<()> {
        if self.dir.is_dir() {
            Ok(())
        } else {
            Err(CoreError::MigrationsDirNotFound {
                path: self.dir.display().to_string(),
            })
        }
    }

    fn read_file(&self, name: ChangeSetName, path: PathBuf) -> CoreResult<ChangeSetFile> {
        let content = fs::read_to_string(&path).map_err(|e| CoreError::IoWithPath {
            path: path.display().to_string(),
            source: e,
        })?;
        Ok(ChangeSetFile {
            name,
            path,
            content,
        })
    }
}

impl ChangeSetRepository for DirectoryRepository {
    fn list(&self) -> CoreResult<Vec<ChangeSetFile>> {
        self.ensure_dir()?;

        let entries = fs::read_dir(&self.dir).map_err(|e| CoreError::IoWithPath {
            path: self.dir.display().to_string(),
            source: e,
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| CoreError::IoWithPath {
                path: self.dir.display().to_string(),
                source: e,
            })?;
            let path = entry.path();

            if !path.is_file() {
                log::debug!("Skipping non-file entry {}", path.display());
                continue;
            }

            let Some(file_name) = entry.file_name().to_str().map(String::from) else {
                return Err(CoreError::NonUtf8FileName {
                    path: path.display().to_string(),
                });
            };

            if file_name.starts_with('.') {
                log::debug!("Skipping hidden file {}", path.display());
                continue;
            }

            let Some(name) = ChangeSetName::try_new(file_name) else {
                log::warn!("Skipping file with unusable name: {}", path.display());
                continue;
            };

            files.push(self.read_file(name, path)?);
        }

        files.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(files)
    }

    fn read(&self, name: &str) -> CoreResult<ChangeSetFile> {
        self.ensure_dir()?;

        let not_found = || CoreError::ChangeSetNotFound {
            name: name.to_string(),
            dir: self.dir.display().to_string(),
        };

        let change_set_name = ChangeSetName::try_new(name).ok_or_else(not_found)?;
        let path = self.dir.join(change_set_name.as_str());
        if !path.is_file() {
            return Err(not_found());
        }
        self.read_file(change_set_name, path)
    }
}

#[cfg(test)]
#[path = "repository_test.rs"]
mod tests;

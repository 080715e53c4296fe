//! Run configuration.

use crate::error::CleanupError;
use crate::time::parse_date;
use chrono::NaiveDate;
use std::collections::BTreeSet;
use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

/// Validated settings for a single run.
///
/// Setters consume the value, so once a `Config` is handed to the classifier or
/// executor it can no longer change.
#[derive(Debug, Clone)]
pub struct Config {
    root: PathBuf,
    cutoff: NaiveDate,
    recursive: bool,
    delete: bool,
    delete_empty_folders: bool,
    delete_symlinks: bool,
    skip: BTreeSet<OsString>,
}

impl Config {
    /// Configuration for a non-recursive dry run with nothing skipped.
    pub fn new(root: impl Into<PathBuf>, cutoff: NaiveDate) -> Self {
        Config {
            root: root.into(),
            cutoff,
            recursive: false,
            delete: false,
            delete_empty_folders: false,
            delete_symlinks: false,
            skip: BTreeSet::new(),
        }
    }

    /// Build a configuration from the raw folder and date arguments.
    ///
    /// The folder must be an existing directory; it is canonicalized so every
    /// reported path is absolute.
    pub fn from_args(folder: &str, date: &str) -> Result<Self, CleanupError> {
        let cutoff = parse_date(date)?;

        let path = Path::new(folder);
        if !path.is_dir() {
            return Err(CleanupError::MissingFolder {
                path: path.to_path_buf(),
            });
        }
        let root = path
            .canonicalize()
            .map_err(|e| CleanupError::from_io(path, e))?;

        Ok(Config::new(root, cutoff))
    }

    pub fn with_recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    pub fn with_delete(mut self, delete: bool) -> Self {
        self.delete = delete;
        self
    }

    pub fn with_delete_empty_folders(mut self, delete_empty_folders: bool) -> Self {
        self.delete_empty_folders = delete_empty_folders;
        self
    }

    pub fn with_delete_symlinks(mut self, delete_symlinks: bool) -> Self {
        self.delete_symlinks = delete_symlinks;
        self
    }

    /// Add names to the skip set. Matching is exact, against base names only.
    pub fn with_skip<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        self.skip.extend(names.into_iter().map(Into::into));
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn cutoff(&self) -> NaiveDate {
        self.cutoff
    }

    pub fn recursive(&self) -> bool {
        self.recursive
    }

    /// Whether deletions are carried out rather than previewed
    pub fn delete(&self) -> bool {
        self.delete
    }

    pub fn delete_empty_folders(&self) -> bool {
        self.delete_empty_folders
    }

    pub fn delete_symlinks(&self) -> bool {
        self.delete_symlinks
    }

    /// Check whether an entry name is in the skip set
    pub fn is_skipped(&self, name: &OsStr) -> bool {
        self.skip.contains(name)
    }
}

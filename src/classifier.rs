//! Directory crawling and deletion classification.

use crate::config::Config;
use crate::error::CleanupError;
use crate::time::{format_date, local_midnight};

use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::SystemTime;
use tracing::{debug, trace};

/// A regular file old enough to be deleted
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub modified: SystemTime,
    pub size: u64,
    /// Modification date as shown to the user (DD-MM-YYYY)
    pub modified_display: String,
}

/// A symbolic link selected for deletion. Links are never followed.
#[derive(Debug, Clone)]
pub struct SymlinkEntry {
    pub path: PathBuf,
}

impl SymlinkEntry {
    pub const ANNOTATION: &'static str = "(Symbolic link)";
}

/// Everything a single crawl selected for deletion
#[derive(Debug, Default)]
pub struct ClassificationResult {
    pub files: Vec<FileEntry>,
    pub symlinks: Vec<SymlinkEntry>,
    /// Directories expected to be empty once files and symlinks are gone,
    /// in discovery order (children before their parent).
    pub folders: Vec<PathBuf>,
    /// Skip-list names that were actually encountered, each recorded once
    pub skipped: Vec<OsString>,
    /// Sum of the sizes of all entries in `files`
    pub recovered_space: u64,
}

impl ClassificationResult {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty() && self.symlinks.is_empty() && self.folders.is_empty()
    }

    fn record_skipped(&mut self, name: OsString) {
        if !self.skipped.contains(&name) {
            self.skipped.push(name);
        }
    }

    /// Fold the result of a subdirectory crawl into this one
    fn merge(&mut self, other: ClassificationResult) {
        self.files.extend(other.files);
        self.symlinks.extend(other.symlinks);
        self.folders.extend(other.folders);
        self.recovered_space += other.recovered_space;
        for name in other.skipped {
            self.record_skipped(name);
        }
    }
}

/// Crawl `path` and classify everything that falls before the configured cutoff.
///
/// Any directory that cannot be listed aborts the whole crawl; the error is
/// returned and nothing collected so far is kept.
pub fn classify(path: &Path, config: &Config) -> Result<ClassificationResult, CleanupError> {
    let cutoff = local_midnight(config.cutoff())?;
    debug!(
        root = %path.display(),
        cutoff = %config.cutoff(),
        recursive = config.recursive(),
        "classifying"
    );

    let crawler = Crawler { config, cutoff };
    crawler.crawl(path, true)
}

struct Crawler<'a> {
    config: &'a Config,
    cutoff: SystemTime,
}

impl Crawler<'_> {
    fn crawl(&self, dir: &Path, is_root: bool) -> Result<ClassificationResult, CleanupError> {
        let mut result = ClassificationResult::default();

        // Entries that count toward the emptiness prediction
        let mut seen = 0usize;
        let mut eligible = 0usize;
        let mut subdirs = 0usize;

        for entry in read_dir_sorted(dir)? {
            let name = entry.file_name();
            if self.config.is_skipped(&name) {
                trace!(path = %entry.path().display(), "skipped by name");
                result.record_skipped(name);
                continue;
            }

            let path = entry.path();
            // symlink_metadata so links are classified as links, never followed
            let metadata = fs::symlink_metadata(&path).map_err(|e| CleanupError::from_io(&path, e))?;
            let file_type = metadata.file_type();

            if file_type.is_dir() {
                subdirs += 1;
                if self.config.recursive() {
                    let sub = self.crawl(&path, false)?;
                    result.merge(sub);
                }
            } else if file_type.is_symlink() {
                if !self.config.delete_symlinks() {
                    continue;
                }
                seen += 1;
                eligible += 1;
                debug!(path = %path.display(), "symbolic link selected");
                result.symlinks.push(SymlinkEntry { path });
            } else if file_type.is_file() {
                seen += 1;
                let modified = metadata
                    .modified()
                    .map_err(|e| CleanupError::from_io(&path, e))?;
                if modified <= self.cutoff {
                    eligible += 1;
                    let size = metadata.len();
                    result.recovered_space += size;
                    debug!(path = %path.display(), size, "file selected");
                    result.files.push(FileEntry {
                        path,
                        modified,
                        size,
                        modified_display: format_date(modified),
                    });
                }
            } else {
                // fifo, socket or device node: never deleted, keeps the folder alive
                seen += 1;
                trace!(path = %path.display(), "not a regular file");
            }
        }

        // A folder holding nothing but subfolders is not flagged, even if those
        // subfolders are candidates themselves.
        let only_subdirs = seen == 0 && subdirs > 0;
        if !is_root && eligible == seen && !only_subdirs {
            debug!(path = %dir.display(), "folder expected to become empty");
            result.folders.push(dir.to_path_buf());
        }

        Ok(result)
    }
}

/// List a directory with entries ordered by file name
fn read_dir_sorted(dir: &Path) -> Result<Vec<fs::DirEntry>, CleanupError> {
    let mut entries = fs::read_dir(dir)
        .map_err(|e| CleanupError::from_io(dir, e))?
        .collect::<Result<Vec<_>, _>>()
        .map_err(|e| CleanupError::from_io(dir, e))?;
    entries.sort_by_key(|entry| entry.file_name());
    Ok(entries)
}

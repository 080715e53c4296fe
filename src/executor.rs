//! Deletion of classified entries.

use crate::classifier::ClassificationResult;
use crate::config::Config;

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Symlink,
    Folder,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeletionStatus {
    Removed,
    /// The folder still had children; expected when skipped entries live inside it
    NotEmpty,
    Failed(String),
}

/// Outcome of a single removal attempt
#[derive(Debug, Clone)]
pub struct Deletion {
    pub path: PathBuf,
    pub kind: EntryKind,
    pub status: DeletionStatus,
}

/// What a deleting run actually did, in the order it did it
#[derive(Debug, Default)]
pub struct ExecutionReport {
    pub deletions: Vec<Deletion>,
    /// Bytes held by files that were removed
    pub bytes_freed: u64,
}

impl ExecutionReport {
    fn removed(&self, kind: EntryKind) -> usize {
        self.deletions
            .iter()
            .filter(|d| d.kind == kind && d.status == DeletionStatus::Removed)
            .count()
    }

    pub fn files_deleted(&self) -> usize {
        self.removed(EntryKind::File)
    }

    pub fn symlinks_deleted(&self) -> usize {
        self.removed(EntryKind::Symlink)
    }

    pub fn folders_deleted(&self) -> usize {
        self.removed(EntryKind::Folder)
    }

    /// Attempts that failed for a reason other than a folder not being empty
    pub fn failures(&self) -> impl Iterator<Item = &Deletion> {
        self.deletions
            .iter()
            .filter(|d| matches!(d.status, DeletionStatus::Failed(_)))
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }

    fn record(&mut self, path: &Path, kind: EntryKind, outcome: io::Result<()>) -> bool {
        let status = match outcome {
            Ok(()) => {
                debug!(path = %path.display(), ?kind, "removed");
                DeletionStatus::Removed
            }
            Err(err) if kind == EntryKind::Folder && is_not_empty(&err) => {
                debug!(path = %path.display(), "folder not empty, left in place");
                DeletionStatus::NotEmpty
            }
            Err(err) => {
                warn!(path = %path.display(), ?kind, error = %err, "removal failed");
                DeletionStatus::Failed(err.to_string())
            }
        };
        let removed = status == DeletionStatus::Removed;
        self.deletions.push(Deletion {
            path: path.to_path_buf(),
            kind,
            status,
        });
        removed
    }
}

fn is_not_empty(err: &io::Error) -> bool {
    err.kind() == io::ErrorKind::DirectoryNotEmpty
}

/// Delete files, then symbolic links, then predicted-empty folders.
///
/// Every entry is attempted on its own; a failure is recorded and the run moves
/// on to the next entry. Folders are removed deepest first so a parent is only
/// tried after its own candidate subfolders are gone.
pub fn execute(result: &ClassificationResult, config: &Config) -> ExecutionReport {
    let mut report = ExecutionReport::default();

    for file in &result.files {
        if report.record(&file.path, EntryKind::File, fs::remove_file(&file.path)) {
            report.bytes_freed += file.size;
        }
    }

    if config.delete_symlinks() {
        for link in &result.symlinks {
            report.record(&link.path, EntryKind::Symlink, remove_symlink(&link.path));
        }
    }

    if config.delete_empty_folders() {
        for folder in deepest_first(&result.folders) {
            report.record(folder, EntryKind::Folder, fs::remove_dir(folder));
        }
    }

    report
}

/// Order folders so that deeper paths come before shallower ones
fn deepest_first(folders: &[PathBuf]) -> Vec<&PathBuf> {
    let mut ordered: Vec<&PathBuf> = folders.iter().collect();
    ordered.sort_by_key(|path| std::cmp::Reverse(path.components().count()));
    ordered
}

#[cfg(not(windows))]
fn remove_symlink(path: &Path) -> io::Result<()> {
    fs::remove_file(path)
}

#[cfg(windows)]
fn remove_symlink(path: &Path) -> io::Result<()> {
    // Directory symlinks on Windows must be removed as directories
    fs::remove_file(path).or_else(|_| fs::remove_dir(path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::classifier::{classify, FileEntry};
    use chrono::NaiveDate;
    use filetime::{set_file_mtime, FileTime};
    use std::time::SystemTime;
    use tempfile::tempdir;

    fn config(root: &Path) -> Config {
        Config::new(root, NaiveDate::from_ymd_opt(2015, 1, 1).unwrap())
    }

    fn old_file(path: &Path, size: usize) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, vec![0u8; size]).unwrap();
        set_file_mtime(path, FileTime::from_unix_time(1_388_577_600, 0)).unwrap(); // 2014-01-01 12:00 UTC
    }

    #[test]
    fn test_deletes_files_and_counts_bytes() {
        let dir = tempdir().unwrap();
        old_file(&dir.path().join("a.txt"), 100);
        old_file(&dir.path().join("b.txt"), 23);

        let config = config(dir.path()).with_delete(true);
        let result = classify(dir.path(), &config).unwrap();
        let report = execute(&result, &config);

        assert_eq!(report.files_deleted(), 2);
        assert_eq!(report.bytes_freed, 123);
        assert!(!report.has_failures());
        assert!(!dir.path().join("a.txt").exists());
        assert!(!dir.path().join("b.txt").exists());
    }

    #[test]
    fn test_missing_file_does_not_stop_others() {
        let dir = tempdir().unwrap();
        old_file(&dir.path().join("a.txt"), 1);
        old_file(&dir.path().join("b.txt"), 1);
        old_file(&dir.path().join("c.txt"), 1);

        let config = config(dir.path()).with_delete(true);
        let result = classify(dir.path(), &config).unwrap();
        fs::remove_file(dir.path().join("b.txt")).unwrap();
        let report = execute(&result, &config);

        assert_eq!(report.files_deleted(), 2);
        assert_eq!(report.bytes_freed, 2);
        let failures: Vec<_> = report.failures().collect();
        assert_eq!(failures.len(), 1);
        assert_eq!(failures[0].path, dir.path().join("b.txt"));
        assert!(!dir.path().join("c.txt").exists());
    }

    #[test]
    fn test_folders_left_alone_unless_enabled() {
        let dir = tempdir().unwrap();
        old_file(&dir.path().join("sub/old.txt"), 1);

        let config = config(dir.path()).with_recursive(true).with_delete(true);
        let result = classify(dir.path(), &config).unwrap();
        assert_eq!(result.folders.len(), 1);

        let report = execute(&result, &config);

        assert_eq!(report.folders_deleted(), 0);
        assert!(dir.path().join("sub").is_dir());
        assert!(!dir.path().join("sub/old.txt").exists());
    }

    #[test]
    fn test_folder_removed_after_its_files() {
        let dir = tempdir().unwrap();
        old_file(&dir.path().join("sub/old.txt"), 1);

        let config = config(dir.path())
            .with_recursive(true)
            .with_delete(true)
            .with_delete_empty_folders(true);
        let result = classify(dir.path(), &config).unwrap();
        let report = execute(&result, &config);

        let kinds: Vec<EntryKind> = report.deletions.iter().map(|d| d.kind).collect();
        assert_eq!(kinds, vec![EntryKind::File, EntryKind::Folder]);
        assert_eq!(report.files_deleted(), 1);
        assert_eq!(report.folders_deleted(), 1);
        assert!(!dir.path().join("sub").exists());
    }

    #[test]
    fn test_not_empty_folder_is_tolerated() {
        let dir = tempdir().unwrap();
        old_file(&dir.path().join("a/keep.txt"), 1);
        old_file(&dir.path().join("b/old.txt"), 1);

        let config = config(dir.path())
            .with_recursive(true)
            .with_delete(true)
            .with_delete_empty_folders(true)
            .with_skip(["keep.txt"]);
        let result = classify(dir.path(), &config).unwrap();
        assert_eq!(result.folders.len(), 2);

        let report = execute(&result, &config);

        assert!(!report.has_failures());
        assert_eq!(report.folders_deleted(), 1);
        let a = report
            .deletions
            .iter()
            .find(|d| d.path == dir.path().join("a"))
            .unwrap();
        assert_eq!(a.status, DeletionStatus::NotEmpty);
        assert!(dir.path().join("a/keep.txt").exists());
        assert!(!dir.path().join("b").exists());
    }

    #[test]
    fn test_deepest_first_order() {
        let folders = vec![
            PathBuf::from("/r/a"),
            PathBuf::from("/r/a/b/c"),
            PathBuf::from("/r/x"),
            PathBuf::from("/r/a/b"),
        ];
        let ordered = deepest_first(&folders);
        assert_eq!(
            ordered,
            vec![
                &PathBuf::from("/r/a/b/c"),
                &PathBuf::from("/r/a/b"),
                &PathBuf::from("/r/a"),
                &PathBuf::from("/r/x"),
            ]
        );
    }

    #[test]
    fn test_parent_candidate_removed_after_child() {
        let dir = tempdir().unwrap();
        let parent = dir.path().join("parent");
        let child = parent.join("child");
        fs::create_dir_all(&child).unwrap();

        // Discovery order puts the parent first; removal must still go child first
        let result = ClassificationResult {
            folders: vec![parent.clone(), child.clone()],
            ..Default::default()
        };
        let config = config(dir.path()).with_delete_empty_folders(true);
        let report = execute(&result, &config);

        assert_eq!(report.folders_deleted(), 2);
        assert!(!parent.exists());
    }

    #[test]
    fn test_nothing_to_do() {
        let dir = tempdir().unwrap();
        let result = ClassificationResult::default();
        let config = config(dir.path())
            .with_delete_symlinks(true)
            .with_delete_empty_folders(true);
        let report = execute(&result, &config);
        assert!(report.deletions.is_empty());
        assert_eq!(report.bytes_freed, 0);
    }

    #[test]
    fn test_failed_file_keeps_bytes_out_of_total() {
        let dir = tempdir().unwrap();
        let result = ClassificationResult {
            files: vec![FileEntry {
                path: dir.path().join("ghost.txt"),
                modified: SystemTime::UNIX_EPOCH,
                size: 4096,
                modified_display: "01-01-1970".into(),
            }],
            recovered_space: 4096,
            ..Default::default()
        };
        let report = execute(&result, &config(dir.path()));

        assert_eq!(report.files_deleted(), 0);
        assert_eq!(report.bytes_freed, 0);
        assert!(report.has_failures());
    }

    #[cfg(unix)]
    #[test]
    fn test_symlinks_removed_only_when_enabled() {
        use std::os::unix::fs::symlink;

        let dir = tempdir().unwrap();
        let target = dir.path().join("target.txt");
        fs::write(&target, "keep me").unwrap();
        symlink(&target, dir.path().join("link")).unwrap();

        let enabled = config(dir.path()).with_delete_symlinks(true).with_delete(true);
        let result = classify(dir.path(), &enabled).unwrap();
        assert_eq!(result.symlinks.len(), 1);

        // Same result, but symlink deletion switched off at execution time
        let disabled = config(dir.path()).with_delete(true);
        let report = execute(&result, &disabled);
        assert_eq!(report.symlinks_deleted(), 0);
        assert!(dir.path().join("link").symlink_metadata().is_ok());

        let report = execute(&result, &enabled);
        assert_eq!(report.symlinks_deleted(), 1);
        assert!(dir.path().join("link").symlink_metadata().is_err());
        assert!(target.exists());
    }
}

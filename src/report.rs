//! Plain-text rendering of previews and deletion outcomes.

use crate::classifier::{ClassificationResult, FileEntry, SymlinkEntry};
use crate::config::Config;
use crate::executor::{Deletion, DeletionStatus, EntryKind, ExecutionReport};

use humansize::{format_size, BINARY};

const BYTES_PER_KB: f64 = 1024.0;
const BYTES_PER_MB: f64 = 1_048_576.0;

/// Render the dry-run preview of what a deleting run would remove
pub fn render(result: &ClassificationResult, config: &Config) -> String {
    let mut lines = vec!["Files to be deleted".to_string(), String::new()];
    lines.extend(result.files.iter().map(file_line));

    if config.delete_symlinks() {
        lines.push(String::new());
        lines.push("Symbolic links to be deleted".to_string());
        lines.push(String::new());
        lines.extend(result.symlinks.iter().map(symlink_line));
    }

    if config.delete_empty_folders() {
        lines.push(String::new());
        lines.push("Folders to be deleted".to_string());
        lines.push(String::new());
        lines.extend(result.folders.iter().map(|f| f.display().to_string()));
    }

    lines.push(String::new());
    lines.push(format!("{} file(s) will be deleted", result.files.len()));
    if config.delete_symlinks() {
        lines.push(format!(
            "{} symbolic link(s) will be deleted",
            result.symlinks.len()
        ));
    }
    if config.delete_empty_folders() {
        lines.push(format!("{} folder(s) will be deleted", result.folders.len()));
    }
    lines.push(format!(
        "Approximately {} MB will be recovered",
        format_mebibytes(result.recovered_space)
    ));

    lines.extend(skipped_section(result));
    finish(lines)
}

/// Render the per-entry log and totals of a deleting run
pub fn render_execution(
    report: &ExecutionReport,
    result: &ClassificationResult,
    config: &Config,
) -> String {
    let mut lines = vec!["Deleting files, please wait ...".to_string(), String::new()];
    lines.extend(deletion_lines(report, EntryKind::File));

    if config.delete_symlinks() {
        lines.push(String::new());
        lines.push("Deleting symbolic links, please wait ...".to_string());
        lines.push(String::new());
        lines.extend(deletion_lines(report, EntryKind::Symlink));
    }

    if config.delete_empty_folders() {
        lines.push(String::new());
        lines.push("Deleting empty folders, please wait ...".to_string());
        lines.push(String::new());
        lines.extend(deletion_lines(report, EntryKind::Folder));
    }

    lines.push(String::new());
    lines.push(format!(
        "{} file(s), {} symbolic link(s) and {} folder(s) have been deleted",
        report.files_deleted(),
        report.symlinks_deleted(),
        report.folders_deleted()
    ));
    lines.push(format!(
        "Recovered {}",
        format_size(report.bytes_freed, BINARY)
    ));

    let failed = report.failures().count();
    if failed > 0 {
        lines.push(format!("{failed} deletion(s) failed"));
    }

    lines.extend(skipped_section(result));
    finish(lines)
}

/// Bytes as mebibytes with one decimal place
pub fn format_mebibytes(bytes: u64) -> String {
    format!("{:.1}", bytes as f64 / BYTES_PER_MB)
}

fn file_line(file: &FileEntry) -> String {
    format!(
        "{} ({} :: {:.1} KB)",
        file.path.display(),
        file.modified_display,
        file.size as f64 / BYTES_PER_KB
    )
}

fn symlink_line(link: &SymlinkEntry) -> String {
    format!("{} {}", link.path.display(), SymlinkEntry::ANNOTATION)
}

fn deletion_lines(report: &ExecutionReport, kind: EntryKind) -> impl Iterator<Item = String> + '_ {
    report
        .deletions
        .iter()
        .filter(move |d| d.kind == kind)
        .map(deletion_line)
}

fn deletion_line(deletion: &Deletion) -> String {
    let noun = match deletion.kind {
        EntryKind::File => "file",
        EntryKind::Symlink => "symbolic link",
        EntryKind::Folder => "folder",
    };
    let outcome = match &deletion.status {
        DeletionStatus::Removed => "OK".to_string(),
        DeletionStatus::NotEmpty => "folder not empty, can't delete".to_string(),
        DeletionStatus::Failed(reason) => format!("FAILED: {reason}"),
    };
    format!("Deleting {noun} {} ... {outcome}", deletion.path.display())
}

fn skipped_section(result: &ClassificationResult) -> Vec<String> {
    if result.skipped.is_empty() {
        return Vec::new();
    }

    let mut lines = vec![String::new(), "These have been skipped:".to_string()];
    lines.extend(
        result
            .skipped
            .iter()
            .map(|name| name.to_string_lossy().into_owned()),
    );
    lines
}

fn finish(lines: Vec<String>) -> String {
    let mut out = lines.join("\n");
    out.push('\n');
    out
}

//! cleanup-older - Date-based directory cleanup
//!
//! Finds files, symbolic links and soon-to-be-empty folders older than a cutoff date
//! and optionally deletes them. A run happens in two phases:
//!
//! 1. [`classify`] walks the tree once and returns a [`ClassificationResult`] listing
//!    everything eligible for deletion. Nothing on disk is touched.
//! 2. The result is either rendered as a preview with [`render`], or handed to
//!    [`execute`] which performs the deletions and returns an [`ExecutionReport`].
//!
//! Folder candidates are a prediction: a folder is listed when every entry directly
//! inside it is itself going to be deleted. Folders are removed deepest first, and a
//! folder that turns out not to be empty is left in place without raising an error.

pub mod classifier;
pub mod config;
pub mod error;
pub mod executor;
pub mod report;
pub mod time;

// Re-export commonly used items
pub use classifier::{classify, ClassificationResult, FileEntry, SymlinkEntry};
pub use config::Config;
pub use error::CleanupError;
pub use executor::{execute, Deletion, DeletionStatus, EntryKind, ExecutionReport};
pub use report::{render, render_execution};
pub use time::{format_date, local_midnight, parse_date};

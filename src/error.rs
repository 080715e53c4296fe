//! Error taxonomy for configuration and classification failures.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that stop a run before any deletion takes place.
///
/// Usage errors (`InvalidDate`, `MissingFolder`) surface before traversal starts.
/// Everything else is raised by the classifier and aborts the whole run; no
/// partial classification result is ever returned alongside one of these.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("Second argument must be a date of type YYYY-MM-DD, got: {input}")]
    InvalidDate { input: String },

    #[error("The folder \"{}\" doesn't exist", path.display())]
    MissingFolder { path: PathBuf },

    #[error("Local midnight of {date} does not exist in the current time zone")]
    InvalidCutoff { date: chrono::NaiveDate },

    #[error("Can't access {}, permission denied!", path.display())]
    AccessDenied { path: PathBuf },

    #[error("Failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl CleanupError {
    /// Wrap an I/O error raised while listing or inspecting `path`.
    ///
    /// Permission denial is singled out so callers can report it the way users
    /// expect; every other kind is carried through untouched.
    pub fn from_io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        let path = path.into();
        if source.kind() == io::ErrorKind::PermissionDenied {
            CleanupError::AccessDenied { path }
        } else {
            CleanupError::Io { path, source }
        }
    }

    /// Whether this error should be reported together with the usage text.
    pub fn is_usage(&self) -> bool {
        matches!(
            self,
            CleanupError::InvalidDate { .. } | CleanupError::MissingFolder { .. }
        )
    }
}

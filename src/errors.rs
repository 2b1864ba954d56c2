//! Typed failures of a fixer invocation.
//!
//! The exit-code variants carry the exact message text shown to the user;
//! the remaining variants are synthetic conditions detected by the engine
//! itself (launch failure, staging failure, empty or unreadable output,
//! contention).

use std::io;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum FixerError {
    /// Exit code 1.
    #[error("PHP CS Fixer: php general error.")]
    GeneralError,

    /// Exit code 16. Never shown to the user, but still a rejection.
    #[error("PHP CS Fixer: Configuration error of the application.")]
    AppConfigError,

    /// Exit code 32.
    #[error("PHP CS Fixer: Configuration error of a Fixer.")]
    FixerConfigError,

    /// Exit code 64.
    #[error("PHP CS Fixer: Exception raised within the application.")]
    AppException,

    /// Any other nonzero exit code.
    #[error("PHP CS Fixer: Unknown error.")]
    UnknownError { code: i32 },

    /// The executable could not be started at all.
    #[error("PHP CS Fixer: failed to launch the executable: {0}")]
    LaunchFailed(io::Error),

    /// The temp file backing the invocation could not be written.
    #[error("PHP CS Fixer: failed to stage the file to fix: {0}")]
    TempFile(io::Error),

    /// Exit code 0 but nothing was written back.
    #[error("PHP CS Fixer: the fixer produced no output.")]
    EmptyOutput,

    /// The temp file was unreadable after a successful run.
    #[error("PHP CS Fixer: failed to read the fixed output: {0}")]
    ReadBack(io::Error),

    /// A diff preview was requested while an invocation was in flight.
    /// Full and partial requests never see this; they resolve with the
    /// input text unchanged instead.
    #[error("PHP CS Fixer: an invocation is already running.")]
    Busy,

    /// The executable path still contains a `${...}` placeholder after
    /// substitution. Spawning with it would hand the raw template to the
    /// OS, so the invocation is refused instead.
    #[error("PHP CS Fixer: unresolved placeholder in executable path: {0}")]
    UnresolvedPlaceholder(String),
}

impl FixerError {
    /// Whether this failure is ever surfaced as a user-visible error
    /// notification. Exit code 16 is suppressed from display but still
    /// rejects the invocation; the caller additionally suppresses all
    /// display in partial mode.
    pub fn user_visible(&self) -> bool {
        !matches!(self, FixerError::AppConfigError)
    }
}

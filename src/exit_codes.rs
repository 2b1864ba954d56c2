/// Exit codes reported by the `php-cs-fixer` executable.
///
/// These follow the fixer's own convention and are the sole basis for
/// classifying a finished invocation; stderr content only adds advisory
/// notices on top and never changes the outcome.
use crate::errors::FixerError;

/// Success - the file was fixed (or already compliant)
pub const SUCCESS: i32 = 0;

/// General error (or PHP minimal requirement not matched)
pub const GENERAL_ERROR: i32 = 1;

/// Configuration error of the application
pub const APP_CONFIG_ERROR: i32 = 16;

/// Configuration error of a Fixer
pub const FIXER_CONFIG_ERROR: i32 = 32;

/// Exception raised within the application
pub const APP_EXCEPTION: i32 = 64;

/// Map a nonzero exit code to its error.
///
/// Codes outside the documented set (including signal terminations,
/// conventionally reported as a negative code) fall back to
/// [`FixerError::UnknownError`].
pub fn classify(code: i32) -> FixerError {
    match code {
        GENERAL_ERROR => FixerError::GeneralError,
        APP_CONFIG_ERROR => FixerError::AppConfigError,
        FIXER_CONFIG_ERROR => FixerError::FixerConfigError,
        APP_EXCEPTION => FixerError::AppException,
        other => FixerError::UnknownError { code: other },
    }
}

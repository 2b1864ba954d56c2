//! User-facing notifications.
//!
//! The host editor decides how to render these (status bar, toast, log
//! panel); the engine only decides what to say and when. [`LogNotifier`]
//! is the default sink for hosts that have no UI of their own.

/// Sink for user-visible messages.
pub trait Notifier: Send + Sync {
    /// Transient status message (e.g. a status-bar flash on success).
    fn status(&self, message: &str);
    fn info(&self, message: &str);
    fn error(&self, message: &str);
}

/// Forwards every notification to the `log` facade.
#[derive(Debug, Default)]
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn status(&self, message: &str) {
        log::info!("{message}");
    }

    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn error(&self, message: &str) {
        log::error!("{message}");
    }
}

/// Stderr marker the fixer prints when PHP linting rejected the file
/// before any fixing happened. The detail after the marker names the
/// offending files.
pub(crate) const LINT_ERROR_MARKER: &str =
    "Files that were not fixed due to errors reported during linting before fixing:";

/// Deprecation notice for the legacy config filename.
pub(crate) const OUTDATED_CONFIG_NOTICE: &str =
    "Configuration file `.php_cs` is outdated, rename to `.php-cs-fixer.php`.";

/// Scan captured stderr for the two recognized advisory messages.
///
/// These overlays are independent of the exit code and never change the
/// invocation's outcome; partial mode skips this scan entirely.
pub(crate) fn scan_stderr(stderr: &str, notifier: &dyn Notifier) {
    if let Some(at) = stderr.find(LINT_ERROR_MARKER) {
        let detail = &stderr[at + LINT_ERROR_MARKER.len()..];
        notifier.error(&format!("phpcsfixer: php syntax error{detail}"));
    } else if stderr.contains(OUTDATED_CONFIG_NOTICE) {
        notifier.info(OUTDATED_CONFIG_NOTICE);
    }
}

//! Single-flight invocation of the external fixer.
//!
//! At most one external process is in flight at any instant. A request
//! arriving while one is running is dropped, never queued: full and
//! partial requests resolve with their input text unchanged, diff
//! previews are rejected. Queuing would change the latency the editor
//! relies on, so contention is handled by the caller re-triggering.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::args::{ResolvedCommand, build_args};
use crate::errors::FixerError;
use crate::exit_codes;
use crate::notify::{Notifier, scan_stderr};
use crate::resolve::PathResolver;
use crate::settings::FixerSettings;
use crate::workspace::WorkspaceContext;

/// Reserved temp filename all partial (range) requests funnel through.
/// Concurrent partial requests are serialized solely by the single-flight
/// guard; the filename itself is not locked.
pub const PARTIAL_TEMP_NAME: &str = "pcf-range.php";

/// Temp name for documents with no usable file name (unsaved buffers).
const FALLBACK_TEMP_NAME: &str = "pcf-buffer.php";

/// Environment variables overridden to the active workspace root (with a
/// trailing separator) for config files that want to locate the project.
const WORKSPACE_ENV_VARS: [&str; 2] = ["PROJECT_WORKSPACE", "VSCODE_WORKSPACE"];

const FIXED_MESSAGE: &str = "PHP CS Fixer: Fixed all files!";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FixMode {
    /// Whole-document fix; the result replaces the document text.
    Full,
    /// Sub-range fix; failures degrade to "no change" and are never
    /// surfaced to the user.
    Partial,
    /// Fix into a retained temp artifact for a two-pane comparison.
    DiffPreview,
}

/// Owns the single-flight guard, the temp-file lifecycle, process
/// spawning and result mapping. The only stateful component of the
/// engine; everything else is resolved fresh per invocation.
pub struct FixerCoordinator {
    busy: AtomicBool,
    save_gate: AtomicBool,
    notifier: Arc<dyn Notifier>,
}

impl FixerCoordinator {
    pub fn new(notifier: Arc<dyn Notifier>) -> Self {
        Self {
            busy: AtomicBool::new(false),
            save_gate: AtomicBool::new(false),
            notifier,
        }
    }

    /// Fix `text` in [`FixMode::Full`] or [`FixMode::Partial`] and return
    /// the fixed text. `document` only lends its file name to the temp
    /// file and its location to workspace/config resolution; the file on
    /// disk is never touched.
    ///
    /// If another invocation is in flight the input text is returned
    /// unchanged and no process is spawned.
    pub fn fix_text(
        &self,
        text: &str,
        document: &Path,
        mode: FixMode,
        settings: &FixerSettings,
        workspace: &WorkspaceContext,
    ) -> Result<String, FixerError> {
        debug_assert!(mode != FixMode::DiffPreview, "use diff_preview()");
        let Some(_flight) = Flight::acquire(&self.busy) else {
            log::debug!("fix request dropped: an invocation is already in flight");
            return Ok(text.to_string());
        };
        let result = self
            .run_to_completion(text, document, mode, settings, workspace)
            .and_then(|stage| {
                let fixed = fs::read_to_string(stage.path()).map_err(FixerError::ReadBack)?;
                if fixed.is_empty() {
                    return Err(FixerError::EmptyOutput);
                }
                Ok(fixed)
            });
        self.save_gate.store(false, Ordering::Release);
        result
    }

    /// Fix `text` into a temp artifact and return its path. The artifact
    /// is retained: ownership passes to the host's diff viewer.
    ///
    /// Rejects with [`FixerError::Busy`] if another invocation is in
    /// flight.
    pub fn diff_preview(
        &self,
        text: &str,
        document: &Path,
        settings: &FixerSettings,
        workspace: &WorkspaceContext,
    ) -> Result<PathBuf, FixerError> {
        let Some(_flight) = Flight::acquire(&self.busy) else {
            return Err(FixerError::Busy);
        };
        let result = self
            .run_to_completion(text, document, FixMode::DiffPreview, settings, workspace)
            .map(TempStage::into_path);
        self.save_gate.store(false, Ordering::Release);
        result
    }

    /// Arm the save-reentrancy gate. Returns false when a format action
    /// is already pending at the editor-command layer, so the same
    /// logical action is not fired twice. The gate is cleared whenever an
    /// invocation finishes, or explicitly via [`Self::reset_save_gate`].
    pub fn try_enter_save_gate(&self) -> bool {
        self.save_gate
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
    }

    pub fn reset_save_gate(&self) {
        self.save_gate.store(false, Ordering::Release);
    }

    pub fn save_gate_pending(&self) -> bool {
        self.save_gate.load(Ordering::Acquire)
    }

    pub fn is_busy(&self) -> bool {
        self.busy.load(Ordering::Acquire)
    }

    /// Steps 2-8 of an invocation: stage the temp file, resolve the
    /// command, spawn, wait, classify. Returns the stage holding the
    /// fixed file on exit 0.
    fn run_to_completion(
        &self,
        text: &str,
        document: &Path,
        mode: FixMode,
        settings: &FixerSettings,
        workspace: &WorkspaceContext,
    ) -> Result<TempStage, FixerError> {
        let stage = TempStage::create(document, mode, text).map_err(|err| self.surface(err, mode))?;
        let command = self
            .resolve_command(settings, workspace, document, mode)
            .map_err(|err| self.surface(err, mode))?;

        log::debug!(
            "spawning {} {} {}",
            command.executable.display(),
            command.args.join(" "),
            stage.path().display()
        );
        let output = Command::new(&command.executable)
            .args(&command.args)
            .arg(stage.path())
            .envs(command.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .output()
            .map_err(|err| self.surface(FixerError::LaunchFailed(err), mode))?;

        // Advisory overlays ride on stderr independent of the exit code.
        if mode != FixMode::Partial {
            scan_stderr(&String::from_utf8_lossy(&output.stderr), self.notifier.as_ref());
        }

        let code = output.status.code().unwrap_or(-1);
        if code == exit_codes::SUCCESS {
            self.notifier.status(FIXED_MESSAGE);
            Ok(stage)
        } else {
            Err(self.surface(exit_codes::classify(code), mode))
        }
    }

    /// Resolve executable, arguments and environment for one invocation.
    /// Never cached: the active document or workspace may have changed
    /// since the last call.
    fn resolve_command(
        &self,
        settings: &FixerSettings,
        workspace: &WorkspaceContext,
        document: &Path,
        mode: FixMode,
    ) -> Result<ResolvedCommand, FixerError> {
        let resolver = PathResolver::for_document(workspace, Some(document));
        let executable = resolver.resolve_exec_path(settings.exec_path_template())?;
        let root = workspace.active_root(Some(document)).map(Path::to_path_buf);
        let config_file = resolver.find_config_file(&settings.config, root.as_deref());
        let args = build_args(config_file.as_deref(), settings.rules.as_ref(), settings.allow_risky, mode);

        let mut env = Vec::new();
        if let Some(root) = root {
            let value = format!("{}{}", root.display(), std::path::MAIN_SEPARATOR);
            for var in WORKSPACE_ENV_VARS {
                env.push((var.to_string(), value.clone()));
            }
        }
        Ok(ResolvedCommand { executable, args, env })
    }

    /// Show a failure to the user unless the mode or the error kind
    /// suppresses display. Always hands the error back for rejection.
    fn surface(&self, err: FixerError, mode: FixMode) -> FixerError {
        if mode == FixMode::Partial {
            log::debug!("partial fix failed silently: {err}");
        } else if err.user_visible() {
            self.notifier.error(&err.to_string());
        }
        err
    }
}

/// Exclusive hold on the single-flight guard, released on drop so every
/// exit path returns the coordinator to idle.
struct Flight<'a> {
    busy: &'a AtomicBool,
}

impl<'a> Flight<'a> {
    fn acquire(busy: &'a AtomicBool) -> Option<Self> {
        busy.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .is_ok()
            .then_some(Self { busy })
    }
}

impl Drop for Flight<'_> {
    fn drop(&mut self) {
        self.busy.store(false, Ordering::Release);
    }
}

/// Temp file exclusively owned by one invocation. Deleted on drop except
/// in diff-preview mode, where the artifact outlives the invocation.
struct TempStage {
    path: PathBuf,
    retained: bool,
}

impl TempStage {
    fn create(document: &Path, mode: FixMode, text: &str) -> Result<Self, FixerError> {
        let path = temp_path_for(document, mode);
        fs::write(&path, text).map_err(FixerError::TempFile)?;
        Ok(Self {
            path,
            retained: mode == FixMode::DiffPreview,
        })
    }

    fn path(&self) -> &Path {
        &self.path
    }

    fn into_path(self) -> PathBuf {
        self.path.clone()
    }
}

impl Drop for TempStage {
    fn drop(&mut self) {
        if !self.retained
            && let Err(err) = fs::remove_file(&self.path)
        {
            // Best-effort cleanup; a vanished file is not worth reporting.
            log::debug!("temp file cleanup failed for {}: {err}", self.path.display());
        }
    }
}

fn temp_path_for(document: &Path, mode: FixMode) -> PathBuf {
    let dir = std::env::temp_dir();
    match mode {
        FixMode::Partial => dir.join(PARTIAL_TEMP_NAME),
        _ => match document.file_name() {
            Some(name) => dir.join(name),
            None => dir.join(FALLBACK_TEMP_NAME),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;

    fn coordinator() -> FixerCoordinator {
        FixerCoordinator::new(Arc::new(RecordingNotifier::default()))
    }

    #[test]
    fn contended_fix_returns_input_unchanged() {
        let coord = coordinator();
        coord.busy.store(true, Ordering::Release);
        let out = coord
            .fix_text(
                "<?php echo 1 ;",
                Path::new("/w/a.php"),
                FixMode::Full,
                &FixerSettings::default(),
                &WorkspaceContext::default(),
            )
            .unwrap();
        assert_eq!(out, "<?php echo 1 ;");
    }

    #[test]
    fn contended_diff_preview_is_rejected() {
        let coord = coordinator();
        coord.busy.store(true, Ordering::Release);
        let err = coord
            .diff_preview(
                "<?php echo 1 ;",
                Path::new("/w/a.php"),
                &FixerSettings::default(),
                &WorkspaceContext::default(),
            )
            .unwrap_err();
        assert!(matches!(err, FixerError::Busy));
    }

    #[test]
    fn partial_requests_share_the_reserved_temp_name() {
        let a = temp_path_for(Path::new("/w/a.php"), FixMode::Partial);
        let b = temp_path_for(Path::new("/w/b.php"), FixMode::Partial);
        assert_eq!(a, b);
        assert_eq!(a.file_name().unwrap(), PARTIAL_TEMP_NAME);
    }

    #[test]
    fn full_mode_temp_name_derives_from_the_document() {
        let path = temp_path_for(Path::new("/w/src/Invoice.php"), FixMode::Full);
        assert_eq!(path, std::env::temp_dir().join("Invoice.php"));
    }

    #[test]
    fn save_gate_arms_once_until_reset() {
        let coord = coordinator();
        assert!(coord.try_enter_save_gate());
        assert!(!coord.try_enter_save_gate());
        assert!(coord.save_gate_pending());
        coord.reset_save_gate();
        assert!(coord.try_enter_save_gate());
    }

    #[test]
    fn flight_guard_releases_on_drop() {
        let busy = AtomicBool::new(false);
        {
            let _flight = Flight::acquire(&busy).unwrap();
            assert!(Flight::acquire(&busy).is_none());
        }
        assert!(!busy.load(Ordering::Acquire));
    }
}

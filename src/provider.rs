//! Host-facing formatting surface.
//!
//! The host editor wires its document model, settings store and
//! format-on-save events into this provider; the provider owns the live
//! settings/workspace records and funnels every trigger path (command,
//! save, formatting provider) into one coordinator invocation.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use crate::PHP_LANGUAGE_ID;
use crate::coordinator::{FixMode, FixerCoordinator};
use crate::errors::FixerError;
use crate::notify::Notifier;
use crate::range;
use crate::settings::FixerSettings;
use crate::workspace::WorkspaceContext;

/// Snapshot of a document the host asks to format. `path` identifies the
/// document (temp file naming, workspace matching); the file on disk is
/// never read or written.
#[derive(Debug, Clone)]
pub struct Document {
    pub path: PathBuf,
    pub language_id: String,
    pub text: String,
}

/// Byte-offset range into a document's text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextRange {
    pub start: usize,
    pub end: usize,
}

pub struct FixerProvider {
    settings: Mutex<FixerSettings>,
    workspace: Mutex<WorkspaceContext>,
    coordinator: FixerCoordinator,
    reloading: AtomicBool,
}

impl FixerProvider {
    pub fn new(settings: FixerSettings, workspace: WorkspaceContext, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            settings: Mutex::new(settings),
            workspace: Mutex::new(workspace),
            coordinator: FixerCoordinator::new(notifier),
            reloading: AtomicBool::new(false),
        }
    }

    pub fn coordinator(&self) -> &FixerCoordinator {
        &self.coordinator
    }

    /// Full-document format. Returns the replacement text, or `None`
    /// when the document is already compliant, another invocation is in
    /// flight, or the fix failed (failures are surfaced by the
    /// coordinator, not here).
    pub fn provide_document_formatting(&self, document: &Document) -> Option<String> {
        let settings = self.settings();
        let workspace = self.workspace();
        match self
            .coordinator
            .fix_text(&document.text, &document.path, FixMode::Full, &settings, &workspace)
        {
            Ok(fixed) if fixed != document.text => Some(fixed),
            Ok(_) => None,
            Err(err) => {
                log::debug!("document format rejected: {err}");
                None
            }
        }
    }

    /// Range format with boundary-whitespace preservation. Failures
    /// degrade to `None` without interrupting the user.
    pub fn provide_range_formatting(&self, document: &Document, range: TextRange) -> Option<String> {
        let selected = document.text.get(range.start..range.end)?;
        let settings = self.settings();
        let workspace = self.workspace();
        range::format_range(selected, |input| {
            self.coordinator
                .fix_text(input, &document.path, FixMode::Partial, &settings, &workspace)
        })
    }

    /// Produce a fixed temp artifact for the host's two-pane diff. The
    /// artifact is owned by the diff viewer and never deleted here.
    pub fn provide_diff_preview(&self, document: &Document) -> Result<PathBuf, FixerError> {
        let settings = self.settings();
        let workspace = self.workspace();
        self.coordinator
            .diff_preview(&document.text, &document.path, &settings, &workspace)
    }

    /// Swap in a new settings record. Re-entrant reloads (a change event
    /// fired while one is being applied) are dropped.
    pub fn on_configuration_changed(&self, settings: FixerSettings) {
        if self.reloading.swap(true, Ordering::AcqRel) {
            return;
        }
        *self.settings.lock().unwrap_or_else(PoisonError::into_inner) = settings;
        self.reloading.store(false, Ordering::Release);
    }

    pub fn set_workspace(&self, workspace: WorkspaceContext) {
        *self.workspace.lock().unwrap_or_else(PoisonError::into_inner) = workspace;
    }

    /// Gate for the host's will-save hook. True means the host should
    /// fire its format action now (and await it before completing the
    /// save); false means saving proceeds without formatting, either
    /// because format-on-save is off, the document is not PHP, or a
    /// format action is already pending.
    pub fn on_will_save(&self, document: &Document) -> bool {
        if document.language_id != PHP_LANGUAGE_ID || !self.settings().onsave {
            return false;
        }
        self.coordinator.try_enter_save_gate()
    }

    /// Gate for the host's explicit format command; identical to the
    /// save path except format-on-save need not be enabled.
    pub fn on_format_command(&self, document: &Document) -> bool {
        if document.language_id != PHP_LANGUAGE_ID {
            return false;
        }
        self.coordinator.try_enter_save_gate()
    }

    pub fn settings(&self) -> FixerSettings {
        self.settings.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }

    fn workspace(&self) -> WorkspaceContext {
        self.workspace.lock().unwrap_or_else(PoisonError::into_inner).clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::testing::RecordingNotifier;

    fn php_doc(text: &str) -> Document {
        Document {
            path: PathBuf::from("/w/src/a.php"),
            language_id: PHP_LANGUAGE_ID.to_string(),
            text: text.to_string(),
        }
    }

    fn provider() -> FixerProvider {
        FixerProvider::new(
            FixerSettings { onsave: true, ..Default::default() },
            WorkspaceContext::default(),
            Arc::new(RecordingNotifier::default()),
        )
    }

    #[test]
    fn will_save_gate_fires_once_per_action() {
        let provider = provider();
        let doc = php_doc("<?php echo 1;");
        assert!(provider.on_will_save(&doc));
        assert!(!provider.on_will_save(&doc));
        provider.coordinator().reset_save_gate();
        assert!(provider.on_will_save(&doc));
    }

    #[test]
    fn non_php_documents_never_trigger() {
        let provider = provider();
        let doc = Document {
            path: PathBuf::from("/w/readme.md"),
            language_id: "markdown".to_string(),
            text: String::new(),
        };
        assert!(!provider.on_will_save(&doc));
        assert!(!provider.on_format_command(&doc));
    }

    #[test]
    fn will_save_respects_the_onsave_setting() {
        let provider = provider();
        provider.on_configuration_changed(FixerSettings::default());
        assert!(!provider.on_will_save(&php_doc("<?php echo 1;")));
        // The command path ignores onsave.
        assert!(provider.on_format_command(&php_doc("<?php echo 1;")));
    }

    #[test]
    fn configuration_changes_swap_the_record() {
        let provider = provider();
        provider.on_configuration_changed(FixerSettings {
            exec_path: Some("/opt/php-cs-fixer".to_string()),
            ..Default::default()
        });
        assert_eq!(provider.settings().exec_path.as_deref(), Some("/opt/php-cs-fixer"));
    }

    #[test]
    fn out_of_bounds_range_is_rejected() {
        let provider = provider();
        let doc = php_doc("<?php");
        assert_eq!(
            provider.provide_range_formatting(&doc, TextRange { start: 2, end: 99 }),
            None
        );
    }
}

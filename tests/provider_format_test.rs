//! Provider-level formatting tests: full document, range with boundary
//! whitespace preservation, and diff preview, all against fake fixers.

#![cfg(unix)]

mod common;

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use common::{RecordingNotifier, write_script};
use phpcf::{Document, FixerProvider, FixerSettings, PHP_LANGUAGE_ID, TextRange, WorkspaceContext};
use pretty_assertions::assert_eq;
use serial_test::serial;

fn provider_with(script: &Path) -> FixerProvider {
    FixerProvider::new(
        FixerSettings {
            exec_path: Some(script.to_string_lossy().into_owned()),
            ..Default::default()
        },
        WorkspaceContext::new(Vec::new(), PathBuf::from("/ext")),
        Arc::new(RecordingNotifier::default()),
    )
}

fn php_doc(name: &str, text: &str) -> Document {
    Document {
        path: PathBuf::from("/w/src").join(name),
        language_id: PHP_LANGUAGE_ID.to_string(),
        text: text.to_string(),
    }
}

/// A fixer that leaves the staged file untouched.
fn identity_script(dir: &Path) -> PathBuf {
    write_script(dir, "identity-fixer", ":")
}

#[test]
fn full_document_formatting_returns_the_replacement() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "fixer",
        "for last; do :; done\nprintf '<?php\\necho 1;\\n' > \"$last\"",
    );
    let provider = provider_with(&script);

    let doc = php_doc("provider_full.php", "<?php\necho 1 ;\n");
    assert_eq!(
        provider.provide_document_formatting(&doc),
        Some("<?php\necho 1;\n".to_string())
    );
}

#[test]
fn compliant_document_yields_no_edit() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider_with(&identity_script(dir.path()));

    let doc = php_doc("provider_compliant.php", "<?php\necho 1;\n");
    assert_eq!(provider.provide_document_formatting(&doc), None);
}

#[test]
#[serial]
fn range_formatting_preserves_boundary_whitespace() {
    let dir = tempfile::tempdir().unwrap();
    // Normalizes file-boundary whitespace, as the real fixer does.
    let script = write_script(
        dir.path(),
        "fixer",
        "for last; do :; done\nprintf '<?php\\n\\necho 1;\\n' > \"$last\"",
    );
    let provider = provider_with(&script);

    let text = "<?php\nfn();  \n  echo 1 ;\n\n  more();\n";
    let doc = php_doc("provider_range.php", text);
    let start = text.find("  \n  echo").unwrap();
    let selected_end = start + "  \n  echo 1 ;\n\n  ".len();

    let replacement = provider
        .provide_range_formatting(&doc, TextRange { start, end: selected_end })
        .unwrap();
    assert_eq!(replacement, "  \n  echo 1;\n\n  ");
}

#[test]
#[serial]
fn compliant_range_yields_no_edit() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider_with(&identity_script(dir.path()));

    let doc = php_doc("provider_range_noop.php", "echo 1;");
    assert_eq!(
        provider.provide_range_formatting(&doc, TextRange { start: 0, end: 7 }),
        None
    );
}

#[test]
#[serial]
fn whitespace_only_range_yields_no_edit() {
    let dir = tempfile::tempdir().unwrap();
    let provider = provider_with(&identity_script(dir.path()));

    let doc = php_doc("provider_range_ws.php", "<?php\n   \n\t\n");
    assert_eq!(
        provider.provide_range_formatting(&doc, TextRange { start: 6, end: 12 }),
        None
    );
}

#[test]
fn diff_preview_hands_over_the_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(
        dir.path(),
        "fixer",
        "for last; do :; done\nprintf '<?php echo 1;\\n' > \"$last\"",
    );
    let provider = provider_with(&script);

    let doc = php_doc("provider_diff.php", "<?php echo 1 ;");
    let artifact = provider.provide_diff_preview(&doc).unwrap();
    assert_eq!(fs::read_to_string(&artifact).unwrap(), "<?php echo 1;\n");
    fs::remove_file(artifact).unwrap();
}

#[test]
#[serial]
fn failed_range_format_never_interrupts() {
    let dir = tempfile::tempdir().unwrap();
    let script = write_script(dir.path(), "fixer", "exit 64");
    let notifier = Arc::new(RecordingNotifier::default());
    let provider = FixerProvider::new(
        FixerSettings {
            exec_path: Some(script.to_string_lossy().into_owned()),
            ..Default::default()
        },
        WorkspaceContext::new(Vec::new(), PathBuf::from("/ext")),
        notifier.clone(),
    );

    let doc = php_doc("provider_range_fail.php", "echo 1 ;");
    assert_eq!(
        provider.provide_range_formatting(&doc, TextRange { start: 0, end: 8 }),
        None
    );
    assert!(notifier.errors().is_empty());
}

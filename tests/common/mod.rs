#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use phpcf::Notifier;

/// Write an executable shell script standing in for php-cs-fixer.
/// Scripts receive the engine's argument vector; `for last; do :; done`
/// leaves the temp-file path (always the final argument) in `$last`.
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// Notification sink recording (level, message) pairs for assertions.
#[derive(Debug, Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<(String, String)>>,
}

impl RecordingNotifier {
    pub fn recorded(&self) -> Vec<(String, String)> {
        self.messages.lock().unwrap().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.recorded()
            .into_iter()
            .filter(|(level, _)| level == "error")
            .map(|(_, message)| message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn status(&self, message: &str) {
        self.messages.lock().unwrap().push(("status".into(), message.into()));
    }

    fn info(&self, message: &str) {
        self.messages.lock().unwrap().push(("info".into(), message.into()));
    }

    fn error(&self, message: &str) {
        self.messages.lock().unwrap().push(("error".into(), message.into()));
    }
}

//! Active workspace context.
//!
//! The engine never caches workspace lookups across invocations: the host
//! can switch documents or folders between calls, so every invocation asks
//! this context fresh.

use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default)]
pub struct WorkspaceContext {
    folders: Vec<PathBuf>,
    extension_dir: PathBuf,
}

impl WorkspaceContext {
    pub fn new(folders: Vec<PathBuf>, extension_dir: PathBuf) -> Self {
        Self { folders, extension_dir }
    }

    pub fn folders(&self) -> &[PathBuf] {
        &self.folders
    }

    /// Install directory of the engine itself, substituted for the
    /// `${extensionPath}` placeholder.
    pub fn extension_dir(&self) -> &Path {
        &self.extension_dir
    }

    /// The workspace folder owning `document`, by longest prefix match.
    ///
    /// Falls back to the sole folder when exactly one exists and the
    /// document matches none. A multi-root workspace with no unambiguous
    /// match yields `None`, which leaves the `${workspaceRoot}`
    /// placeholder unresolved rather than guessing.
    pub fn folder_for(&self, document: Option<&Path>) -> Option<&Path> {
        if let Some(found) = document.and_then(|doc| self.matching_folder(doc)) {
            return Some(found);
        }
        if self.folders.len() == 1 {
            return Some(&self.folders[0]);
        }
        None
    }

    /// The root used for the config search and the workspace environment
    /// variables: the owning folder if any, else the first folder.
    pub fn active_root(&self, document: Option<&Path>) -> Option<&Path> {
        if let Some(found) = document.and_then(|doc| self.matching_folder(doc)) {
            return Some(found);
        }
        self.folders.first().map(PathBuf::as_path)
    }

    fn matching_folder(&self, document: &Path) -> Option<&Path> {
        self.folders
            .iter()
            .filter(|folder| document.starts_with(folder))
            .max_by_key(|folder| folder.as_os_str().len())
            .map(PathBuf::as_path)
    }
}

//! Executable path resolution and config file discovery.
//!
//! The executable template goes through a fixed substitution pipeline:
//! workspace root first, then the extension install directory, then a
//! leading `~/`, then separator normalization. The order matters because
//! a substituted workspace root may itself start with `~/` on exotic
//! setups, and because an unresolved `${workspaceRoot}` must be detected
//! before spawning rather than handed to the OS as a literal path.

use std::path::{Path, PathBuf};

use crate::errors::FixerError;
use crate::workspace::WorkspaceContext;

const WORKSPACE_PLACEHOLDERS: [&str; 2] = ["${workspaceRoot}", "${workspaceFolder}"];
const EXTENSION_PLACEHOLDER: &str = "${extensionPath}";

/// Substitution inputs for one invocation, captured fresh per call.
#[derive(Debug, Clone)]
pub struct PathResolver {
    workspace_root: Option<PathBuf>,
    extension_dir: PathBuf,
    home_dir: PathBuf,
}

impl PathResolver {
    pub fn new(workspace_root: Option<PathBuf>, extension_dir: PathBuf, home_dir: PathBuf) -> Self {
        Self { workspace_root, extension_dir, home_dir }
    }

    /// Capture the substitution inputs for `document` from the live
    /// workspace context.
    pub fn for_document(ctx: &WorkspaceContext, document: Option<&Path>) -> Self {
        Self::new(
            ctx.folder_for(document).map(Path::to_path_buf),
            ctx.extension_dir().to_path_buf(),
            home_dir(),
        )
    }

    /// Run the substitution pipeline over an executable path template.
    ///
    /// Returns [`FixerError::UnresolvedPlaceholder`] when a `${...}`
    /// placeholder survives substitution (e.g. `${workspaceRoot}` in a
    /// multi-root workspace with no folder owning the document).
    pub fn resolve_exec_path(&self, template: &str) -> Result<PathBuf, FixerError> {
        let mut path = template.to_string();
        for placeholder in WORKSPACE_PLACEHOLDERS {
            if path.contains(placeholder)
                && let Some(root) = &self.workspace_root
            {
                path = path.replace(placeholder, &root.to_string_lossy());
            }
        }
        if path.contains(EXTENSION_PLACEHOLDER) {
            path = path.replace(EXTENSION_PLACEHOLDER, &self.extension_dir.to_string_lossy());
        }
        if let Some(rest) = path.strip_prefix("~/") {
            path = self.home_dir.join(rest).to_string_lossy().into_owned();
        }
        if path.contains("${") {
            return Err(FixerError::UnresolvedPlaceholder(path));
        }
        Ok(PathBuf::from(normalize_separators(&path)))
    }

    /// Discover the config file for this invocation, if any.
    ///
    /// `search_list` is semicolon-delimited; empty entries are dropped and
    /// a leading `~/` is expanded. Absolute entries are probed as-is.
    /// Relative entries are probed under the workspace's `.vscode`
    /// directory and then the workspace root, entry by entry, and the
    /// first existing file wins. Without a workspace root, relative
    /// entries produce no candidates at all.
    pub fn find_config_file(&self, search_list: &str, workspace_root: Option<&Path>) -> Option<PathBuf> {
        for entry in search_list.split(';').filter(|entry| !entry.is_empty()) {
            let entry = match entry.strip_prefix("~/") {
                Some(rest) => self.home_dir.join(rest),
                None => PathBuf::from(entry),
            };
            if entry.is_absolute() {
                if entry.is_file() {
                    return Some(entry);
                }
            } else if let Some(root) = workspace_root {
                for candidate in [root.join(".vscode").join(&entry), root.join(&entry)] {
                    if candidate.is_file() {
                        return Some(candidate);
                    }
                }
            }
        }
        None
    }
}

/// Home directory via the platform base-directory strategy, with a bare
/// `~` fallback so a missing home degrades to a spawn failure instead of
/// a panic.
fn home_dir() -> PathBuf {
    use etcetera::{BaseStrategy, choose_base_strategy};
    choose_base_strategy()
        .map(|strategy| strategy.home_dir().to_path_buf())
        .unwrap_or_else(|_| PathBuf::from("~"))
}

fn normalize_separators(path: &str) -> String {
    if cfg!(windows) { path.replace('/', "\\") } else { path.replace('\\', "/") }
}

//! Command-line assembly for one fixer invocation.

use std::path::{Path, PathBuf};

use crate::coordinator::FixMode;
use crate::settings::RuleSet;

/// Fully resolved command for one invocation. Built fresh per call and
/// never cached: the active document or workspace may change between
/// invocations.
#[derive(Debug, Clone)]
pub struct ResolvedCommand {
    pub executable: PathBuf,
    pub args: Vec<String>,
    /// Overrides applied on top of the inherited environment.
    pub env: Vec<(String, String)>,
}

/// Build the argument vector, minus the trailing temp-file path which the
/// coordinator appends last.
///
/// Precedence: a discovered config file suppresses both the inline rules
/// argument and the risky flag; with neither configured the fixer falls
/// back to its own defaults. Partial mode adds `-q` so incidental stderr
/// chatter from fixing a fragment is not misread as an error.
pub fn build_args(
    config_file: Option<&Path>,
    rules: Option<&RuleSet>,
    allow_risky: bool,
    mode: FixMode,
) -> Vec<String> {
    let mut args = vec![
        "fix".to_string(),
        "--using-cache=no".to_string(),
        "--path-mode=override".to_string(),
        "-vv".to_string(),
    ];
    match config_file {
        Some(path) => args.push(format!("--config={}", path.display())),
        None => {
            if let Some(rules) = rules {
                args.push(format!("--rules={}", rules.to_arg()));
            }
            if allow_risky {
                args.push("--allow-risky=yes".to_string());
            }
        }
    }
    if mode == FixMode::Partial {
        args.push("-q".to_string());
    }
    args
}

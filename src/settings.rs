//! Host-provided settings record.
//!
//! Mirrors the configuration surface the editor host persists for the
//! engine. Keys are camelCase because that is how the host's settings
//! store spells them; every field has a default so a missing or empty
//! record deserializes cleanly.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Default config search list, ordered from current to legacy filenames.
pub const DEFAULT_CONFIG_SEARCH_LIST: &str =
    ".php-cs-fixer.php;.php-cs-fixer.dist.php;.php_cs;.php_cs.dist";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default, rename_all = "camelCase")]
pub struct FixerSettings {
    /// Executable path template. May contain `${workspaceRoot}` /
    /// `${workspaceFolder}`, `${extensionPath}` and a leading `~/`.
    pub exec_path: Option<String>,

    /// Inline rule set, used only when no config file is discovered.
    pub rules: Option<RuleSet>,

    /// Semicolon-delimited config file search list.
    pub config: String,

    /// Trigger a format action when a PHP document is about to be saved.
    pub onsave: bool,

    /// Emit `--allow-risky=yes` when formatting with inline rules or
    /// tool defaults. A discovered config file suppresses this flag.
    pub allow_risky: bool,

    /// Whether the host should register the document formatting provider.
    pub formatting_provider: bool,
}

impl Default for FixerSettings {
    fn default() -> Self {
        Self {
            exec_path: None,
            rules: None,
            config: DEFAULT_CONFIG_SEARCH_LIST.to_string(),
            onsave: false,
            allow_risky: false,
            formatting_provider: true,
        }
    }
}

impl FixerSettings {
    /// The executable template to resolve, falling back to the platform
    /// default name looked up on the process search path.
    pub fn exec_path_template(&self) -> &str {
        self.exec_path.as_deref().unwrap_or(default_exec_name())
    }
}

/// Platform default executable name. The `.bat` form and the bare form
/// are equivalent: both mean "run the fixer via the search path".
pub fn default_exec_name() -> &'static str {
    if cfg!(windows) { "php-cs-fixer.bat" } else { "php-cs-fixer" }
}

/// Inline rule set: either a raw rules string passed through verbatim,
/// or a structured object serialized to JSON for the `--rules=` argument.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RuleSet {
    Raw(String),
    Structured(serde_json::Map<String, Value>),
}

impl RuleSet {
    /// Serialize into the value half of a `--rules=` argument.
    pub fn to_arg(&self) -> String {
        match self {
            RuleSet::Raw(s) => s.clone(),
            RuleSet::Structured(map) => Value::Object(map.clone()).to_string(),
        }
    }
}

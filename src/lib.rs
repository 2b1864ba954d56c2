pub mod args;
pub mod coordinator;
pub mod errors;
pub mod exit_codes;
pub mod notify;
pub mod provider;
pub mod range;
pub mod resolve;
pub mod settings;
pub mod workspace;

pub use crate::coordinator::{FixMode, FixerCoordinator};
pub use crate::errors::FixerError;
pub use crate::notify::{LogNotifier, Notifier};
pub use crate::provider::{Document, FixerProvider, TextRange};
pub use crate::settings::{FixerSettings, RuleSet};
pub use crate::workspace::WorkspaceContext;

/// Language identifier the engine formats. Documents with any other
/// identifier are ignored by the save and command trigger paths.
pub const PHP_LANGUAGE_ID: &str = "php";

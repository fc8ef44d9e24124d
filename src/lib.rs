/// shellgate library
///
/// Command interception for terminal front ends: an ordered chain of plugins
/// sees each command before the shell does.

pub mod config;
pub mod core;
pub mod error;
pub mod plugins;
pub mod shell;

// Re-exports for convenience
pub use config::Config;
pub use crate::core::{Command, ExecutionResult, Plugin, PluginManager, Session, SessionOutcome};
pub use error::{Result, ShellgateError};

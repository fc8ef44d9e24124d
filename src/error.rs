/// Error types for shellgate
///
/// Errors that escape the pipeline. Plugin failures never show up here: the
/// manager turns them into an `ExecutionResult`, so these are setup-time and
/// configuration problems.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for shellgate operations
#[derive(Error, Debug)]
pub enum ShellgateError {
    /// Two plugins registered under the same name
    #[error("Plugin already registered: {0}")]
    DuplicatePlugin(String),

    /// A requested working directory does not resolve to a usable directory
    #[error("invalid directory: {}: {}", .path.display(), .reason)]
    InvalidDirectory { path: PathBuf, reason: String },

    /// I/O errors (file operations, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

/// Result type alias for shellgate operations
pub type Result<T> = std::result::Result<T, ShellgateError>;

/// Convert ShellgateError to a user-friendly error message
impl ShellgateError {
    pub fn user_message(&self) -> String {
        match self {
            ShellgateError::DuplicatePlugin(name) => {
                format!(
                    "Two plugins are both named '{}'. Rename one before starting the session.",
                    name
                )
            }
            ShellgateError::InvalidDirectory { path, reason } => {
                format!("Cannot change to {}: {}", path.display(), reason)
            }
            ShellgateError::Io(e) => {
                format!("File system error. Check permissions. Details: {}", e)
            }
            ShellgateError::Serialization(e) => {
                format!("Config file is not valid JSON: {}", e)
            }
            ShellgateError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
        }
    }
}

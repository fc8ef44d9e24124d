//! Execution result
//!
//! The record every plugin hands back to the manager, and the manager hands
//! back to the session. Optional fields default the same way whether a plugin
//! builds the struct in Rust or a remote plugin sends it as JSON.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Exit status reported for a dispatch that was cancelled or timed out
pub const CANCELLED_EXIT_CODE: i32 = 130;

/// Error text reported for a dispatch that was cancelled or timed out
pub const CANCELLED_MESSAGE: &str = "cancelled";

/// Outcome of running a command through the pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExecutionResult {
    /// True iff this result terminates the pipeline
    pub handled: bool,
    /// Text for the caller to display
    #[serde(default)]
    pub output: String,
    /// Text for the caller to display as a failure
    #[serde(default)]
    pub error: String,
    /// Process-style status code, 0 on success
    #[serde(default)]
    pub exit_code: i32,
    /// Requested working-directory change
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_cwd: Option<PathBuf>,
}

impl ExecutionResult {
    /// Nobody claimed the command; the caller should run it through the shell.
    pub fn not_handled() -> Self {
        Self {
            handled: false,
            output: String::new(),
            error: String::new(),
            exit_code: 0,
            new_cwd: None,
        }
    }

    /// A plugin matched but changed its mind. Same shape as `not_handled`,
    /// named separately so plugin code reads right.
    pub fn decline() -> Self {
        Self::not_handled()
    }

    /// Handled successfully with some output
    pub fn ok(output: impl Into<String>) -> Self {
        Self {
            handled: true,
            output: output.into(),
            error: String::new(),
            exit_code: 0,
            new_cwd: None,
        }
    }

    /// Handled, but the command failed
    pub fn failure(error: impl Into<String>, exit_code: i32) -> Self {
        Self {
            handled: true,
            output: String::new(),
            error: error.into(),
            exit_code,
            new_cwd: None,
        }
    }

    /// Handled by moving the session to another directory
    pub fn change_dir(path: impl Into<PathBuf>) -> Self {
        Self {
            new_cwd: Some(path.into()),
            ..Self::ok("")
        }
    }

    /// The terminal result for an interrupted or timed-out dispatch
    pub fn cancelled() -> Self {
        Self::failure(CANCELLED_MESSAGE, CANCELLED_EXIT_CODE)
    }

    pub fn with_output(mut self, output: impl Into<String>) -> Self {
        self.output = output.into();
        self
    }

    pub fn is_success(&self) -> bool {
        self.handled && self.exit_code == 0
    }

    /// True when a directory change was requested and carries an actual path
    pub fn requests_cwd_change(&self) -> bool {
        self.handled
            && self
                .new_cwd
                .as_ref()
                .map(|p| !p.as_os_str().is_empty())
                .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_handled_defaults() {
        let result = ExecutionResult::not_handled();
        assert!(!result.handled);
        assert!(result.output.is_empty());
        assert!(result.error.is_empty());
        assert_eq!(result.exit_code, 0);
        assert!(result.new_cwd.is_none());
    }

    #[test]
    fn test_failure() {
        let result = ExecutionResult::failure("boom", 2);
        assert!(result.handled);
        assert!(!result.is_success());
        assert_eq!(result.error, "boom");
        assert_eq!(result.exit_code, 2);
    }

    #[test]
    fn test_cancelled() {
        let result = ExecutionResult::cancelled();
        assert!(result.handled);
        assert_eq!(result.error, "cancelled");
        assert_eq!(result.exit_code, 130);
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let result: ExecutionResult = serde_json::from_str(r#"{"handled": true}"#).unwrap();
        assert_eq!(result, ExecutionResult::ok(""));
    }

    #[test]
    fn test_deserialize_requires_handled() {
        let parsed = serde_json::from_str::<ExecutionResult>(r#"{"output": "hi"}"#);
        assert!(parsed.is_err());
    }

    #[test]
    fn test_new_cwd_omitted_when_absent() {
        let json = serde_json::to_string(&ExecutionResult::ok("x")).unwrap();
        assert!(!json.contains("new_cwd"));

        let json = serde_json::to_string(&ExecutionResult::change_dir("/tmp")).unwrap();
        assert!(json.contains("\"new_cwd\":\"/tmp\""));
    }

    #[test]
    fn test_requests_cwd_change() {
        assert!(ExecutionResult::change_dir("/tmp").requests_cwd_change());
        assert!(!ExecutionResult::change_dir("").requests_cwd_change());
        assert!(!ExecutionResult::ok("").requests_cwd_change());

        let mut declined = ExecutionResult::decline();
        declined.new_cwd = Some(PathBuf::from("/tmp"));
        assert!(!declined.requests_cwd_change());
    }
}

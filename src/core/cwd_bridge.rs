/// Working-directory bridge
///
/// Applies `new_cwd` requests from handled results to the session's working
/// directory. A request either fully succeeds or is turned into a visible
/// error; the session never ends up somewhere it didn't validate.

use crate::core::ExecutionResult;
use crate::error::{Result, ShellgateError};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Tracks one session's working directory
#[derive(Debug, Clone)]
pub struct WorkingDirectoryBridge {
    cwd: PathBuf,
    previous: Option<PathBuf>,
}

impl WorkingDirectoryBridge {
    pub fn new(cwd: impl Into<PathBuf>) -> Self {
        Self {
            cwd: cwd.into(),
            previous: None,
        }
    }

    /// Current working directory
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    /// Directory the session was in before the last successful change
    pub fn previous(&self) -> Option<&Path> {
        self.previous.as_deref()
    }

    /// Apply a dispatch result.
    ///
    /// Results that are not handled, or don't ask for a directory change, come
    /// back untouched. A valid request moves the session and rewrites
    /// `new_cwd` to the canonical path. An invalid one leaves the session where
    /// it is and comes back as a handled failure with exit code 1.
    pub fn apply(&mut self, mut result: ExecutionResult) -> ExecutionResult {
        if !result.requests_cwd_change() {
            return result;
        }

        let requested = match result.new_cwd.take() {
            Some(path) => path,
            None => return result,
        };

        match Self::validate(&self.cwd, &requested) {
            Ok(resolved) => {
                debug!(from = %self.cwd.display(), to = %resolved.display(), "changing directory");
                if resolved != self.cwd {
                    self.previous = Some(std::mem::replace(&mut self.cwd, resolved.clone()));
                }
                result.new_cwd = Some(resolved);
                result
            }
            Err(e) => {
                warn!("rejected directory change: {}", e);
                ExecutionResult {
                    handled: true,
                    output: result.output,
                    error: e.to_string(),
                    exit_code: 1,
                    new_cwd: None,
                }
            }
        }
    }

    /// Resolve `path` against `base` and make sure it is a directory we can
    /// actually read.
    ///
    /// # Returns
    /// * `Ok(PathBuf)` - Canonical path of the directory
    /// * `Err(ShellgateError::InvalidDirectory)` - Missing, not a directory,
    ///   or not readable
    pub fn validate(base: &Path, path: &Path) -> Result<PathBuf> {
        let joined = if path.is_absolute() {
            path.to_path_buf()
        } else {
            base.join(path)
        };

        let invalid = |reason: String| ShellgateError::InvalidDirectory {
            path: path.to_path_buf(),
            reason,
        };

        let resolved = fs::canonicalize(&joined).map_err(|e| invalid(e.to_string()))?;

        let metadata = fs::metadata(&resolved).map_err(|e| invalid(e.to_string()))?;
        if !metadata.is_dir() {
            return Err(invalid("Not a directory".to_string()));
        }

        // Listing is the cheapest portable check for "can I actually cd here"
        fs::read_dir(&resolved).map_err(|e| invalid(e.to_string()))?;

        Ok(resolved)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_apply_valid_absolute() {
        let temp = TempDir::new().unwrap();
        let target = temp.path().join("project");
        fs::create_dir(&target).unwrap();

        let mut bridge = WorkingDirectoryBridge::new(temp.path());
        let result = bridge.apply(ExecutionResult::change_dir(&target));

        let canonical = fs::canonicalize(&target).unwrap();
        assert!(result.is_success());
        assert_eq!(result.new_cwd.as_deref(), Some(canonical.as_path()));
        assert_eq!(bridge.cwd(), canonical);
        assert_eq!(bridge.previous(), Some(temp.path()));
    }

    #[test]
    fn test_apply_relative_resolves_against_cwd() {
        let temp = TempDir::new().unwrap();
        fs::create_dir_all(temp.path().join("a").join("b")).unwrap();
        let start = fs::canonicalize(temp.path().join("a")).unwrap();

        let mut bridge = WorkingDirectoryBridge::new(&start);
        bridge.apply(ExecutionResult::change_dir("b"));
        assert_eq!(bridge.cwd(), start.join("b"));

        bridge.apply(ExecutionResult::change_dir(".."));
        assert_eq!(bridge.cwd(), start);
    }

    #[test]
    fn test_apply_missing_directory() {
        let temp = TempDir::new().unwrap();
        let mut bridge = WorkingDirectoryBridge::new(temp.path());

        let result = bridge.apply(ExecutionResult::change_dir("/does/not/exist"));

        assert!(result.handled);
        assert_eq!(result.exit_code, 1);
        assert!(result.error.starts_with("invalid directory"));
        assert!(result.new_cwd.is_none());
        assert_eq!(bridge.cwd(), temp.path());
        assert!(bridge.previous().is_none());
    }

    #[test]
    fn test_apply_file_is_rejected() {
        let temp = TempDir::new().unwrap();
        let file = temp.path().join("notes.txt");
        fs::write(&file, "hi").unwrap();

        let mut bridge = WorkingDirectoryBridge::new(temp.path());
        let result = bridge.apply(ExecutionResult::change_dir(&file).with_output("moving"));

        assert_eq!(result.exit_code, 1);
        assert!(result.error.contains("Not a directory"));
        assert_eq!(result.output, "moving");
        assert_eq!(bridge.cwd(), temp.path());
    }

    #[test]
    fn test_untouched_results() {
        let mut bridge = WorkingDirectoryBridge::new("/");

        let plain = ExecutionResult::ok("hello");
        assert_eq!(bridge.apply(plain.clone()), plain);

        let empty = ExecutionResult::change_dir("");
        assert_eq!(bridge.apply(empty.clone()), empty);

        let mut declined = ExecutionResult::not_handled();
        declined.new_cwd = Some(PathBuf::from("/does/not/exist"));
        assert_eq!(bridge.apply(declined.clone()), declined);

        assert_eq!(bridge.cwd(), Path::new("/"));
    }

    #[test]
    fn test_same_directory_keeps_previous() {
        let temp = TempDir::new().unwrap();
        let start = fs::canonicalize(temp.path()).unwrap();
        let mut bridge = WorkingDirectoryBridge::new(&start);

        bridge.apply(ExecutionResult::change_dir("."));

        assert_eq!(bridge.cwd(), start);
        assert!(bridge.previous().is_none());
    }
}

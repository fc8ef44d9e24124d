/// Shell detection logic
///
/// Works out which shell should run commands that fall through the pipeline.

use crate::error::{Result, ShellgateError};
use std::env;

/// Shells we know how to hand a command line to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shell {
    Sh,
    Bash,
    Zsh,
    Fish,
}

impl Shell {
    /// Get the shell name as a string
    pub fn name(&self) -> &str {
        match self {
            Shell::Sh => "sh",
            Shell::Bash => "bash",
            Shell::Zsh => "zsh",
            Shell::Fish => "fish",
        }
    }

    /// Flag that makes the shell run its next argument as a command line
    pub fn command_flag(&self) -> &str {
        "-c"
    }

    /// Parse a shell from a path like `/usr/bin/zsh`
    pub fn from_path(path: &str) -> Option<Shell> {
        let name = path.rsplit('/').next().unwrap_or("").to_lowercase();
        match name.as_str() {
            "sh" | "dash" => Some(Shell::Sh),
            "bash" => Some(Shell::Bash),
            "zsh" => Some(Shell::Zsh),
            "fish" => Some(Shell::Fish),
            _ => None,
        }
    }
}

impl std::fmt::Display for Shell {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// Shell detector
pub struct ShellDetector;

impl ShellDetector {
    /// Detect the user's shell from `$SHELL`
    ///
    /// # Returns
    /// * `Ok(Shell)` - The detected shell
    /// * `Err(ShellgateError)` - `$SHELL` unset or not a shell we support
    pub fn detect() -> Result<Shell> {
        let shell_path = env::var("SHELL").map_err(|_| {
            ShellgateError::Config(
                "Could not detect shell. Please set $SHELL environment variable.".to_string(),
            )
        })?;

        Shell::from_path(&shell_path)
            .ok_or_else(|| ShellgateError::Config(format!("Unsupported shell: {}", shell_path)))
    }

    /// Detected shell, or plain `sh` when detection fails
    pub fn detect_or_sh() -> Shell {
        Self::detect().unwrap_or(Shell::Sh)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shell_name() {
        assert_eq!(Shell::Sh.name(), "sh");
        assert_eq!(Shell::Bash.name(), "bash");
        assert_eq!(Shell::Zsh.name(), "zsh");
        assert_eq!(Shell::Fish.name(), "fish");
    }

    #[test]
    fn test_from_path() {
        assert_eq!(Shell::from_path("/bin/bash"), Some(Shell::Bash));
        assert_eq!(Shell::from_path("/usr/local/bin/fish"), Some(Shell::Fish));
        assert_eq!(Shell::from_path("zsh"), Some(Shell::Zsh));
        assert_eq!(Shell::from_path("/bin/dash"), Some(Shell::Sh));
        assert_eq!(Shell::from_path("/usr/bin/nu"), None);
    }

    #[test]
    fn test_shell_display() {
        assert_eq!(Shell::Bash.to_string(), "bash");
        assert_eq!(Shell::Zsh.to_string(), "zsh");
    }

    // Only test in the crate that reads or writes $SHELL
    #[test]
    fn test_detect_from_env() {
        let saved = env::var("SHELL").ok();

        env::set_var("SHELL", "/usr/bin/zsh");
        assert_eq!(ShellDetector::detect().unwrap(), Shell::Zsh);
        assert_eq!(ShellDetector::detect_or_sh(), Shell::Zsh);

        env::set_var("SHELL", "/usr/bin/nu");
        assert!(matches!(ShellDetector::detect(), Err(ShellgateError::Config(_))));
        assert_eq!(ShellDetector::detect_or_sh(), Shell::Sh);

        env::remove_var("SHELL");
        assert_eq!(ShellDetector::detect_or_sh(), Shell::Sh);

        if let Some(shell) = saved {
            env::set_var("SHELL", shell);
        }
    }
}

// A command as the user typed it, plus where they typed it from.
//
// Never mutated once built. Plugins that want to move the session somewhere
// else say so through ExecutionResult::new_cwd.

use std::fmt;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    text: String,
    cwd: PathBuf,
    previous_cwd: Option<PathBuf>,
}

impl Command {
    pub fn new(text: impl Into<String>, cwd: impl Into<PathBuf>) -> Self {
        Self {
            text: text.into(),
            cwd: cwd.into(),
            previous_cwd: None,
        }
    }

    /// Attach the session's prior directory (what a shell keeps in `OLDPWD`).
    pub fn with_previous_cwd(mut self, previous: Option<PathBuf>) -> Self {
        self.previous_cwd = previous;
        self
    }

    /// Raw command text, untrimmed
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Directory the command was issued from
    pub fn cwd(&self) -> &Path {
        &self.cwd
    }

    pub fn previous_cwd(&self) -> Option<&Path> {
        self.previous_cwd.as_deref()
    }

    /// First whitespace-separated word, or "" for a blank command
    pub fn program(&self) -> &str {
        self.text.split_whitespace().next().unwrap_or("")
    }

    /// Everything after the program, split on whitespace
    pub fn args(&self) -> Vec<&str> {
        self.text.split_whitespace().skip(1).collect()
    }

    /// The text after the program with its original spacing kept
    pub fn rest(&self) -> &str {
        let trimmed = self.text.trim_start();
        match trimmed.find(char::is_whitespace) {
            Some(idx) => trimmed[idx..].trim(),
            None => "",
        }
    }

    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty()
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.text)
    }
}

/// zsh-style navigation shortcuts
///
/// - `..`, `...`, `....` go up one, two, three levels
/// - `-` goes back to the previous directory
/// - `~` goes home
/// - a bare path containing `/` that names a directory goes there (auto_cd)

use crate::core::{Command, ExecutionResult, Plugin};
use crate::plugins::expand_tilde;
use async_trait::async_trait;
use std::path::{Path, PathBuf};

#[derive(Debug, Default)]
pub struct ZshBindingsPlugin;

impl ZshBindingsPlugin {
    pub fn new() -> Self {
        Self
    }
}

/// `..` -> 1, `...` -> 2, anything else -> None
fn levels_up(word: &str) -> Option<usize> {
    if word.len() >= 2 && word.chars().all(|c| c == '.') {
        Some(word.len() - 1)
    } else {
        None
    }
}

fn parent_path(levels: usize) -> PathBuf {
    let mut path = PathBuf::new();
    for _ in 0..levels {
        path.push("..");
    }
    path
}

/// Only words that look like paths, so plain program names never get
/// shadowed by a directory of the same name
fn looks_like_path(word: &str) -> bool {
    word.contains('/')
}

fn auto_cd_target(word: &str, cwd: &Path) -> Option<PathBuf> {
    if !looks_like_path(word) {
        return None;
    }
    let path = expand_tilde(word).ok()?;
    let resolved = if path.is_absolute() { path.clone() } else { cwd.join(&path) };
    if resolved.is_dir() {
        Some(path)
    } else {
        None
    }
}

/// The single word of a one-word command
fn sole_word(command: &Command) -> Option<&str> {
    if command.args().is_empty() && !command.is_empty() {
        Some(command.program())
    } else {
        None
    }
}

#[async_trait]
impl Plugin for ZshBindingsPlugin {
    fn name(&self) -> &str {
        "zsh_bindings"
    }

    fn should_handle(&self, command: &Command) -> bool {
        match sole_word(command) {
            Some("-") | Some("~") => true,
            // Whether a path is really a directory is left to execute
            Some(word) => levels_up(word).is_some() || looks_like_path(word),
            None => false,
        }
    }

    async fn execute(&self, command: &Command) -> anyhow::Result<ExecutionResult> {
        let word = match sole_word(command) {
            Some(word) => word,
            None => return Ok(ExecutionResult::decline()),
        };

        if word == "-" {
            return Ok(match command.previous_cwd() {
                Some(previous) => ExecutionResult::change_dir(previous)
                    .with_output(previous.display().to_string()),
                None => ExecutionResult::failure("cd: OLDPWD not set", 1),
            });
        }

        if let Some(levels) = levels_up(word) {
            return Ok(ExecutionResult::change_dir(parent_path(levels)));
        }

        if word == "~" {
            return Ok(ExecutionResult::change_dir(expand_tilde(word)?));
        }

        // Scripts like `./build.sh` decline here and carry on to the shell
        match auto_cd_target(word, command.cwd()) {
            Some(target) => Ok(ExecutionResult::change_dir(target)),
            None => Ok(ExecutionResult::decline()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_levels_up() {
        assert_eq!(levels_up(".."), Some(1));
        assert_eq!(levels_up("...."), Some(3));
        assert_eq!(levels_up("."), None);
        assert_eq!(levels_up("..a"), None);
    }

    #[test]
    fn test_should_handle() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("src")).unwrap();
        let zsh = ZshBindingsPlugin::new();
        let at = |text: &str| Command::new(text, temp.path());

        assert!(zsh.should_handle(&at("..")));
        assert!(zsh.should_handle(&at("-")));
        assert!(zsh.should_handle(&at("~")));
        assert!(zsh.should_handle(&at("src/")));
        assert!(zsh.should_handle(&at("./src")));
        assert!(zsh.should_handle(&at("./build.sh")));
        assert!(!zsh.should_handle(&at("src")));
        assert!(!zsh.should_handle(&at(".. now")));
        assert!(!zsh.should_handle(&at("ls")));
    }

    #[tokio::test]
    async fn test_dots() {
        let zsh = ZshBindingsPlugin::new();
        let result = zsh.execute(&Command::new("...", "/a/b/c")).await.unwrap();
        assert_eq!(result.new_cwd, Some(PathBuf::from("../..")));
    }

    #[tokio::test]
    async fn test_dash() {
        let zsh = ZshBindingsPlugin::new();
        let with_prev = Command::new("-", "/a").with_previous_cwd(Some("/b".into()));
        let result = zsh.execute(&with_prev).await.unwrap();
        assert_eq!(result.new_cwd, Some(PathBuf::from("/b")));

        let result = zsh.execute(&Command::new("-", "/a")).await.unwrap();
        assert_eq!(result.exit_code, 1);
    }

    #[tokio::test]
    async fn test_auto_cd() {
        let temp = TempDir::new().unwrap();
        fs::create_dir(temp.path().join("build")).unwrap();
        let zsh = ZshBindingsPlugin::new();

        let result = zsh
            .execute(&Command::new("build/", temp.path()))
            .await
            .unwrap();
        assert_eq!(result.new_cwd, Some(PathBuf::from("build/")));
    }

    #[tokio::test]
    async fn test_auto_cd_declines_non_directories() {
        let temp = TempDir::new().unwrap();
        fs::write(temp.path().join("build.sh"), "echo hi").unwrap();
        let zsh = ZshBindingsPlugin::new();

        for text in ["./build.sh", "missing/"] {
            let result = zsh.execute(&Command::new(text, temp.path())).await.unwrap();
            assert!(!result.handled, "{} should fall through", text);
        }
    }
}

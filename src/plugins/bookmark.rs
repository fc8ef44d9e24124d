// Bookmarks: named directories you can jump back to.
//
//   bm                 list
//   bm add <name>      bookmark the current directory
//   bm rm <name>       forget one
//   bm go <name>       jump (also: g <name>)
//
// Seeded from config; additions live for the session only.

use crate::config::Config;
use crate::core::{Command, ExecutionResult, Plugin};
use async_trait::async_trait;
use std::collections::BTreeMap;
use std::path::PathBuf;
use tokio::sync::RwLock;

const USAGE: &str = "usage: bm [add|rm|go] <name>";

pub struct BookmarkPlugin {
    marks: RwLock<BTreeMap<String, PathBuf>>,
}

impl BookmarkPlugin {
    pub fn new(config: &Config) -> Self {
        Self {
            marks: RwLock::new(config.bookmarks.clone()),
        }
    }

    fn valid_name(name: &str) -> bool {
        !name.is_empty()
            && name
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '-' | '.'))
    }

    async fn list(&self) -> ExecutionResult {
        let marks = self.marks.read().await;
        if marks.is_empty() {
            return ExecutionResult::ok("no bookmarks");
        }
        let lines: Vec<String> = marks
            .iter()
            .map(|(name, path)| format!("{} -> {}", name, path.display()))
            .collect();
        ExecutionResult::ok(lines.join("\n"))
    }

    async fn add(&self, name: &str, command: &Command) -> ExecutionResult {
        if !Self::valid_name(name) {
            return ExecutionResult::failure(format!("bm: invalid bookmark name '{}'", name), 2);
        }
        let path = command.cwd().to_path_buf();
        let output = format!("{} -> {}", name, path.display());
        self.marks.write().await.insert(name.to_string(), path);
        ExecutionResult::ok(output)
    }

    async fn remove(&self, name: &str) -> ExecutionResult {
        match self.marks.write().await.remove(name) {
            Some(_) => ExecutionResult::ok(format!("removed {}", name)),
            None => ExecutionResult::failure(format!("bm: {}: no such bookmark", name), 1),
        }
    }

    async fn go(&self, name: &str) -> ExecutionResult {
        match self.marks.read().await.get(name) {
            Some(path) => ExecutionResult::change_dir(path.clone()),
            None => ExecutionResult::failure(format!("bm: {}: no such bookmark", name), 1),
        }
    }
}

#[async_trait]
impl Plugin for BookmarkPlugin {
    fn name(&self) -> &str {
        "bookmarks"
    }

    fn should_handle(&self, command: &Command) -> bool {
        match command.program() {
            "bm" => true,
            "g" => command.args().len() == 1,
            _ => false,
        }
    }

    async fn execute(&self, command: &Command) -> anyhow::Result<ExecutionResult> {
        let args = command.args();

        let result = match (command.program(), args.as_slice()) {
            ("g", [name]) => self.go(name).await,
            ("bm", []) => self.list().await,
            ("bm", ["add", name]) => self.add(name, command).await,
            ("bm", ["rm", name]) => self.remove(name).await,
            ("bm", ["go", name]) => self.go(name).await,
            _ => ExecutionResult::failure(USAGE, 2),
        };

        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded() -> BookmarkPlugin {
        let mut config = Config::default();
        config.bookmarks.insert("tmp".to_string(), PathBuf::from("/tmp"));
        BookmarkPlugin::new(&config)
    }

    async fn run(plugin: &BookmarkPlugin, text: &str, cwd: &str) -> ExecutionResult {
        plugin.execute(&Command::new(text, cwd)).await.unwrap()
    }

    #[test]
    fn test_should_handle() {
        let bm = seeded();
        assert!(bm.should_handle(&Command::new("bm", "/")));
        assert!(bm.should_handle(&Command::new("g tmp", "/")));
        assert!(!bm.should_handle(&Command::new("g", "/")));
        assert!(!bm.should_handle(&Command::new("git status", "/")));
    }

    #[tokio::test]
    async fn test_go_seeded() {
        let bm = seeded();
        assert_eq!(run(&bm, "g tmp", "/").await.new_cwd, Some(PathBuf::from("/tmp")));
        assert_eq!(run(&bm, "bm go tmp", "/").await.new_cwd, Some(PathBuf::from("/tmp")));
    }

    #[tokio::test]
    async fn test_add_list_remove() {
        let bm = seeded();

        let added = run(&bm, "bm add proj", "/home/me/proj").await;
        assert!(added.is_success());

        let listed = run(&bm, "bm", "/").await;
        assert_eq!(listed.output, "proj -> /home/me/proj\ntmp -> /tmp");

        assert!(run(&bm, "bm rm proj", "/").await.is_success());
        let missing = run(&bm, "bm go proj", "/").await;
        assert_eq!(missing.exit_code, 1);
        assert!(missing.error.contains("no such bookmark"));
    }

    #[tokio::test]
    async fn test_invalid_name_and_usage() {
        let bm = seeded();
        assert_eq!(run(&bm, "bm add a/b", "/").await.exit_code, 2);
        assert_eq!(run(&bm, "bm frobnicate", "/").await.error, USAGE);
    }

    #[tokio::test]
    async fn test_empty_list() {
        let bm = BookmarkPlugin::new(&Config::default());
        assert_eq!(run(&bm, "bm", "/").await.output, "no bookmarks");
    }
}

/// Configuration
///
/// A snapshot read once at startup and handed to each plugin's constructor.
/// Nothing reads it after that, so changes need a new session.

use crate::error::{Result, ShellgateError};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

const CONFIG_DIR: &str = ".shellgate";
const CONFIG_FILE: &str = "config.json";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// alias name -> replacement text
    pub aliases: BTreeMap<String, String>,
    /// bookmark name -> directory
    pub bookmarks: BTreeMap<String, PathBuf>,
    /// Programs allowed to run. Empty means everything not denied.
    pub allowlist: Vec<String>,
    /// Programs that never run
    pub denylist: Vec<String>,
    /// Regexes matched against the whole command line
    pub deny_patterns: Vec<String>,
    pub enhancers: EnhancerConfig,
    /// Per-command dispatch timeout
    pub dispatch_timeout_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnhancerConfig {
    pub ls_color: bool,
    pub grep_color: bool,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        Self {
            ls_color: true,
            grep_color: true,
        }
    }
}

impl Config {
    /// `~/.shellgate/config.json`
    pub fn default_path() -> Result<PathBuf> {
        let home = dirs::home_dir().ok_or_else(|| {
            ShellgateError::Config("Could not determine home directory".to_string())
        })?;
        Ok(home.join(CONFIG_DIR).join(CONFIG_FILE))
    }

    /// Load from the default location
    pub fn load_default() -> Result<Self> {
        Self::load(Self::default_path()?)
    }

    /// Load a config file. A missing file gives the defaults; a file that
    /// exists but isn't valid JSON is an error.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::debug!("no config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let raw = fs::read_to_string(path)?;
        let config = serde_json::from_str(&raw)?;
        Ok(config)
    }

    /// Write as pretty JSON, creating the parent directory if needed
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn dispatch_timeout(&self) -> Option<Duration> {
        self.dispatch_timeout_ms.map(Duration::from_millis)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_gives_defaults() {
        let temp = TempDir::new().unwrap();
        let config = Config::load(temp.path().join("nope.json")).unwrap();
        assert_eq!(config, Config::default());
        assert!(config.enhancers.ls_color);
        assert!(config.dispatch_timeout().is_none());
    }

    #[test]
    fn test_partial_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(
            &path,
            r#"{"aliases": {"gs": "git status"}, "enhancers": {"grep_color": false}, "dispatch_timeout_ms": 1500}"#,
        )
        .unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.aliases.get("gs").map(String::as_str), Some("git status"));
        assert!(config.enhancers.ls_color);
        assert!(!config.enhancers.grep_color);
        assert_eq!(config.dispatch_timeout(), Some(Duration::from_millis(1500)));
    }

    #[test]
    fn test_malformed_file() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.json");
        fs::write(&path, "{ not json").unwrap();

        match Config::load(&path) {
            Err(ShellgateError::Serialization(_)) => {}
            other => panic!("Expected Serialization error, got {:?}", other),
        }
    }

    #[test]
    fn test_save_then_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.json");

        let mut config = Config::default();
        config.bookmarks.insert("tmp".to_string(), PathBuf::from("/tmp"));
        config.denylist.push("rm".to_string());
        config.save(&path).unwrap();

        assert_eq!(Config::load(&path).unwrap(), config);
    }
}

/// Bundled plugins
///
/// Leaves that plug into the pipeline: command policy, aliases, directory
/// navigation, bookmarks and screen clearing.

pub mod alias;
pub mod bookmark;
pub mod cd;
pub mod clear;
pub mod policy;
pub mod zsh_bindings;

pub use alias::AliasPlugin;
pub use bookmark::BookmarkPlugin;
pub use cd::CdPlugin;
pub use clear::ClearPlugin;
pub use policy::{Policy, PolicyPlugin};
pub use zsh_bindings::ZshBindingsPlugin;

use crate::config::Config;
use crate::core::{ColorFlagEnhancer, EnhancerManager, PluginManager};
use crate::error::Result;
use crate::shell::ShellRunner;
use anyhow::anyhow;
use std::path::PathBuf;

/// Registry with every bundled plugin, in the order they should be asked.
///
/// Policy goes first so a blocked command never reaches anything else, and
/// aliases re-check their expansion against the same rules.
pub fn default_plugins(config: &Config, runner: ShellRunner) -> Result<PluginManager> {
    let policy = Policy::new(config);
    let mut manager = PluginManager::new();
    manager.register(PolicyPlugin::new(policy.clone()))?;
    manager.register(AliasPlugin::new(config, runner).with_policy(policy))?;
    manager.register(CdPlugin::new())?;
    manager.register(ZshBindingsPlugin::new())?;
    manager.register(BookmarkPlugin::new(config))?;
    manager.register(ClearPlugin)?;
    Ok(manager)
}

/// Enhancers switched on in the config
pub fn default_enhancers(config: &Config) -> EnhancerManager {
    let mut enhancers = EnhancerManager::new();
    if config.enhancers.ls_color {
        enhancers.register(ColorFlagEnhancer::ls());
    }
    if config.enhancers.grep_color {
        enhancers.register(ColorFlagEnhancer::grep());
    }
    enhancers
}

/// `~` and `~/x` against the home directory; anything else as-is
pub(crate) fn expand_tilde(arg: &str) -> anyhow::Result<PathBuf> {
    if arg != "~" && !arg.starts_with("~/") {
        return Ok(PathBuf::from(arg));
    }

    let home = dirs::home_dir().ok_or_else(|| anyhow!("HOME not set"))?;
    match arg.strip_prefix("~/") {
        Some(rest) if !rest.is_empty() => Ok(home.join(rest)),
        _ => Ok(home),
    }
}

//! Plugin trait
//!
//! A plugin gets a look at every command before the shell does. The manager
//! asks `should_handle` first and only calls `execute` when that said yes.

use async_trait::async_trait;

use crate::core::{Command, ExecutionResult};

/// A unit of command-handling policy.
///
/// Implementations are built once per session and registered into a
/// [`PluginManager`](crate::core::PluginManager). They must be `Send + Sync`
/// because the manager may be shared behind an `Arc`.
#[async_trait]
pub trait Plugin: Send + Sync {
    /// Stable, unique name. Used for duplicate detection and in logs.
    fn name(&self) -> &str;

    /// Cheap, side-effect-free check run on every submitted command.
    ///
    /// A panic here is caught and counted as `false`.
    fn should_handle(&self, command: &Command) -> bool;

    /// Handle a command this plugin just claimed.
    ///
    /// Return `ExecutionResult::decline()` to pass the command on to the next
    /// plugin. An `Err` ends the pipeline as a handled failure with exit code 1.
    async fn execute(&self, command: &Command) -> anyhow::Result<ExecutionResult>;
}

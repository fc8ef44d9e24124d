//! Plugin manager
//!
//! Owns the ordered plugin registry and runs the try-and-fallthrough dispatch:
//! plugins are asked in registration order, the first one that matches and
//! handles the command wins, and a plugin that matches but declines hands the
//! command on to the next one.

use std::any::Any;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::Instant;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::core::{Command, ExecutionResult, Plugin};
use crate::error::{Result, ShellgateError};

/// Per-dispatch knobs supplied by the caller
#[derive(Debug, Clone, Default)]
pub struct DispatchOptions {
    /// Fires when the user interrupts the command
    pub cancel: CancellationToken,
    /// Upper bound on the whole dispatch. None means wait forever.
    pub timeout: Option<Duration>,
}

impl DispatchOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    pub fn with_cancel(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }
}

/// Ordered registry of plugins for one session
#[derive(Default)]
pub struct PluginManager {
    plugins: Vec<Arc<dyn Plugin>>,
}

impl PluginManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a plugin to the end of the registry.
    ///
    /// # Returns
    /// * `Ok(())` - Plugin registered
    /// * `Err(ShellgateError::DuplicatePlugin)` - Name already taken; the
    ///   registry is left as it was
    pub fn register<P: Plugin + 'static>(&mut self, plugin: P) -> Result<()> {
        self.register_shared(Arc::new(plugin))
    }

    /// Same as [`register`](Self::register) for a plugin that is already shared
    pub fn register_shared(&mut self, plugin: Arc<dyn Plugin>) -> Result<()> {
        let name = plugin.name();
        if self.contains(name) {
            return Err(ShellgateError::DuplicatePlugin(name.to_string()));
        }

        debug!(plugin = name, position = self.plugins.len(), "registered plugin");
        self.plugins.push(plugin);
        Ok(())
    }

    /// Plugin names in registration order
    pub fn names(&self) -> Vec<&str> {
        self.plugins.iter().map(|p| p.name()).collect()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.plugins.iter().any(|p| p.name() == name)
    }

    pub fn len(&self) -> usize {
        self.plugins.len()
    }

    pub fn is_empty(&self) -> bool {
        self.plugins.is_empty()
    }

    /// Run a command through the registry with no timeout and no way to
    /// cancel it.
    pub async fn dispatch(&self, command: &Command) -> ExecutionResult {
        self.dispatch_with(command, &DispatchOptions::default()).await
    }

    /// Run a command through the registry.
    ///
    /// Always returns a terminal outcome: a handled result (success, failure
    /// or cancelled) or `ExecutionResult::not_handled()` when the command
    /// should go to the shell.
    pub async fn dispatch_with(
        &self,
        command: &Command,
        options: &DispatchOptions,
    ) -> ExecutionResult {
        let deadline = options.timeout.map(|t| Instant::now() + t);

        tokio::select! {
            biased;
            _ = options.cancel.cancelled() => {
                debug!(command = %command, "dispatch cancelled");
                ExecutionResult::cancelled()
            }
            _ = wait_for(deadline) => {
                debug!(command = %command, "dispatch timed out");
                ExecutionResult::cancelled()
            }
            result = self.run_chain(command) => result,
        }
    }

    async fn run_chain(&self, command: &Command) -> ExecutionResult {
        for plugin in &self.plugins {
            if !matches(plugin.as_ref(), command) {
                continue;
            }

            debug!(plugin = plugin.name(), command = %command, "plugin matched");
            let result = execute_guarded(plugin, command).await;

            if result.handled {
                return result;
            }

            // Matched, then declined. Keep going.
            debug!(plugin = plugin.name(), "plugin declined after match");
        }

        ExecutionResult::not_handled()
    }
}

impl fmt::Debug for PluginManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PluginManager")
            .field("plugins", &self.names())
            .finish()
    }
}

/// Predicate check that treats a panic as "no match"
fn matches(plugin: &dyn Plugin, command: &Command) -> bool {
    match panic::catch_unwind(AssertUnwindSafe(|| plugin.should_handle(command))) {
        Ok(matched) => matched,
        Err(payload) => {
            warn!(
                plugin = plugin.name(),
                "should_handle panicked, skipping plugin: {}",
                panic_message(payload.as_ref())
            );
            false
        }
    }
}

/// Run `execute` on its own task so a panic is contained, and abort that task
/// if the dispatch future is dropped (cancel or timeout).
async fn execute_guarded(plugin: &Arc<dyn Plugin>, command: &Command) -> ExecutionResult {
    let task_plugin = Arc::clone(plugin);
    let task_command = command.clone();
    let mut task = AbortOnDrop(tokio::spawn(async move {
        task_plugin.execute(&task_command).await
    }));

    match (&mut task.0).await {
        Ok(Ok(result)) => result,
        Ok(Err(e)) => {
            let message = format!("{:#}", e);
            warn!(plugin = plugin.name(), "plugin failed: {}", message);
            ExecutionResult::failure(non_empty(message, plugin.name()), 1)
        }
        Err(join_err) if join_err.is_panic() => {
            let message = panic_message(join_err.into_panic().as_ref());
            warn!(plugin = plugin.name(), "plugin panicked: {}", message);
            ExecutionResult::failure(non_empty(message, plugin.name()), 1)
        }
        Err(_) => ExecutionResult::cancelled(),
    }
}

struct AbortOnDrop<T>(JoinHandle<T>);

impl<T> Drop for AbortOnDrop<T> {
    fn drop(&mut self) {
        self.0.abort();
    }
}

async fn wait_for(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending::<()>().await,
    }
}

fn non_empty(message: String, plugin: &str) -> String {
    if message.trim().is_empty() {
        format!("{}: plugin failed", plugin)
    } else {
        message
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        String::new()
    }
}

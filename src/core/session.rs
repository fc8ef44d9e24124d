/// Terminal session
///
/// Glue between a front end and the pipeline: takes a raw input line, runs it
/// through the plugin manager, applies any directory change and tells the
/// caller whether to hand the command to the shell.

use crate::core::{
    Command, DispatchOptions, EnhancerManager, ExecutionResult, PluginManager,
    WorkingDirectoryBridge,
};
use std::collections::VecDeque;
use std::path::{Path, PathBuf};

/// Most lines a session remembers
pub const MAX_HISTORY: usize = 1000;

/// What the caller should do with a submitted line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionOutcome {
    /// Blank input, nothing to do
    Empty,
    /// A plugin took care of it; show the result
    Handled(ExecutionResult),
    /// Nobody claimed it; run this (possibly enhanced) command in the shell
    Fallthrough(String),
}

/// One terminal session's pipeline state
pub struct Session {
    manager: PluginManager,
    enhancers: EnhancerManager,
    bridge: WorkingDirectoryBridge,
    history: VecDeque<String>,
    options: DispatchOptions,
}

impl Session {
    pub fn new(manager: PluginManager, cwd: impl Into<PathBuf>) -> Self {
        Self::with_enhancers(manager, EnhancerManager::new(), cwd)
    }

    pub fn with_enhancers(
        manager: PluginManager,
        enhancers: EnhancerManager,
        cwd: impl Into<PathBuf>,
    ) -> Self {
        Self {
            manager,
            enhancers,
            bridge: WorkingDirectoryBridge::new(cwd),
            history: VecDeque::new(),
            options: DispatchOptions::default(),
        }
    }

    /// Default options for `submit`, e.g. a per-command timeout from config
    pub fn with_options(mut self, options: DispatchOptions) -> Self {
        self.options = options;
        self
    }

    pub fn cwd(&self) -> &Path {
        self.bridge.cwd()
    }

    pub fn previous_cwd(&self) -> Option<&Path> {
        self.bridge.previous()
    }

    pub fn options(&self) -> &DispatchOptions {
        &self.options
    }

    pub fn manager(&self) -> &PluginManager {
        &self.manager
    }

    /// Submitted lines, oldest first
    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub async fn submit(&mut self, line: &str) -> SessionOutcome {
        let options = self.options.clone();
        self.submit_with(line, &options).await
    }

    /// Submit with caller-supplied cancellation or timeout
    pub async fn submit_with(&mut self, line: &str, options: &DispatchOptions) -> SessionOutcome {
        let line = line.trim();
        if line.is_empty() {
            return SessionOutcome::Empty;
        }

        self.remember(line);

        let command = Command::new(line, self.bridge.cwd())
            .with_previous_cwd(self.bridge.previous().map(Path::to_path_buf));

        let result = self.manager.dispatch_with(&command, options).await;
        if !result.handled {
            return SessionOutcome::Fallthrough(self.enhancers.enhance(line));
        }

        SessionOutcome::Handled(self.bridge.apply(result))
    }

    fn remember(&mut self, line: &str) {
        if self.history.back().map(String::as_str) == Some(line) {
            return;
        }
        if self.history.len() == MAX_HISTORY {
            self.history.pop_front();
        }
        self.history.push_back(line.to_string());
    }
}

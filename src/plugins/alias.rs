/// Alias plugin
///
/// Expands configured aliases and runs the result through the shell. Also
/// answers the `alias` builtin for listing them. The expansion goes through
/// the same `Policy` as typed commands before anything is spawned.

use crate::config::Config;
use crate::core::{Command, ExecutionResult, Plugin};
use crate::plugins::policy::Policy;
use crate::shell::ShellRunner;
use anyhow::Context;
use async_trait::async_trait;
use std::collections::BTreeMap;

pub struct AliasPlugin {
    aliases: BTreeMap<String, String>,
    runner: ShellRunner,
    policy: Policy,
}

impl AliasPlugin {
    pub fn new(config: &Config, runner: ShellRunner) -> Self {
        Self {
            aliases: config.aliases.clone(),
            runner,
            policy: Policy::default(),
        }
    }

    pub fn with_policy(mut self, policy: Policy) -> Self {
        self.policy = policy;
        self
    }

    /// What `command` turns into, or None if its program isn't an alias
    pub fn expand(&self, command: &Command) -> Option<String> {
        let value = self.aliases.get(command.program())?;
        let rest = command.rest();
        if rest.is_empty() {
            Some(value.trim().to_string())
        } else {
            Some(format!("{} {}", value.trim(), rest))
        }
    }

    fn list(&self, names: &[&str]) -> ExecutionResult {
        if names.is_empty() {
            let lines: Vec<String> = self
                .aliases
                .iter()
                .map(|(name, value)| format!("{}='{}'", name, value))
                .collect();
            return ExecutionResult::ok(lines.join("\n"));
        }

        let mut lines = Vec::new();
        let mut missing = Vec::new();
        for name in names {
            match self.aliases.get(*name) {
                Some(value) => lines.push(format!("{}='{}'", name, value)),
                None => missing.push(format!("alias: {}: not found", name)),
            }
        }

        ExecutionResult {
            handled: true,
            output: lines.join("\n"),
            error: missing.join("\n"),
            exit_code: if missing.is_empty() { 0 } else { 1 },
            new_cwd: None,
        }
    }
}

#[async_trait]
impl Plugin for AliasPlugin {
    fn name(&self) -> &str {
        "alias"
    }

    fn should_handle(&self, command: &Command) -> bool {
        let program = command.program();
        program == "alias" || self.aliases.contains_key(program)
    }

    async fn execute(&self, command: &Command) -> anyhow::Result<ExecutionResult> {
        let expansion = match self.expand(command) {
            Some(expansion) => expansion,
            // Only `alias` itself gets here without an expansion
            None => return Ok(self.list(&command.args())),
        };

        if expansion.is_empty() {
            return Ok(ExecutionResult::decline());
        }

        if let Some(refusal) = self.policy.check(&expansion) {
            tracing::debug!(alias = command.program(), expansion = %expansion, "alias expansion blocked");
            return Ok(refusal);
        }

        tracing::debug!(alias = command.program(), expansion = %expansion, "expanding alias");
        let output = self
            .runner
            .run(&expansion, command.cwd())
            .await
            .with_context(|| format!("{}: failed to run alias", command.program()))?;

        Ok(output.into_result())
    }
}

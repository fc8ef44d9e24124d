/// cd plugin
///
/// `cd` has to live inside the session: a child shell can't move its parent.
/// This plugin works out the target and leaves validation to the
/// working-directory bridge.

use crate::core::{Command, ExecutionResult, Plugin};
use crate::plugins::expand_tilde;
use async_trait::async_trait;

#[derive(Debug, Default)]
pub struct CdPlugin;

impl CdPlugin {
    pub fn new() -> Self {
        Self
    }
}

/// `"My Docs"` and `'My Docs'` lose one pair of matching quotes; anything
/// else comes back as written
fn unquote(target: &str) -> &str {
    for quote in ['"', '\''] {
        if let Some(inner) = target
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return inner;
        }
    }
    target
}

#[async_trait]
impl Plugin for CdPlugin {
    fn name(&self) -> &str {
        "cd"
    }

    fn should_handle(&self, command: &Command) -> bool {
        command.program() == "cd"
    }

    async fn execute(&self, command: &Command) -> anyhow::Result<ExecutionResult> {
        // Everything after `cd` is one path, spaces included
        let result = match command.rest() {
            "" => ExecutionResult::change_dir(expand_tilde("~")?),
            "-" => match command.previous_cwd() {
                // Shells echo the directory for `cd -`
                Some(previous) => ExecutionResult::change_dir(previous)
                    .with_output(previous.display().to_string()),
                None => ExecutionResult::failure("cd: OLDPWD not set", 1),
            },
            target => match unquote(target) {
                "" => ExecutionResult::failure("cd: empty directory name", 1),
                target => ExecutionResult::change_dir(expand_tilde(target)?),
            },
        };

        Ok(result)
    }
}

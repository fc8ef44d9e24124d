use crate::core::{Command, ExecutionResult, Plugin};
use async_trait::async_trait;

/// Clear screen and move the cursor home
const CLEAR_SEQUENCE: &str = "\x1b[2J\x1b[H";

/// `clear` / `cls` without arguments
#[derive(Debug, Default)]
pub struct ClearPlugin;

#[async_trait]
impl Plugin for ClearPlugin {
    fn name(&self) -> &str {
        "clear"
    }

    fn should_handle(&self, command: &Command) -> bool {
        matches!(command.program(), "clear" | "cls") && command.args().is_empty()
    }

    async fn execute(&self, _command: &Command) -> anyhow::Result<ExecutionResult> {
        Ok(ExecutionResult::ok(CLEAR_SEQUENCE))
    }
}

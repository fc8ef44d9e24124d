/// Shell runner
///
/// Runs a command line through a real shell. Used by plugins that shell out
/// (aliases) and by the front end for commands nothing claimed.

use crate::core::ExecutionResult;
use crate::shell::Shell;
use std::io;
use std::path::Path;
use std::process::{ExitStatus, Stdio};
use tokio::process::Command;

/// Captured output of one shell invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl RunOutput {
    /// A handled result carrying the captured streams and status
    pub fn into_result(self) -> ExecutionResult {
        ExecutionResult {
            handled: true,
            output: self.stdout,
            error: self.stderr,
            exit_code: self.exit_code,
            new_cwd: None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct ShellRunner {
    shell: Shell,
}

impl ShellRunner {
    pub fn new(shell: Shell) -> Self {
        Self { shell }
    }

    pub fn shell(&self) -> Shell {
        self.shell
    }

    fn command(&self, line: &str, cwd: &Path) -> Command {
        let mut cmd = Command::new(self.shell.name());
        cmd.arg(self.shell.command_flag())
            .arg(line)
            .current_dir(cwd)
            // Dropping the future (cancel, timeout) kills the child
            .kill_on_drop(true);
        cmd
    }

    /// Run and capture stdout/stderr
    pub async fn run(&self, line: &str, cwd: &Path) -> io::Result<RunOutput> {
        let output = self
            .command(line, cwd)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await?;

        Ok(RunOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: exit_code(output.status),
        })
    }

    /// Run attached to the caller's terminal and return the exit code
    pub async fn run_interactive(&self, line: &str, cwd: &Path) -> io::Result<i32> {
        let status = self
            .command(line, cwd)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;
        Ok(exit_code(status))
    }
}

/// Exit code the way a shell reports it: 128 + signal for killed processes
fn exit_code(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }

    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(signal) = status.signal() {
            return 128 + signal;
        }
    }

    -1
}

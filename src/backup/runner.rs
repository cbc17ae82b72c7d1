use duct::cmd;

use crate::backup::error::BackupError;
use crate::common::shell::command_line;
use crate::ui::prelude::*;

/// Exit code and combined stdout/stderr of one tool invocation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolOutput {
    pub exit_code: i32,
    pub output: String,
}

impl ToolOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Seam between the orchestrator and the external tools it drives
pub trait CommandRunner {
    /// Run `program` to completion. A non-zero exit is not an error; only a
    /// failure to start the process is.
    fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, BackupError>;
}

/// Runs tools as child processes, blocking until they exit
#[derive(Debug, Default, Clone, Copy)]
pub struct ProcessRunner;

impl CommandRunner for ProcessRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<ToolOutput, BackupError> {
        emit(
            Level::Debug,
            "backup.tool.command",
            &format!("$ {}", command_line(program, args)),
            None,
        );

        let output = cmd(program, args)
            .stderr_to_stdout()
            .stdout_capture()
            .unchecked()
            .run()
            .map_err(|source| BackupError::Spawn {
                tool: program.to_string(),
                source,
            })?;

        Ok(ToolOutput {
            // Killed by a signal
            exit_code: output.status.code().unwrap_or(1),
            output: String::from_utf8_lossy(&output.stdout).into_owned(),
        })
    }
}

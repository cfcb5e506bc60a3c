//! Spawning external binaries
//!
//! Every adapter talks to its tool through `ToolCommand` so that a missing
//! binary and a failing run map to the same domain errors everywhere.

use std::ffi::OsStr;
use std::process::{Output, Stdio};

use tokio::process::Command;
use tracing::debug;

use crate::domain::errors::DomainError;

/// An external tool invocation
pub struct ToolCommand {
    tool: String,
    command: Command,
}

impl ToolCommand {
    /// Start building an invocation of `program`; `tool` names it in errors
    pub fn new(tool: &str, program: &str) -> Self {
        let mut command = Command::new(program);
        command
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);
        Self {
            tool: tool.to_string(),
            command,
        }
    }

    pub fn arg<S: AsRef<OsStr>>(mut self, arg: S) -> Self {
        self.command.arg(arg);
        self
    }

    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        self.command.args(args);
        self
    }

    /// Run to completion regardless of exit status
    pub async fn output(mut self) -> Result<Output, DomainError> {
        debug!(tool = %self.tool, command = ?self.command.as_std(), "Running external tool");
        let tool = self.tool.clone();
        self.command.output().await.map_err(|e| spawn_error(&tool, e))
    }

    /// Run to completion; a non-zero exit becomes `ToolFailed`
    pub async fn run(self) -> Result<Output, DomainError> {
        let tool = self.tool.clone();
        let output = self.output().await?;
        if !output.status.success() {
            return Err(DomainError::tool_failed(
                &tool,
                &String::from_utf8_lossy(&output.stderr),
            ));
        }
        Ok(output)
    }

    /// Hand over the underlying command for streaming use
    pub fn into_inner(self) -> (String, Command) {
        (self.tool, self.command)
    }
}

/// Map a spawn failure; `NotFound` means the binary is not installed
pub fn spawn_error(tool: &str, err: std::io::Error) -> DomainError {
    if err.kind() == std::io::ErrorKind::NotFound {
        DomainError::ToolMissing(tool.to_string())
    } else {
        DomainError::ToolFailed {
            tool: tool.to_string(),
            message: err.to_string(),
        }
    }
}

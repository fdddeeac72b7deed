//! External command execution.
//!
//! Package managers are configured by running their own CLIs. Commands are
//! executed directly (no shell), with stdout and stderr captured.

use crate::{PartifactError, Result};
use async_trait::async_trait;
use std::process::Stdio;
use tokio::process::Command;

/// Executes a command and returns stdout as a string.
///
/// # Arguments
///
/// - `program`: Command to execute (e.g., "pip", "poetry")
/// - `args`: Command arguments
///
/// # Errors
///
/// Returns [`PartifactError::ShellCommandFailure`] if:
/// - Command not found or cannot be spawned
/// - Exit code is non-zero (stderr is captured into the error)
/// - Output is not valid UTF-8
pub async fn run_command(program: &str, args: &[String]) -> Result<String> {
    let mut cmd = Command::new(program);
    cmd.args(args);
    cmd.stdin(Stdio::null());
    cmd.stdout(Stdio::piped());
    cmd.stderr(Stdio::piped());

    let output = cmd.output().await.map_err(|e| PartifactError::ShellCommandFailure {
        program: program.to_string(),
        code: -1,
        stderr: if e.kind() == std::io::ErrorKind::NotFound {
            format!("{} command not found", program)
        } else {
            e.to_string()
        },
    })?;

    if !output.status.success() {
        return Err(PartifactError::ShellCommandFailure {
            program: program.to_string(),
            code: output.status.code().unwrap_or(-1),
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        });
    }

    String::from_utf8(output.stdout).map_err(|e| PartifactError::ShellCommandFailure {
        program: program.to_string(),
        code: 0,
        stderr: format!("invalid UTF-8 in command output: {}", e),
    })
}

/// Runs external commands on behalf of the configurator.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args`, returning captured stdout.
    async fn run(&self, program: &str, args: &[String]) -> Result<String>;
}

/// Runs commands as real subprocesses via [`run_command`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemRunner;

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        run_command(program, args).await
    }
}

/// A command captured by [`RecordingRunner`].
#[cfg(feature = "mock")]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedCommand {
    pub program: String,
    pub args: Vec<String>,
}

/// Records commands instead of executing them.
///
/// Programs listed in `failing` return a [`PartifactError::ShellCommandFailure`]
/// (after being recorded).
#[cfg(feature = "mock")]
#[derive(Debug, Default)]
pub struct RecordingRunner {
    commands: std::sync::Mutex<Vec<RecordedCommand>>,
    /// Programs that should fail, with the stderr they report
    pub failing: Vec<(String, String)>,
}

#[cfg(feature = "mock")]
impl RecordingRunner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every invocation of `program` fail with `stderr`.
    pub fn fail(mut self, program: impl Into<String>, stderr: impl Into<String>) -> Self {
        self.failing.push((program.into(), stderr.into()));
        self
    }

    /// Every command run so far, in order.
    pub fn commands(&self) -> Vec<RecordedCommand> {
        self.commands
            .lock()
            .map(|commands| commands.clone())
            .unwrap_or_default()
    }
}

#[cfg(feature = "mock")]
#[async_trait]
impl CommandRunner for RecordingRunner {
    async fn run(&self, program: &str, args: &[String]) -> Result<String> {
        if let Ok(mut commands) = self.commands.lock() {
            commands.push(RecordedCommand {
                program: program.to_string(),
                args: args.to_vec(),
            });
        }

        match self.failing.iter().find(|(name, _)| name == program) {
            Some((_, stderr)) => Err(PartifactError::ShellCommandFailure {
                program: program.to_string(),
                code: 1,
                stderr: stderr.clone(),
            }),
            None => Ok(String::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    #[tokio::test]
    async fn test_run_command_success() {
        let output = run_command("echo", &args(&["hello"])).await.unwrap();
        assert_eq!(output.trim(), "hello");
    }

    #[tokio::test]
    async fn test_run_command_not_found() {
        let result = run_command("nonexistent-command-12345", &[]).await;
        assert!(matches!(
            result,
            Err(PartifactError::ShellCommandFailure { code: -1, .. })
        ));
    }

    #[tokio::test]
    async fn test_run_command_not_executable() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let program = file.path().to_string_lossy().to_string();

        let err = run_command(&program, &[]).await.unwrap_err();

        assert_eq!(err.kind(), "ShellCommandFailure");
        assert_eq!(err.exit_code(), 6);
        assert!(matches!(err, PartifactError::ShellCommandFailure { code: -1, .. }));
    }

    #[tokio::test]
    async fn test_run_command_captures_stderr() {
        let result = run_command("sh", &args(&["-c", "echo broken >&2; exit 3"])).await;

        match result {
            Err(PartifactError::ShellCommandFailure { program, code, stderr }) => {
                assert_eq!(program, "sh");
                assert_eq!(code, 3);
                assert_eq!(stderr, "broken");
            }
            other => panic!("expected ShellCommandFailure, got {:?}", other),
        }
    }

    #[cfg(feature = "mock")]
    #[tokio::test]
    async fn test_recording_runner() {
        let runner = RecordingRunner::new().fail("poetry", "no such key");

        runner.run("pip", &args(&["config", "list"])).await.unwrap();
        let result = runner.run("poetry", &args(&["config"])).await;

        assert!(matches!(result, Err(PartifactError::ShellCommandFailure { .. })));
        let commands = runner.commands();
        assert_eq!(commands.len(), 2);
        assert_eq!(commands[0].program, "pip");
        assert_eq!(commands[0].args, args(&["config", "list"]));
    }
}

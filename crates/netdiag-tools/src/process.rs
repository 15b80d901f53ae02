//! External process execution.
//!
//! Diagnostics never spawn processes themselves; they describe an
//! [`Invocation`] and hand it to a [`CommandRunner`]. The system runner
//! launches the program directly (no shell) and captures its output.

use std::fmt;
use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::debug;

use crate::ToolError;

/// A program and its fixed arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    /// Program name, resolved against PATH
    pub program: String,
    /// Arguments passed verbatim
    pub args: Vec<String>,
}

impl Invocation {
    /// Create an invocation with no arguments.
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
        }
    }

    /// Append an argument.
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }
}

impl fmt::Display for Invocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.program)?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}

/// Captured result of a finished process.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProcessOutput {
    /// Exit code, `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    /// Standard output, lossily decoded
    pub stdout: String,
    /// Standard error, lossily decoded
    pub stderr: String,
}

impl ProcessOutput {
    /// Whether the process exited with status 0.
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Runs invocations to completion.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    /// Run the invocation and capture its output.
    ///
    /// A non-zero exit status is not an error; only failing to launch, read
    /// or finish the process is.
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolError>;
}

/// Runner that spawns real OS processes.
#[derive(Debug, Clone, Default)]
pub struct SystemRunner {
    timeout: Option<Duration>,
}

impl SystemRunner {
    /// Create a runner that waits for processes indefinitely.
    pub fn new() -> Self {
        Self::default()
    }

    /// Kill processes that run longer than `timeout`.
    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }
}

#[async_trait]
impl CommandRunner for SystemRunner {
    async fn run(&self, invocation: &Invocation) -> Result<ProcessOutput, ToolError> {
        debug!(command = %invocation, "Running external utility");

        let mut cmd = Command::new(&invocation.program);
        cmd.args(&invocation.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        let launch_error = |source: std::io::Error| ToolError::Launch {
            program: invocation.program.clone(),
            source,
        };

        // Dropping the output future on timeout kills the child.
        let output = match self.timeout {
            Some(limit) => match timeout(limit, cmd.output()).await {
                Ok(result) => result.map_err(launch_error)?,
                Err(_) => {
                    return Err(ToolError::Timeout {
                        program: invocation.program.clone(),
                        seconds: limit.as_secs(),
                    })
                }
            },
            None => cmd.output().await.map_err(launch_error)?,
        };

        let output = ProcessOutput {
            exit_code: output.status.code(),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        };

        debug!(
            command = %invocation,
            exit_code = ?output.exit_code,
            stdout_len = output.stdout.len(),
            "External utility finished"
        );

        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use netdiag_core::FailureKind;

    #[test]
    fn test_invocation_display() {
        let invocation = Invocation::new("ping").args(["-c", "4"]).arg("8.8.8.8");
        assert_eq!(invocation.to_string(), "ping -c 4 8.8.8.8");
    }

    #[test]
    fn test_process_output_success() {
        let mut output = ProcessOutput {
            exit_code: Some(0),
            ..Default::default()
        };
        assert!(output.success());

        output.exit_code = Some(1);
        assert!(!output.success());

        output.exit_code = None;
        assert!(!output.success());
    }

    #[tokio::test]
    async fn test_missing_program_is_not_found() {
        let runner = SystemRunner::new();
        let invocation = Invocation::new("netdiag-definitely-not-installed");

        let err = runner.run(&invocation).await.unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::NotFound);
        assert!(err.to_string().contains("netdiag-definitely-not-installed"));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_captures_stdout_and_exit_code() {
        let runner = SystemRunner::new();
        let invocation = Invocation::new("sh").args(["-c", "echo hello; echo oops >&2; exit 3"]);

        let output = runner.run(&invocation).await.unwrap();
        assert_eq!(output.exit_code, Some(3));
        assert_eq!(output.stdout.trim(), "hello");
        assert_eq!(output.stderr.trim(), "oops");
        assert!(!output.success());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_args_are_not_shell_interpreted() {
        let runner = SystemRunner::new();
        let invocation = Invocation::new("echo").arg("$HOME; true");

        let output = runner.run(&invocation).await.unwrap();
        assert_eq!(output.stdout.trim(), "$HOME; true");
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_timeout_kills_process() {
        let runner = SystemRunner::new().with_timeout(Some(Duration::from_millis(100)));
        let invocation = Invocation::new("sleep").arg("10");

        let err = runner.run(&invocation).await.unwrap_err();
        assert_eq!(err.failure_kind(), FailureKind::Timeout);
    }
}

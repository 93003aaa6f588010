use crate::flyctl::FlyctlError;
use std::process::{ExitStatus, Stdio};
use std::time::Duration;

/// Abstraction over flyctl execution for testability.
///
/// Production code uses [`RealExecutor`], tests use mockall-generated mocks.
/// Every call is bounded by `timeout`; a child still running when it expires
/// is killed.
#[allow(async_fn_in_trait)]
pub trait FlyctlExecutor: Send + Sync {
    /// Execute a flyctl command and capture stdout.
    async fn exec(&self, args: &[String], timeout: Duration) -> Result<String, FlyctlError>;

    /// Execute a flyctl command, streaming output to the terminal.
    async fn exec_streaming(&self, args: &[String], timeout: Duration)
    -> Result<(), FlyctlError>;

    /// Execute a flyctl command with data piped to stdin.
    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
        timeout: Duration,
    ) -> Result<String, FlyctlError>;
}

/// Real flyctl executor.
pub struct RealExecutor {
    program: String,
}

impl RealExecutor {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn command(&self, args: &[String]) -> tokio::process::Command {
        tracing::info!(program = %self.program, args = ?args, "running");
        let mut cmd = tokio::process::Command::new(&self.program);
        // Dropping the future on timeout drops the child, which kills it.
        cmd.args(args).kill_on_drop(true);
        cmd
    }

    fn not_found(&self, source: std::io::Error) -> FlyctlError {
        FlyctlError::NotFound {
            program: self.program.clone(),
            source,
        }
    }
}

impl Default for RealExecutor {
    fn default() -> Self {
        Self::new("flyctl")
    }
}

impl FlyctlExecutor for RealExecutor {
    async fn exec(&self, args: &[String], timeout: Duration) -> Result<String, FlyctlError> {
        let child = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        let output = tokio::time::timeout(timeout, child.wait_with_output())
            .await
            .map_err(|e| timed_out(args, timeout, e))?
            .map_err(|e| FlyctlError::Wait { source: e })?;

        finish(args, output)
    }

    async fn exec_streaming(
        &self,
        args: &[String],
        timeout: Duration,
    ) -> Result<(), FlyctlError> {
        let mut child = self
            .command(args)
            .stdin(Stdio::null())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        let status = tokio::time::timeout(timeout, child.wait())
            .await
            .map_err(|e| timed_out(args, timeout, e))?
            .map_err(|e| FlyctlError::Wait { source: e })?;

        if status.success() {
            Ok(())
        } else {
            Err(command_failed(args, status, String::new()))
        }
    }

    async fn exec_with_stdin(
        &self,
        args: &[String],
        stdin_data: &[u8],
        timeout: Duration,
    ) -> Result<String, FlyctlError> {
        use tokio::io::AsyncWriteExt;

        let mut child = self
            .command(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|e| self.not_found(e))?;

        let stdin = child.stdin.take();
        let run = async move {
            if let Some(mut stdin) = stdin {
                stdin
                    .write_all(stdin_data)
                    .await
                    .map_err(|e| FlyctlError::StdinWrite { source: e })?;
                stdin
                    .shutdown()
                    .await
                    .map_err(|e| FlyctlError::StdinWrite { source: e })?;
            }
            child
                .wait_with_output()
                .await
                .map_err(|e| FlyctlError::Wait { source: e })
        };

        let output = tokio::time::timeout(timeout, run)
            .await
            .map_err(|e| timed_out(args, timeout, e))??;

        finish(args, output)
    }
}

fn finish(args: &[String], output: std::process::Output) -> Result<String, FlyctlError> {
    if output.status.success() {
        String::from_utf8(output.stdout).map_err(|e| FlyctlError::InvalidUtf8 { source: e })
    } else {
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();
        Err(command_failed(args, output.status, stderr))
    }
}

fn command_failed(args: &[String], status: ExitStatus, stderr: String) -> FlyctlError {
    FlyctlError::CommandFailed {
        args: args.to_vec(),
        status: status.to_string(),
        code: status.code(),
        stderr,
    }
}

fn timed_out(
    args: &[String],
    timeout: Duration,
    elapsed: tokio::time::error::Elapsed,
) -> FlyctlError {
    tracing::warn!(
        args = ?args,
        timeout_secs = timeout.as_secs(),
        error = %elapsed,
        "flyctl timed out; killing"
    );
    FlyctlError::TimedOut {
        args: args.to_vec(),
        timeout,
    }
}

//! Bounded execution of single command lines on the frontend host.

use crate::RemoteConfig;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;

/// Exit code the ssh client reserves for its own channel errors
/// (unreachable host, authentication failure). A remote command that
/// itself exits 255 is indistinguishable, which OAR commands never do.
const SSH_TRANSPORT_EXIT: i32 = 255;

/// Captured result of a completed remote invocation.
///
/// A non-zero exit code is a normal result here; what it means is
/// decided per operation by the response interpreter.
#[derive(Debug, Clone)]
pub struct ExecOutput {
    pub stdout: String,
    pub stderr: String,
    pub exit_code: i32,
}

impl ExecOutput {
    pub fn success(&self) -> bool {
        self.exit_code == 0
    }
}

#[derive(Error, Debug)]
pub enum ExecError {
    #[error("connection to {host} failed: {detail}")]
    Connection { host: String, detail: String },
    #[error("remote command timed out after {timeout:?}")]
    Timeout { timeout: Duration },
}

/// Command execution seam. The production implementation runs ssh;
/// tests substitute scripted outputs.
pub trait Executor {
    fn execute(
        &self,
        command_line: &str,
    ) -> impl Future<Output = Result<ExecOutput, ExecError>> + Send;
}

/// Executes command lines on the configured frontend via the system
/// ssh client. Every call spawns its own ssh process, so concurrent
/// invocations are independent and dropping an in-flight call kills
/// the remote invocation.
#[derive(Debug, Clone)]
pub struct SshExecutor {
    config: RemoteConfig,
}

impl SshExecutor {
    pub fn new(config: RemoteConfig) -> Self {
        SshExecutor { config }
    }

    pub fn config(&self) -> &RemoteConfig {
        &self.config
    }

    fn command(&self, command_line: &str) -> Command {
        let mut cmd = Command::new("ssh");
        cmd.arg(&self.config.hostname).arg(command_line);
        cmd
    }
}

impl Executor for SshExecutor {
    async fn execute(&self, command_line: &str) -> Result<ExecOutput, ExecError> {
        tracing::debug!(host = %self.config.hostname, command = command_line, "remote exec");
        let output = run_with_timeout(self.command(command_line), self.config.command_timeout)
            .await
            .map_err(|e| match e {
                RunError::Spawn(err) => ExecError::Connection {
                    host: self.config.hostname.clone(),
                    detail: err.to_string(),
                },
                RunError::Timeout => ExecError::Timeout {
                    timeout: self.config.command_timeout,
                },
            })?;

        if output.exit_code == SSH_TRANSPORT_EXIT {
            return Err(ExecError::Connection {
                host: self.config.hostname.clone(),
                detail: transport_detail(&output.stderr),
            });
        }

        Ok(output)
    }
}

#[derive(Debug)]
enum RunError {
    Spawn(std::io::Error),
    Timeout,
}

/// Run a prepared command to completion under a wall-clock bound.
///
/// `kill_on_drop` guarantees the child is killed when the timeout fires
/// or the caller cancels, so a hung remote command cannot outlive the
/// call that started it.
async fn run_with_timeout(mut cmd: Command, timeout: Duration) -> Result<ExecOutput, RunError> {
    cmd.stdin(Stdio::null()).kill_on_drop(true);

    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(ExecOutput {
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
            exit_code: output.status.code().unwrap_or(-1),
        }),
        Ok(Err(e)) => Err(RunError::Spawn(e)),
        Err(_) => Err(RunError::Timeout),
    }
}

/// First meaningful stderr line from the ssh client itself.
fn transport_detail(stderr: &str) -> String {
    stderr
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or("channel error")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[tokio::test]
    async fn test_run_captures_stdout() {
        let mut cmd = Command::new("echo");
        cmd.arg("hello");
        let out = run_with_timeout(cmd, Duration::from_secs(5)).await.unwrap();
        assert_eq!(out.stdout.trim(), "hello");
        assert_eq!(out.exit_code, 0);
        assert!(out.success());
    }

    #[tokio::test]
    async fn test_run_nonzero_exit_is_a_result() {
        let mut cmd = Command::new("sh");
        cmd.args(["-c", "echo oops >&2; exit 3"]);
        let out = run_with_timeout(cmd, Duration::from_secs(5)).await.unwrap();
        assert_eq!(out.exit_code, 3);
        assert_eq!(out.stderr.trim(), "oops");
        assert!(!out.success());
    }

    #[tokio::test]
    async fn test_run_spawn_failure() {
        let cmd = Command::new("nonexistent_command_12345");
        let result = run_with_timeout(cmd, Duration::from_secs(5)).await;
        assert!(matches!(result, Err(RunError::Spawn(_))));
    }

    #[tokio::test]
    async fn test_run_times_out_within_bound() {
        let mut cmd = Command::new("sleep");
        cmd.arg("30");
        let start = Instant::now();
        let result = run_with_timeout(cmd, Duration::from_millis(200)).await;
        assert!(matches!(result, Err(RunError::Timeout)));
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_transport_detail() {
        assert_eq!(
            transport_detail("\nssh: connect to host cluster port 22: refused\n"),
            "ssh: connect to host cluster port 22: refused"
        );
        assert_eq!(transport_detail(""), "channel error");
    }
}

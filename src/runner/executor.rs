//! External command execution under a bounded timeout and a fixed
//! environment overlay.
//!
//! Both the setup and the measured command run through `sh -c` with the
//! overlay as their entire environment. The setup command inherits the
//! parent's stdio. The measured command's output is echoed to the parent's
//! stdout/stderr line by line as it arrives *and* accumulated as the
//! captured text, so the invoking console sees live output while the
//! synthesizer still gets the full transcript.

use std::process::{ExitStatus, Stdio};
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::error::ExecError;

use super::config::ExecEnv;

/// Exit code shells report when the invoked program cannot be located.
const SHELL_NOT_FOUND_CODE: i32 = 127;

/// Timing-annotated result of a measured command run.
#[derive(Debug)]
pub struct MeasuredRun {
    /// Captured combined output on success, structured fault otherwise.
    pub result: Result<String, ExecError>,
    /// Timestamp immediately before spawn.
    pub started_at: DateTime<Utc>,
    /// Timestamp when the command exited or the fault was detected.
    pub finished_at: DateTime<Utc>,
}

/// Runs external commands with a per-command timeout budget.
pub struct CommandExecutor {
    env: ExecEnv,
    timeout: Duration,
}

impl CommandExecutor {
    /// Creates an executor with the given environment overlay and timeout.
    pub fn new(env: ExecEnv, timeout: Duration) -> Self {
        Self { env, timeout }
    }

    /// Runs the setup command with inherited stdio and no capture.
    ///
    /// Any fault here propagates to the caller; setup failures are treated
    /// as environment defects outside the scored contract.
    pub async fn run_setup(&self, command: &str) -> Result<(), ExecError> {
        info!("Running setup command: {}", command);

        let mut cmd = self.shell_command(command);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let mut child = cmd.spawn().map_err(|e| spawn_fault(e, command))?;

        match tokio::time::timeout(self.timeout, child.wait()).await {
            Ok(Ok(status)) if status.success() => Ok(()),
            Ok(Ok(status)) => Err(exit_fault(status, command)),
            Ok(Err(e)) => Err(ExecError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                Err(ExecError::Timeout {
                    timeout: self.timeout,
                })
            }
        }
    }

    /// Runs the measured command, returning the captured text and the
    /// timestamps bounding the run.
    pub async fn run_measured(&self, command: &str) -> MeasuredRun {
        let started_at = Utc::now();
        let result = self.capture(command).await;
        let finished_at = Utc::now();
        MeasuredRun {
            result,
            started_at,
            finished_at,
        }
    }

    async fn capture(&self, command: &str) -> Result<String, ExecError> {
        let mut cmd = self.shell_command(command);
        cmd.stdin(Stdio::inherit())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| spawn_fault(e, command))?;

        let stdout = child.stdout.take().expect("stdout not captured");
        let stderr = child.stderr.take().expect("stderr not captured");

        let mut stdout_lines = BufReader::new(stdout).lines();
        let mut stderr_lines = BufReader::new(stderr).lines();

        let mut captured = String::new();

        // Drain both streams before waiting so the child cannot block on a
        // full pipe. Lines are echoed as they arrive and appended to the
        // captured transcript in arrival order.
        let waited = tokio::time::timeout(self.timeout, async {
            let mut stdout_done = false;
            let mut stderr_done = false;

            while !(stdout_done && stderr_done) {
                tokio::select! {
                    line = stdout_lines.next_line(), if !stdout_done => match line {
                        Ok(Some(l)) => {
                            println!("{}", l);
                            captured.push_str(&l);
                            captured.push('\n');
                        }
                        Ok(None) => stdout_done = true,
                        Err(e) => {
                            warn!("Error reading stdout: {}", e);
                            stdout_done = true;
                        }
                    },
                    line = stderr_lines.next_line(), if !stderr_done => match line {
                        Ok(Some(l)) => {
                            eprintln!("{}", l);
                            captured.push_str(&l);
                            captured.push('\n');
                        }
                        Ok(None) => stderr_done = true,
                        Err(e) => {
                            warn!("Error reading stderr: {}", e);
                            stderr_done = true;
                        }
                    },
                }
            }

            child.wait().await
        });

        match waited.await {
            Ok(Ok(status)) if status.success() => {
                debug!("Command exited cleanly ({} bytes captured)", captured.len());
                Ok(captured)
            }
            Ok(Ok(status)) => Err(exit_fault(status, command)),
            Ok(Err(e)) => Err(ExecError::Io(e)),
            Err(_) => {
                let _ = child.kill().await;
                Err(ExecError::Timeout {
                    timeout: self.timeout,
                })
            }
        }
    }

    fn shell_command(&self, command: &str) -> Command {
        let mut cmd = Command::new("sh");
        cmd.arg("-c").arg(command);
        // The overlay is the entire child environment; ambient variables
        // not in it are not inherited.
        cmd.env_clear();
        for (key, value) in self.env.vars() {
            cmd.env(key, value);
        }
        cmd
    }
}

/// Maps a spawn failure to a structured fault.
fn spawn_fault(error: std::io::Error, command: &str) -> ExecError {
    if error.kind() == std::io::ErrorKind::NotFound {
        ExecError::NotFound {
            command: command.to_string(),
        }
    } else {
        ExecError::Io(error)
    }
}

/// Maps a failing exit status to a structured fault. Exit code 127 is the
/// shell's marker for an unresolvable program name.
fn exit_fault(status: ExitStatus, command: &str) -> ExecError {
    let code = status.code().unwrap_or(-1);
    if code == SHELL_NOT_FOUND_CODE {
        ExecError::NotFound {
            command: command.to_string(),
        }
    } else {
        ExecError::NonZeroExit { code }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_executor(timeout: Duration) -> CommandExecutor {
        CommandExecutor::new(ExecEnv::from_ambient(), timeout)
    }

    #[tokio::test]
    async fn test_captures_stdout() {
        let executor = test_executor(Duration::from_secs(10));
        let run = executor.run_measured("echo hello").await;
        assert_eq!(run.result.unwrap(), "hello\n");
        assert!(run.finished_at >= run.started_at);
    }

    #[tokio::test]
    async fn test_captures_stderr_too() {
        let executor = test_executor(Duration::from_secs(10));
        let run = executor.run_measured("echo oops >&2").await;
        assert_eq!(run.result.unwrap(), "oops\n");
    }

    #[tokio::test]
    async fn test_non_zero_exit_is_structured() {
        let executor = test_executor(Duration::from_secs(10));
        let run = executor.run_measured("exit 3").await;
        match run.result {
            Err(ExecError::NonZeroExit { code }) => assert_eq!(code, 3),
            other => panic!("expected NonZeroExit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_missing_executable_is_not_found() {
        let executor = test_executor(Duration::from_secs(10));
        let run = executor.run_measured("/nonexistent/bin").await;
        match run.result {
            Err(ExecError::NotFound { command }) => {
                assert_eq!(command, "/nonexistent/bin");
            }
            other => panic!("expected NotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_timeout_kills_command() {
        let executor = test_executor(Duration::from_millis(100));
        let run = executor.run_measured("sleep 5").await;
        assert!(matches!(run.result, Err(ExecError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_setup_success_and_failure() {
        let executor = test_executor(Duration::from_secs(10));
        assert!(executor.run_setup("true").await.is_ok());
        assert!(executor.run_setup("false").await.is_err());
    }

    #[tokio::test]
    async fn test_env_overlay_is_exclusive() {
        std::env::set_var("GRADER_TEST_LEAK", "1");
        let executor = test_executor(Duration::from_secs(10));
        let run = executor
            .run_measured("echo FORCE_COLOR=$FORCE_COLOR LEAK=$GRADER_TEST_LEAK")
            .await;
        assert_eq!(run.result.unwrap(), "FORCE_COLOR=true LEAK=\n");
        std::env::remove_var("GRADER_TEST_LEAK");
    }
}

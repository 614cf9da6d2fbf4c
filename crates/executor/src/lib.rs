//! Child-process execution for the workspace admin CLI.
//!
//! Runs only argv vectors that already passed the policy guard. Every run
//! carries a hard wall-clock timeout; stdout and stderr are captured
//! separately, and output is clamped to a byte ceiling with a visible
//! marker.

use std::process::Stdio;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{info, warn};

const TRUNCATION_MARKER: &str = "\n[truncated]";

#[derive(Error, Debug)]
pub enum ExecutorError {
    #[error("failed to spawn admin CLI: {0}")]
    Spawn(String),

    #[error("admin CLI exited with an error: {error}")]
    CommandFailed {
        error: String,
        /// Stdout captured before the failure, if any.
        partial_stdout: Option<String>,
    },

    #[error("admin CLI timed out after {0} ms")]
    Timeout(u64),
}

pub struct AdminCliExecutor {
    program: String,
    timeout: Duration,
    max_output_bytes: usize,
}

impl AdminCliExecutor {
    pub fn new(program: &str, timeout_ms: u64, max_output_bytes: usize) -> Self {
        Self {
            program: program.to_string(),
            timeout: Duration::from_millis(timeout_ms),
            max_output_bytes,
        }
    }

    /// Runs the CLI with `args`, returning its text output. Stdout is
    /// preferred; the wrapped CLI writes progress to stderr even on
    /// success, so stderr is the fallback when stdout is empty.
    pub async fn run(&self, args: &[String]) -> Result<String, ExecutorError> {
        info!(program = %self.program, ?args, "executing admin CLI command");

        let exec = async {
            let mut cmd = Command::new(&self.program);
            cmd.args(args)
                .env_clear()
                .env("PATH", "/usr/bin:/bin")
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true);

            // Own process group so a timeout kill reaps any children too.
            #[cfg(unix)]
            {
                unsafe {
                    cmd.pre_exec(|| {
                        libc::setsid();
                        Ok(())
                    });
                }
            }

            cmd.output().await
        };

        let timeout_ms = self.timeout.as_millis() as u64;
        let output = timeout(self.timeout, exec)
            .await
            .map_err(|_| {
                warn!(program = %self.program, ?args, timeout_ms, "admin CLI timed out");
                ExecutorError::Timeout(timeout_ms)
            })?
            .map_err(|e| ExecutorError::Spawn(e.to_string()))?;

        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        if !output.status.success() {
            warn!(
                program = %self.program,
                ?args,
                code = output.status.code(),
                "admin CLI exited non-zero"
            );
            let partial_stdout = if stdout.trim().is_empty() {
                None
            } else {
                Some(self.clamp(stdout))
            };
            return Err(ExecutorError::CommandFailed {
                error: if stderr.trim().is_empty() {
                    format!("exit code {:?}", output.status.code())
                } else {
                    self.clamp(stderr)
                },
                partial_stdout,
            });
        }

        let text = if stdout.trim().is_empty() { stderr } else { stdout };
        Ok(self.clamp(text))
    }

    fn clamp(&self, text: String) -> String {
        truncate_output(text, self.max_output_bytes)
    }
}

/// Clamps `text` to `max_bytes` (on a char boundary) and appends the
/// truncation marker when anything was cut.
fn truncate_output(text: String, max_bytes: usize) -> String {
    if text.len() <= max_bytes {
        return text;
    }
    let mut cut = max_bytes;
    while cut > 0 && !text.is_char_boundary(cut) {
        cut -= 1;
    }
    let mut out = text[..cut].to_string();
    out.push_str(TRUNCATION_MARKER);
    out
}

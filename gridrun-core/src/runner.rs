//! External job execution with live output streaming.
//!
//! Runs one training job as a child process, merges stdout and stderr
//! into a single line stream, forwards every line to the output sink as
//! it arrives, and measures wall-clock runtime. The sweep blocks on each
//! job until it exits; runs never overlap.

use async_trait::async_trait;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, Command};
use tokio::sync::mpsc;
use tracing::{debug, warn};

use crate::command::JobCommand;
use crate::error::RunError;
use crate::sweep_log::OutputSink;
use crate::types::RunOutput;

/// Launches one external job and streams its output.
///
/// The orchestrator only depends on this seam; tests drive it with stub
/// runners that never touch a real process.
#[async_trait]
pub trait JobRunner: Send + Sync {
    /// Run the command to completion, forwarding every merged output line
    /// to the sink. A failed launch is an error; a job that starts and
    /// exits non-zero is reported through [`RunOutput::exit_code`].
    async fn run(
        &self,
        command: &JobCommand,
        sink: &mut dyn OutputSink,
    ) -> Result<RunOutput, RunError>;
}

/// Runs jobs as real child processes with piped, merged output.
pub struct ProcessRunner {
    timeout: Option<Duration>,
}

impl ProcessRunner {
    /// A runner that waits for each job indefinitely.
    pub fn new() -> Self {
        Self { timeout: None }
    }

    /// A runner that kills any job still running after `timeout`. A
    /// killed job yields whatever output arrived, the elapsed duration,
    /// and exit code -1.
    pub fn with_timeout(timeout: Duration) -> Self {
        Self {
            timeout: Some(timeout),
        }
    }
}

impl Default for ProcessRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl JobRunner for ProcessRunner {
    async fn run(
        &self,
        command: &JobCommand,
        sink: &mut dyn OutputSink,
    ) -> Result<RunOutput, RunError> {
        debug!(command = %command, "Launching job");
        let started = Instant::now();

        // kill_on_drop covers every early return below: a run aborted by
        // a sink error must not leave the job running unsupervised.
        let mut child = Command::new(&command.program)
            .args(&command.args)
            .stdout(std::process::Stdio::piped())
            .stderr(std::process::Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| RunError::Spawn {
                program: command.program.clone(),
                message: e.to_string(),
            })?;

        let stdout_pipe = child.stdout.take();
        let stderr_pipe = child.stderr.take();

        // Both pipes feed one channel; the receiver loop below sees lines
        // in arrival order, which is the merge the log records.
        let (tx, mut rx) = mpsc::unbounded_channel();
        let tx_stdout = tx.clone();

        let stdout_task = tokio::spawn(async move {
            if let Some(pipe) = stdout_pipe {
                let reader = BufReader::new(pipe);
                let mut line_stream = reader.lines();
                while let Ok(Some(line)) = line_stream.next_line().await {
                    if tx_stdout.send(line).is_err() {
                        break;
                    }
                }
            }
        });
        let stderr_task = tokio::spawn(async move {
            if let Some(pipe) = stderr_pipe {
                let reader = BufReader::new(pipe);
                let mut line_stream = reader.lines();
                while let Ok(Some(line)) = line_stream.next_line().await {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
            }
        });

        let mut lines = Vec::new();
        let exit_code = match self.timeout {
            None => stream_to_exit(&mut child, &mut rx, &mut lines, sink)
                .await?
                .unwrap_or(-1),
            Some(limit) => {
                let supervised =
                    tokio::time::timeout(limit, stream_to_exit(&mut child, &mut rx, &mut lines, sink));
                match supervised.await {
                    Ok(finished) => finished?.unwrap_or(-1),
                    Err(_) => {
                        warn!(
                            program = %command.program,
                            timeout_secs = limit.as_secs(),
                            "Job exceeded timeout, killing"
                        );
                        let _ = child.kill().await;
                        // Record whatever lines were already buffered. The
                        // readers are aborted rather than drained to EOF: a
                        // grandchild of the killed job can keep the pipes
                        // open indefinitely.
                        while let Ok(line) = rx.try_recv() {
                            sink.record_line(&line)?;
                            lines.push(line);
                        }
                        stdout_task.abort();
                        stderr_task.abort();
                        -1
                    }
                }
            }
        };

        let duration_secs = round2(started.elapsed().as_secs_f64());

        let _ = stdout_task.await;
        let _ = stderr_task.await;

        if exit_code != 0 {
            warn!(program = %command.program, exit_code, "Job exited with non-zero status");
        }

        Ok(RunOutput {
            captured: lines.join("\n"),
            duration_secs,
            exit_code,
        })
    }
}

/// Drain merged output lines until both pipes close, then reap the child.
/// Returns the exit code if the job exited normally.
async fn stream_to_exit(
    child: &mut Child,
    rx: &mut mpsc::UnboundedReceiver<String>,
    lines: &mut Vec<String>,
    sink: &mut dyn OutputSink,
) -> Result<Option<i32>, RunError> {
    while let Some(line) = rx.recv().await {
        sink.record_line(&line)?;
        lines.push(line);
    }
    let status = child.wait().await.map_err(|e| RunError::Wait {
        message: e.to_string(),
    })?;
    Ok(status.code())
}

/// Round to two decimal places, matching the precision of the reported
/// runtimes.
fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

//! Engine process launching and output collection
//!
//! The engine writes diagnostics and a single delimited JSON payload to
//! stdout and free-form diagnostics to stderr. Both pipes are drained
//! concurrently with the process itself, so a chatty engine can never fill
//! a pipe buffer and stall.

use std::ffi::OsString;
use std::process::Stdio;
use std::time::Duration;

use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::Command;
use tracing::{error, info};

use broll_common::{EngineError, Result};

/// Token shared by both payload delimiters. Stdout lines containing it are
/// kept out of the diagnostic log so the raw payload is not leaked there a
/// second time.
const PAYLOAD_MARKER_TOKEN: &str = "JSON_PLAN";

/// Terminal state of one engine run
#[derive(Debug)]
pub struct ProcessOutcome {
    /// Exit code; `None` when the process was killed by a signal
    pub exit_code: Option<i32>,
    /// Accumulated stdout text
    pub stdout: String,
    /// Accumulated stderr text
    pub stderr: String,
}

impl ProcessOutcome {
    /// Whether the engine terminated cleanly
    #[must_use]
    pub fn success(&self) -> bool {
        self.exit_code == Some(0)
    }
}

/// Spawn the engine and collect its output until it terminates.
///
/// Arguments are passed as a discrete vector; no shell is involved. With a
/// deadline set, an overrunning child is killed and reaped and the call
/// fails with [`EngineError::Timeout`]. The outcome is only reported once
/// both pipes are fully drained, so every byte the engine wrote up to
/// termination reaches the extractor.
pub async fn launch(
    executable: &str,
    args: Vec<OsString>,
    timeout: Option<Duration>,
) -> Result<ProcessOutcome> {
    let mut child = Command::new(executable)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true)
        .spawn()
        .map_err(|e| EngineError::Spawn(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| EngineError::Io(std::io::Error::other("stdout pipe not available")))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| EngineError::Io(std::io::Error::other("stderr pipe not available")))?;

    // One task per pipe; each task is the only writer of its accumulator.
    let stdout_task = tokio::spawn(async move {
        let mut lines = BufReader::new(stdout).lines();
        let mut collected = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            if !line.contains(PAYLOAD_MARKER_TOKEN) {
                info!("[engine stdout]: {}", line.trim_end());
            }
            collected.push_str(&line);
            collected.push('\n');
        }
        collected
    });
    let stderr_task = tokio::spawn(async move {
        let mut lines = BufReader::new(stderr).lines();
        let mut collected = String::new();
        while let Ok(Some(line)) = lines.next_line().await {
            error!("[engine stderr]: {}", line.trim_end());
            collected.push_str(&line);
            collected.push('\n');
        }
        collected
    });
    let stdout_abort = stdout_task.abort_handle();
    let stderr_abort = stderr_task.abort_handle();

    // Wait for exit, then drain both pipes to EOF before reporting.
    let collect = async {
        let status = child.wait().await?;
        let stdout_text = stdout_task.await.map_err(std::io::Error::other)?;
        let stderr_text = stderr_task.await.map_err(std::io::Error::other)?;
        Ok::<ProcessOutcome, EngineError>(ProcessOutcome {
            exit_code: status.code(),
            stdout: stdout_text,
            stderr: stderr_text,
        })
    };

    match timeout {
        Some(limit) => {
            let collected = tokio::time::timeout(limit, collect).await;
            match collected {
                Ok(outcome) => outcome,
                Err(_) => {
                    let _ = child.start_kill();
                    let _ = child.wait().await;
                    // The engine may leave grandchildren holding the pipes
                    // open; stop the drain tasks rather than waiting for
                    // an EOF that may never come. Everything drained so
                    // far has already been logged live.
                    stdout_abort.abort();
                    stderr_abort.abort();
                    Err(EngineError::Timeout(limit.as_secs()))
                }
            }
        }
        None => collect.await,
    }
}

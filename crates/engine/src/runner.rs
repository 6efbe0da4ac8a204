//! Engine subprocess supervision with live stdio streaming.

use std::path::Path;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;

use tokio::io::{AsyncBufReadExt, AsyncRead, BufReader};
use tokio::sync::Mutex;

use crate::invocation::EngineSettings;

/// Error type for engine supervision.
///
/// Render failures are NOT errors at this level: a non-zero exit comes back
/// as a normal [`RenderRun`] and is classified by the pipeline.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("engine failed to start: {0}")]
    Spawn(std::io::Error),

    #[error("I/O error while supervising engine: {0}")]
    Io(#[from] std::io::Error),
}

/// Outcome of one engine invocation: how the child terminated, plus its
/// combined stdout/stderr retained for diagnostics.
#[derive(Debug)]
pub struct RenderRun {
    pub status: ExitStatus,
    pub log: String,
}

impl RenderRun {
    /// Whether the child exited with status code 0.
    pub fn succeeded(&self) -> bool {
        self.status.success()
    }

    /// Human-readable description of how the child terminated.
    ///
    /// Distinguishes a normal exit code from signal termination on Unix;
    /// both collapse to non-success for classification.
    pub fn exit_label(&self) -> String {
        if let Some(code) = self.status.code() {
            return format!("exit code {code}");
        }
        #[cfg(unix)]
        {
            use std::os::unix::process::ExitStatusExt;
            if let Some(signal) = self.status.signal() {
                return format!("terminated by signal {signal}");
            }
        }
        "terminated abnormally".to_string()
    }

    /// Last `max_chars` characters of the retained log, trimmed.
    pub fn log_tail(&self, max_chars: usize) -> String {
        let trimmed = self.log.trim_end();
        let total = trimmed.chars().count();
        if total <= max_chars {
            trimmed.to_string()
        } else {
            trimmed.chars().skip(total - max_chars).collect()
        }
    }
}

/// Run the engine for one job.
///
/// The child's stdout and stderr are forwarded line by line into the host
/// logs as they arrive, and simultaneously retained in `RenderRun::log`.
/// Blocks until the child terminates; there is no render timeout.
pub async fn run(
    settings: &EngineSettings,
    input: &Path,
    template: &Path,
    output: &Path,
) -> Result<RenderRun, EngineError> {
    let mut cmd = settings.command(input, template, output);
    cmd.stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped());

    tracing::info!(
        engine = %settings.python_bin,
        script = %settings.script,
        cwd = %settings.root.display(),
        "Starting render engine",
    );

    let mut child = cmd.spawn().map_err(EngineError::Spawn)?;

    let log = Arc::new(Mutex::new(String::new()));
    let stdout_pump = child
        .stdout
        .take()
        .map(|pipe| tokio::spawn(pump_lines(pipe, "stdout", Arc::clone(&log))));
    let stderr_pump = child
        .stderr
        .take()
        .map(|pipe| tokio::spawn(pump_lines(pipe, "stderr", Arc::clone(&log))));

    let status = child.wait().await?;

    // Drain both pipes fully before reporting.
    if let Some(pump) = stdout_pump {
        let _ = pump.await;
    }
    if let Some(pump) = stderr_pump {
        let _ = pump.await;
    }

    let log = log.lock().await.clone();
    Ok(RenderRun { status, log })
}

/// Forward one stdio pipe into the host logs line by line, retaining each
/// line in the shared buffer.
async fn pump_lines<R>(pipe: R, stream: &'static str, sink: Arc<Mutex<String>>)
where
    R: AsyncRead + Unpin,
{
    let mut lines = BufReader::new(pipe).lines();
    loop {
        match lines.next_line().await {
            Ok(Some(line)) => {
                tracing::info!(stream, "[engine] {line}");
                let mut buf = sink.lock().await;
                buf.push_str(&line);
                buf.push('\n');
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(stream, error = %e, "Engine stdio read error");
                break;
            }
        }
    }
}

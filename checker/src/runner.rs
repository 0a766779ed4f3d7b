//! Asynchronous check runs.
//!
//! A run owns its child process end to end: executable resolution, spawn,
//! stdout capture, and a bounded-grace exit wait. The terminal event comes
//! back on a channel owned by the run handle, and the handle going away is
//! cancellation: the task is aborted, the child is killed via
//! `kill_on_drop`, and the event receiver disappears with the handle, so a
//! superseded run can never be observed after the fact.

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::AsyncReadExt;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use sidelight_types::CheckerConfig;

use crate::command;

/// A run emits exactly one terminal event; the headroom is for cheapness,
/// not correctness.
const EVENT_CHANNEL_CAPACITY: usize = 8;

/// Terminal events of one check run.
#[derive(Debug)]
pub enum CheckEvent {
    /// The checker ran to completion; `stdout` is everything it printed.
    /// The exit status is deliberately not part of the event: checkers
    /// exit nonzero whenever findings exist, so status carries no signal
    /// the output does not.
    Completed { stdout: String },
    /// The configured executable could not be resolved on `PATH`.
    CheckerMissing { command: String },
    /// Spawning or capturing failed.
    Failed { message: String },
}

/// Handle to one in-flight check.
///
/// Holding the handle is proof the run is wanted; dropping it cancels the
/// run. Poll with [`try_next_event`](Self::try_next_event) from the host's
/// event loop.
#[derive(Debug)]
pub struct RunningCheck {
    file: PathBuf,
    event_rx: mpsc::Receiver<CheckEvent>,
    task: JoinHandle<()>,
}

impl RunningCheck {
    /// Start a check for `file`, with `project_root` as the working
    /// directory.
    ///
    /// Never blocks and never fails: every failure mode is delivered as a
    /// [`CheckEvent`] through the returned handle. Must be called from
    /// within a tokio runtime.
    #[must_use]
    pub fn start(config: &CheckerConfig, file: &Path, project_root: &Path) -> Self {
        let (event_tx, event_rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
        let config = config.clone();
        let file = file.to_path_buf();
        let root = project_root.to_path_buf();

        let task_file = file.clone();
        let task = tokio::spawn(async move {
            let event = run_check(&config, &task_file, &root).await;
            // A closed channel means the run was cancelled mid-send.
            let _ = event_tx.send(event).await;
        });

        Self {
            file,
            event_rx,
            task,
        }
    }

    /// The file this run was started for.
    #[must_use]
    pub fn file(&self) -> &Path {
        &self.file
    }

    /// Non-blocking poll for the run's terminal event.
    pub fn try_next_event(&mut self) -> Option<CheckEvent> {
        self.event_rx.try_recv().ok()
    }
}

impl Drop for RunningCheck {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run_check(config: &CheckerConfig, file: &Path, root: &Path) -> CheckEvent {
    let program = match which::which(config.command()) {
        Ok(program) => program,
        Err(e) => {
            tracing::debug!("Checker '{}' not resolvable: {e}", config.command());
            return CheckEvent::CheckerMissing {
                command: config.command().to_string(),
            };
        }
    };

    match capture_output(&program, config, file, root).await {
        Ok(stdout) => CheckEvent::Completed { stdout },
        Err(e) => CheckEvent::Failed {
            message: format!("{e:#}"),
        },
    }
}

/// Spawn the checker and read its stdout to EOF.
///
/// The exit status is awaited in grace-sized slices and re-polled for as
/// long as it takes; a checker that lingers after closing stdout is never
/// escalated to a kill while the run is still wanted. Cancellation is the
/// caller dropping the handle.
async fn capture_output(
    program: &Path,
    config: &CheckerConfig,
    file: &Path,
    root: &Path,
) -> Result<String> {
    let mut cmd = command::checker_command(program, config, file, root);
    let mut child = cmd
        .spawn()
        .with_context(|| format!("spawning {}", config.command()))?;

    let mut stdout = child.stdout.take().context("no stdout from child")?;
    let mut raw = Vec::new();
    stdout
        .read_to_end(&mut raw)
        .await
        .context("reading checker output")?;

    let grace = Duration::from_millis(config.exit_grace_ms().max(1));
    loop {
        match tokio::time::timeout(grace, child.wait()).await {
            Ok(Ok(status)) => {
                tracing::debug!(?status, "Checker exited");
                break;
            }
            Ok(Err(e)) => return Err(e).context("waiting for checker exit"),
            Err(_) => {
                tracing::trace!("Checker still running after closing stdout");
            }
        }
    }

    Ok(String::from_utf8_lossy(&raw).into_owned())
}

//! Per-job liveness reporting.
//!
//! A [`Heartbeat`] is a supervised background task: it reports for one job at
//! a fixed interval until the owning executor cancels it, and the executor
//! always awaits the task before returning.

use std::sync::Arc;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio_util::sync::{CancellationToken, DropGuard};
use tracing::{debug, error, info};

use crate::api::StatusApi;

/// Handle to a running heartbeat task.
///
/// Dropping the handle cancels the task, so an `execute` future that is
/// aborted or unwinds never leaves a heartbeat behind.
pub struct Heartbeat {
    cancel: DropGuard,
    task: JoinHandle<()>,
}

impl Heartbeat {
    /// Start reporting liveness for `job_id` every `interval`.
    pub fn spawn(api: Arc<dyn StatusApi>, job_id: &str, interval: Duration) -> Self {
        let cancel = CancellationToken::new();
        let task = tokio::spawn(run(api, job_id.to_string(), interval, cancel.clone()));
        Self {
            cancel: cancel.drop_guard(),
            task,
        }
    }

    /// Cancel the task and wait until it has exited.
    pub async fn stop(self) {
        let Self { cancel, task } = self;
        drop(cancel);
        match task.await {
            Ok(()) => {}
            Err(e) if e.is_cancelled() => {}
            Err(e) => error!(error = %e, "heartbeat task panicked"),
        }
    }
}

/// Report, wait, repeat until `cancel` fires.
///
/// Report failures are logged and the loop keeps its schedule. Cancellation
/// is observed both while a report is in flight and while waiting.
pub async fn run(
    api: Arc<dyn StatusApi>,
    job_id: String,
    interval: Duration,
    cancel: CancellationToken,
) {
    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            result = api.update_job_heartbeat(&job_id) => match result {
                Ok(()) => debug!(job_id = %job_id, "heartbeat reported"),
                Err(e) => error!(job_id = %job_id, error = %e, "failed to report heartbeat"),
            },
        }

        tokio::select! {
            biased;
            _ = cancel.cancelled() => break,
            _ = tokio::time::sleep(interval) => {}
        }
    }
    info!(job_id = %job_id, "heartbeat cancelled");
}

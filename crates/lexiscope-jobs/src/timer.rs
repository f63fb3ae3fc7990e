//! One-shot delayed refresh.
//!
//! After an analysis job starts, its results are reloaded once after a fixed
//! delay. The delay is a best-effort guess at completion: nothing here waits
//! for the job to actually finish, and callers may reload manually at any
//! time.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info};

use lexiscope_core::JobKind;

/// A scheduled refresh.
///
/// Dropping the timer detaches it: the refresh still runs. Use
/// [`RefreshTimer::cancel`] to prevent it.
#[derive(Debug)]
pub struct RefreshTimer<T> {
    kind: JobKind,
    delay: Duration,
    task: JoinHandle<T>,
}

impl<T: Send + 'static> RefreshTimer<T> {
    /// Run `refresh` once after `delay`.
    pub fn schedule<F, Fut>(kind: JobKind, delay: Duration, refresh: F) -> Self
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = T> + Send + 'static,
    {
        debug!(
            subsystem = "jobs",
            component = "timer",
            job_kind = %kind,
            delay_ms = delay.as_millis() as u64,
            "Refresh scheduled"
        );
        let task = tokio::spawn(async move {
            sleep(delay).await;
            info!(
                subsystem = "jobs",
                component = "timer",
                job_kind = %kind,
                "Delayed refresh firing"
            );
            refresh().await
        });
        Self { kind, delay, task }
    }

    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Whether the refresh has run (or was cancelled).
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }

    /// Cancel the refresh if it has not fired yet.
    pub fn cancel(self) {
        debug!(job_kind = %self.kind, "Refresh cancelled");
        self.task.abort();
    }

    /// Wait for the refresh to run and return its output.
    ///
    /// Returns `None` if the refresh was aborted or panicked.
    pub async fn wait(self) -> Option<T> {
        self.task.await.ok()
    }
}

//! Cancellable periodic status poller.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};
use tracing::{debug, info, warn};

use lexiscope_core::JobKind;

use crate::tracker::JobTracker;

/// Handle for a running status poll.
///
/// Cancelling or dropping the handle stops the poll. A response already in
/// flight at that point is discarded.
pub struct PollHandle {
    kind: JobKind,
    epoch: u64,
    tracker: JobTracker,
    shutdown_tx: mpsc::Sender<()>,
    task: Option<JoinHandle<()>>,
}

impl PollHandle {
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    /// Whether the poll task is still running.
    pub fn is_active(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }

    /// Stop polling.
    pub fn cancel(self) {
        drop(self);
    }

    /// Stop polling and wait for the poll task to exit.
    pub async fn shutdown(mut self) {
        self.stop();
        if let Some(task) = self.task.take() {
            if let Err(e) = task.await {
                warn!(job_kind = %self.kind, error = ?e, "Status poller task failed");
            }
        }
    }

    fn stop(&self) {
        // Invalidate first so nothing is applied between here and loop exit.
        self.tracker.end_watch(self.kind, self.epoch);
        let _ = self.shutdown_tx.try_send(());
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.stop();
    }
}

pub(crate) fn spawn(tracker: JobTracker, kind: JobKind, every: Duration, epoch: u64) -> PollHandle {
    let (shutdown_tx, mut shutdown_rx) = mpsc::channel(1);
    let poller = tracker.clone();

    let task = tokio::spawn(async move {
        run(poller, kind, every, epoch, &mut shutdown_rx).await;
    });

    PollHandle {
        kind,
        epoch,
        tracker,
        shutdown_tx,
        task: Some(task),
    }
}

async fn run(
    tracker: JobTracker,
    kind: JobKind,
    every: Duration,
    epoch: u64,
    shutdown_rx: &mut mpsc::Receiver<()>,
) {
    info!(
        subsystem = "jobs",
        component = "poller",
        job_kind = %kind,
        poll_interval_ms = every.as_millis() as u64,
        "Status poller started"
    );

    let mut ticker = interval(every);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            biased;
            _ = shutdown_rx.recv() => break,
            result = tracker.api().job_status(kind) => result,
        };

        match result {
            Ok(status) => {
                if !tracker.apply_polled(kind, epoch, status) {
                    debug!(job_kind = %kind, epoch, "Dropped stale status response");
                    break;
                }
            }
            Err(e) => {
                warn!(
                    job_kind = %kind,
                    error = %e,
                    "Status poll failed, keeping last known status"
                );
            }
        }
    }

    info!(subsystem = "jobs", component = "poller", job_kind = %kind, "Status poller stopped");
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use lexiscope_core::mock::{MockAnalysisApi, MockEndpoint, MockFailure};
    use lexiscope_core::{JobState, JobStatus};
    use tokio::time::sleep;

    use super::*;
    use crate::tracker::TrackerEvent;

    const EVERY: Duration = Duration::from_millis(3000);

    fn running(kind: JobKind) -> JobStatus {
        JobStatus {
            kind,
            running: true,
            completed: false,
            error: None,
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_tracks_status_over_time() {
        let api = MockAnalysisApi::new();
        let tracker = JobTracker::new(Arc::new(api.clone()));
        let handle = tracker.watch(JobKind::Scraping, EVERY);

        sleep(Duration::from_millis(100)).await;
        assert_eq!(api.call_count(&MockEndpoint::Status(JobKind::Scraping)), 1);

        api.set_status(running(JobKind::Scraping));
        sleep(EVERY).await;
        assert_eq!(tracker.status(JobKind::Scraping).state(), JobState::Running);

        api.set_status(JobStatus {
            kind: JobKind::Scraping,
            running: false,
            completed: true,
            error: None,
        });
        sleep(EVERY).await;
        assert_eq!(
            tracker.status(JobKind::Scraping).state(),
            JobState::Completed
        );
        assert_eq!(api.call_count(&MockEndpoint::Status(JobKind::Scraping)), 3);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_stops_polling() {
        let api = MockAnalysisApi::new();
        let tracker = JobTracker::new(Arc::new(api.clone()));
        let handle = tracker.watch(JobKind::Scraping, EVERY);

        sleep(Duration::from_millis(100)).await;
        handle.cancel();
        sleep(EVERY * 5).await;

        assert_eq!(api.call_count(&MockEndpoint::Status(JobKind::Scraping)), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_response_after_cancel_is_dropped() {
        let api = MockAnalysisApi::new();
        let tracker = JobTracker::new(Arc::new(api.clone()));
        let gate = api.hold(MockEndpoint::Status(JobKind::Scraping));

        let handle = tracker.watch(JobKind::Scraping, EVERY);
        gate.entered().await;

        // Tear down while the first poll is in flight, then let it resolve
        // with a status that would otherwise change state.
        handle.cancel();
        api.set_status(running(JobKind::Scraping));
        gate.release();
        sleep(EVERY * 3).await;

        assert_eq!(tracker.status(JobKind::Scraping).state(), JobState::Idle);
        assert_eq!(api.call_count(&MockEndpoint::Status(JobKind::Scraping)), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_superseded_watch_does_not_apply() {
        let api = MockAnalysisApi::new();
        let tracker = JobTracker::new(Arc::new(api.clone()));
        let gate = api.hold(MockEndpoint::Status(JobKind::Scraping));

        let first = tracker.watch(JobKind::Scraping, EVERY);
        gate.entered().await;
        let second = tracker.watch(JobKind::Scraping, EVERY);
        sleep(Duration::from_millis(100)).await;

        // The first poller's response resolves after it was superseded.
        api.set_status(running(JobKind::Scraping));
        gate.release();
        sleep(Duration::from_millis(100)).await;
        assert!(!first.is_active());

        // Only the current poller moves state.
        assert_eq!(tracker.status(JobKind::Scraping).state(), JobState::Idle);
        sleep(EVERY).await;
        assert_eq!(tracker.status(JobKind::Scraping).state(), JobState::Running);

        drop(first);
        assert!(second.is_active());
        second.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_poll_failure_keeps_polling() {
        let api = MockAnalysisApi::new().with_failure(
            MockEndpoint::Status(JobKind::Scraping),
            MockFailure::request("connection refused"),
        );
        let tracker = JobTracker::new(Arc::new(api.clone()));
        let handle = tracker.watch(JobKind::Scraping, EVERY);

        sleep(EVERY + Duration::from_millis(100)).await;
        assert_eq!(api.call_count(&MockEndpoint::Status(JobKind::Scraping)), 2);
        assert_eq!(tracker.status(JobKind::Scraping).state(), JobState::Idle);

        api.clear_failure(&MockEndpoint::Status(JobKind::Scraping));
        api.set_status(running(JobKind::Scraping));
        sleep(EVERY).await;
        assert_eq!(tracker.status(JobKind::Scraping).state(), JobState::Running);

        handle.shutdown().await;
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_emits_lifecycle_events() {
        let api = MockAnalysisApi::new();
        let tracker = JobTracker::new(Arc::new(api.clone()));
        let mut events = tracker.events();

        let handle = tracker.watch(JobKind::Scraping, EVERY);
        handle.shutdown().await;

        assert_eq!(
            events.recv().await.unwrap(),
            TrackerEvent::PollerStarted(JobKind::Scraping)
        );
        assert_eq!(
            events.recv().await.unwrap(),
            TrackerEvent::PollerStopped(JobKind::Scraping)
        );
    }
}

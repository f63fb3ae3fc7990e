//! Per-kind job status tracking.
//!
//! Each job kind moves `Idle -> Running -> {Completed, Failed}`; a later
//! start re-enters `Running` and clears any prior error. Status only changes
//! in response to a successful start or a successful status fetch. Failed
//! fetches are logged and leave the last known status in place.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::broadcast;
use tracing::{debug, info, instrument, warn};

use lexiscope_core::defaults::EVENT_BUS_CAPACITY;
use lexiscope_core::{Accepted, AnalysisApi, JobKind, JobStatus, Result};

use crate::poller::{self, PollHandle};

/// Event emitted by the tracker.
#[derive(Debug, Clone, PartialEq)]
pub enum TrackerEvent {
    /// A start request was accepted.
    JobStarted { kind: JobKind, message: String },
    /// A status fetch produced a different status.
    StatusChanged(JobStatus),
    /// Periodic polling began for a kind.
    PollerStarted(JobKind),
    /// Periodic polling ended for a kind.
    PollerStopped(JobKind),
}

struct Slot {
    status: JobStatus,
    /// Bumped whenever a watch begins or ends; a poll result is applied only
    /// while the epoch it was issued under is still current.
    epoch: u64,
}

#[derive(Default)]
struct Slots(HashMap<JobKind, Slot>);

impl Slots {
    fn idle() -> Self {
        Self(
            JobKind::ALL
                .into_iter()
                .map(|kind| {
                    (
                        kind,
                        Slot {
                            status: JobStatus::idle(kind),
                            epoch: 0,
                        },
                    )
                })
                .collect(),
        )
    }

    fn slot(&mut self, kind: JobKind) -> &mut Slot {
        self.0.entry(kind).or_insert_with(|| Slot {
            status: JobStatus::idle(kind),
            epoch: 0,
        })
    }
}

/// Tracks the last known status of every job kind.
///
/// Cheap to clone; clones share state.
#[derive(Clone)]
pub struct JobTracker {
    api: Arc<dyn AnalysisApi>,
    slots: Arc<Mutex<Slots>>,
    event_tx: broadcast::Sender<TrackerEvent>,
}

impl JobTracker {
    /// Create a tracker with every kind idle.
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        let (event_tx, _) = broadcast::channel(EVENT_BUS_CAPACITY);
        Self {
            api,
            slots: Arc::new(Mutex::new(Slots::idle())),
            event_tx,
        }
    }

    pub(crate) fn api(&self) -> &Arc<dyn AnalysisApi> {
        &self.api
    }

    fn lock(&self) -> MutexGuard<'_, Slots> {
        self.slots.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn emit(&self, event: TrackerEvent) {
        // No subscribers is fine.
        let _ = self.event_tx.send(event);
    }

    /// Get a receiver for tracker events.
    pub fn events(&self) -> broadcast::Receiver<TrackerEvent> {
        self.event_tx.subscribe()
    }

    /// Last known status of `kind`.
    pub fn status(&self, kind: JobKind) -> JobStatus {
        self.lock().slot(kind).status.clone()
    }

    /// Last known status of every kind.
    pub fn snapshot(&self) -> Vec<JobStatus> {
        let mut slots = self.lock();
        JobKind::ALL
            .into_iter()
            .map(|kind| slots.slot(kind).status.clone())
            .collect()
    }

    /// Ask the service to start `kind`.
    ///
    /// On acceptance the kind is marked running and its error cleared. A
    /// rejection is returned to the caller and does not touch the status.
    #[instrument(skip(self), fields(subsystem = "jobs", component = "tracker", op = "start", job_kind = %kind))]
    pub async fn start(&self, kind: JobKind) -> Result<Accepted> {
        let accepted = match self.api.start_job(kind).await {
            Ok(accepted) => accepted,
            Err(e) => {
                warn!(error = %e, "Job start rejected");
                return Err(e);
            }
        };

        {
            let mut slots = self.lock();
            let status = &mut slots.slot(kind).status;
            status.running = true;
            status.completed = false;
            status.error = None;
        }

        info!(message = %accepted.message, "Job started");
        self.emit(TrackerEvent::JobStarted {
            kind,
            message: accepted.message.clone(),
        });
        Ok(accepted)
    }

    /// Fetch and record the current status of `kind`.
    ///
    /// A failed fetch is logged and returned; the previous status stays.
    #[instrument(skip(self), fields(subsystem = "jobs", component = "tracker", op = "refresh_status", job_kind = %kind))]
    pub async fn refresh_status(&self, kind: JobKind) -> Result<JobStatus> {
        match self.api.job_status(kind).await {
            Ok(status) => {
                self.record(status.clone());
                Ok(status)
            }
            Err(e) => {
                warn!(error = %e, "Status refresh failed, keeping last known status");
                Err(e)
            }
        }
    }

    fn record(&self, status: JobStatus) {
        let changed = {
            let mut slots = self.lock();
            let slot = slots.slot(status.kind);
            let changed = slot.status != status;
            slot.status = status.clone();
            changed
        };
        if changed {
            debug!(job_kind = %status.kind, state = ?status.state(), "Job status changed");
            self.emit(TrackerEvent::StatusChanged(status));
        }
    }

    /// Poll the status of `kind` every `interval` until the handle is
    /// cancelled or dropped.
    ///
    /// Starting a new watch on the same kind supersedes the old one: results
    /// from the older poller are no longer applied.
    pub fn watch(&self, kind: JobKind, interval: Duration) -> PollHandle {
        let epoch = {
            let mut slots = self.lock();
            let slot = slots.slot(kind);
            slot.epoch += 1;
            slot.epoch
        };
        self.emit(TrackerEvent::PollerStarted(kind));
        poller::spawn(self.clone(), kind, interval, epoch)
    }

    /// Record a polled status if `epoch` is still current. Returns whether it
    /// was applied.
    pub(crate) fn apply_polled(&self, kind: JobKind, epoch: u64, status: JobStatus) -> bool {
        let changed = {
            let mut slots = self.lock();
            let slot = slots.slot(kind);
            if slot.epoch != epoch {
                return false;
            }
            let changed = slot.status != status;
            slot.status = status.clone();
            changed
        };
        if changed {
            debug!(job_kind = %kind, state = ?status.state(), "Job status changed");
            self.emit(TrackerEvent::StatusChanged(status));
        }
        true
    }

    /// Invalidate `epoch` so no in-flight poll issued under it is applied.
    pub(crate) fn end_watch(&self, kind: JobKind, epoch: u64) {
        let ended = {
            let mut slots = self.lock();
            let slot = slots.slot(kind);
            let current = slot.epoch == epoch;
            if current {
                slot.epoch += 1;
            }
            current
        };
        if ended {
            self.emit(TrackerEvent::PollerStopped(kind));
        }
    }
}

//! # lexiscope-jobs
//!
//! Lifecycle tracking for the remote service's long-running jobs.
//!
//! This crate provides:
//! - A per-kind status tracker fed by job starts and status fetches
//! - A cancellable periodic status poller (used for scraping)
//! - A one-shot delayed refresh timer (used after analysis starts)
//! - Tracker events via a broadcast channel
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use std::time::Duration;
//! use lexiscope_client::AnalysisClient;
//! use lexiscope_jobs::{JobKind, JobTracker};
//!
//! let tracker = JobTracker::new(Arc::new(AnalysisClient::from_env()?));
//! tracker.start(JobKind::Scraping).await?;
//!
//! // Poll every 3 seconds until the handle is dropped.
//! let poll = tracker.watch(JobKind::Scraping, Duration::from_millis(3000));
//! let mut events = tracker.events();
//! while let Ok(event) = events.recv().await {
//!     println!("Event: {:?}", event);
//! }
//! poll.cancel();
//! ```

pub mod poller;
pub mod timer;
pub mod tracker;

// Re-export core types
pub use lexiscope_core::{JobKind, JobState, JobStatus};

pub use poller::PollHandle;
pub use timer::RefreshTimer;
pub use tracker::{JobTracker, TrackerEvent};

/// Default scraping status poll interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = lexiscope_core::defaults::SCRAPE_POLL_INTERVAL_MS;

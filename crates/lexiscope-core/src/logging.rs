//! Structured logging field names shared by every lexiscope crate.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Unexpected internal failure (task panic) |
//! | WARN  | Fail-soft degradation: optional fetch failed, status refresh failed, payload skipped |
//! | INFO  | Lifecycle: job started, poller started/stopped, view committed |
//! | DEBUG | Decision points: payload shape detected, stale response dropped |
//! | TRACE | Per-row iteration: malformed row skipped |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "client", "jobs", "session", "normalize", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "http", "tracker", "poller", "aggregator"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "load_lexical", "refresh_status", "start_job"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Corpus being operated on ("gaza", "ukraine").
pub const CORPUS: &str = "corpus";

/// Job kind ("scraping", "lexical", "semantic", "sentiment").
pub const JOB_KIND: &str = "job_kind";

/// Endpoint path requested.
pub const ENDPOINT: &str = "endpoint";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Wall-clock duration in milliseconds.
pub const DURATION_MS: &str = "duration_ms";

/// Number of records returned or produced.
pub const RESULT_COUNT: &str = "result_count";

/// HTTP status code of a response.
pub const STATUS_CODE: &str = "status_code";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

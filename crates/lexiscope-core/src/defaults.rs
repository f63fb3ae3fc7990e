//! Centralized default constants for lexiscope.
//!
//! Every crate reads its defaults from here instead of defining its own
//! magic numbers. Environment overrides are applied by the config types in
//! `lexiscope-client` and `lexiscope-session`.

// =============================================================================
// REMOTE SERVICE
// =============================================================================

/// Base URL of the analysis service.
pub const API_URL: &str = "http://localhost:8000";

/// Per-request timeout in seconds.
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Timeout for the health check probe in seconds.
pub const HEALTH_TIMEOUT_SECS: u64 = 5;

/// Requests slower than this are logged at WARN.
pub const SLOW_REQUEST_MS: u64 = 5_000;

// =============================================================================
// JOBS
// =============================================================================

/// Interval between scraping status polls.
pub const SCRAPE_POLL_INTERVAL_MS: u64 = 3_000;

/// Capacity of the tracker's status event channel.
pub const EVENT_BUS_CAPACITY: usize = 64;

/// Delay before the one-shot results reload after a lexical start.
pub const LEXICAL_REFRESH_DELAY_MS: u64 = 3_000;

/// Delay before the one-shot results reload after a semantic or sentiment start.
pub const ANALYSIS_REFRESH_DELAY_MS: u64 = 5_000;

/// Delay before the corpus page reload after scraping starts.
pub const CORPUS_REFRESH_DELAY_MS: u64 = 5_000;

// =============================================================================
// PAGINATION
// =============================================================================

/// Corpus texts per page.
pub const PAGE_SIZE: u64 = 20;

// =============================================================================
// SENTIMENT
// =============================================================================

/// Scores at or above this are Positive.
pub const SENTIMENT_POSITIVE_THRESHOLD: f64 = 0.05;

/// Scores at or below this are Negative.
pub const SENTIMENT_NEGATIVE_THRESHOLD: f64 = -0.05;

// =============================================================================
// NORMALIZATION
// =============================================================================

/// Placeholder term for rows without any term-bearing field.
pub const MISSING_TERM: &str = "-";

/// Placeholder for sentiment rows without an actor or context text.
pub const MISSING_TEXT: &str = "N/A";

/// Occurrence count assumed for actor sentiment rows without one.
pub const ACTOR_OCCURRENCES: u64 = 1;

//! Core traits for lexiscope abstractions.
//!
//! [`AnalysisApi`] is the seam between the session layer and the remote
//! analysis service: the HTTP client implements it for production and
//! [`crate::mock::MockAnalysisApi`] implements it for tests.

use async_trait::async_trait;
use serde_json::Value as JsonValue;

use crate::error::Result;
use crate::models::*;

// =============================================================================
// REMOTE ANALYSIS SERVICE
// =============================================================================

/// Typed request layer over the remote analysis service.
///
/// Result methods return the unwrapped `data` value of the response envelope
/// (`null` when absent). Turning it into records is the normalizer's job.
#[async_trait]
pub trait AnalysisApi: Send + Sync {
    /// Whether the service answers at all.
    async fn health_check(&self) -> Result<bool>;

    /// Start a job. Rejections (e.g. already running) are `Error::Status`.
    async fn start_job(&self, kind: JobKind) -> Result<Accepted>;

    /// Current status of a job.
    async fn job_status(&self, kind: JobKind) -> Result<JobStatus>;

    /// One window of corpus texts.
    async fn corpus_texts(&self, corpus: Corpus, limit: u64, offset: u64) -> Result<JsonValue>;

    /// Combined lexical statistics for both corpora.
    async fn lexical_results(&self) -> Result<JsonValue>;

    async fn ngrams(&self, kind: NgramKind, corpus: Corpus) -> Result<JsonValue>;

    async fn tfidf(&self, corpus: Corpus) -> Result<JsonValue>;

    async fn wordfreq(&self, corpus: Corpus) -> Result<JsonValue>;

    async fn logodds(&self, variant: LogOddsVariant) -> Result<JsonValue>;

    /// Token tables for one actor in one corpus.
    async fn actor_stats(&self, actor: &str, corpus: Corpus) -> Result<JsonValue>;

    async fn semantic_results(&self, corpus: Corpus) -> Result<JsonValue>;

    async fn sentiment_results(&self, corpus: Corpus) -> Result<JsonValue>;
}

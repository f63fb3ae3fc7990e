//! In-memory analysis service for deterministic testing.
//!
//! Serves scripted payloads per endpoint, scripted failures, and gated
//! responses that are held until the test releases them.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let api = MockAnalysisApi::new()
//!     .with_data(
//!         MockEndpoint::Ngrams(NgramKind::Bigrams, Corpus::Gaza),
//!         json!([{"term": "air strike", "count": 4}]),
//!     )
//!     .with_failure(
//!         MockEndpoint::Ngrams(NgramKind::Bigrams, Corpus::Ukraine),
//!         MockFailure::status(500, "boom"),
//!     );
//!
//! assert!(api.ngrams(NgramKind::Bigrams, Corpus::Gaza).await.is_ok());
//! assert!(api.ngrams(NgramKind::Bigrams, Corpus::Ukraine).await.is_err());
//! ```

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::Value as JsonValue;
use tokio::sync::Notify;

use crate::error::{Error, Result};
use crate::models::*;
use crate::traits::AnalysisApi;

/// One addressable endpoint of the mock service.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MockEndpoint {
    Health,
    Start(JobKind),
    Status(JobKind),
    CorpusTexts(Corpus),
    LexicalResults,
    Ngrams(NgramKind, Corpus),
    Tfidf(Corpus),
    Wordfreq(Corpus),
    LogOdds(LogOddsVariant),
    ActorStats(String, Corpus),
    Semantic(Corpus),
    Sentiment(Corpus),
}

/// Scripted failure, converted into an [`Error`] on each call.
#[derive(Debug, Clone, PartialEq)]
pub enum MockFailure {
    Request(String),
    Status { status: u16, message: String },
    Decode(String),
}

impl MockFailure {
    pub fn request(message: impl Into<String>) -> Self {
        MockFailure::Request(message.into())
    }

    pub fn status(status: u16, message: impl Into<String>) -> Self {
        MockFailure::Status {
            status,
            message: message.into(),
        }
    }

    pub fn decode(message: impl Into<String>) -> Self {
        MockFailure::Decode(message.into())
    }

    fn to_error(&self) -> Error {
        match self {
            MockFailure::Request(m) => Error::Request(m.clone()),
            MockFailure::Status { status, message } => Error::Status {
                status: *status,
                message: message.clone(),
            },
            MockFailure::Decode(m) => Error::Decode(m.clone()),
        }
    }
}

/// Handle for a held response.
///
/// The next call to the gated endpoint blocks after it is logged until
/// [`MockGate::release`] is called.
#[derive(Clone)]
pub struct MockGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl MockGate {
    fn new() -> Self {
        Self {
            entered: Arc::new(Notify::new()),
            release: Arc::new(Notify::new()),
        }
    }

    /// Wait until a request has reached the gate.
    pub async fn entered(&self) {
        self.entered.notified().await;
    }

    /// Let the held request complete.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

#[derive(Debug, Clone)]
pub struct MockCall {
    pub endpoint: MockEndpoint,
    pub timestamp: std::time::Instant,
}

#[derive(Default)]
struct MockState {
    data: HashMap<MockEndpoint, JsonValue>,
    failures: HashMap<MockEndpoint, MockFailure>,
    statuses: HashMap<JobKind, JobStatus>,
    gates: HashMap<MockEndpoint, MockGate>,
}

/// Mock analysis service for testing.
#[derive(Clone, Default)]
pub struct MockAnalysisApi {
    state: Arc<Mutex<MockState>>,
    call_log: Arc<Mutex<Vec<MockCall>>>,
}

impl MockAnalysisApi {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the `data` returned by an endpoint. Unscripted endpoints return `null`.
    pub fn with_data(self, endpoint: MockEndpoint, data: JsonValue) -> Self {
        self.set_data(endpoint, data);
        self
    }

    /// Make every call to `endpoint` fail until [`MockAnalysisApi::clear_failure`].
    pub fn with_failure(self, endpoint: MockEndpoint, failure: MockFailure) -> Self {
        self.set_failure(endpoint, failure);
        self
    }

    pub fn with_status(self, status: JobStatus) -> Self {
        self.set_status(status);
        self
    }

    pub fn set_data(&self, endpoint: MockEndpoint, data: JsonValue) {
        self.state.lock().unwrap().data.insert(endpoint, data);
    }

    pub fn set_failure(&self, endpoint: MockEndpoint, failure: MockFailure) {
        self.state.lock().unwrap().failures.insert(endpoint, failure);
    }

    pub fn clear_failure(&self, endpoint: &MockEndpoint) {
        self.state.lock().unwrap().failures.remove(endpoint);
    }

    /// Status served for `status.kind` from now on.
    pub fn set_status(&self, status: JobStatus) {
        self.state
            .lock()
            .unwrap()
            .statuses
            .insert(status.kind, status);
    }

    /// Hold the next call to `endpoint` until the returned gate is released.
    pub fn hold(&self, endpoint: MockEndpoint) -> MockGate {
        let gate = MockGate::new();
        self.state
            .lock()
            .unwrap()
            .gates
            .insert(endpoint, gate.clone());
        gate
    }

    /// Get all logged calls for assertion.
    pub fn calls(&self) -> Vec<MockCall> {
        self.call_log.lock().unwrap().clone()
    }

    pub fn call_count(&self, endpoint: &MockEndpoint) -> usize {
        self.call_log
            .lock()
            .unwrap()
            .iter()
            .filter(|c| &c.endpoint == endpoint)
            .count()
    }

    pub fn clear_calls(&self) {
        self.call_log.lock().unwrap().clear()
    }

    /// Log the call, wait at its gate if one is set, then apply scripted failures.
    async fn enter(&self, endpoint: &MockEndpoint) -> Result<()> {
        self.call_log.lock().unwrap().push(MockCall {
            endpoint: endpoint.clone(),
            timestamp: std::time::Instant::now(),
        });

        let gate = self.state.lock().unwrap().gates.remove(endpoint);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        match self.state.lock().unwrap().failures.get(endpoint) {
            Some(failure) => Err(failure.to_error()),
            None => Ok(()),
        }
    }

    async fn data(&self, endpoint: MockEndpoint) -> Result<JsonValue> {
        self.enter(&endpoint).await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .data
            .get(&endpoint)
            .cloned()
            .unwrap_or(JsonValue::Null))
    }
}

/// Slice a scripted `{texts, total}` payload the way the service pages it.
fn window(data: JsonValue, limit: u64, offset: u64) -> JsonValue {
    let mut obj = match data {
        JsonValue::Object(obj) => obj,
        other => return other,
    };
    let Some(texts) = obj.get("texts").and_then(JsonValue::as_array).cloned() else {
        return JsonValue::Object(obj);
    };
    let total = texts.len();
    let page: Vec<JsonValue> = texts
        .into_iter()
        .skip(offset as usize)
        .take(limit as usize)
        .collect();
    obj.insert("showing".into(), page.len().into());
    obj.entry("total").or_insert_with(|| total.into());
    obj.insert("texts".into(), JsonValue::Array(page));
    JsonValue::Object(obj)
}

#[async_trait]
impl AnalysisApi for MockAnalysisApi {
    async fn health_check(&self) -> Result<bool> {
        self.enter(&MockEndpoint::Health).await?;
        Ok(true)
    }

    async fn start_job(&self, kind: JobKind) -> Result<Accepted> {
        self.enter(&MockEndpoint::Start(kind)).await?;
        self.set_status(JobStatus {
            kind,
            running: true,
            completed: false,
            error: None,
        });
        Ok(Accepted {
            message: format!("{} started", kind),
        })
    }

    async fn job_status(&self, kind: JobKind) -> Result<JobStatus> {
        self.enter(&MockEndpoint::Status(kind)).await?;
        Ok(self
            .state
            .lock()
            .unwrap()
            .statuses
            .get(&kind)
            .cloned()
            .unwrap_or_else(|| JobStatus::idle(kind)))
    }

    async fn corpus_texts(&self, corpus: Corpus, limit: u64, offset: u64) -> Result<JsonValue> {
        let data = self.data(MockEndpoint::CorpusTexts(corpus)).await?;
        Ok(window(data, limit, offset))
    }

    async fn lexical_results(&self) -> Result<JsonValue> {
        self.data(MockEndpoint::LexicalResults).await
    }

    async fn ngrams(&self, kind: NgramKind, corpus: Corpus) -> Result<JsonValue> {
        self.data(MockEndpoint::Ngrams(kind, corpus)).await
    }

    async fn tfidf(&self, corpus: Corpus) -> Result<JsonValue> {
        self.data(MockEndpoint::Tfidf(corpus)).await
    }

    async fn wordfreq(&self, corpus: Corpus) -> Result<JsonValue> {
        self.data(MockEndpoint::Wordfreq(corpus)).await
    }

    async fn logodds(&self, variant: LogOddsVariant) -> Result<JsonValue> {
        self.data(MockEndpoint::LogOdds(variant)).await
    }

    async fn actor_stats(&self, actor: &str, corpus: Corpus) -> Result<JsonValue> {
        self.data(MockEndpoint::ActorStats(actor.to_string(), corpus))
            .await
    }

    async fn semantic_results(&self, corpus: Corpus) -> Result<JsonValue> {
        self.data(MockEndpoint::Semantic(corpus)).await
    }

    async fn sentiment_results(&self, corpus: Corpus) -> Result<JsonValue> {
        self.data(MockEndpoint::Sentiment(corpus)).await
    }
}

//! HTTP implementation of [`AnalysisApi`].

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::{Client, Method, Response, Url};
use serde_json::Value as JsonValue;
use tracing::{debug, info, instrument, warn};

use lexiscope_core::defaults::{HEALTH_TIMEOUT_SECS, SLOW_REQUEST_MS};
use lexiscope_core::normalize::{accepted, envelope_data, job_status};
use lexiscope_core::{
    Accepted, AnalysisApi, Corpus, Error, JobKind, JobStatus, LogOddsVariant, NgramKind, Result,
};

use crate::config::ClientConfig;

/// Client for the remote analysis service.
#[derive(Debug, Clone)]
pub struct AnalysisClient {
    client: Client,
    base_url: Url,
    timeout: Duration,
}

impl AnalysisClient {
    /// Create a client from a validated configuration.
    pub fn new(config: &ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&config.base_url)
            .map_err(|e| Error::Config(format!("invalid base_url {}: {}", config.base_url, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(Error::Config(format!(
                "base_url cannot carry a path: {}",
                config.base_url
            )));
        }

        let timeout = Duration::from_secs(config.timeout_secs);
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| Error::Config(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            subsystem = "client",
            base_url = %base_url,
            timeout_secs = config.timeout_secs,
            "Initializing analysis client"
        );

        Ok(Self {
            client,
            base_url,
            timeout,
        })
    }

    /// Create from `LEXISCOPE_*` environment variables.
    pub fn from_env() -> Result<Self> {
        Self::new(&ClientConfig::from_env())
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Base URL with `segments` appended, each percent-encoded.
    fn endpoint(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| Error::Config(format!("base_url cannot carry a path: {}", self.base_url)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Send a request and return the parsed JSON body.
    ///
    /// Non-2xx responses become [`Error::Status`] carrying the server's
    /// `detail` (or `message`) text when the body has one.
    async fn send(
        &self,
        method: Method,
        segments: &[&str],
        query: &[(&str, String)],
    ) -> Result<JsonValue> {
        let url = self.endpoint(segments)?;
        let start = Instant::now();

        let response = self
            .client
            .request(method.clone(), url.clone())
            .query(query)
            .send()
            .await?;

        let body = read_body(response).await;
        let elapsed = start.elapsed().as_millis() as u64;
        match &body {
            Ok(_) => debug!(
                method = %method,
                endpoint = url.path(),
                duration_ms = elapsed,
                "Request complete"
            ),
            Err(e) => debug!(
                method = %method,
                endpoint = url.path(),
                duration_ms = elapsed,
                status_code = e.status_code(),
                error = %e,
                "Request failed"
            ),
        }
        if elapsed > SLOW_REQUEST_MS {
            warn!(
                endpoint = url.path(),
                duration_ms = elapsed,
                slow = true,
                "Slow analysis service request"
            );
        }
        body
    }

    /// GET an enveloped result and return its `data`.
    async fn get_data(&self, segments: &[&str], query: &[(&str, String)]) -> Result<JsonValue> {
        let body = self.send(Method::GET, segments, query).await?;
        envelope_data(body, &segments.join("/"))
    }
}

async fn read_body(response: Response) -> Result<JsonValue> {
    let status = response.status();
    if !status.is_success() {
        let text = response.text().await.unwrap_or_default();
        return Err(Error::Status {
            status: status.as_u16(),
            message: error_message(&text)
                .unwrap_or_else(|| status.canonical_reason().unwrap_or("error").to_string()),
        });
    }

    let text = response.text().await?;
    serde_json::from_str(&text).map_err(|e| Error::Decode(format!("invalid JSON body: {}", e)))
}

/// Human-readable message from an error body: `detail`, then `message`, then
/// the raw text.
fn error_message(body: &str) -> Option<String> {
    let body = body.trim();
    if body.is_empty() {
        return None;
    }
    match serde_json::from_str::<JsonValue>(body) {
        Ok(json) => match json.get("detail").or_else(|| json.get("message")) {
            Some(JsonValue::String(s)) => Some(s.clone()),
            Some(other) => Some(other.to_string()),
            None => Some(body.to_string()),
        },
        Err(_) => Some(body.to_string()),
    }
}

fn start_path(kind: JobKind) -> Vec<&'static str> {
    match kind {
        JobKind::Scraping => vec!["api", "scraping", "start"],
        other => vec!["api", "analysis", other.as_str(), "start"],
    }
}

fn corpus_query(corpus: Corpus) -> [(&'static str, String); 1] {
    [("corpus", corpus.as_str().to_string())]
}

#[async_trait]
impl AnalysisApi for AnalysisClient {
    async fn health_check(&self) -> Result<bool> {
        let response = self
            .client
            .get(self.base_url.clone())
            .timeout(Duration::from_secs(HEALTH_TIMEOUT_SECS.min(self.timeout.as_secs())))
            .send()
            .await;

        match response {
            Ok(resp) => {
                if resp.status().is_success() {
                    info!("Analysis service health check passed");
                    Ok(true)
                } else {
                    warn!("Analysis service health check failed: {}", resp.status());
                    Ok(false)
                }
            }
            Err(e) => {
                warn!("Analysis service health check error: {}", e);
                Ok(false)
            }
        }
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "start_job", job_kind = %kind))]
    async fn start_job(&self, kind: JobKind) -> Result<Accepted> {
        let segments = start_path(kind);
        let body = self.send(Method::POST, &segments, &[]).await?;
        let ack = accepted(kind, &body);
        envelope_data(body, &segments.join("/"))?;
        info!(message = %ack.message, "Job accepted");
        Ok(ack)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "job_status", job_kind = %kind))]
    async fn job_status(&self, kind: JobKind) -> Result<JobStatus> {
        let segments: &[&str] = if kind.is_analysis() {
            &["api", "analysis", "status"]
        } else {
            &["api", "scraping", "status"]
        };
        let data = self.get_data(segments, &[]).await?;
        job_status(kind, &data)
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "corpus_texts", corpus = %corpus))]
    async fn corpus_texts(&self, corpus: Corpus, limit: u64, offset: u64) -> Result<JsonValue> {
        let query = [
            ("corpus", corpus.as_str().to_string()),
            ("limit", limit.to_string()),
            ("offset", offset.to_string()),
        ];
        self.get_data(&["api", "corpus", "texts"], &query).await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "lexical_results"))]
    async fn lexical_results(&self) -> Result<JsonValue> {
        self.get_data(&["api", "analysis", "lexical", "results"], &[])
            .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "ngrams", corpus = %corpus))]
    async fn ngrams(&self, kind: NgramKind, corpus: Corpus) -> Result<JsonValue> {
        self.get_data(
            &["api", "analysis", "lexical", kind.as_str()],
            &corpus_query(corpus),
        )
        .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "tfidf", corpus = %corpus))]
    async fn tfidf(&self, corpus: Corpus) -> Result<JsonValue> {
        self.get_data(&["api", "analysis", "lexical", "tfidf"], &corpus_query(corpus))
            .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "wordfreq", corpus = %corpus))]
    async fn wordfreq(&self, corpus: Corpus) -> Result<JsonValue> {
        self.get_data(
            &["api", "analysis", "lexical", "wordfreq"],
            &corpus_query(corpus),
        )
        .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "logodds"))]
    async fn logodds(&self, variant: LogOddsVariant) -> Result<JsonValue> {
        self.get_data(
            &["api", "analysis", "lexical", "logodds"],
            &[("variant", variant.as_str().to_string())],
        )
        .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "actor_stats", corpus = %corpus))]
    async fn actor_stats(&self, actor: &str, corpus: Corpus) -> Result<JsonValue> {
        if actor.trim().is_empty() {
            return Err(Error::Validation("actor name cannot be empty".to_string()));
        }
        self.get_data(
            &["api", "analysis", "lexical", "actor", actor],
            &corpus_query(corpus),
        )
        .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "semantic_results", corpus = %corpus))]
    async fn semantic_results(&self, corpus: Corpus) -> Result<JsonValue> {
        self.get_data(&["api", "analysis", "semantic", "results"], &corpus_query(corpus))
            .await
    }

    #[instrument(skip(self), fields(subsystem = "client", component = "http", op = "sentiment_results", corpus = %corpus))]
    async fn sentiment_results(&self, corpus: Corpus) -> Result<JsonValue> {
        self.get_data(
            &["api", "analysis", "sentiment", "results"],
            &corpus_query(corpus),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client(base: &str) -> AnalysisClient {
        AnalysisClient::new(&ClientConfig::default().with_base_url(base)).unwrap()
    }

    #[test]
    fn test_endpoint_joins_segments() {
        let c = client("http://localhost:8000");
        let url = c.endpoint(&["api", "scraping", "status"]).unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/scraping/status");
    }

    #[test]
    fn test_endpoint_keeps_base_path_prefix() {
        let c = client("http://proxy.local/lexiscope/");
        let url = c.endpoint(&["api", "analysis", "status"]).unwrap();
        assert_eq!(url.as_str(), "http://proxy.local/lexiscope/api/analysis/status");
    }

    #[test]
    fn test_endpoint_encodes_actor_names() {
        let c = client("http://localhost:8000");
        let url = c
            .endpoint(&["api", "analysis", "lexical", "actor", "west bank/idf"])
            .unwrap();
        assert!(url.path().ends_with("/actor/west%20bank%2Fidf"));
    }

    #[test]
    fn test_start_paths() {
        assert_eq!(start_path(JobKind::Scraping), ["api", "scraping", "start"]);
        assert_eq!(
            start_path(JobKind::Sentiment),
            ["api", "analysis", "sentiment", "start"]
        );
    }

    #[test]
    fn test_error_message_prefers_detail() {
        assert_eq!(
            error_message(r#"{"detail": "Le scraping est déjà en cours"}"#).as_deref(),
            Some("Le scraping est déjà en cours")
        );
        assert_eq!(
            error_message(r#"{"message": "nope"}"#).as_deref(),
            Some("nope")
        );
        assert_eq!(
            error_message("Internal Server Error").as_deref(),
            Some("Internal Server Error")
        );
        assert_eq!(error_message("   "), None);
    }

    #[tokio::test]
    async fn test_blank_actor_rejected_before_request() {
        let client = client("http://127.0.0.1:9");
        let result = client.actor_stats("  ", Corpus::Gaza).await;
        assert!(matches!(result, Err(Error::Validation(_))));
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let result = AnalysisClient::new(&ClientConfig::default().with_base_url("ftp://x"));
        assert!(matches!(result, Err(Error::Config(_))));
    }
}

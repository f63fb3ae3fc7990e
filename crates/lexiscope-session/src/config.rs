//! Session configuration: poll interval, refresh delays and page size.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use lexiscope_core::{defaults, JobKind};

/// Configuration for a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Interval between scraping status polls.
    pub scrape_poll_interval_ms: u64,
    /// Delay before lexical results are reloaded after a lexical start.
    pub lexical_refresh_delay_ms: u64,
    /// Delay before semantic or sentiment results are reloaded after a start.
    pub analysis_refresh_delay_ms: u64,
    /// Delay before the corpus page is reloaded after scraping starts.
    pub corpus_refresh_delay_ms: u64,
    /// Corpus texts per page.
    pub page_size: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scrape_poll_interval_ms: defaults::SCRAPE_POLL_INTERVAL_MS,
            lexical_refresh_delay_ms: defaults::LEXICAL_REFRESH_DELAY_MS,
            analysis_refresh_delay_ms: defaults::ANALYSIS_REFRESH_DELAY_MS,
            corpus_refresh_delay_ms: defaults::CORPUS_REFRESH_DELAY_MS,
            page_size: defaults::PAGE_SIZE,
        }
    }
}

fn env_u64(name: &str, default: u64) -> u64 {
    std::env::var(name)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

impl SessionConfig {
    /// Create config from environment variables (with defaults).
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `LEXISCOPE_SCRAPE_POLL_INTERVAL_MS` | `3000` | Scraping status poll interval |
    /// | `LEXISCOPE_LEXICAL_REFRESH_DELAY_MS` | `3000` | Reload delay after a lexical start |
    /// | `LEXISCOPE_ANALYSIS_REFRESH_DELAY_MS` | `5000` | Reload delay after a semantic/sentiment start |
    /// | `LEXISCOPE_CORPUS_REFRESH_DELAY_MS` | `5000` | Corpus reload delay after scraping starts |
    /// | `LEXISCOPE_PAGE_SIZE` | `20` | Corpus texts per page |
    pub fn from_env() -> Self {
        Self {
            scrape_poll_interval_ms: env_u64(
                "LEXISCOPE_SCRAPE_POLL_INTERVAL_MS",
                defaults::SCRAPE_POLL_INTERVAL_MS,
            )
            .max(1),
            lexical_refresh_delay_ms: env_u64(
                "LEXISCOPE_LEXICAL_REFRESH_DELAY_MS",
                defaults::LEXICAL_REFRESH_DELAY_MS,
            ),
            analysis_refresh_delay_ms: env_u64(
                "LEXISCOPE_ANALYSIS_REFRESH_DELAY_MS",
                defaults::ANALYSIS_REFRESH_DELAY_MS,
            ),
            corpus_refresh_delay_ms: env_u64(
                "LEXISCOPE_CORPUS_REFRESH_DELAY_MS",
                defaults::CORPUS_REFRESH_DELAY_MS,
            ),
            page_size: env_u64("LEXISCOPE_PAGE_SIZE", defaults::PAGE_SIZE).max(1),
        }
    }

    pub fn with_scrape_poll_interval(mut self, ms: u64) -> Self {
        self.scrape_poll_interval_ms = ms.max(1);
        self
    }

    pub fn with_lexical_refresh_delay(mut self, ms: u64) -> Self {
        self.lexical_refresh_delay_ms = ms;
        self
    }

    pub fn with_analysis_refresh_delay(mut self, ms: u64) -> Self {
        self.analysis_refresh_delay_ms = ms;
        self
    }

    pub fn with_corpus_refresh_delay(mut self, ms: u64) -> Self {
        self.corpus_refresh_delay_ms = ms;
        self
    }

    /// Set texts per page (at least 1).
    pub fn with_page_size(mut self, page_size: u64) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    pub fn scrape_poll_interval(&self) -> Duration {
        Duration::from_millis(self.scrape_poll_interval_ms)
    }

    /// Delay before the one-shot reload that follows starting `kind`.
    pub fn refresh_delay(&self, kind: JobKind) -> Duration {
        Duration::from_millis(match kind {
            JobKind::Scraping => self.corpus_refresh_delay_ms,
            JobKind::Lexical => self.lexical_refresh_delay_ms,
            JobKind::Semantic | JobKind::Sentiment => self.analysis_refresh_delay_ms,
        })
    }
}

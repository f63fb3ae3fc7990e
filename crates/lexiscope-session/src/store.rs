//! Session-scoped view-model store.
//!
//! One [`Session`] holds the latest view of each kind. Views are built
//! completely before being committed, so a reader sees either the previous
//! view or the new one, never a mix. A failed required fetch leaves the
//! previous view in place.

use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use tracing::{debug, info, instrument, warn};

use lexiscope_core::{
    ActorStatsView, AnalysisApi, Corpus, CorpusView, JobKind, JobStatus, LexicalView, PageWindow,
    Result, SemanticView, SentimentView, StatType,
};
use lexiscope_jobs::{JobTracker, PollHandle, RefreshTimer};

use crate::aggregator::Aggregator;
use crate::config::SessionConfig;

struct SessionState {
    corpus: Corpus,
    window: PageWindow,
    corpus_view: Option<Arc<CorpusView>>,
    lexical: Option<Arc<LexicalView>>,
    actor_stats: Option<Arc<ActorStatsView>>,
    semantic: Option<Arc<SemanticView>>,
    sentiment: Option<Arc<SentimentView>>,
    // Latest issued semantic/sentiment load; older responses are not committed.
    semantic_seq: u64,
    sentiment_seq: u64,
}

impl SessionState {
    fn new(page_size: u64) -> Self {
        Self {
            corpus: Corpus::default(),
            window: PageWindow::first(page_size),
            corpus_view: None,
            lexical: None,
            actor_stats: None,
            semantic: None,
            sentiment: None,
            semantic_seq: 0,
            sentiment_seq: 0,
        }
    }
}

/// A client session against the analysis service.
///
/// Cheap to clone; clones share the same views and job tracker.
#[derive(Clone)]
pub struct Session {
    aggregator: Aggregator,
    tracker: JobTracker,
    config: SessionConfig,
    state: Arc<RwLock<SessionState>>,
}

impl Session {
    pub fn new(api: Arc<dyn AnalysisApi>, config: SessionConfig) -> Self {
        info!(
            subsystem = "session",
            page_size = config.page_size,
            scrape_poll_interval_ms = config.scrape_poll_interval_ms,
            "Session created"
        );
        Self {
            aggregator: Aggregator::new(api.clone()),
            tracker: JobTracker::new(api),
            state: Arc::new(RwLock::new(SessionState::new(config.page_size))),
            config,
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, SessionState> {
        self.state.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, SessionState> {
        self.state.write().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn aggregator(&self) -> &Aggregator {
        &self.aggregator
    }

    pub fn tracker(&self) -> &JobTracker {
        &self.tracker
    }

    // =========================================================================
    // Current views
    // =========================================================================

    /// Currently selected corpus.
    pub fn corpus(&self) -> Corpus {
        self.read().corpus
    }

    pub fn window(&self) -> PageWindow {
        self.read().window
    }

    pub fn corpus_view(&self) -> Option<Arc<CorpusView>> {
        self.read().corpus_view.clone()
    }

    pub fn lexical(&self) -> Option<Arc<LexicalView>> {
        self.read().lexical.clone()
    }

    pub fn actor_stats(&self) -> Option<Arc<ActorStatsView>> {
        self.read().actor_stats.clone()
    }

    pub fn semantic(&self) -> Option<Arc<SemanticView>> {
        self.read().semantic.clone()
    }

    pub fn sentiment(&self) -> Option<Arc<SentimentView>> {
        self.read().sentiment.clone()
    }

    pub fn job_status(&self, kind: JobKind) -> JobStatus {
        self.tracker.status(kind)
    }

    // =========================================================================
    // Corpus browsing
    // =========================================================================

    /// Switch corpus. Always returns to page 1 and discards the current
    /// corpus view, even when `corpus` is already selected.
    pub fn select_corpus(&self, corpus: Corpus) {
        let mut state = self.write();
        state.corpus = corpus;
        state.window = PageWindow::first(self.config.page_size);
        state.corpus_view = None;
        debug!(corpus = %corpus, "Corpus selected, page reset");
    }

    /// Load `page` of the selected corpus.
    ///
    /// A page past the last known page is a no-op that returns the current
    /// view. A response for a corpus that is no longer selected is returned
    /// but not committed.
    #[instrument(skip(self), fields(subsystem = "session", op = "load_corpus_page"))]
    pub async fn load_corpus_page(&self, page: u64) -> Result<Arc<CorpusView>> {
        let (corpus, window) = {
            let state = self.read();
            if let Some(view) = &state.corpus_view {
                if page > view.window.last_page() {
                    debug!(page, last_page = view.window.last_page(), "Page out of range");
                    return Ok(view.clone());
                }
            }
            (state.corpus, state.window.at(page))
        };
        self.fetch_corpus_page(corpus, window).await
    }

    /// Move to the next page; a no-op on the last page.
    pub async fn next_page(&self) -> Result<Arc<CorpusView>> {
        match self.corpus_view() {
            Some(view) => match view.window.next() {
                Some(window) => self.fetch_corpus_page(view.corpus, window).await,
                None => Ok(view),
            },
            None => self.reload_corpus_page().await,
        }
    }

    /// Move to the previous page; a no-op on page 1.
    pub async fn previous_page(&self) -> Result<Arc<CorpusView>> {
        match self.corpus_view() {
            Some(view) => match view.window.previous() {
                Some(window) => self.fetch_corpus_page(view.corpus, window).await,
                None => Ok(view),
            },
            None => self.reload_corpus_page().await,
        }
    }

    /// Reload the page currently selected.
    pub async fn reload_corpus_page(&self) -> Result<Arc<CorpusView>> {
        let (corpus, window) = {
            let state = self.read();
            (state.corpus, state.window)
        };
        self.fetch_corpus_page(corpus, window).await
    }

    async fn fetch_corpus_page(
        &self,
        corpus: Corpus,
        window: PageWindow,
    ) -> Result<Arc<CorpusView>> {
        let view = Arc::new(self.aggregator.corpus_page(corpus, window).await?);

        let mut state = self.write();
        if state.corpus != corpus {
            debug!(
                corpus = %corpus,
                selected = %state.corpus,
                "Dropped corpus page for deselected corpus"
            );
            return Ok(view);
        }
        state.window = view.window;
        state.corpus_view = Some(view.clone());
        info!(
            view = "corpus",
            corpus = %corpus,
            page = view.window.page,
            result_count = view.page.showing,
            "View committed"
        );
        Ok(view)
    }

    // =========================================================================
    // Results
    // =========================================================================

    /// Load the lexical view. On failure the previous view stays.
    #[instrument(skip(self), fields(subsystem = "session", op = "load_lexical"))]
    pub async fn load_lexical(&self) -> Result<Arc<LexicalView>> {
        let view = match self.aggregator.lexical().await {
            Ok(view) => Arc::new(view),
            Err(e) => {
                warn!(error = %e, "Lexical load failed, keeping previous view");
                return Err(e);
            }
        };
        self.write().lexical = Some(view.clone());
        info!(view = "lexical", "View committed");
        Ok(view)
    }

    /// Load per-actor tables for both corpora.
    #[instrument(skip(self), fields(subsystem = "session", op = "load_actor_stats"))]
    pub async fn load_actor_stats(&self, actor: &str, stat_type: StatType) -> Arc<ActorStatsView> {
        let view = Arc::new(self.aggregator.actor_stats(actor, stat_type).await);
        self.write().actor_stats = Some(view.clone());
        info!(
            view = "actor_stats",
            gaza = view.gaza.is_some(),
            ukraine = view.ukraine.is_some(),
            "View committed"
        );
        view
    }

    /// Load semantic results. Any failure commits an empty view for `corpus`.
    ///
    /// Only the most recently issued load commits; a slower earlier response
    /// is returned to its caller but leaves the stored view alone.
    #[instrument(skip(self), fields(subsystem = "session", op = "load_semantic", corpus = %corpus))]
    pub async fn load_semantic(&self, corpus: Corpus) -> Arc<SemanticView> {
        let seq = {
            let mut state = self.write();
            state.semantic_seq += 1;
            state.semantic_seq
        };
        let view = match self.aggregator.semantic(corpus).await {
            Ok(view) => view,
            Err(e) => {
                warn!(error = %e, "Semantic load failed, showing empty results");
                SemanticView::empty(corpus)
            }
        };
        let view = Arc::new(view);
        let mut state = self.write();
        if state.semantic_seq != seq {
            debug!(seq, latest = state.semantic_seq, "Dropped superseded semantic results");
            return view;
        }
        state.semantic = Some(view.clone());
        info!(view = "semantic", clusters = view.clusters.len(), "View committed");
        view
    }

    /// Load sentiment results. Any failure commits an empty view for `corpus`.
    /// Superseded responses are not committed.
    #[instrument(skip(self), fields(subsystem = "session", op = "load_sentiment", corpus = %corpus))]
    pub async fn load_sentiment(&self, corpus: Corpus) -> Arc<SentimentView> {
        let seq = {
            let mut state = self.write();
            state.sentiment_seq += 1;
            state.sentiment_seq
        };
        let view = match self.aggregator.sentiment(corpus).await {
            Ok(view) => view,
            Err(e) => {
                warn!(error = %e, "Sentiment load failed, showing empty results");
                SentimentView::empty(corpus)
            }
        };
        let view = Arc::new(view);
        let mut state = self.write();
        if state.sentiment_seq != seq {
            debug!(seq, latest = state.sentiment_seq, "Dropped superseded sentiment results");
            return view;
        }
        state.sentiment = Some(view.clone());
        info!(view = "sentiment", result_count = view.victims.len(), "View committed");
        view
    }

    // =========================================================================
    // Jobs
    // =========================================================================

    /// Start scraping, refresh its status once, and schedule one reload of
    /// the current corpus page.
    pub async fn start_scraping(&self) -> Result<RefreshTimer<()>> {
        self.tracker.start(JobKind::Scraping).await?;
        // Logged by the tracker; the previous status stays on failure.
        let _ = self.tracker.refresh_status(JobKind::Scraping).await;
        Ok(self.schedule_refresh(JobKind::Scraping))
    }

    /// Start an analysis job and schedule one delayed reload of its results.
    ///
    /// The reload is not tied to the job finishing; it may show results from
    /// before the job completed. Reload manually to see later results.
    pub async fn start_analysis(&self, kind: JobKind) -> Result<RefreshTimer<()>> {
        if !kind.is_analysis() {
            return self.start_scraping().await;
        }
        self.tracker.start(kind).await?;
        Ok(self.schedule_refresh(kind))
    }

    fn schedule_refresh(&self, kind: JobKind) -> RefreshTimer<()> {
        let session = self.clone();
        RefreshTimer::schedule(kind, self.config.refresh_delay(kind), move || async move {
            session.refresh_results(kind).await;
        })
    }

    /// Reload whatever view depends on `kind`, then refresh the status of an
    /// analysis job so it no longer reads as running once the service agrees.
    /// Failures are logged.
    async fn refresh_results(&self, kind: JobKind) {
        match kind {
            JobKind::Scraping => {
                if let Err(e) = self.reload_corpus_page().await {
                    warn!(error = %e, "Corpus reload after scraping start failed");
                }
            }
            JobKind::Lexical => {
                // Failure already logged; the previous view stays.
                let _ = self.load_lexical().await;
            }
            JobKind::Semantic => {
                let corpus = self.semantic().map_or_else(|| self.corpus(), |v| v.corpus);
                self.load_semantic(corpus).await;
            }
            JobKind::Sentiment => {
                let corpus = self.sentiment().map_or_else(|| self.corpus(), |v| v.corpus);
                self.load_sentiment(corpus).await;
            }
        }
        if kind.is_analysis() {
            // Logged by the tracker; the previous status stays on failure.
            let _ = self.tracker.refresh_status(kind).await;
        }
    }

    /// Poll the scraping status until the handle is cancelled or dropped.
    pub fn watch_scraping(&self) -> PollHandle {
        self.tracker
            .watch(JobKind::Scraping, self.config.scrape_poll_interval())
    }
}

//! Parallel fan-out of result fetches into complete view models.
//!
//! Every fan-out waits for all of its fetches to settle. Only a sub-fetch
//! declared required (the main lexical statistics) fails the whole view;
//! supplementary fetches degrade to empty or `None`.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, instrument, warn};

use lexiscope_core::normalize::{
    actor_stats, corpus_page, lexical_stats, logodds_entries, semantic_results, sentiment_results,
    term_counts, tfidf_entries,
};
use lexiscope_core::{
    ActorStats, ActorStatsView, AnalysisApi, Corpus, CorpusView, Error, LexicalView,
    LogOddsEntry, LogOddsVariant, NgramKind, NgramTables, PageWindow, Result, SemanticView,
    SentimentView, StatType, TermCount, TfidfEntry,
};

/// Builds view models from the analysis service.
#[derive(Clone)]
pub struct Aggregator {
    api: Arc<dyn AnalysisApi>,
}

impl Aggregator {
    pub fn new(api: Arc<dyn AnalysisApi>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &Arc<dyn AnalysisApi> {
        &self.api
    }

    /// One corpus page at `window`'s position.
    #[instrument(skip(self), fields(subsystem = "session", component = "aggregator", op = "corpus_page", corpus = %corpus, page = window.page))]
    pub async fn corpus_page(&self, corpus: Corpus, window: PageWindow) -> Result<CorpusView> {
        let data = self
            .api
            .corpus_texts(corpus, window.per_page, window.offset())
            .await?;
        let page = corpus_page(&data, window.per_page)?;
        debug!(result_count = page.showing, total = page.total, "Corpus page loaded");
        Ok(CorpusView::new(corpus, window, page))
    }

    /// Main statistics plus both n-gram sizes for both corpora.
    ///
    /// Fails only if the main statistics cannot be fetched or decoded. A
    /// failed n-gram fetch leaves its table empty.
    #[instrument(skip(self), fields(subsystem = "session", component = "aggregator", op = "lexical"))]
    pub async fn lexical(&self) -> Result<LexicalView> {
        let start = Instant::now();
        let (main, gaza_bigrams, ukraine_bigrams, gaza_trigrams, ukraine_trigrams) = tokio::join!(
            self.api.lexical_results(),
            self.ngrams(NgramKind::Bigrams, Corpus::Gaza),
            self.ngrams(NgramKind::Bigrams, Corpus::Ukraine),
            self.ngrams(NgramKind::Trigrams, Corpus::Gaza),
            self.ngrams(NgramKind::Trigrams, Corpus::Ukraine),
        );

        let stats = main
            .and_then(|data| lexical_stats(&data))
            .map_err(|e| Error::aggregate("lexical_results", e))?;

        let view = LexicalView::assemble(
            stats,
            NgramTables {
                gaza_bigrams,
                ukraine_bigrams,
                gaza_trigrams,
                ukraine_trigrams,
            },
        );
        debug!(
            duration_ms = start.elapsed().as_millis() as u64,
            "Lexical view assembled"
        );
        Ok(view)
    }

    async fn ngrams(&self, kind: NgramKind, corpus: Corpus) -> Vec<TermCount> {
        let result = self
            .api
            .ngrams(kind, corpus)
            .await
            .and_then(|data| term_counts(&data, kind.as_str()));
        match result {
            Ok(rows) => rows,
            Err(e) => {
                warn!(
                    ngram = kind.as_str(),
                    corpus = %corpus,
                    error = %e,
                    "N-gram fetch failed, leaving table empty"
                );
                Vec::new()
            }
        }
    }

    /// Per-actor tables for both corpora. Never fails: a side whose fetch
    /// fails is `None`.
    #[instrument(skip(self), fields(subsystem = "session", component = "aggregator", op = "actor_stats"))]
    pub async fn actor_stats(&self, actor: &str, stat_type: StatType) -> ActorStatsView {
        let (gaza, ukraine) = tokio::join!(
            self.actor_side(actor, Corpus::Gaza),
            self.actor_side(actor, Corpus::Ukraine),
        );
        ActorStatsView::new(actor, stat_type, gaza, ukraine)
    }

    async fn actor_side(&self, actor: &str, corpus: Corpus) -> Option<ActorStats> {
        let result = self
            .api
            .actor_stats(actor, corpus)
            .await
            .and_then(|data| actor_stats(&data));
        match result {
            Ok(stats) => Some(stats),
            Err(e) => {
                warn!(corpus = %corpus, error = %e, "Actor stats fetch failed for one corpus");
                None
            }
        }
    }

    /// The semantic payload for `corpus`. A single request feeds every
    /// part, so any failure fails the whole view.
    #[instrument(skip(self), fields(subsystem = "session", component = "aggregator", op = "semantic", corpus = %corpus))]
    pub async fn semantic(&self, corpus: Corpus) -> Result<SemanticView> {
        let data = self.api.semantic_results(corpus).await?;
        let results = semantic_results(&data)?;
        debug!(
            concordances = results.concordances.len(),
            neighbors = results.neighbors.len(),
            clusters = results.clusters.len(),
            "Semantic results normalized"
        );
        Ok(SemanticView::new(corpus, results))
    }

    #[instrument(skip(self), fields(subsystem = "session", component = "aggregator", op = "sentiment", corpus = %corpus))]
    pub async fn sentiment(&self, corpus: Corpus) -> Result<SentimentView> {
        let data = self.api.sentiment_results(corpus).await?;
        let results = sentiment_results(&data)?;
        Ok(SentimentView::new(corpus, results))
    }

    pub async fn logodds(&self, variant: LogOddsVariant) -> Result<Vec<LogOddsEntry>> {
        let data = self.api.logodds(variant).await?;
        logodds_entries(&data, variant.as_str())
    }

    pub async fn tfidf(&self, corpus: Corpus) -> Result<Vec<TfidfEntry>> {
        let data = self.api.tfidf(corpus).await?;
        tfidf_entries(&data, "tfidf")
    }

    pub async fn wordfreq(&self, corpus: Corpus) -> Result<Vec<TermCount>> {
        let data = self.api.wordfreq(corpus).await?;
        term_counts(&data, "wordfreq")
    }
}

/// Sample payload for tests: one row in every main lexical table.
#[cfg(test)]
pub(crate) fn lexical_payload() -> serde_json::Value {
    serde_json::json!({
        "gaza_wordfreq": [{"word": "gaza", "count": 120}],
        "ukraine_wordfreq": [{"word": "kyiv", "count": "98"}],
        "tfidf_gaza": [{"term": "rafah", "score": 0.42}],
        "tfidf_ukraine": [{"term": "kharkiv", "tfidf": "0.37"}],
        "logodds_top": [{"word": "hamas", "count_a": 80, "count_b": 1, "logodds": 4.2, "z": 9.1}],
        "logodds_bottom": [{"word": "putin", "count_a": 2, "count_b": 75, "log_odds": -3.9, "z_score": -8.4}]
    })
}

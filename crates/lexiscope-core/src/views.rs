//! Display-ready view models.
//!
//! A view is built in one piece from normalized records and never mutated
//! afterwards; the session store swaps whole views.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::*;
use crate::stats::{mean_victim_sentiment, total_actor_occurrences, LabelCounts, PageWindow};

/// One page of one corpus.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorpusView {
    pub corpus: Corpus,
    pub window: PageWindow,
    pub page: CorpusPage,
    pub loaded_at: DateTime<Utc>,
}

impl CorpusView {
    /// `window` takes its total from the page.
    pub fn new(corpus: Corpus, window: PageWindow, page: CorpusPage) -> Self {
        Self {
            corpus,
            window: window.with_total(page.total),
            page,
            loaded_at: Utc::now(),
        }
    }

    pub fn has_next(&self) -> bool {
        self.window.has_next()
    }

    pub fn has_previous(&self) -> bool {
        self.window.has_previous()
    }
}

/// Supplementary n-gram tables; any slot may be empty.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NgramTables {
    pub gaza_bigrams: Vec<TermCount>,
    pub ukraine_bigrams: Vec<TermCount>,
    pub gaza_trigrams: Vec<TermCount>,
    pub ukraine_trigrams: Vec<TermCount>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LexicalView {
    pub gaza_wordfreq: Vec<TermCount>,
    pub ukraine_wordfreq: Vec<TermCount>,
    pub tfidf_gaza: Vec<TfidfEntry>,
    pub tfidf_ukraine: Vec<TfidfEntry>,
    pub logodds_top: Vec<LogOddsEntry>,
    pub logodds_bottom: Vec<LogOddsEntry>,
    pub gaza_bigrams: Vec<TermCount>,
    pub ukraine_bigrams: Vec<TermCount>,
    pub gaza_trigrams: Vec<TermCount>,
    pub ukraine_trigrams: Vec<TermCount>,
    pub loaded_at: DateTime<Utc>,
}

impl LexicalView {
    pub fn assemble(stats: LexicalStats, ngrams: NgramTables) -> Self {
        Self {
            gaza_wordfreq: stats.gaza_wordfreq,
            ukraine_wordfreq: stats.ukraine_wordfreq,
            tfidf_gaza: stats.tfidf_gaza,
            tfidf_ukraine: stats.tfidf_ukraine,
            logodds_top: stats.logodds_top,
            logodds_bottom: stats.logodds_bottom,
            gaza_bigrams: ngrams.gaza_bigrams,
            ukraine_bigrams: ngrams.ukraine_bigrams,
            gaza_trigrams: ngrams.gaza_trigrams,
            ukraine_trigrams: ngrams.ukraine_trigrams,
            loaded_at: Utc::now(),
        }
    }
}

/// Per-actor tables for both corpora. A side is `None` when its fetch failed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorStatsView {
    pub actor: String,
    pub stat_type: StatType,
    pub gaza: Option<ActorStats>,
    pub ukraine: Option<ActorStats>,
    pub loaded_at: DateTime<Utc>,
}

impl ActorStatsView {
    pub fn new(
        actor: impl Into<String>,
        stat_type: StatType,
        gaza: Option<ActorStats>,
        ukraine: Option<ActorStats>,
    ) -> Self {
        Self {
            actor: actor.into(),
            stat_type,
            gaza,
            ukraine,
            loaded_at: Utc::now(),
        }
    }

    pub fn side(&self, corpus: Corpus) -> Option<&ActorStats> {
        match corpus {
            Corpus::Gaza => self.gaza.as_ref(),
            Corpus::Ukraine => self.ukraine.as_ref(),
        }
    }

    /// The table selected by `stat_type` for one side.
    pub fn selected(&self, corpus: Corpus) -> Option<&[TermCount]> {
        self.side(corpus).map(|stats| stats.table(self.stat_type))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SemanticView {
    pub corpus: Corpus,
    pub concordances: Vec<Concordance>,
    pub neighbors: Vec<NeighborEntry>,
    pub clusters: Vec<SemanticCluster>,
    pub loaded_at: DateTime<Utc>,
}

impl SemanticView {
    pub fn new(corpus: Corpus, results: SemanticResults) -> Self {
        Self {
            corpus,
            concordances: results.concordances,
            neighbors: results.neighbors,
            clusters: results.clusters,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty(corpus: Corpus) -> Self {
        Self::new(corpus, SemanticResults::default())
    }

    pub fn is_empty(&self) -> bool {
        self.concordances.is_empty() && self.neighbors.is_empty() && self.clusters.is_empty()
    }
}

/// Sentiment records with their derived aggregates.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentView {
    pub corpus: Corpus,
    pub victims: Vec<VictimSentiment>,
    pub actors: Vec<ActorSentiment>,
    /// `None` when there are no victim records.
    pub victim_mean: Option<AggregateStat>,
    pub victim_labels: LabelCounts,
    pub actor_occurrences: u64,
    pub loaded_at: DateTime<Utc>,
}

impl SentimentView {
    pub fn new(corpus: Corpus, results: SentimentResults) -> Self {
        let victim_mean = mean_victim_sentiment(&results.victims);
        let victim_labels = LabelCounts::tally(results.victims.iter().map(VictimSentiment::label));
        let actor_occurrences = total_actor_occurrences(&results.actors);
        Self {
            corpus,
            victims: results.victims,
            actors: results.actors,
            victim_mean,
            victim_labels,
            actor_occurrences,
            loaded_at: Utc::now(),
        }
    }

    pub fn empty(corpus: Corpus) -> Self {
        Self::new(corpus, SentimentResults::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tc(term: &str, count: u64) -> TermCount {
        TermCount {
            term: term.into(),
            count,
        }
    }

    #[test]
    fn test_corpus_view_takes_total_from_page() {
        let page = CorpusPage {
            total: 45,
            showing: 0,
            texts: vec![],
        };
        let view = CorpusView::new(Corpus::Gaza, PageWindow::first(20).at(3), page);
        assert_eq!(view.window.total, 45);
        assert_eq!(view.window.last_page(), 3);
        assert!(!view.has_next());
        assert!(view.has_previous());
    }

    #[test]
    fn test_lexical_view_keeps_empty_ngram_slots() {
        let stats = LexicalStats {
            gaza_wordfreq: vec![tc("gaza", 10)],
            ..Default::default()
        };
        let ngrams = NgramTables {
            ukraine_bigrams: vec![tc("kyiv region", 3)],
            ..Default::default()
        };
        let view = LexicalView::assemble(stats, ngrams);
        assert_eq!(view.gaza_wordfreq.len(), 1);
        assert!(view.gaza_bigrams.is_empty());
        assert_eq!(view.ukraine_bigrams[0].term, "kyiv region");
    }

    #[test]
    fn test_actor_view_selected_table() {
        let gaza = ActorStats {
            adjectives: vec![tc("brutal", 2)],
            ..Default::default()
        };
        let view = ActorStatsView::new("israel", StatType::Adjectives, Some(gaza), None);
        assert_eq!(view.selected(Corpus::Gaza).unwrap()[0].term, "brutal");
        assert!(view.selected(Corpus::Ukraine).is_none());
    }

    #[test]
    fn test_sentiment_view_aggregates() {
        let results = SentimentResults {
            victims: [0.2, -0.4, 0.0]
                .iter()
                .enumerate()
                .map(|(i, s)| VictimSentiment {
                    doc_id: format!("Article {}", i + 1),
                    context_text: "N/A".into(),
                    score: *s,
                })
                .collect(),
            actors: vec![
                ActorSentiment {
                    actor: "israel".into(),
                    mean_score: -0.2,
                    occurrences: 4,
                },
                ActorSentiment {
                    actor: "hamas".into(),
                    mean_score: -0.3,
                    occurrences: 1,
                },
            ],
        };
        let view = SentimentView::new(Corpus::Gaza, results);
        let mean = view.victim_mean.unwrap();
        assert!((mean.mean - (-0.0667)).abs() < 1e-3);
        assert_eq!(view.actor_occurrences, 5);
        assert_eq!(view.victim_labels.negative, 1);
        assert_eq!(view.victim_labels.neutral, 1);
    }

    #[test]
    fn test_empty_views() {
        let view = SentimentView::empty(Corpus::Ukraine);
        assert!(view.victim_mean.is_none());
        assert_eq!(view.actor_occurrences, 0);
        assert!(SemanticView::empty(Corpus::Gaza).is_empty());
    }
}

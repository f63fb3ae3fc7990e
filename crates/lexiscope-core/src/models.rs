//! Canonical records produced by normalization.
//!
//! Nothing here is persisted: every value is rebuilt from network responses
//! and owned by the session view model that displays it.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::stats::{classify_sentiment, SentimentLabel};

// =============================================================================
// SELECTORS
// =============================================================================

/// One of the two compared text collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Corpus {
    #[default]
    Gaza,
    Ukraine,
}

impl Corpus {
    pub const ALL: [Corpus; 2] = [Corpus::Gaza, Corpus::Ukraine];

    pub fn as_str(&self) -> &'static str {
        match self {
            Corpus::Gaza => "gaza",
            Corpus::Ukraine => "ukraine",
        }
    }
}

impl fmt::Display for Corpus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Corpus {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "gaza" => Ok(Corpus::Gaza),
            "ukraine" => Ok(Corpus::Ukraine),
            _ => Err(Error::Config(format!(
                "unknown corpus '{}', expected gaza or ukraine",
                s
            ))),
        }
    }
}

/// Long-running remote job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobKind {
    Scraping,
    Lexical,
    Semantic,
    Sentiment,
}

impl JobKind {
    pub const ALL: [JobKind; 4] = [
        JobKind::Scraping,
        JobKind::Lexical,
        JobKind::Semantic,
        JobKind::Sentiment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            JobKind::Scraping => "scraping",
            JobKind::Lexical => "lexical",
            JobKind::Semantic => "semantic",
            JobKind::Sentiment => "sentiment",
        }
    }

    /// Analysis jobs share one status endpoint and are never polled.
    pub fn is_analysis(&self) -> bool {
        !matches!(self, JobKind::Scraping)
    }
}

impl fmt::Display for JobKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for JobKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "scraping" | "scrape" => Ok(JobKind::Scraping),
            "lexical" => Ok(JobKind::Lexical),
            "semantic" => Ok(JobKind::Semantic),
            "sentiment" => Ok(JobKind::Sentiment),
            _ => Err(Error::Config(format!("unknown job kind '{}'", s))),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NgramKind {
    Bigrams,
    Trigrams,
}

impl NgramKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            NgramKind::Bigrams => "bigrams",
            NgramKind::Trigrams => "trigrams",
        }
    }
}

/// Slice of the log-odds table served by the service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogOddsVariant {
    #[default]
    Top200,
    Bottom200,
    Full,
}

impl LogOddsVariant {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogOddsVariant::Top200 => "top200",
            LogOddsVariant::Bottom200 => "bottom200",
            LogOddsVariant::Full => "full",
        }
    }
}

impl FromStr for LogOddsVariant {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "top200" | "top" => Ok(LogOddsVariant::Top200),
            "bottom200" | "bottom" => Ok(LogOddsVariant::Bottom200),
            "full" => Ok(LogOddsVariant::Full),
            _ => Err(Error::Config(format!(
                "unknown log-odds variant '{}', expected top200, bottom200 or full",
                s
            ))),
        }
    }
}

/// Which per-actor table a view displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatType {
    #[default]
    Context,
    Adjectives,
    Nouns,
    Verbs,
}

impl FromStr for StatType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "context" => Ok(StatType::Context),
            "adjectives" | "adj" => Ok(StatType::Adjectives),
            "nouns" | "noun" => Ok(StatType::Nouns),
            "verbs" | "verb" => Ok(StatType::Verbs),
            _ => Err(Error::Config(format!("unknown stat type '{}'", s))),
        }
    }
}

// =============================================================================
// JOBS
// =============================================================================

/// Acknowledgement of a job start.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accepted {
    pub message: String,
}

/// Lifecycle state derived from a [`JobStatus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum JobState {
    Idle,
    Running,
    Completed,
    Failed,
}

/// Last known status of one job kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobStatus {
    pub kind: JobKind,
    pub running: bool,
    pub completed: bool,
    pub error: Option<String>,
}

impl JobStatus {
    /// Session-start status: nothing running, nothing completed.
    pub fn idle(kind: JobKind) -> Self {
        Self {
            kind,
            running: false,
            completed: false,
            error: None,
        }
    }

    pub fn state(&self) -> JobState {
        if self.running {
            JobState::Running
        } else if self.error.is_some() {
            JobState::Failed
        } else if self.completed {
            JobState::Completed
        } else {
            JobState::Idle
        }
    }
}

// =============================================================================
// CORPUS
// =============================================================================

/// Snapshot of one scraped document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CorpusText {
    pub filename: String,
    pub word_count: u64,
    pub preview: String,
}

/// One page of corpus texts. `showing == texts.len() <= total`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CorpusPage {
    pub total: u64,
    pub showing: u64,
    pub texts: Vec<CorpusText>,
}

// =============================================================================
// LEXICAL
// =============================================================================

/// Frequency, n-gram and actor-token record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TermCount {
    pub term: String,
    pub count: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TfidfEntry {
    pub term: String,
    pub score: f64,
}

/// Which corpus a term skews toward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CorpusSkew {
    /// Positive log-odds (Gaza).
    CorpusA,
    /// Negative log-odds (Ukraine).
    CorpusB,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogOddsEntry {
    pub term: String,
    pub count_a: u64,
    pub count_b: u64,
    pub log_odds: f64,
    pub z: f64,
}

impl LogOddsEntry {
    pub fn skew(&self) -> Option<CorpusSkew> {
        if self.log_odds > 0.0 {
            Some(CorpusSkew::CorpusA)
        } else if self.log_odds < 0.0 {
            Some(CorpusSkew::CorpusB)
        } else {
            None
        }
    }
}

/// Main lexical statistics, as served by the combined results endpoint.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LexicalStats {
    pub gaza_wordfreq: Vec<TermCount>,
    pub ukraine_wordfreq: Vec<TermCount>,
    pub tfidf_gaza: Vec<TfidfEntry>,
    pub tfidf_ukraine: Vec<TfidfEntry>,
    pub logodds_top: Vec<LogOddsEntry>,
    pub logodds_bottom: Vec<LogOddsEntry>,
}

/// Per-actor token tables for one corpus.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ActorStats {
    pub context: Vec<TermCount>,
    pub adjectives: Vec<TermCount>,
    pub nouns: Vec<TermCount>,
    pub verbs: Vec<TermCount>,
}

impl ActorStats {
    pub fn table(&self, stat: StatType) -> &[TermCount] {
        match stat {
            StatType::Context => &self.context,
            StatType::Adjectives => &self.adjectives,
            StatType::Nouns => &self.nouns,
            StatType::Verbs => &self.verbs,
        }
    }
}

// =============================================================================
// SEMANTIC
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConcordanceLine {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub doc_id: Option<String>,
    pub left: String,
    pub keyword: String,
    pub right: String,
}

/// Occurrences of one keyword, in server order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Concordance {
    pub keyword: String,
    pub occurrences: Vec<ConcordanceLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborEntry {
    pub actor: String,
    pub neighbor: String,
    pub similarity: Option<f64>,
}

/// Cluster identifier as the service labels it.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(untagged)]
pub enum ClusterId {
    Number(i64),
    Label(String),
}

impl fmt::Display for ClusterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClusterId::Number(n) => write!(f, "{}", n),
            ClusterId::Label(s) => f.write_str(s),
        }
    }
}

/// Canonical semantic cluster; `terms` is de-duplicated and sorted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SemanticCluster {
    pub id: ClusterId,
    pub terms: Vec<String>,
}

/// Everything the semantic results endpoint returns for one corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SemanticResults {
    pub concordances: Vec<Concordance>,
    pub neighbors: Vec<NeighborEntry>,
    pub clusters: Vec<SemanticCluster>,
}

// =============================================================================
// SENTIMENT
// =============================================================================

/// Sentiment of a context mentioning civilian victims.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VictimSentiment {
    pub doc_id: String,
    pub context_text: String,
    pub score: f64,
}

impl VictimSentiment {
    pub fn label(&self) -> SentimentLabel {
        classify_sentiment(self.score)
    }
}

/// Mean sentiment of the language used around one actor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActorSentiment {
    pub actor: String,
    pub mean_score: f64,
    pub occurrences: u64,
}

impl ActorSentiment {
    pub fn label(&self) -> SentimentLabel {
        classify_sentiment(self.mean_score)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SentimentResults {
    pub victims: Vec<VictimSentiment>,
    pub actors: Vec<ActorSentiment>,
}

/// Mean over a non-empty set of scores.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AggregateStat {
    pub mean: f64,
    pub count: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_corpus_round_trip_str() {
        for corpus in Corpus::ALL {
            assert_eq!(corpus.as_str().parse::<Corpus>().unwrap(), corpus);
        }
        assert!("mars".parse::<Corpus>().is_err());
        assert_eq!("UKRAINE".parse::<Corpus>().unwrap(), Corpus::Ukraine);
    }

    #[test]
    fn test_job_kind_analysis_flag() {
        assert!(!JobKind::Scraping.is_analysis());
        assert!(JobKind::Lexical.is_analysis());
        assert!(JobKind::Semantic.is_analysis());
        assert!(JobKind::Sentiment.is_analysis());
    }

    #[test]
    fn test_job_status_idle() {
        let status = JobStatus::idle(JobKind::Scraping);
        assert!(!status.running);
        assert!(!status.completed);
        assert!(status.error.is_none());
        assert_eq!(status.state(), JobState::Idle);
    }

    #[test]
    fn test_job_state_running_wins() {
        let status = JobStatus {
            kind: JobKind::Lexical,
            running: true,
            completed: true,
            error: Some("old".into()),
        };
        assert_eq!(status.state(), JobState::Running);
    }

    #[test]
    fn test_job_state_failed_and_completed() {
        let mut status = JobStatus::idle(JobKind::Scraping);
        status.error = Some("timeout".into());
        assert_eq!(status.state(), JobState::Failed);

        status.error = None;
        status.completed = true;
        assert_eq!(status.state(), JobState::Completed);
    }

    #[test]
    fn test_logodds_skew_sign() {
        let mut entry = LogOddsEntry {
            term: "occupation".into(),
            count_a: 40,
            count_b: 2,
            log_odds: 2.1,
            z: 5.0,
        };
        assert_eq!(entry.skew(), Some(CorpusSkew::CorpusA));
        entry.log_odds = -0.3;
        assert_eq!(entry.skew(), Some(CorpusSkew::CorpusB));
        entry.log_odds = 0.0;
        assert_eq!(entry.skew(), None);
    }

    #[test]
    fn test_cluster_id_serializes_untagged() {
        let json = serde_json::to_value(ClusterId::Number(3)).unwrap();
        assert_eq!(json, serde_json::json!(3));
        let json = serde_json::to_value(ClusterId::Label("misc".into())).unwrap();
        assert_eq!(json, serde_json::json!("misc"));
    }

    #[test]
    fn test_actor_stats_table_selects_by_stat_type() {
        let stats = ActorStats {
            verbs: vec![TermCount {
                term: "bombed".into(),
                count: 4,
            }],
            ..Default::default()
        };
        assert_eq!(stats.table(StatType::Verbs)[0].term, "bombed");
        assert!(stats.table(StatType::Context).is_empty());
    }

    #[test]
    fn test_stat_type_parse_aliases() {
        assert_eq!("adj".parse::<StatType>().unwrap(), StatType::Adjectives);
        assert_eq!("Verbs".parse::<StatType>().unwrap(), StatType::Verbs);
        assert!("adverbs".parse::<StatType>().is_err());
    }

    #[test]
    fn test_logodds_variant_parse() {
        assert_eq!(
            "bottom200".parse::<LogOddsVariant>().unwrap(),
            LogOddsVariant::Bottom200
        );
        assert_eq!(LogOddsVariant::default().as_str(), "top200");
    }
}

//! Per-endpoint record normalization.
//!
//! Each function takes the unwrapped `data` value of one endpoint and returns
//! canonical records. `null` stands for "no results yet" and yields empty
//! output; a value of the wrong JSON type is a decode error. Rows inside a
//! list are resolved field by field with the defaults below, so a sparse row
//! still produces a record.

use serde_json::{Map, Value};
use tracing::{debug, trace, warn};

use super::clusters::normalize_clusters;
use super::fields::{as_flag, as_text, as_u64, json_type, FieldChain};
use crate::defaults::{ACTOR_OCCURRENCES, MISSING_TERM, MISSING_TEXT};
use crate::error::{Error, Result};
use crate::models::{
    Accepted, ActorSentiment, ActorStats, Concordance, ConcordanceLine, CorpusPage, CorpusText,
    JobKind, JobStatus, LexicalStats, LogOddsEntry, NeighborEntry, SemanticResults,
    SentimentResults, TermCount, TfidfEntry, VictimSentiment,
};

static NULL: Value = Value::Null;

// Term counts (word frequency, n-grams, actor tokens)
const TERM: FieldChain = FieldChain::new(&["term", "word", "token"]);
const COUNT: FieldChain = FieldChain::new(&["count", "frequency", "freq"]);

const TFIDF_TERM: FieldChain = FieldChain::new(&["term", "word"]);
const TFIDF_SCORE: FieldChain = FieldChain::new(&["score", "tfidf"]);

const LOGODDS_TERM: FieldChain = FieldChain::new(&["term", "word"]);
const LOGODDS_COUNT_A: FieldChain = FieldChain::new(&["count_a"]);
const LOGODDS_COUNT_B: FieldChain = FieldChain::new(&["count_b"]);
const LOGODDS_VALUE: FieldChain = FieldChain::new(&["logodds", "log_odds"]);
const LOGODDS_Z: FieldChain = FieldChain::new(&["z", "z_score"]);

const TEXT_FILENAME: FieldChain = FieldChain::new(&["filename"]);
const TEXT_WORDS: FieldChain = FieldChain::new(&["word_count", "wordCount"]);
const TEXT_PREVIEW: FieldChain = FieldChain::new(&["preview"]);

const CONC_DOC: FieldChain = FieldChain::new(&["doc_id", "id"]);
const CONC_LEFT: FieldChain = FieldChain::new(&["left", "context_left"]);
const CONC_RIGHT: FieldChain = FieldChain::new(&["right", "context_right"]);
const CONC_KEYWORD: FieldChain = FieldChain::new(&["keyword"]);

const NEIGHBOR_ACTOR: FieldChain = FieldChain::new(&["actor", "entity"]);
const NEIGHBOR_WORD: FieldChain = FieldChain::new(&["neighbor", "word"]);
const NEIGHBOR_SIMILARITY: FieldChain = FieldChain::new(&["similarity", "sim"]);
const NEIGHBOR_LIST: FieldChain = FieldChain::new(&["word2vec_neighbors", "neighbors"]);

const VICTIM_DOC: FieldChain = FieldChain::new(&["doc_id", "article_id"]);
const VICTIM_CONTEXT: FieldChain = FieldChain::new(&["segment", "context", "text"]);
const VICTIM_SCORE: FieldChain = FieldChain::new(&["compound", "score", "sentiment"]);

const ACTOR_NAME: FieldChain = FieldChain::new(&["actor", "entity"]);
const ACTOR_MEAN: FieldChain =
    FieldChain::new(&["mean_score", "avg_sentiment", "mean", "mean_compound"]);
const ACTOR_OCCURRENCES_FIELD: FieldChain = FieldChain::new(&["count", "occurrences"]);

// =============================================================================
// SHAPE HELPERS
// =============================================================================

fn rows<'a>(value: &'a Value, what: &str) -> Result<&'a [Value]> {
    match value {
        Value::Null => Ok(&[]),
        Value::Array(rows) => Ok(rows),
        other => Err(Error::Decode(format!(
            "{}: expected an array, got {}",
            what,
            json_type(other)
        ))),
    }
}

fn object<'a>(value: &'a Value, what: &str) -> Result<Option<&'a Map<String, Value>>> {
    match value {
        Value::Null => Ok(None),
        Value::Object(map) => Ok(Some(map)),
        other => Err(Error::Decode(format!(
            "{}: expected an object, got {}",
            what,
            json_type(other)
        ))),
    }
}

fn field<'a>(map: &'a Map<String, Value>, key: &str) -> &'a Value {
    map.get(key).unwrap_or(&NULL)
}

/// Object rows only; anything else in a list is skipped.
fn object_rows<'a>(rows: &'a [Value], what: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
    rows.iter().filter(move |row| {
        let keep = row.is_object();
        if !keep {
            trace!(list = what, "Skipping non-object row");
        }
        keep
    })
}

// =============================================================================
// JOBS
// =============================================================================

/// Acknowledgement of a job start; the server's message when it sent one.
pub fn accepted(kind: JobKind, body: &Value) -> Accepted {
    let message = body
        .get("message")
        .and_then(as_text)
        .unwrap_or_else(|| format!("{} started", kind));
    Accepted { message }
}

/// Status of `kind` from a status payload.
///
/// Scraping status is the payload itself; analysis status is one entry of the
/// combined analysis-status object, which never carries an error.
pub fn job_status(kind: JobKind, data: &Value) -> Result<JobStatus> {
    let entry = if kind.is_analysis() {
        data.get(kind.as_str())
    } else {
        Some(data)
    };
    let Some(obj) = entry.and_then(Value::as_object) else {
        return Err(Error::Decode(format!(
            "{} status: expected an object, got {}",
            kind,
            entry.map_or("nothing", json_type)
        )));
    };

    Ok(JobStatus {
        kind,
        running: as_flag(obj.get("running")),
        completed: as_flag(obj.get("completed")),
        error: obj.get("error").and_then(as_text),
    })
}

// =============================================================================
// CORPUS
// =============================================================================

/// One page of corpus texts requested with `limit`.
///
/// `showing` is recounted from the texts actually kept, and `total` never
/// drops below it.
pub fn corpus_page(data: &Value, limit: u64) -> Result<CorpusPage> {
    let Some(obj) = object(data, "corpus texts")? else {
        return Ok(CorpusPage::default());
    };

    let mut texts: Vec<CorpusText> = object_rows(rows(field(obj, "texts"), "texts")?, "texts")
        .filter_map(|row| {
            let Some(filename) = TEXT_FILENAME.text(row) else {
                trace!("Skipping corpus text without a filename");
                return None;
            };
            Some(CorpusText {
                filename,
                word_count: TEXT_WORDS.u64(row).unwrap_or(0),
                preview: TEXT_PREVIEW.text(row).unwrap_or_default(),
            })
        })
        .collect();

    let limit = usize::try_from(limit).unwrap_or(usize::MAX);
    if texts.len() > limit {
        debug!(
            received = texts.len(),
            limit, "Corpus page longer than requested, truncating"
        );
        texts.truncate(limit);
    }

    let showing = texts.len() as u64;
    let total = as_u64(field(obj, "total")).unwrap_or(0).max(showing);
    Ok(CorpusPage {
        total,
        showing,
        texts,
    })
}

// =============================================================================
// LEXICAL
// =============================================================================

pub fn term_count(row: &Value) -> TermCount {
    TermCount {
        term: TERM
            .text(row)
            .unwrap_or_else(|| MISSING_TERM.to_string()),
        count: COUNT.u64(row).unwrap_or(0),
    }
}

/// Frequency, n-gram or actor-token rows.
pub fn term_counts(value: &Value, what: &str) -> Result<Vec<TermCount>> {
    Ok(object_rows(rows(value, what)?, what).map(term_count).collect())
}

pub fn tfidf_entries(value: &Value, what: &str) -> Result<Vec<TfidfEntry>> {
    Ok(object_rows(rows(value, what)?, what)
        .map(|row| TfidfEntry {
            term: TFIDF_TERM
                .text(row)
                .unwrap_or_else(|| MISSING_TERM.to_string()),
            score: TFIDF_SCORE.f64(row).unwrap_or(0.0),
        })
        .collect())
}

fn logodds_entry(row: &Value) -> Option<LogOddsEntry> {
    Some(LogOddsEntry {
        term: LOGODDS_TERM.text(row)?,
        count_a: LOGODDS_COUNT_A.u64(row)?,
        count_b: LOGODDS_COUNT_B.u64(row)?,
        log_odds: LOGODDS_VALUE.f64(row)?,
        z: LOGODDS_Z.f64(row)?,
    })
}

/// Log-odds rows. The table is expected to be complete; rows missing a
/// column are dropped rather than defaulted.
pub fn logodds_entries(value: &Value, what: &str) -> Result<Vec<LogOddsEntry>> {
    let rows = rows(value, what)?;
    let entries: Vec<LogOddsEntry> = rows.iter().filter_map(logodds_entry).collect();
    if entries.len() < rows.len() {
        debug!(
            list = what,
            dropped = rows.len() - entries.len(),
            "Dropped incomplete log-odds rows"
        );
    }
    Ok(entries)
}

/// Main statistics from the combined lexical results payload.
pub fn lexical_stats(data: &Value) -> Result<LexicalStats> {
    let Some(obj) = object(data, "lexical results")? else {
        return Err(Error::Decode("lexical results: missing data".to_string()));
    };
    Ok(LexicalStats {
        gaza_wordfreq: term_counts(field(obj, "gaza_wordfreq"), "gaza_wordfreq")?,
        ukraine_wordfreq: term_counts(field(obj, "ukraine_wordfreq"), "ukraine_wordfreq")?,
        tfidf_gaza: tfidf_entries(field(obj, "tfidf_gaza"), "tfidf_gaza")?,
        tfidf_ukraine: tfidf_entries(field(obj, "tfidf_ukraine"), "tfidf_ukraine")?,
        logodds_top: logodds_entries(field(obj, "logodds_top"), "logodds_top")?,
        logodds_bottom: logodds_entries(field(obj, "logodds_bottom"), "logodds_bottom")?,
    })
}

/// Token tables of one actor in one corpus.
pub fn actor_stats(data: &Value) -> Result<ActorStats> {
    let Some(obj) = object(data, "actor stats")? else {
        return Ok(ActorStats::default());
    };
    Ok(ActorStats {
        context: term_counts(field(obj, "context"), "context")?,
        adjectives: term_counts(field(obj, "adjectives"), "adjectives")?,
        nouns: term_counts(field(obj, "nouns"), "nouns")?,
        verbs: term_counts(field(obj, "verbs"), "verbs")?,
    })
}

// =============================================================================
// SEMANTIC
// =============================================================================

/// Keyword concordances in server order.
pub fn concordances(value: &Value) -> Result<Vec<Concordance>> {
    let Some(obj) = object(value, "concordances")? else {
        return Ok(Vec::new());
    };

    let mut out = Vec::with_capacity(obj.len());
    for (keyword, lines) in obj {
        let lines = match rows(lines, "concordance") {
            Ok(lines) => lines,
            Err(e) => {
                warn!(keyword = %keyword, error = %e, "Skipping malformed concordance");
                continue;
            }
        };
        let occurrences = object_rows(lines, "concordance")
            .map(|row| ConcordanceLine {
                doc_id: CONC_DOC.text(row),
                left: CONC_LEFT.text(row).unwrap_or_default(),
                keyword: CONC_KEYWORD.text(row).unwrap_or_else(|| keyword.clone()),
                right: CONC_RIGHT.text(row).unwrap_or_default(),
            })
            .collect();
        out.push(Concordance {
            keyword: keyword.clone(),
            occurrences,
        });
    }
    Ok(out)
}

pub fn neighbors(value: &Value) -> Result<Vec<NeighborEntry>> {
    Ok(object_rows(rows(value, "neighbors")?, "neighbors")
        .map(|row| NeighborEntry {
            actor: NEIGHBOR_ACTOR
                .text(row)
                .unwrap_or_else(|| MISSING_TEXT.to_string()),
            neighbor: NEIGHBOR_WORD
                .text(row)
                .unwrap_or_else(|| MISSING_TERM.to_string()),
            similarity: NEIGHBOR_SIMILARITY.f64(row),
        })
        .collect())
}

/// The full semantic payload. It is authoritative for all three parts: if
/// any part is unusable the whole payload is rejected.
pub fn semantic_results(data: &Value) -> Result<SemanticResults> {
    let Some(obj) = object(data, "semantic results")? else {
        return Ok(SemanticResults::default());
    };
    let neighbor_rows = NEIGHBOR_LIST
        .first_present(data)
        .map_or(&NULL, |(_, v)| v);

    Ok(SemanticResults {
        concordances: concordances(field(obj, "concordances"))?,
        neighbors: neighbors(neighbor_rows)?,
        clusters: normalize_clusters(field(obj, "clusters"))?,
    })
}

// =============================================================================
// SENTIMENT
// =============================================================================

/// Victim-context rows. Documents without an id are labelled by their
/// 1-based position in the list.
pub fn victim_sentiments(value: &Value) -> Result<Vec<VictimSentiment>> {
    Ok(rows(value, "victims")?
        .iter()
        .enumerate()
        .filter(|(_, row)| row.is_object())
        .map(|(i, row)| VictimSentiment {
            doc_id: VICTIM_DOC
                .text(row)
                .unwrap_or_else(|| format!("Article {}", i + 1)),
            context_text: VICTIM_CONTEXT
                .text(row)
                .unwrap_or_else(|| MISSING_TEXT.to_string()),
            score: VICTIM_SCORE.f64_or(row, 0.0),
        })
        .collect())
}

pub fn actor_sentiments(value: &Value) -> Result<Vec<ActorSentiment>> {
    Ok(object_rows(rows(value, "actors")?, "actors")
        .map(|row| ActorSentiment {
            actor: ACTOR_NAME
                .text(row)
                .unwrap_or_else(|| MISSING_TEXT.to_string()),
            mean_score: ACTOR_MEAN.f64_or(row, 0.0),
            occurrences: ACTOR_OCCURRENCES_FIELD
                .u64(row)
                .unwrap_or(ACTOR_OCCURRENCES),
        })
        .collect())
}

pub fn sentiment_results(data: &Value) -> Result<SentimentResults> {
    let Some(obj) = object(data, "sentiment results")? else {
        return Ok(SentimentResults::default());
    };
    Ok(SentimentResults {
        victims: victim_sentiments(field(obj, "victims"))?,
        actors: actor_sentiments(field(obj, "actors"))?,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ClusterId;
    use serde_json::json;

    #[test]
    fn test_term_count_resolution_chain() {
        let rows = json!([
            {"word": "attack", "frequency": "12"},
            {"token": "siege", "freq": 3.0},
            {"term": "strike", "word": "ignored", "count": 5},
            {}
        ]);
        let counts = term_counts(&rows, "wordfreq").unwrap();
        assert_eq!(
            counts,
            vec![
                TermCount {
                    term: "attack".into(),
                    count: 12
                },
                TermCount {
                    term: "siege".into(),
                    count: 3
                },
                TermCount {
                    term: "strike".into(),
                    count: 5
                },
                TermCount {
                    term: "-".into(),
                    count: 0
                },
            ]
        );
    }

    #[test]
    fn test_null_list_is_empty_and_scalar_is_decode_error() {
        assert!(term_counts(&Value::Null, "bigrams").unwrap().is_empty());
        assert!(term_counts(&json!([]), "bigrams").unwrap().is_empty());
        let err = term_counts(&json!("oops"), "bigrams").unwrap_err();
        assert!(err.is_decode());
        assert!(err.to_string().contains("bigrams"));
    }

    #[test]
    fn test_tfidf_accepts_string_scores() {
        let rows = json!([{"word": "ceasefire", "tfidf": "0.42"}, {"term": "aid", "score": 0.1}]);
        let entries = tfidf_entries(&rows, "tfidf_gaza").unwrap();
        assert_eq!(entries[0].term, "ceasefire");
        assert!((entries[0].score - 0.42).abs() < 1e-12);
        assert!((entries[1].score - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_logodds_csv_strings_and_incomplete_rows() {
        let rows = json!([
            {"term": "occupation", "count_a": "40", "count_b": "2", "logodds": "2.31", "z": "6.5"},
            {"term": "invasion", "count_a": 3, "count_b": 90, "logodds": -2.9, "z": -8.1},
            {"term": "broken", "count_a": 1}
        ]);
        let entries = logodds_entries(&rows, "logodds_top").unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].count_a, 40);
        assert!((entries[0].log_odds - 2.31).abs() < 1e-12);
        assert!(entries[1].log_odds < 0.0);
    }

    #[test]
    fn test_corpus_page_recounts_showing() {
        let data = json!({
            "total": 45,
            "showing": 99,
            "texts": [
                {"filename": "a.txt", "word_count": 120, "preview": "..."},
                {"filename": "b.txt", "word_count": "80"},
                {"preview": "no filename"}
            ]
        });
        let page = corpus_page(&data, 20).unwrap();
        assert_eq!(page.showing, 2);
        assert_eq!(page.texts.len(), 2);
        assert_eq!(page.total, 45);
        assert_eq!(page.texts[1].word_count, 80);
        assert_eq!(page.texts[1].preview, "");
    }

    #[test]
    fn test_corpus_page_invariants_hold_on_bad_totals() {
        let data = json!({
            "total": 1,
            "texts": [{"filename": "a.txt"}, {"filename": "b.txt"}, {"filename": "c.txt"}]
        });
        let page = corpus_page(&data, 2).unwrap();
        assert_eq!(page.showing, 2);
        assert_eq!(page.total, 2);
        assert!(page.showing <= page.total);

        let empty = corpus_page(&json!({"texts": [], "total": 0}), 20).unwrap();
        assert_eq!(empty, CorpusPage::default());
    }

    #[test]
    fn test_job_status_scraping_and_analysis() {
        let scraping = json!({"running": true, "completed": false, "error": null});
        let status = job_status(JobKind::Scraping, &scraping).unwrap();
        assert!(status.running);
        assert!(status.error.is_none());

        let failed = json!({"running": false, "completed": false, "error": "timeout"});
        let status = job_status(JobKind::Scraping, &failed).unwrap();
        assert_eq!(status.error.as_deref(), Some("timeout"));

        let analysis = json!({
            "lexical": {"running": false, "completed": true},
            "semantic": {"running": true, "completed": false},
            "sentiment": {"running": false, "completed": false}
        });
        let status = job_status(JobKind::Lexical, &analysis).unwrap();
        assert!(status.completed);
        assert_eq!(status.kind, JobKind::Lexical);
        assert!(job_status(JobKind::Semantic, &analysis).unwrap().running);
    }

    #[test]
    fn test_job_status_missing_entry_is_decode_error() {
        let err = job_status(JobKind::Sentiment, &json!({"lexical": {}})).unwrap_err();
        assert!(err.is_decode());
        assert!(job_status(JobKind::Scraping, &json!([])).is_err());
    }

    #[test]
    fn test_accepted_message_fallback() {
        let body = json!({"status": "success", "message": "Analyse lexicale démarrée"});
        assert_eq!(
            accepted(JobKind::Lexical, &body).message,
            "Analyse lexicale démarrée"
        );
        assert_eq!(
            accepted(JobKind::Scraping, &json!({})).message,
            "scraping started"
        );
    }

    #[test]
    fn test_lexical_stats_requires_data() {
        assert!(lexical_stats(&Value::Null).unwrap_err().is_decode());

        let data = json!({
            "gaza_wordfreq": [{"term": "gaza", "count": "300"}],
            "ukraine_wordfreq": [],
            "tfidf_gaza": [{"term": "rafah", "score": "0.3"}],
            "logodds_top": [{"term": "occupation", "count_a": 4, "count_b": 1, "logodds": 1.2, "z": 2.0}],
            "summary": {"docs": 10}
        });
        let stats = lexical_stats(&data).unwrap();
        assert_eq!(stats.gaza_wordfreq[0].count, 300);
        assert!(stats.ukraine_wordfreq.is_empty());
        assert!(stats.tfidf_ukraine.is_empty());
        assert!(stats.logodds_bottom.is_empty());
        assert_eq!(stats.logodds_top.len(), 1);
    }

    #[test]
    fn test_actor_stats_tables() {
        let data = json!({
            "context": [{"word": "army", "count": 9}],
            "adjectives": [{"token": "brutal", "count": "2"}],
            "verbs": [],
            "nouns": null
        });
        let stats = actor_stats(&data).unwrap();
        assert_eq!(stats.context[0].term, "army");
        assert_eq!(stats.adjectives[0].count, 2);
        assert!(stats.nouns.is_empty());
        assert_eq!(actor_stats(&Value::Null).unwrap(), ActorStats::default());
    }

    #[test]
    fn test_concordances_keep_server_order_and_default_keyword() {
        let data = json!({
            "strike": [{"id": "d1", "context_left": "an air", "context_right": "on the camp"}],
            "attack": [{"doc_id": 7, "left": "the", "keyword": "attacks", "right": "continued"}],
            "civilian": "not a list"
        });
        let out = concordances(&data).unwrap();
        let keywords: Vec<&str> = out.iter().map(|c| c.keyword.as_str()).collect();
        assert_eq!(keywords, vec!["strike", "attack"]);

        let line = &out[0].occurrences[0];
        assert_eq!(line.doc_id.as_deref(), Some("d1"));
        assert_eq!(line.keyword, "strike");
        assert_eq!(line.left, "an air");
        assert_eq!(out[1].occurrences[0].doc_id.as_deref(), Some("7"));
        assert_eq!(out[1].occurrences[0].keyword, "attacks");
    }

    #[test]
    fn test_neighbors_similarity_is_optional() {
        let rows = json!([
            {"actor": "israel", "neighbor": "idf", "similarity": "0.81"},
            {"entity": "russia", "word": "kremlin", "sim": "n/a"}
        ]);
        let out = neighbors(&rows).unwrap();
        assert_eq!(out[0].similarity, Some(0.81));
        assert_eq!(out[1].actor, "russia");
        assert_eq!(out[1].neighbor, "kremlin");
        assert_eq!(out[1].similarity, None);
    }

    #[test]
    fn test_semantic_results_all_parts() {
        let data = json!({
            "concordances": {"attack": []},
            "word2vec_neighbors": [{"actor": "hamas", "neighbor": "militants", "similarity": 0.7}],
            "clusters": [{"cluster": 1, "word": "tank"}, {"cluster": 0, "word": "aid"}]
        });
        let results = semantic_results(&data).unwrap();
        assert_eq!(results.concordances.len(), 1);
        assert_eq!(results.neighbors.len(), 1);
        assert_eq!(results.clusters[0].id, ClusterId::Number(0));
    }

    #[test]
    fn test_semantic_results_reject_bad_clusters() {
        let data = json!({"concordances": {}, "clusters": 42});
        let err = semantic_results(&data).unwrap_err();
        assert!(matches!(err, Error::Validation(_)));
    }

    #[test]
    fn test_victim_sentiment_resolution() {
        let rows = json!([
            {"article_id": "a-17", "segment": "children killed", "compound": "-0.8"},
            {"context": "aid arrived", "compound": "n/a", "score": 0.6},
            {"text": "ceasefire talks", "sentiment": 0.3}
        ]);
        let out = victim_sentiments(&rows).unwrap();
        assert_eq!(out[0].doc_id, "a-17");
        assert!((out[0].score + 0.8).abs() < 1e-12);
        assert_eq!(out[1].doc_id, "Article 2");
        assert_eq!(out[1].score, 0.0);
        assert_eq!(out[2].context_text, "ceasefire talks");
        assert!((out[2].score - 0.3).abs() < 1e-12);
    }

    #[test]
    fn test_victim_sentiment_defaults() {
        let out = victim_sentiments(&json!([{}])).unwrap();
        assert_eq!(out[0].doc_id, "Article 1");
        assert_eq!(out[0].context_text, "N/A");
        assert_eq!(out[0].score, 0.0);
    }

    #[test]
    fn test_actor_sentiment_resolution() {
        let rows = json!([
            {"actor": "israel", "mean_score": "-0.21", "count": "14"},
            {"entity": "hamas", "mean_compound": -0.4},
            {"actor": "russia", "avg_sentiment": 0.1, "occurrences": "x"}
        ]);
        let out = actor_sentiments(&rows).unwrap();
        assert_eq!(out[0].occurrences, 14);
        assert!((out[0].mean_score + 0.21).abs() < 1e-12);
        assert_eq!(out[1].actor, "hamas");
        assert!((out[1].mean_score + 0.4).abs() < 1e-12);
        assert_eq!(out[1].occurrences, 1);
        assert_eq!(out[2].occurrences, 1);
    }

    #[test]
    fn test_sentiment_results_empty_lists() {
        let results = sentiment_results(&json!({"victims": [], "actors": []})).unwrap();
        assert!(results.victims.is_empty());
        assert!(results.actors.is_empty());
        assert_eq!(
            sentiment_results(&Value::Null).unwrap(),
            SentimentResults::default()
        );
    }
}

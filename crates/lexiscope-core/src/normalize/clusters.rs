//! Semantic cluster normalization.
//!
//! The semantic endpoint has shipped cluster data in five forms:
//!
//! 1. `{"<id>": "w1, w2"}`: mapping to a comma-separated string
//! 2. `{"<id>": ["w1", "w2"]}`: mapping to an array
//! 3. `[{"cluster": <id>, "word": "w1"}, ...]`: one row per (cluster, term)
//! 4. `[{"cluster_id"|"cluster"|"clusterId": <id>, "keywords"|"words"|"keyword": "w1, w2" | [...]}]`
//! 5. `[{"cluster": <id>, "words": ["w1", "w2"]}]`
//!
//! [`detect_entries`] classifies each entry into a [`ClusterEntry`] using an
//! ordered list of predicates; [`normalize_clusters`] merges the entries into
//! one sorted list of [`SemanticCluster`]s.

use std::collections::{BTreeSet, HashMap};

use serde_json::{Map, Value};
use tracing::{debug, trace};

use super::fields::{as_text, json_type, number_text, FieldChain};
use crate::error::{Error, Result};
use crate::models::{ClusterId, SemanticCluster};

const ROW_ID: FieldChain = FieldChain::new(&["cluster_id", "cluster", "clusterId"]);
const ROW_TERMS: FieldChain = FieldChain::new(&["keywords", "words", "keyword"]);

/// Terms carried by a keyword row.
#[derive(Debug, Clone, PartialEq)]
pub enum TermList<'a> {
    Csv(&'a str),
    Array(&'a [Value]),
}

/// One recognized cluster entry, tagged by the form it arrived in.
#[derive(Debug, Clone, PartialEq)]
pub enum ClusterEntry<'a> {
    /// Form 1.
    CsvByKey { id: String, terms: &'a str },
    /// Form 2.
    ListByKey { id: String, terms: &'a [Value] },
    /// Form 3.
    ExplodedRow { id: String, word: String },
    /// Form 4.
    KeywordRow { id: String, terms: TermList<'a> },
    /// Form 5.
    WordsRow { id: String, words: &'a [Value] },
}

impl ClusterEntry<'_> {
    pub fn id(&self) -> &str {
        match self {
            ClusterEntry::CsvByKey { id, .. }
            | ClusterEntry::ListByKey { id, .. }
            | ClusterEntry::ExplodedRow { id, .. }
            | ClusterEntry::KeywordRow { id, .. }
            | ClusterEntry::WordsRow { id, .. } => id,
        }
    }

    /// Trimmed, non-empty terms in source order.
    pub fn terms(&self) -> Vec<String> {
        match self {
            ClusterEntry::CsvByKey { terms, .. }
            | ClusterEntry::KeywordRow {
                terms: TermList::Csv(terms),
                ..
            } => split_csv(terms),
            ClusterEntry::ListByKey { terms, .. }
            | ClusterEntry::KeywordRow {
                terms: TermList::Array(terms),
                ..
            }
            | ClusterEntry::WordsRow { words: terms, .. } => list_terms(terms),
            ClusterEntry::ExplodedRow { word, .. } => clean_term(word).into_iter().collect(),
        }
    }
}

/// Classify raw cluster data into entries.
///
/// `null` is treated as empty. A scalar at the top level is not any known
/// form and is rejected rather than guessed at. Individual entries that match
/// no form are skipped.
pub fn detect_entries(raw: &Value) -> Result<Vec<ClusterEntry<'_>>> {
    match raw {
        Value::Null => Ok(Vec::new()),
        Value::Object(map) => {
            debug!(entries = map.len(), "Cluster payload is a mapping");
            Ok(mapping_entries(map))
        }
        Value::Array(rows) => {
            debug!(rows = rows.len(), "Cluster payload is a row list");
            Ok(rows.iter().filter_map(detect_row).collect())
        }
        other => Err(Error::Validation(format!(
            "unrecognized cluster payload: expected mapping or array, got {}",
            json_type(other)
        ))),
    }
}

fn mapping_entries(map: &Map<String, Value>) -> Vec<ClusterEntry<'_>> {
    map.iter()
        .filter_map(|(key, value)| match value {
            Value::String(terms) => Some(ClusterEntry::CsvByKey {
                id: key.clone(),
                terms,
            }),
            Value::Array(terms) => Some(ClusterEntry::ListByKey {
                id: key.clone(),
                terms,
            }),
            _ => {
                trace!(cluster = %key, "Skipping mapping entry without terms");
                None
            }
        })
        .collect()
}

/// Predicates are tried in order; the first match decides the form.
fn detect_row(row: &Value) -> Option<ClusterEntry<'_>> {
    let obj = row.as_object()?;

    // Form 3: exploded (cluster, word) pair.
    if let (Some(cluster), Some(word)) = (present(obj, "cluster"), present(obj, "word")) {
        let id = cluster_key(cluster)?;
        let word = as_text(word)?;
        return Some(ClusterEntry::ExplodedRow { id, word });
    }

    let Some(id) = ROW_ID.first_present(row).and_then(|(_, v)| cluster_key(v)) else {
        trace!("Skipping cluster row without an id");
        return None;
    };

    match ROW_TERMS.first_present(row) {
        // Form 4 with comma-separated keywords.
        Some((_, Value::String(terms))) => Some(ClusterEntry::KeywordRow {
            id,
            terms: TermList::Csv(terms),
        }),
        // Form 5.
        Some(("words", Value::Array(words))) => Some(ClusterEntry::WordsRow { id, words }),
        // Form 4 with an array of keywords.
        Some((_, Value::Array(terms))) => Some(ClusterEntry::KeywordRow {
            id,
            terms: TermList::Array(terms),
        }),
        _ => {
            trace!(cluster = %id, "Skipping cluster row without terms");
            None
        }
    }
}

/// Merge raw cluster data of any recognized form into sorted clusters.
///
/// Ids are compared as strings, so `2` and `"2"` name the same cluster while
/// `"01"` and `"1"` stay apart. Terms are de-duplicated per cluster. Clusters
/// are ordered numerically when every id parses as a finite number,
/// lexicographically otherwise.
pub fn normalize_clusters(raw: &Value) -> Result<Vec<SemanticCluster>> {
    let entries = detect_entries(raw)?;

    let mut order: Vec<String> = Vec::new();
    let mut groups: HashMap<String, BTreeSet<String>> = HashMap::new();
    for entry in &entries {
        let terms = entry.terms();
        let group = groups.entry(entry.id().to_string()).or_insert_with(|| {
            order.push(entry.id().to_string());
            BTreeSet::new()
        });
        group.extend(terms);
    }

    let all_numeric = order.iter().all(|id| numeric_key(id).is_some());
    let mut clusters: Vec<SemanticCluster> = order
        .into_iter()
        .map(|id| {
            let terms = groups.remove(&id).unwrap_or_default().into_iter().collect();
            SemanticCluster {
                id: cluster_id(id),
                terms,
            }
        })
        .collect();

    if all_numeric {
        clusters.sort_by(|a, b| {
            let (a, b) = (a.id.to_string(), b.id.to_string());
            let x = numeric_key(&a).unwrap_or(f64::MAX);
            let y = numeric_key(&b).unwrap_or(f64::MAX);
            x.total_cmp(&y).then_with(|| a.cmp(&b))
        });
    } else {
        clusters.sort_by_cached_key(|c| c.id.to_string());
    }

    debug!(
        entries = entries.len(),
        result_count = clusters.len(),
        numeric_order = all_numeric,
        "Clusters normalized"
    );
    Ok(clusters)
}

/// Numeric value of an id, if it has one.
fn numeric_key(id: &str) -> Option<f64> {
    id.parse::<f64>().ok().filter(|n| n.is_finite())
}

/// Integer ids in canonical form become numbers; everything else keeps its label.
fn cluster_id(id: String) -> ClusterId {
    match id.parse::<i64>() {
        Ok(n) if n.to_string() == id => ClusterId::Number(n),
        _ => ClusterId::Label(id),
    }
}

fn present<'a>(obj: &'a Map<String, Value>, key: &str) -> Option<&'a Value> {
    obj.get(key).filter(|v| !v.is_null())
}

/// String form of a cluster id; blank ids are treated as missing.
fn cluster_key(value: &Value) -> Option<String> {
    let key = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!key.trim().is_empty()).then_some(key)
}

fn clean_term(term: &str) -> Option<String> {
    let term = term.trim();
    (!term.is_empty()).then(|| term.to_string())
}

fn split_csv(terms: &str) -> Vec<String> {
    terms.split(',').filter_map(clean_term).collect()
}

fn list_terms(terms: &[Value]) -> Vec<String> {
    terms
        .iter()
        .filter_map(as_text)
        .filter_map(|t| clean_term(&t))
        .collect()
}

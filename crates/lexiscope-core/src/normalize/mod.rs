//! Result normalization.
//!
//! Converts shape-variable service payloads into the canonical records in
//! [`crate::models`]. All shape guessing lives here; nothing downstream looks
//! at raw JSON.

pub mod clusters;
pub mod fields;
pub mod records;

use serde_json::Value;

use crate::error::{Error, Result};
use fields::{as_text, json_type};

pub use clusters::{detect_entries, normalize_clusters, ClusterEntry, TermList};
pub use fields::FieldChain;
pub use records::{
    accepted, actor_sentiments, actor_stats, concordances, corpus_page, job_status,
    lexical_stats, logodds_entries, neighbors, semantic_results, sentiment_results, term_counts,
    tfidf_entries, victim_sentiments,
};

/// Unwrap the `{status, data}` envelope the service puts around results.
///
/// A `status` other than `"success"` is a decode failure carrying the
/// service's message. A missing `data` is returned as `null`.
pub fn envelope_data(body: Value, endpoint: &str) -> Result<Value> {
    let mut obj = match body {
        Value::Object(obj) => obj,
        other => {
            return Err(Error::Decode(format!(
                "{}: expected a JSON object, got {}",
                endpoint,
                json_type(&other)
            )))
        }
    };

    if let Some(status) = obj.get("status") {
        if status.as_str() != Some("success") {
            let message = obj
                .get("message")
                .or_else(|| obj.get("detail"))
                .and_then(as_text)
                .unwrap_or_else(|| "no message".to_string());
            return Err(Error::Decode(format!(
                "{}: service reported status {}: {}",
                endpoint, status, message
            )));
        }
    }

    Ok(obj.remove("data").unwrap_or(Value::Null))
}

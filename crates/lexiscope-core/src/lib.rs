//! # lexiscope-core
//!
//! Core types, normalization and derived statistics for lexiscope, a client
//! for a remote service that compares media coverage across two corpora.
//!
//! This crate provides the data model, the error taxonomy, the
//! [`AnalysisApi`] seam that the HTTP client implements, the result
//! normalizer and the view models the session layer hands to callers.

pub mod defaults;
pub mod error;
pub mod logging;
pub mod models;
pub mod normalize;
pub mod stats;
pub mod traits;
pub mod views;

#[cfg(any(test, feature = "mock"))]
pub mod mock;

// Re-export commonly used types at crate root
pub use error::{Error, Result};
pub use models::*;
pub use stats::{classify_sentiment, LabelCounts, PageWindow, SentimentLabel};
pub use traits::*;
pub use views::*;

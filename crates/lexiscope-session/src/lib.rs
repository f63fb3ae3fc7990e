//! # lexiscope-session
//!
//! Aggregation of result fetches into view models, and the session-scoped
//! store that holds the latest view of each kind.
//!
//! This crate provides:
//! - Parallel fan-out with partial-success rules ([`Aggregator`])
//! - A [`Session`] that commits whole views and drives job starts, delayed
//!   reloads and scraping status polls
//! - [`SessionConfig`] loaded from `LEXISCOPE_*` environment variables
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use lexiscope_client::AnalysisClient;
//! use lexiscope_session::{Session, SessionConfig};
//!
//! let session = Session::new(Arc::new(AnalysisClient::from_env()?), SessionConfig::from_env());
//! let lexical = session.load_lexical().await?;
//! println!("{} bigrams", lexical.gaza_bigrams.len());
//! ```

pub mod aggregator;
pub mod config;
pub mod store;

pub use aggregator::Aggregator;
pub use config::SessionConfig;
pub use store::Session;

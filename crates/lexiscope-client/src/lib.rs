//! # lexiscope-client
//!
//! HTTP client for the lexiscope corpus analysis service.
//!
//! [`AnalysisClient`] implements [`lexiscope_core::AnalysisApi`] over
//! `reqwest`. It maps non-2xx responses to `Error::Status` with the server's
//! message, unwraps the `{status, data}` result envelope and hands the raw
//! `data` to the caller for normalization.
//!
//! # Example
//!
//! ```rust,no_run
//! use lexiscope_client::{AnalysisClient, ClientConfig};
//! use lexiscope_core::{AnalysisApi, JobKind};
//!
//! #[tokio::main]
//! async fn main() {
//!     let client = AnalysisClient::new(&ClientConfig::from_env()).unwrap();
//!     let status = client.job_status(JobKind::Scraping).await.unwrap();
//!     println!("running: {}", status.running);
//! }
//! ```

pub mod config;
pub mod http;

pub use config::ClientConfig;
pub use http::AnalysisClient;

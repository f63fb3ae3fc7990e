//! Error types for lexiscope.

use thiserror::Error;

/// Result type alias using lexiscope's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for lexiscope operations.
#[derive(Error, Debug)]
pub enum Error {
    /// Network/transport failure before a response was received
    #[error("Request error: {0}")]
    Request(String),

    /// Remote service answered with a non-2xx status
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },

    /// Response arrived but its JSON was unparseable or unexpected
    #[error("Decode error: {0}")]
    Decode(String),

    /// A required sub-fetch of a composite view failed
    #[error("Aggregate error: required fetch '{part}' failed: {source}")]
    Aggregate {
        part: &'static str,
        #[source]
        source: Box<Error>,
    },

    /// Payload shape not recognized at all
    #[error("Validation error: {0}")]
    Validation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Wrap a failure of a required sub-fetch.
    pub fn aggregate(part: &'static str, source: Error) -> Self {
        Error::Aggregate {
            part,
            source: Box::new(source),
        }
    }

    /// True for transport and non-2xx failures (the RequestError class).
    pub fn is_request(&self) -> bool {
        matches!(self, Error::Request(_) | Error::Status { .. })
    }

    /// True for valid transport with an unusable body.
    pub fn is_decode(&self) -> bool {
        matches!(self, Error::Decode(_))
    }

    /// HTTP status code, when the failure came from a non-2xx response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Aggregate { source, .. } => source.status_code(),
            _ => None,
        }
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Decode(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            Error::Decode(e.to_string())
        } else {
            Error::Request(e.to_string())
        }
    }
}

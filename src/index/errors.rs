//! Error types for index service calls

use std::time::Duration;
use thiserror::Error;

/// Failure talking to the text index or the document store.
#[derive(Debug, Error)]
pub enum IndexError {
    /// The service handle was never established at startup.
    #[error("No connection to the index service")]
    NoClient,

    /// Transport failure or timeout.
    #[error("Request to {url} failed after {elapsed:?}: {source}")]
    Request {
        url: String,
        elapsed: Duration,
        #[source]
        source: reqwest::Error,
    },

    /// The service answered with a non-success status.
    #[error("Request to {url} returned {status} after {elapsed:?}")]
    Status {
        url: String,
        status: reqwest::StatusCode,
        elapsed: Duration,
    },

    /// The response body did not match the expected schema.
    #[error("Malformed response from {url}: {source}")]
    Decode {
        url: String,
        elapsed: Duration,
        #[source]
        source: serde_json::Error,
    },
}

impl IndexError {
    /// Wall time spent on the failed attempt, when one was made.
    #[must_use]
    pub fn elapsed(&self) -> Option<Duration> {
        match self {
            IndexError::NoClient => None,
            IndexError::Request { elapsed, .. }
            | IndexError::Status { elapsed, .. }
            | IndexError::Decode { elapsed, .. } => Some(*elapsed),
        }
    }

    /// True when the request timed out rather than failing outright.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, IndexError::Request { source, .. } if source.is_timeout())
    }
}

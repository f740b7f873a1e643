//! Error types for the search pipeline

use crate::index::IndexError;
use thiserror::Error;

/// A failed search. Any stage failure fails the whole request: there are no
/// partial results, even when the text index already answered.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("Text index request failed: {0}")]
    TextIndex(#[source] IndexError),

    #[error("Document store request failed: {0}")]
    DocStore(#[source] IndexError),
}

impl SearchError {
    /// The underlying service failure.
    #[must_use]
    pub fn index_error(&self) -> &IndexError {
        match self {
            SearchError::TextIndex(e) | SearchError::DocStore(e) => e,
        }
    }
}

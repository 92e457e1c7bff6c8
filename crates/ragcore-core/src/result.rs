//! Value Object: SearchResult

use crate::document::Document;
use serde::{Deserialize, Serialize};

/// The outcome of a similarity search.
///
/// `total` is the length of `documents`, never the size of the underlying
/// corpus.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    /// Ordered documents, most-relevant first unless a strategy dictates
    /// otherwise
    pub documents: Vec<Document>,
    /// Echo of the query text that produced this result
    pub query: String,
    /// `documents.len()`
    pub total: usize,
    /// Echo of the threshold that was applied
    pub threshold: f64,
}

impl SearchResult {
    /// Construct a result, deriving `total` from `documents.len()`.
    pub fn new(documents: Vec<Document>, query: impl Into<String>, threshold: f64) -> Self {
        let total = documents.len();
        Self {
            documents,
            query: query.into(),
            total,
            threshold,
        }
    }

    /// Replace the document list, keeping `query`/`threshold`, and
    /// recomputing `total`.
    #[must_use]
    pub fn with_documents(mut self, documents: Vec<Document>) -> Self {
        self.total = documents.len();
        self.documents = documents;
        self
    }
}

//! Value Object: SearchQuery

use crate::metadata::Metadata;
use serde::{Deserialize, Serialize};

/// A similarity search request.
///
/// `text` is empty only when `vector` is already populated (e.g. the caller
/// pre-computed an embedding); the orchestrator's embedding resolution
/// is what usually populates `vector` from `text`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Query text
    #[serde(default)]
    pub text: String,
    /// Pre-computed query embedding, opaque 32-bit float vector
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vector: Option<Vec<f32>>,
    /// Minimum similarity in `[0, 1]`; `0.0` disables filtering
    #[serde(default)]
    pub threshold: f64,
    /// Maximum results; `<= 0` means "use the backend's default"
    #[serde(default)]
    pub limit: i64,
    /// AND-combined equality filter over metadata fields
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub filter: Metadata,
    /// Optional override of the backend's default namespace/class/table
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collection: Option<String>,
}

impl SearchQuery {
    /// Build a text-only query with the rest of the fields defaulted.
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }

    /// Whether this query already carries a vector, i.e. embedding
    /// resolution does not need to run.
    pub fn has_vector(&self) -> bool {
        self.vector.as_ref().is_some_and(|v| !v.is_empty())
    }

    /// Whether this query has either text or a vector to search with
    /// (a bad-request error if neither holds).
    pub fn is_well_formed(&self) -> bool {
        !self.text.is_empty() || self.has_vector()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_only_query_has_no_vector() {
        let q = SearchQuery::text("hello");
        assert!(!q.has_vector());
        assert!(q.is_well_formed());
    }

    #[test]
    fn empty_query_with_no_vector_is_malformed() {
        let q = SearchQuery::default();
        assert!(!q.is_well_formed());
    }

    #[test]
    fn vector_only_query_is_well_formed() {
        let mut q = SearchQuery::default();
        q.vector = Some(vec![0.1, 0.2]);
        assert!(q.is_well_formed());
        assert!(q.has_vector());
    }
}

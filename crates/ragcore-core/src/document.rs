//! Value Object: Document
//!
//! The unit of storage and retrieval.

use crate::metadata::Metadata;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A document stored in, or returned from, a vector store.
///
/// ## Business Rules
///
/// - `id` is a stable unique key; some backends require a specific format
///   (e.g. the gRPC/Qdrant-like adapter requires UUID-form strings).
/// - `content` is non-empty for stored documents; query-only result shells
///   may carry empty content.
/// - `score` is set either by the backend's distance→similarity conversion
///   or by post-processing — never both overwriting silently.
/// - `created`/`updated` may be the Unix epoch on input; adapters fill them
///   with the current time on write.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    /// Stable unique identifier
    pub id: String,
    /// Document text content
    #[serde(default)]
    pub content: String,
    /// Metadata key/value map
    #[serde(default, skip_serializing_if = "std::collections::HashMap::is_empty")]
    pub metadata: Metadata,
    /// Similarity score in `[0, 1]`, set only on returned documents
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    /// Creation timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created: Option<DateTime<Utc>>,
    /// Last-updated timestamp
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated: Option<DateTime<Utc>>,
}

impl Document {
    /// Create a new document with no metadata, score, or timestamps set.
    ///
    /// Adapters performing a write MUST fill `created`/`updated` with the
    /// current time when either is absent.
    pub fn new(id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            content: content.into(),
            metadata: Metadata::new(),
            score: None,
            created: None,
            updated: None,
        }
    }

    /// Attach metadata, replacing any previously set map.
    #[must_use]
    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = metadata;
        self
    }

    /// Set the similarity score.
    #[must_use]
    pub fn with_score(mut self, score: f64) -> Self {
        self.score = Some(score);
        self
    }

    /// Set `created`/`updated` to the given instant (adapters call this on
    /// write when a caller left the fields unset).
    #[must_use]
    pub fn with_timestamps(mut self, created: DateTime<Utc>, updated: DateTime<Utc>) -> Self {
        self.created = Some(created);
        self.updated = Some(updated);
        self
    }

    /// Fill `created`/`updated` with `now` wherever they are currently unset.
    pub fn fill_timestamps(&mut self, now: DateTime<Utc>) {
        if self.created.is_none() {
            self.created = Some(now);
        }
        if self.updated.is_none() {
            self.updated = Some(now);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_document_has_no_score_or_timestamps() {
        let doc = Document::new("d1", "hello world");
        assert_eq!(doc.id, "d1");
        assert_eq!(doc.content, "hello world");
        assert!(doc.score.is_none());
        assert!(doc.created.is_none());
        assert!(doc.updated.is_none());
    }

    #[test]
    fn fill_timestamps_only_fills_unset_fields() {
        let now = Utc::now();
        let earlier = now - chrono::Duration::days(1);
        let mut doc = Document::new("d1", "x").with_timestamps(earlier, earlier);
        doc.fill_timestamps(now);
        assert_eq!(doc.created, Some(earlier));
        assert_eq!(doc.updated, Some(earlier));

        let mut doc2 = Document::new("d2", "y");
        doc2.fill_timestamps(now);
        assert_eq!(doc2.created, Some(now));
        assert_eq!(doc2.updated, Some(now));
    }

    #[test]
    fn json_round_trip_is_stable() {
        let doc = Document::new("d1", "hello")
            .with_score(0.8)
            .with_timestamps(Utc::now(), Utc::now());
        let json = serde_json::to_string(&doc).expect("serialize");
        let back: Document = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(doc, back);
    }
}

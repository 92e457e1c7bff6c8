//! In-memory adapter.
//!
//! Stores documents in an insertion-ordered sequence behind a `DashMap`
//! keyed by id, for concurrent access without a global lock. Search is a
//! query-word-overlap score, not a vector similarity — this adapter exists
//! for testing and bootstrap, not production search quality.

use async_trait::async_trait;
use chrono::Utc;
use dashmap::DashMap;
use ragcore_core::{Document, Error, HealthStatus, Result, SearchQuery, SearchResult, Store};
use std::sync::Arc;

/// In-memory, non-persistent [`Store`] implementation.
#[derive(Default)]
pub struct InMemoryStore {
    documents: Arc<DashMap<String, Document>>,
    insertion_order: std::sync::Mutex<Vec<String>>,
}

impl InMemoryStore {
    /// Construct an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn ordered_documents(&self) -> Vec<Document> {
        let order = self.insertion_order.lock().unwrap();
        order.iter().filter_map(|id| self.documents.get(id).map(|d| d.clone())).collect()
    }
}

/// Lower-case a query, splitting on whitespace and dropping words of length
/// `<= 2`.
fn significant_words(text: &str) -> Vec<String> {
    text.split_whitespace()
        .map(|w| w.to_lowercase())
        .filter(|w| w.len() > 2)
        .collect()
}

fn overlap_score(query_words: &[String], content: &str) -> f64 {
    if query_words.is_empty() {
        return 0.0;
    }
    let content_words = significant_words(content);
    let matches = query_words.iter().filter(|w| content_words.contains(w)).count();
    matches as f64 / query_words.len() as f64
}

#[async_trait]
impl Store for InMemoryStore {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let query_words = significant_words(&query.text);
        let mut scored: Vec<Document> = self
            .ordered_documents()
            .into_iter()
            .filter(|doc| matches_filter(doc, &query.filter))
            .map(|doc| {
                let score = overlap_score(&query_words, &doc.content);
                doc.with_score(score)
            })
            .filter(|doc| doc.score.unwrap_or(0.0) >= query.threshold)
            .collect();

        scored.sort_by(|a, b| b.score.unwrap_or(0.0).total_cmp(&a.score.unwrap_or(0.0)));
        if query.limit > 0 {
            scored.truncate(query.limit as usize);
        }

        let total = scored.len();
        Ok(SearchResult {
            documents: scored,
            query: query.text.clone(),
            total,
            threshold: query.threshold,
        })
    }

    async fn store(&self, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let now = Utc::now();
        let mut order = self.insertion_order.lock().unwrap();
        for mut doc in documents {
            doc.fill_timestamps(now);
            if !self.documents.contains_key(&doc.id) {
                order.push(doc.id.clone());
            }
            self.documents.insert(doc.id.clone(), doc);
        }
        Ok(())
    }

    async fn delete(&self, _ids: &[String]) -> Result<()> {
        // Documented no-op: this adapter is append-only, keeping deletes
        // cheap and side-effect-free for tests that don't depend on them.
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        Ok(HealthStatus::healthy())
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

fn matches_filter(doc: &Document, filter: &ragcore_core::Metadata) -> bool {
    filter.iter().all(|(key, expected)| doc.metadata.get(key) == Some(expected))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str) -> Document {
        Document::new(id, content)
    }

    #[tokio::test]
    async fn store_then_search_scores_by_word_overlap() {
        let store = InMemoryStore::new();
        store
            .store(vec![
                doc("d1", "how to build data processing pipelines"),
                doc("d2", "cooking recipes for weekend brunch"),
            ])
            .await
            .unwrap();

        let result = store
            .search(&SearchQuery {
                text: "data processing pipelines".to_string(),
                threshold: 0.2,
                limit: 5,
                ..SearchQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.documents[0].id, "d1");
        assert!(result.documents[0].score.unwrap() >= 0.2);
    }

    #[tokio::test]
    async fn empty_store_is_a_no_op() {
        let store = InMemoryStore::new();
        store.store(Vec::new()).await.unwrap();
        let result = store.search(&SearchQuery::text("anything")).await.unwrap();
        assert!(result.documents.is_empty());
    }

    #[tokio::test]
    async fn delete_nonexistent_id_is_not_an_error() {
        let store = InMemoryStore::new();
        store.delete(&["missing".to_string()]).await.unwrap();
    }

    #[tokio::test]
    async fn upsert_is_idempotent_on_repeated_store() {
        let store = InMemoryStore::new();
        store.store(vec![doc("d1", "version one")]).await.unwrap();
        store.store(vec![doc("d1", "version two")]).await.unwrap();

        let result = store
            .search(&SearchQuery {
                text: "version two".to_string(),
                threshold: 0.0,
                limit: 10,
                ..SearchQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(result.documents.len(), 1);
        assert_eq!(result.documents[0].content, "version two");
    }

    #[tokio::test]
    async fn limit_truncates_results() {
        let store = InMemoryStore::new();
        store
            .store(vec![doc("d1", "rust programming"), doc("d2", "rust language"), doc("d3", "rust crab")])
            .await
            .unwrap();

        let result = store
            .search(&SearchQuery {
                text: "rust".to_string(),
                threshold: 0.0,
                limit: 2,
                ..SearchQuery::default()
            })
            .await
            .unwrap();

        assert_eq!(result.documents.len(), 2);
        assert_eq!(result.total, 2);
    }
}

//! Search orchestrator: the entry point composing embedding resolution,
//! capability-aware native/post routing, and context assembly.

use crate::{context, embedding, routing};
use ragcore_core::{Result, SearchOptions, SearchQuery, SearchResult, Store};
use std::sync::Arc;

/// The orchestrator's output: raw JSON-serializable search results when no
/// strategy was requested, or an assembled context string when one was.
#[derive(Debug, Clone, PartialEq)]
pub enum Output {
    /// `options.strategy` was unset: the plain [`SearchResult`].
    Json(SearchResult),
    /// `options.strategy` was set: the assembled, token-bounded context.
    Context(String),
}

impl Output {
    /// Serialize an [`Output::Json`] variant to its stable wire JSON shape.
    /// Returns an error if called on `Context` — callers that don't know
    /// which variant they hold should match instead.
    pub fn into_json_string(self) -> Result<String> {
        match self {
            Output::Json(result) => Ok(serde_json::to_string(&result)?),
            Output::Context(_) => Err(ragcore_core::Error::internal(
                "into_json_string called on a Context output",
            )),
        }
    }
}

/// Composes a backend [`Store`] with the strategy engine and context
/// assembly into the single `search` entry point: embed → route →
/// (native or fallback) → post-process → assemble.
pub struct SearchOrchestrator {
    store: Arc<dyn Store>,
}

impl SearchOrchestrator {
    /// Wrap a store for orchestrated search.
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    /// Run one query end to end: resolve embedding, search (native or
    /// plain), post-process if a strategy is set, and produce the
    /// appropriate [`Output`] variant.
    ///
    /// Step ordering within a single call is strict: embed →
    /// route → (native or fallback) → post-process → assemble. There is no
    /// ordering guarantee across concurrent calls; all shared state lives on
    /// the adapter behind `self.store`.
    pub async fn search(&self, query_text: &str, options: &SearchOptions) -> Result<Output> {
        let mut query = SearchQuery {
            text: query_text.to_string(),
            threshold: options.threshold,
            limit: options.limit,
            filter: options.filter.clone(),
            ..SearchQuery::default()
        };

        if !query.is_well_formed() {
            return Err(ragcore_core::Error::bad_request(
                "empty query text with no pre-computed vector",
            ));
        }

        embedding::resolve(self.store.as_ref(), &mut query, options).await?;

        let Some(strategy) = options.strategy else {
            let result = self.store.search(&query).await?;
            return Ok(Output::Json(result));
        };

        let routed = routing::route(self.store.as_ref(), strategy, &query, options).await?;

        let documents = if routed.native_processed {
            routed.documents
        } else {
            ragcore_strategy::apply(strategy, routed.documents, options)?
        };

        let assembled = context::assemble(self.store.as_ref(), &documents, options);
        Ok(Output::Context(assembled))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragcore_core::{
        DiversificationProvider, Document, Error, HealthStatus, ProcessingMode, RerankingProvider, Strategy,
    };
    use std::sync::Mutex;

    struct WordOverlapStore {
        documents: Vec<Document>,
    }

    fn query_words(text: &str) -> Vec<String> {
        text.split_whitespace()
            .map(|w| w.to_lowercase())
            .filter(|w| w.len() > 2)
            .collect()
    }

    #[async_trait]
    impl Store for WordOverlapStore {
        async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
            let q_words = query_words(&query.text);
            let mut scored: Vec<Document> = self
                .documents
                .iter()
                .map(|doc| {
                    let content_words: Vec<String> = query_words(&doc.content);
                    let matches = q_words.iter().filter(|w| content_words.contains(w)).count();
                    let score = if q_words.is_empty() {
                        0.0
                    } else {
                        matches as f64 / q_words.len() as f64
                    };
                    doc.clone().with_score(score)
                })
                .filter(|d| d.score.unwrap_or(0.0) >= query.threshold)
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

        async fn store(&self, _documents: Vec<Document>) -> Result<()> {
            Ok(())
        }

        async fn delete(&self, _ids: &[String]) -> Result<()> {
            Ok(())
        }

        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus::healthy())
        }
    }

    fn sample_documents() -> Vec<Document> {
        vec![
            Document::new("d1", "how to build data processing pipelines with flows"),
            Document::new("d2", "retrieval augmented generation with vector search"),
            Document::new("d3", "cooking recipes for weekend brunch"),
            Document::new("d4", "how to use flows and pipelines together for retrieval"),
            Document::new("d5", "gardening tips for spring planting season"),
        ]
    }

    #[tokio::test]
    async fn plain_search_returns_json_when_no_strategy() {
        let store = Arc::new(WordOverlapStore {
            documents: sample_documents(),
        });
        let orchestrator = SearchOrchestrator::new(store);
        let options = SearchOptions {
            threshold: 0.2,
            limit: 3,
            ..SearchOptions::new()
        };
        let output = orchestrator
            .search("how do I build data processing pipelines", &options)
            .await
            .unwrap();
        match output {
            Output::Json(result) => {
                assert!(result.total <= 3);
                for doc in &result.documents {
                    assert!(doc.score.unwrap() >= 0.2);
                }
            }
            Output::Context(_) => panic!("expected JSON output"),
        }
    }

    #[tokio::test]
    async fn relevant_strategy_returns_descending_context() {
        let store = Arc::new(WordOverlapStore {
            documents: sample_documents(),
        });
        let orchestrator = SearchOrchestrator::new(store);
        let options = SearchOptions {
            threshold: 0.2,
            limit: 3,
            strategy: Some(Strategy::Relevant),
            ..SearchOptions::new()
        };
        let output = orchestrator
            .search("how do I use flows with retrieval", &options)
            .await
            .unwrap();
        match output {
            Output::Context(text) => assert!(!text.is_empty()),
            Output::Json(_) => panic!("expected context output"),
        }
    }

    #[tokio::test]
    async fn native_only_mode_errors_without_capability() {
        let store = Arc::new(WordOverlapStore {
            documents: sample_documents(),
        });
        let orchestrator = SearchOrchestrator::new(store);
        let options = SearchOptions {
            strategy: Some(Strategy::Diverse),
            processing_mode: ProcessingMode::Native,
            ..SearchOptions::new()
        };
        let err = orchestrator.search("anything", &options).await.unwrap_err();
        assert!(matches!(err, Error::Configuration { .. }));
    }

    #[tokio::test]
    async fn empty_query_with_no_vector_is_bad_request() {
        let store = Arc::new(WordOverlapStore {
            documents: sample_documents(),
        });
        let orchestrator = SearchOrchestrator::new(store);
        let options = SearchOptions::new();
        let err = orchestrator.search("", &options).await.unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));
    }

    struct RerankingStore {
        documents: Vec<Document>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl Store for RerankingStore {
        async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
            Ok(SearchResult::new(self.documents.clone(), query.text.clone(), query.threshold))
        }
        async fn store(&self, _documents: Vec<Document>) -> Result<()> {
            Ok(())
        }
        async fn delete(&self, _ids: &[String]) -> Result<()> {
            Ok(())
        }
        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus::healthy())
        }
        fn as_reranking(&self) -> Option<&dyn RerankingProvider> {
            Some(self)
        }
    }

    #[async_trait]
    impl RerankingProvider for RerankingStore {
        async fn search_reranked(&self, query: &SearchQuery, top_k: i64) -> Result<SearchResult> {
            *self.calls.lock().unwrap() += 1;
            let mut docs = self.documents.clone();
            docs.truncate(top_k.max(0) as usize);
            Ok(SearchResult::new(docs, query.text.clone(), query.threshold))
        }
    }

    #[tokio::test]
    async fn auto_mode_prefers_native_reranking_when_available() {
        let store = Arc::new(RerankingStore {
            documents: vec![
                Document::new("d1", "alpha").with_score(0.9),
                Document::new("d2", "beta").with_score(0.8),
            ],
            calls: Mutex::new(0),
        });
        let orchestrator = SearchOrchestrator::new(store.clone());
        let options = SearchOptions {
            limit: 1,
            strategy: Some(Strategy::Relevant),
            ..SearchOptions::new()
        };
        let output = orchestrator.search("query text", &options).await.unwrap();
        assert!(matches!(output, Output::Context(_)));
        assert_eq!(*store.calls.lock().unwrap(), 1);
    }

    struct DiversifyingStore {
        documents: Vec<Document>,
    }

    #[async_trait]
    impl Store for DiversifyingStore {
        async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
            Ok(SearchResult::new(self.documents.clone(), query.text.clone(), query.threshold))
        }
        async fn store(&self, _documents: Vec<Document>) -> Result<()> {
            Ok(())
        }
        async fn delete(&self, _ids: &[String]) -> Result<()> {
            Ok(())
        }
        async fn health(&self) -> Result<HealthStatus> {
            Ok(HealthStatus::healthy())
        }
        fn as_diversification(&self) -> Option<&dyn DiversificationProvider> {
            Some(self)
        }
    }

    #[async_trait]
    impl DiversificationProvider for DiversifyingStore {
        async fn search_diverse(&self, query: &SearchQuery, candidates_limit: i64, _diversity: f64) -> Result<SearchResult> {
            let mut docs = self.documents.clone();
            docs.truncate(candidates_limit.max(0) as usize);
            Ok(SearchResult::new(docs, query.text.clone(), query.threshold))
        }
    }

    #[tokio::test]
    async fn both_mode_prefers_native_documents_when_present() {
        let store = Arc::new(DiversifyingStore {
            documents: vec![Document::new("d1", "alpha beta").with_score(0.9)],
        });
        let orchestrator = SearchOrchestrator::new(store);
        let options = SearchOptions {
            limit: 1,
            strategy: Some(Strategy::Diverse),
            processing_mode: ProcessingMode::Both,
            ..SearchOptions::new()
        };
        let output = orchestrator.search("query", &options).await.unwrap();
        assert!(matches!(output, Output::Context(_)));
    }
}

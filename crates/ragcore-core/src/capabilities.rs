//! Capability traits
//!
//! A store implements the base `Store` trait plus zero or more of these.
//! The orchestrator discovers support at runtime by attempting a trait-object
//! downcast (`as_any().downcast_ref::<dyn Trait>()`-style pattern via the
//! `as_*` accessor methods below) rather than relying on a class hierarchy.

use crate::document::Document;
use crate::error::Error;
use crate::query::SearchQuery;
use crate::result::SearchResult;
use async_trait::async_trait;

/// Descriptive metadata about a store's server-side embedding setup, per
/// `getEmbeddingConfig() → {model, dimensions, provider}`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmbeddingConfig {
    /// Embedding model identifier, e.g. `"text-embedding-3-small"`
    pub model: String,
    /// Output vector dimensionality
    pub dimensions: usize,
    /// Provider/integration name, e.g. `"weaviate-text2vec-openai"`
    pub provider: String,
}

/// A store that embeds query text on its own side during `search`, so the
/// orchestrator never needs to supply a vector. This trait does not itself
/// produce a vector — embedding happens inside the backend's own search
/// call; the orchestrator only needs to know whether that is going to
/// happen.
pub trait AutoEmbeddingCapable: Send + Sync {
    /// Whether this store instance is currently configured to embed
    /// server-side (e.g. a vectorizer module is attached to the collection).
    fn supports_auto_embedding(&self) -> bool;

    /// Describe the server-side embedding setup.
    fn embedding_config(&self) -> EmbeddingConfig;
}

/// A store that can itself produce a query embedding when asked, used when
/// the caller's vector is missing but the store is the most appropriate
/// place to get one from.
#[async_trait]
pub trait EmbeddingCapable: Send + Sync {
    /// Embed `text`, returning the vector to populate `query.vector` with.
    async fn get_embedding(&self, text: &str) -> Result<Vec<f32>, Error>;
}

/// A store that can diversify a result set natively — typically via hybrid search plus Reciprocal
/// Rank Fusion across multiple candidate lists.
#[async_trait]
pub trait DiversificationProvider: Send + Sync {
    /// Return documents selected for relevance/diversity balance natively,
    /// without the caller running MMR. `candidates_limit` sizes the
    /// backend's internal candidate pool (`limit * candidatesMultiplier`);
    /// `diversity` is the MMR-equivalent lambda the backend should target.
    async fn search_diverse(
        &self,
        query: &SearchQuery,
        candidates_limit: i64,
        diversity: f64,
    ) -> Result<SearchResult, Error>;
}

/// A store that can rerank a result set natively.
#[async_trait]
pub trait RerankingProvider: Send + Sync {
    /// Return up to `top_k` documents reranked by the store's own relevance
    /// model (`top_k = limit * rerankMultiplier`).
    async fn search_reranked(&self, query: &SearchQuery, top_k: i64) -> Result<SearchResult, Error>;
}

/// Estimates the token cost of a piece of text for context-assembly bounding.
/// The default implementation uses a word-count ratio and requires no
/// external tokenizer dependency.
pub trait TokenEstimator: Send + Sync {
    /// Estimate the token count of `text`.
    fn estimate(&self, text: &str) -> usize;
}

/// Word-count-ratio token estimator: `ceil(word_count * ratio)`.
#[derive(Debug, Clone, Copy)]
pub struct WordRatioTokenEstimator {
    /// Tokens-per-word ratio; defaults to `1.33`.
    pub ratio: f64,
}

impl Default for WordRatioTokenEstimator {
    fn default() -> Self {
        Self {
            ratio: crate::constants::DEFAULT_TOKEN_ESTIMATION_RATIO,
        }
    }
}

impl TokenEstimator for WordRatioTokenEstimator {
    fn estimate(&self, text: &str) -> usize {
        let words = text.split_whitespace().count();
        (words as f64 * self.ratio).ceil() as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn word_ratio_estimator_rounds_up() {
        let estimator = WordRatioTokenEstimator::default();
        assert_eq!(estimator.estimate("one two three"), 4);
        assert_eq!(estimator.estimate(""), 0);
    }

    #[test]
    fn document_and_result_types_still_resolve() {
        let _doc = Document::new("id", "content");
        let _q = SearchQuery::text("q");
    }
}

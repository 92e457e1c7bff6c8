//! Port: Store
//!
//! The base contract every backend adapter implements. Optional
//! behavior — auto-embedding, native reranking/diversification, dimension
//! introspection — lives in separate capability traits (`capabilities.rs`)
//! that a store may additionally implement; the orchestrator probes for
//! those via `as_auto_embedding`/`as_reranking`/etc. accessors so it never
//! needs to know the concrete adapter type.

use crate::capabilities::{
    AutoEmbeddingCapable, DiversificationProvider, EmbeddingCapable, RerankingProvider, TokenEstimator,
};
use crate::document::Document;
use crate::error::Error;
use crate::query::SearchQuery;
use crate::result::SearchResult;
use async_trait::async_trait;

/// Liveness/diagnostic status returned by `Store::health`.
#[derive(Debug, Clone, PartialEq)]
pub struct HealthStatus {
    /// Whether the backend is reachable and ready to serve requests
    pub healthy: bool,
    /// Optional human-readable detail, e.g. the failure reason
    pub detail: Option<String>,
}

impl HealthStatus {
    /// A healthy status with no detail.
    pub fn healthy() -> Self {
        Self {
            healthy: true,
            detail: None,
        }
    }

    /// An unhealthy status carrying a reason.
    pub fn unhealthy(detail: impl Into<String>) -> Self {
        Self {
            healthy: false,
            detail: Some(detail.into()),
        }
    }
}

/// A backend-agnostic vector/document store.
///
/// Every method is async and fallible; adapters map backend-specific errors
/// onto the [`Error`](crate::error::Error) taxonomy at the boundary, never
/// leaking their own error types.
#[async_trait]
pub trait Store: Send + Sync {
    /// Run a similarity search, returning documents ordered by descending
    /// score unless the caller's query requests otherwise.
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult, Error>;

    /// Insert or update documents. On partial failure, adapters return
    /// `Error::PartialFailure` rather than silently dropping failed items.
    async fn store(&self, documents: Vec<Document>) -> Result<(), Error>;

    /// Remove documents by id. Adapters for which deletion is not meaningful
    /// (e.g. an append-only in-memory demo store) document the no-op
    /// explicitly rather than erroring.
    async fn delete(&self, ids: &[String]) -> Result<(), Error>;

    /// Report backend reachability and readiness.
    async fn health(&self) -> Result<HealthStatus, Error>;

    /// Release any held resources (connection pools, background tasks).
    /// Default is a no-op for adapters with nothing to release.
    async fn close(&self) -> Result<(), Error> {
        Ok(())
    }

    /// Downcast to [`AutoEmbeddingCapable`] if this store implements it.
    fn as_auto_embedding(&self) -> Option<&dyn AutoEmbeddingCapable> {
        None
    }

    /// Downcast to [`EmbeddingCapable`] if this store implements it.
    fn as_embedding_capable(&self) -> Option<&dyn EmbeddingCapable> {
        None
    }

    /// Downcast to [`DiversificationProvider`] if this store implements it.
    fn as_diversification(&self) -> Option<&dyn DiversificationProvider> {
        None
    }

    /// Downcast to [`RerankingProvider`] if this store implements it.
    fn as_reranking(&self) -> Option<&dyn RerankingProvider> {
        None
    }

    /// Downcast to [`TokenEstimator`] if this store implements it. The
    /// orchestrator falls back to `WordRatioTokenEstimator` when this
    /// returns `None`.
    fn as_token_estimator(&self) -> Option<&dyn TokenEstimator> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn health_status_constructors() {
        let ok = HealthStatus::healthy();
        assert!(ok.healthy);
        assert!(ok.detail.is_none());

        let bad = HealthStatus::unhealthy("connection refused");
        assert!(!bad.healthy);
        assert_eq!(bad.detail.as_deref(), Some("connection refused"));
    }
}

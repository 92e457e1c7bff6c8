//! Embedding resolution.
//!
//! Populates `query.vector` following a fixed precedence, stopping at the
//! first source that applies. The store itself is consulted first (it may
//! embed server-side, or it may offer an embedding call of its own), then an
//! explicit fallback provider from [`ragcore_core::SearchOptions`], and
//! finally the query is left as-is — the store must then accept text-only
//! search or fail during `search`.

use ragcore_core::{Result, SearchOptions, SearchQuery, Store};

/// Resolve `query.vector` in place, following the fixed precedence:
/// auto-embedding capability, then store-side `EmbeddingCapable`, then
/// `options.embedding_provider`, then leave unset.
pub async fn resolve(store: &dyn Store, query: &mut SearchQuery, options: &SearchOptions) -> Result<()> {
    if query.has_vector() {
        return Ok(());
    }

    if let Some(auto) = store.as_auto_embedding() {
        if auto.supports_auto_embedding() {
            tracing::debug!(config = ?auto.embedding_config(), "store auto-embeds; leaving query vector unset");
            return Ok(());
        }
    }

    if let Some(embedder) = store.as_embedding_capable() {
        tracing::debug!("resolving query vector via store's EmbeddingCapable");
        let vector = embedder.get_embedding(&query.text).await?;
        query.vector = Some(vector);
        return Ok(());
    }

    if let Some(provider) = &options.embedding_provider {
        tracing::debug!(provider = provider.provider_name(), "resolving query vector via fallback embedding provider");
        let vector = provider.embed(&query.text).await?;
        query.vector = Some(vector);
        return Ok(());
    }

    tracing::debug!("no embedding source available; leaving query vector unset");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use ragcore_core::{Document, Error, HealthStatus, SearchResult};

    struct TextOnlyStore;

    #[async_trait]
    impl Store for TextOnlyStore {
        async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
            Ok(SearchResult::new(Vec::<Document>::new(), query.text.clone(), query.threshold))
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

    #[tokio::test]
    async fn leaves_vector_unset_with_no_embedding_source() {
        let store = TextOnlyStore;
        let mut query = SearchQuery::text("hello");
        let options = SearchOptions::new();
        resolve(&store, &mut query, &options).await.unwrap();
        assert!(query.vector.is_none());
    }

    #[tokio::test]
    async fn already_present_vector_is_untouched() {
        let store = TextOnlyStore;
        let mut query = SearchQuery::text("hello");
        query.vector = Some(vec![1.0, 2.0]);
        let options = SearchOptions::new();
        resolve(&store, &mut query, &options).await.unwrap();
        assert_eq!(query.vector, Some(vec![1.0, 2.0]));
    }

    struct FallbackProvider;

    #[async_trait]
    impl ragcore_core::EmbeddingProvider for FallbackProvider {
        async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|_| vec![0.1, 0.2, 0.3]).collect())
        }
        fn dimensions(&self) -> usize {
            3
        }
        fn provider_name(&self) -> &str {
            "fallback"
        }
    }

    #[tokio::test]
    async fn uses_fallback_provider_when_store_has_no_embedding_capability() {
        let store = TextOnlyStore;
        let mut query = SearchQuery::text("hello");
        let options = SearchOptions {
            embedding_provider: Some(std::sync::Arc::new(FallbackProvider)),
            ..SearchOptions::new()
        };
        resolve(&store, &mut query, &options).await.unwrap();
        assert_eq!(query.vector, Some(vec![0.1, 0.2, 0.3]));
    }

    #[allow(dead_code)]
    fn assert_error_type(_e: Error) {}
}

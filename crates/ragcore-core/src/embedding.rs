//! Port: EmbeddingProvider
//!
//! An abstract text-to-vector embedding source. No concrete implementation
//! ships in this crate: external embedding services are explicitly out of
//! scope (see `DESIGN.md`); callers supply their own provider through
//! `SearchOptions::embedding_provider` or a store's `AutoEmbeddingCapable`
//! capability.

use crate::error::Error;
use async_trait::async_trait;

/// Converts text into vectors for similarity search.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed a single piece of text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, Error> {
        let mut batch = self.embed_batch(std::slice::from_ref(&text.to_string())).await?;
        batch.pop().ok_or_else(|| Error::internal("embedding provider returned no vectors"))
    }

    /// Embed a batch of texts; the returned vector has the same length and
    /// order as `texts`.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, Error>;

    /// Dimensionality of vectors this provider produces.
    fn dimensions(&self) -> usize;

    /// Human-readable provider identifier, for logging and diagnostics.
    fn provider_name(&self) -> &str;
}

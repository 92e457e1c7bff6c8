//! gRPC vector adapter, Qdrant-like.
//!
//! Native diversification runs four candidate searches (dense, text-biased,
//! contextual, relaxed-dense) and fuses them with Reciprocal Rank Fusion
//! (`1 / (k + rank)`, k = 60) rather than delegating to `ragcore-strategy`'s
//! MMR — this is the one adapter that implements [`DiversificationProvider`].

use async_trait::async_trait;
use qdrant_client::qdrant::{
    Condition, CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct, PointsIdsList,
    SearchPointsBuilder, UpsertPointsBuilder, Value as QdrantValue, VectorParamsBuilder,
};
use qdrant_client::{Payload, Qdrant};
use ragcore_core::constants::{DEFAULT_WRITE_BATCH_SIZE, RRF_K};
use ragcore_core::{
    DiversificationProvider, Document, Error, HealthStatus, MetadataValue, Result, SearchQuery, SearchResult, Store,
};
use std::collections::HashMap;
use std::sync::Arc;

use crate::config::QdrantConfig;

/// gRPC/Qdrant-like [`Store`] implementation.
pub struct QdrantStore {
    client: Qdrant,
    collection: String,
    dimensions: usize,
    embedding_provider: Option<Arc<dyn ragcore_core::EmbeddingProvider>>,
}

impl QdrantStore {
    /// Connect and ensure the target collection exists. Collection creation is idempotent: a concurrent second
    /// caller observing "exists" proceeds without re-creating.
    pub async fn connect(config: QdrantConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(Error::configuration("qdrant adapter requires a non-empty endpoint"));
        }

        let mut builder = Qdrant::from_url(&config.endpoint);
        if let Some(api_key) = &config.api_key {
            builder = builder.api_key(api_key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| Error::configuration_with_source("failed to build qdrant client", e))?;

        let exists = client
            .collection_exists(&config.collection)
            .await
            .map_err(|e| Error::transport_with_source("failed to query qdrant collections", e))?;
        if !exists {
            client
                .create_collection(
                    CreateCollectionBuilder::new(&config.collection)
                        .vectors_config(VectorParamsBuilder::new(config.dimensions as u64, Distance::Cosine)),
                )
                .await
                .map_err(|e| Error::transport_with_source("failed to create qdrant collection", e))?;
        }

        Ok(Self {
            client,
            collection: config.collection,
            dimensions: config.dimensions,
            embedding_provider: config.embedding_provider,
        })
    }

    fn metadata_to_payload(doc: &Document) -> Payload {
        let mut map: HashMap<String, QdrantValue> = HashMap::new();
        map.insert("content".to_string(), doc.content.clone().into());
        if let Some(created) = doc.created {
            map.insert("created".to_string(), created.to_rfc3339().into());
        }
        if let Some(updated) = doc.updated {
            map.insert("updated".to_string(), updated.to_rfc3339().into());
        }
        for (key, value) in &doc.metadata {
            map.insert(key.clone(), value.to_string_repr().into());
        }
        Payload::from(map)
    }

    fn payload_to_document(id: String, score: f32, payload: &HashMap<String, QdrantValue>) -> Document {
        let content = payload.get("content").and_then(|v| v.as_str()).unwrap_or_default().to_string();
        let mut metadata = ragcore_core::Metadata::new();
        for (key, value) in payload {
            if key == "content" || key == "created" || key == "updated" {
                continue;
            }
            if let Some(s) = value.as_str() {
                metadata.insert(key.clone(), MetadataValue::String(s.to_string()));
            }
        }
        let created = payload.get("created").and_then(|v| v.as_str()).and_then(|s| s.parse().ok());
        let updated = payload.get("updated").and_then(|v| v.as_str()).and_then(|s| s.parse().ok());

        Document {
            id,
            content,
            metadata,
            score: Some(score as f64),
            created,
            updated,
        }
    }

    fn build_filter(query: &SearchQuery) -> Option<Filter> {
        if query.filter.is_empty() {
            return None;
        }
        let conditions: Vec<Condition> = query
            .filter
            .iter()
            .map(|(key, value)| Condition::matches(key.clone(), value.to_string_repr()))
            .collect();
        Some(Filter::must(conditions))
    }

    /// Run one named candidate search, returning `(document_id, rank)` pairs
    /// in the order Qdrant returned them (rank 0 = best).
    async fn candidate_ranks(
        &self,
        vector: &[f32],
        threshold: f64,
        filter: Option<Filter>,
        limit: u64,
    ) -> Result<(Vec<(String, Document)>, Vec<String>)> {
        let mut builder = SearchPointsBuilder::new(&self.collection, vector.to_vec(), limit)
            .score_threshold(threshold as f32)
            .with_payload(true);
        if let Some(f) = filter {
            builder = builder.filter(f);
        }

        let response = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| Error::transport_with_source("qdrant search failed", e))?;

        let mut order = Vec::with_capacity(response.result.len());
        let mut docs = Vec::with_capacity(response.result.len());
        for point in response.result {
            let id = point_id_to_string(&point.id);
            let doc = Self::payload_to_document(id.clone(), point.score, &point.payload);
            order.push(id.clone());
            docs.push((id, doc));
        }
        Ok((docs, order))
    }
}

/// Fuse ranked id lists via Reciprocal Rank Fusion (`1 / (k + rank + 1)`,
/// rank 0 = best within its own list). Ties break by first-appearance order
/// across the lists in the order they were run.
fn fuse_rrf(lists: &[Vec<String>]) -> Vec<(String, f64)> {
    let mut fused_scores: HashMap<String, f64> = HashMap::new();
    let mut first_seen_order: Vec<String> = Vec::new();

    for order in lists {
        for (rank, id) in order.iter().enumerate() {
            let contribution = 1.0 / (RRF_K + rank as f64 + 1.0);
            *fused_scores.entry(id.clone()).or_insert(0.0) += contribution;
            if !first_seen_order.contains(id) {
                first_seen_order.push(id.clone());
            }
        }
    }

    let mut fused: Vec<(String, f64)> = fused_scores.into_iter().collect();
    fused.sort_by(|a, b| {
        b.1.total_cmp(&a.1).then_with(|| {
            let a_pos = first_seen_order.iter().position(|id| id == &a.0).unwrap_or(usize::MAX);
            let b_pos = first_seen_order.iter().position(|id| id == &b.0).unwrap_or(usize::MAX);
            a_pos.cmp(&b_pos)
        })
    });
    fused
}

fn point_id_to_string(id: &Option<qdrant_client::qdrant::PointId>) -> String {
    match id.as_ref().and_then(|p| p.point_id_options.as_ref()) {
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Uuid(uuid)) => uuid.clone(),
        Some(qdrant_client::qdrant::point_id::PointIdOptions::Num(num)) => num.to_string(),
        None => String::new(),
    }
}

#[async_trait]
impl Store for QdrantStore {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let Some(vector) = query.vector.as_ref() else {
            return Err(Error::bad_request(
                "qdrant adapter requires a pre-computed vector; supply an EmbeddingProvider",
            ));
        };

        let limit = if query.limit > 0 { query.limit as u64 } else { 10 };
        let filter = Self::build_filter(query);
        let (docs, _) = self.candidate_ranks(vector, query.threshold, filter, limit).await?;

        let documents: Vec<Document> = docs.into_iter().map(|(_, d)| d).collect();
        let total = documents.len();
        Ok(SearchResult {
            documents,
            query: query.text.clone(),
            total,
            threshold: query.threshold,
        })
    }

    async fn store(&self, documents: Vec<Document>) -> Result<()> {
        if documents.is_empty() {
            return Ok(());
        }
        let Some(provider) = &self.embedding_provider else {
            return Err(Error::configuration(
                "qdrant adapter requires an external EmbeddingProvider to store documents",
            ));
        };

        let writable: Vec<&Document> = documents.iter().filter(|d| !d.content.is_empty()).collect();
        let mut succeeded = 0usize;
        let mut failures: Vec<String> = Vec::new();

        for chunk in writable.chunks(DEFAULT_WRITE_BATCH_SIZE) {
            let texts: Vec<String> = chunk.iter().map(|d| d.content.clone()).collect();
            let embeddings = match provider.embed_batch(&texts).await {
                Ok(e) => e,
                Err(e) => {
                    failures.push(e.to_string());
                    continue;
                }
            };

            let points: Vec<PointStruct> = chunk
                .iter()
                .zip(embeddings)
                .map(|(doc, embedding)| {
                    PointStruct::new(doc.id.clone(), embedding, Self::metadata_to_payload(doc))
                })
                .collect();
            let count = points.len();

            let result = self
                .client
                .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
                .await;
            match result {
                Ok(_) => succeeded += count,
                Err(e) => failures.push(e.to_string()),
            }
        }

        if failures.is_empty() {
            Ok(())
        } else {
            Err(Error::partial_failure(succeeded, failures.len(), failures[0].clone()))
        }
    }

    async fn delete(&self, ids: &[String]) -> Result<()> {
        if ids.is_empty() {
            return Ok(());
        }
        let selector = PointsIdsList {
            ids: ids.iter().map(|id| id.clone().into()).collect(),
        };
        self.client
            .delete_points(DeletePointsBuilder::new(&self.collection).points(selector))
            .await
            .map_err(|e| Error::transport_with_source("qdrant delete failed", e))?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        match self.client.health_check().await {
            Ok(_) => Ok(HealthStatus::healthy()),
            Err(e) => Ok(HealthStatus::unhealthy(format!("qdrant unreachable: {e}"))),
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn as_diversification(&self) -> Option<&dyn DiversificationProvider> {
        Some(self)
    }
}

#[async_trait]
impl DiversificationProvider for QdrantStore {
    /// Run four candidate searches — dense, text-biased, contextual, and a
    /// relaxed-threshold dense pass — and fuse them with Reciprocal Rank
    /// Fusion. `diversity` does not scale any
    /// single query here — it is absorbed entirely by running searches
    /// across multiple independent "spaces" and letting RRF do the
    /// balancing, matching the reference adapter's behavior.
    async fn search_diverse(&self, query: &SearchQuery, candidates_limit: i64, _diversity: f64) -> Result<SearchResult> {
        let Some(vector) = query.vector.as_ref() else {
            return Err(Error::bad_request(
                "qdrant adapter requires a pre-computed vector; supply an EmbeddingProvider",
            ));
        };
        let limit = if candidates_limit > 0 { candidates_limit as u64 } else { 10 };
        let filter = Self::build_filter(query);

        let dense = self.candidate_ranks(vector, query.threshold, filter.clone(), limit).await?;
        let text_biased_threshold = (query.threshold * 0.5).max(0.0);
        let text_biased = self
            .candidate_ranks(vector, text_biased_threshold, filter.clone(), limit)
            .await?;
        let contextual_threshold = (query.threshold * 0.75).max(0.0);
        let contextual = self
            .candidate_ranks(vector, contextual_threshold, filter.clone(), limit)
            .await?;
        let relaxed_threshold = query.threshold * 0.7;
        let relaxed = self.candidate_ranks(vector, relaxed_threshold, filter, limit).await?;

        let lists = [dense, text_biased, contextual, relaxed];

        let mut known_docs: HashMap<String, Document> = HashMap::new();
        for (docs, _) in &lists {
            for (id, doc) in docs {
                known_docs.entry(id.clone()).or_insert_with(|| doc.clone());
            }
        }

        let orders: Vec<Vec<String>> = lists.iter().map(|(_, order)| order.clone()).collect();
        let fused = fuse_rrf(&orders);

        let limit = if query.limit > 0 { query.limit as usize } else { fused.len() };
        let documents: Vec<Document> = fused
            .into_iter()
            .take(limit)
            .filter_map(|(id, score)| known_docs.get(&id).cloned().map(|d| d.with_score(score)))
            .collect();

        let total = documents.len();
        Ok(SearchResult {
            documents,
            query: query.text.clone(),
            total,
            threshold: query.threshold,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rrf_contribution_matches_formula() {
        let rank = 2usize;
        let contribution = 1.0 / (RRF_K + rank as f64 + 1.0);
        assert!((contribution - 1.0 / 63.0).abs() < 1e-9);
    }

    #[test]
    fn fused_order_equals_summed_reciprocal_rank_contributions() {
        // "a" ranks well in both lists; "b" only appears in the second,
        // at a worse rank; "c" only in the first, at a worse rank.
        let dense = vec!["a".to_string(), "c".to_string()];
        let text_biased = vec!["b".to_string(), "a".to_string()];
        let fused = fuse_rrf(&[dense, text_biased]);

        let expected_a = 1.0 / (RRF_K + 1.0) + 1.0 / (RRF_K + 2.0);
        let expected_b = 1.0 / (RRF_K + 1.0);
        let expected_c = 1.0 / (RRF_K + 2.0);

        let score_of = |id: &str| fused.iter().find(|(i, _)| i == id).unwrap().1;
        assert!((score_of("a") - expected_a).abs() < 1e-9);
        assert!((score_of("b") - expected_b).abs() < 1e-9);
        assert!((score_of("c") - expected_c).abs() < 1e-9);

        let ids: Vec<&str> = fused.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn ties_break_by_first_appearance_across_lists() {
        let first = vec!["x".to_string(), "y".to_string()];
        let second = vec!["y".to_string(), "x".to_string()];
        // Both "x" and "y" appear at rank 0 once and rank 1 once, so their
        // summed scores are equal; "x" was discovered first.
        let fused = fuse_rrf(&[first, second]);
        let ids: Vec<&str> = fused.iter().map(|(id, _)| id.as_str()).collect();
        assert_eq!(ids, vec!["x", "y"]);
    }
}

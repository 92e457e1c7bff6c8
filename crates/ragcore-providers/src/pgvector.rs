//! Relational vector adapter, PGVector-like.
//!
//! Maps the abstract `Store` contract onto a Postgres table with a
//! `vector(D)` column and the `pgvector` cosine-distance operator `<=>`.
//! Schema creation is lazy and idempotent, guarded by a per-client
//! "schema-ensured" flag checked under a mutex.

use crate::config::PgVectorConfig;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use ragcore_core::constants::DEFAULT_WRITE_BATCH_SIZE;
use ragcore_core::{Document, Error, HealthStatus, Metadata, MetadataValue, Result, SearchQuery, SearchResult, Store};
use sqlx::postgres::PgPoolOptions;
use sqlx::{Pool, Postgres, Row};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Relational/PGVector-like [`Store`] implementation.
pub struct PgVectorStore {
    pool: Pool<Postgres>,
    table: String,
    dimensions: usize,
    embedding_provider: Option<Arc<dyn ragcore_core::EmbeddingProvider>>,
    schema_ensured: AtomicBool,
    schema_ensure_lock: tokio::sync::Mutex<()>,
}

impl PgVectorStore {
    /// Connect and validate configuration eagerly: non-empty endpoint, default dimensions, connection pool
    /// sized per `config.pool_size`.
    pub async fn connect(config: PgVectorConfig) -> Result<Self> {
        if config.connection_string.trim().is_empty() {
            return Err(Error::configuration("pgvector adapter requires a non-empty connection string"));
        }

        let pool = PgPoolOptions::new()
            .max_connections(config.pool_size)
            .connect(&config.connection_string)
            .await
            .map_err(|e| Error::transport_with_source("failed to connect to Postgres", e))?;

        Ok(Self {
            pool,
            table: config.table,
            dimensions: config.dimensions,
            embedding_provider: config.embedding_provider,
            schema_ensured: AtomicBool::new(false),
            schema_ensure_lock: tokio::sync::Mutex::new(()),
        })
    }

    /// Idempotent schema creation, guarded by an atomic flag checked before
    /// taking the lock so a warm store never pays the round-trip.
    async fn ensure_schema(&self) -> Result<()> {
        if self.schema_ensured.load(Ordering::Acquire) {
            return Ok(());
        }
        let _guard = self.schema_ensure_lock.lock().await;
        if self.schema_ensured.load(Ordering::Acquire) {
            return Ok(());
        }

        sqlx::query("CREATE EXTENSION IF NOT EXISTS vector")
            .execute(&self.pool)
            .await
            .map_err(|e| {
                Error::not_found(format!(
                    "pgvector extension unavailable; run: CREATE EXTENSION vector ({e})"
                ))
            })?;

        let create_table = format!(
            "CREATE TABLE IF NOT EXISTS {} (\
                id text PRIMARY KEY, \
                content text NOT NULL, \
                metadata jsonb, \
                embedding vector({}), \
                created_at timestamptz NOT NULL DEFAULT now(), \
                updated_at timestamptz NOT NULL DEFAULT now()\
            )",
            self.table, self.dimensions
        );
        sqlx::query(&create_table)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::transport_with_source("failed to create documents table", e))?;

        let create_index = format!(
            "CREATE INDEX IF NOT EXISTS {}_embedding_idx ON {} USING ivfflat (embedding vector_cosine_ops)",
            self.table, self.table
        );
        sqlx::query(&create_index)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::transport_with_source("failed to create ANN index", e))?;

        self.schema_ensured.store(true, Ordering::Release);
        Ok(())
    }

    fn metadata_to_json(metadata: &Metadata) -> serde_json::Value {
        let map: serde_json::Map<String, serde_json::Value> = metadata
            .iter()
            .map(|(k, v)| {
                let json_value = match v {
                    MetadataValue::String(s) => serde_json::Value::String(s.clone()),
                    MetadataValue::Int(i) => serde_json::json!(i),
                    MetadataValue::Float(f) => serde_json::json!(f),
                    MetadataValue::Bool(b) => serde_json::json!(b),
                    MetadataValue::Date(d) => serde_json::Value::String(d.to_rfc3339()),
                    MetadataValue::StringArray(items) => serde_json::json!(items),
                    MetadataValue::Json(j) => j.clone(),
                };
                (k.clone(), json_value)
            })
            .collect();
        serde_json::Value::Object(map)
    }

    fn json_to_metadata(value: &serde_json::Value) -> Metadata {
        let mut metadata = Metadata::new();
        if let Some(map) = value.as_object() {
            for (k, v) in map {
                let metadata_value = match v {
                    serde_json::Value::String(s) => MetadataValue::String(s.clone()),
                    serde_json::Value::Number(n) if n.is_i64() => MetadataValue::Int(n.as_i64().unwrap()),
                    serde_json::Value::Number(n) => MetadataValue::Float(n.as_f64().unwrap_or(0.0)),
                    serde_json::Value::Bool(b) => MetadataValue::Bool(*b),
                    other => MetadataValue::Json(other.clone()),
                };
                metadata.insert(k.clone(), metadata_value);
            }
        }
        metadata
    }
}

#[async_trait]
impl Store for PgVectorStore {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        self.ensure_schema().await?;

        let Some(vector) = query.vector.as_ref() else {
            return Err(Error::bad_request(
                "pgvector adapter requires a pre-computed vector; supply an EmbeddingProvider",
            ));
        };
        let embedding = pgvector::Vector::from(vector.clone());

        let mut sql = format!(
            "SELECT id, content, metadata, 1 - (embedding <=> $1) AS similarity, created_at, updated_at \
             FROM {} WHERE 1 - (embedding <=> $1) > $2",
            self.table
        );
        let mut bind_index = 3;
        let mut filter_clauses = Vec::new();
        for _ in &query.filter {
            filter_clauses.push(format!("metadata ->> ${bind_index} = ${}", bind_index + 1));
            bind_index += 2;
        }
        if !filter_clauses.is_empty() {
            sql.push_str(" AND ");
            sql.push_str(&filter_clauses.join(" AND "));
        }
        sql.push_str(" ORDER BY embedding <=> $1 ASC");
        if query.limit > 0 {
            sql.push_str(&format!(" LIMIT {}", query.limit));
        }

        let mut q = sqlx::query(&sql).bind(embedding).bind(query.threshold);
        for (key, value) in &query.filter {
            q = q.bind(key.clone()).bind(value.to_string_repr());
        }

        let rows = q
            .fetch_all(&self.pool)
            .await
            .map_err(|e| Error::transport_with_source("pgvector search failed", e))?;

        let documents: Vec<Document> = rows
            .into_iter()
            .map(|row| {
                let metadata_json: serde_json::Value = row.try_get("metadata").unwrap_or(serde_json::Value::Null);
                Document {
                    id: row.try_get("id").unwrap_or_default(),
                    content: row.try_get("content").unwrap_or_default(),
                    metadata: Self::json_to_metadata(&metadata_json),
                    score: row.try_get::<f64, _>("similarity").ok(),
                    created: row.try_get::<DateTime<Utc>, _>("created_at").ok(),
                    updated: row.try_get::<DateTime<Utc>, _>("updated_at").ok(),
                }
            })
            .collect();

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
                "pgvector adapter requires an external EmbeddingProvider to store documents",
            ));
        };
        self.ensure_schema().await?;

        let mut succeeded = 0usize;
        let mut failures: Vec<String> = Vec::new();

        for chunk in documents.chunks(DEFAULT_WRITE_BATCH_SIZE) {
            let texts: Vec<String> = chunk.iter().map(|d| d.content.clone()).collect();
            let embeddings = match provider.embed_batch(&texts).await {
                Ok(e) => e,
                Err(e) => {
                    failures.push(e.to_string());
                    continue;
                }
            };

            for (doc, embedding) in chunk.iter().zip(embeddings) {
                let now = Utc::now();
                let created = doc.created.unwrap_or(now);
                let updated = doc.updated.unwrap_or(now);
                let sql = format!(
                    "INSERT INTO {} (id, content, metadata, embedding, created_at, updated_at) \
                     VALUES ($1, $2, $3, $4, $5, $6) \
                     ON CONFLICT (id) DO UPDATE SET content = EXCLUDED.content, metadata = EXCLUDED.metadata, \
                     embedding = EXCLUDED.embedding, updated_at = EXCLUDED.updated_at",
                    self.table
                );
                let result = sqlx::query(&sql)
                    .bind(&doc.id)
                    .bind(&doc.content)
                    .bind(Self::metadata_to_json(&doc.metadata))
                    .bind(pgvector::Vector::from(embedding))
                    .bind(created)
                    .bind(updated)
                    .execute(&self.pool)
                    .await;
                match result {
                    Ok(_) => succeeded += 1,
                    Err(e) => failures.push(e.to_string()),
                }
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
        self.ensure_schema().await?;
        let sql = format!("DELETE FROM {} WHERE id = ANY($1)", self.table);
        sqlx::query(&sql)
            .bind(ids)
            .execute(&self.pool)
            .await
            .map_err(|e| Error::transport_with_source("pgvector delete failed", e))?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        if let Err(e) = sqlx::query("SELECT 1").execute(&self.pool).await {
            return Ok(HealthStatus::unhealthy(format!("postgres unreachable: {e}")));
        }

        match sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS (SELECT 1 FROM pg_extension WHERE extname = 'vector')",
        )
        .fetch_one(&self.pool)
        .await
        {
            Ok(true) => Ok(HealthStatus::healthy()),
            Ok(false) => Ok(HealthStatus::unhealthy(
                "pgvector extension not installed; run: CREATE EXTENSION vector",
            )),
            Err(e) => Ok(HealthStatus::unhealthy(format!(
                "failed to check pgvector extension presence: {e}"
            ))),
        }
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

//! Typed, non-global adapter configuration, builder-style.

use ragcore_core::constants::DEFAULT_VECTOR_DIMENSIONS;
use std::sync::Arc;

/// Distance metric an adapter's ANN index uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DistanceMetric {
    /// Cosine similarity/distance, the default everywhere
    #[default]
    Cosine,
    /// Dot product
    Dot,
    /// Euclidean distance
    Euclidean,
}

/// Configuration for the relational/PGVector-like adapter.
#[derive(Clone)]
pub struct PgVectorConfig {
    /// Postgres connection string
    pub connection_string: String,
    /// Table name
    pub table: String,
    /// Vector column dimensionality
    pub dimensions: usize,
    /// Distance metric for the ANN index
    pub distance_metric: DistanceMetric,
    /// External embedding provider, required for `store`
    pub embedding_provider: Option<Arc<dyn ragcore_core::EmbeddingProvider>>,
    /// Connection pool size
    pub pool_size: u32,
}

impl PgVectorConfig {
    /// Start a config with a connection string and the documented defaults
    /// (table `"documents"`, 1536 dimensions, cosine distance).
    pub fn new(connection_string: impl Into<String>) -> Self {
        Self {
            connection_string: connection_string.into(),
            table: "documents".to_string(),
            dimensions: DEFAULT_VECTOR_DIMENSIONS,
            distance_metric: DistanceMetric::Cosine,
            embedding_provider: None,
            pool_size: 5,
        }
    }

    /// Override the table name.
    #[must_use]
    pub fn with_table(mut self, table: impl Into<String>) -> Self {
        self.table = table.into();
        self
    }

    /// Override vector dimensionality.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Attach an external embedding provider (required before `store`
    /// succeeds).
    #[must_use]
    pub fn with_embedding_provider(mut self, provider: Arc<dyn ragcore_core::EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Override the connection pool size.
    #[must_use]
    pub fn with_pool_size(mut self, pool_size: u32) -> Self {
        self.pool_size = pool_size;
        self
    }
}

/// Configuration for the gRPC/Qdrant-like adapter.
#[derive(Clone)]
pub struct QdrantConfig {
    /// gRPC endpoint, e.g. `http://localhost:6334`
    pub endpoint: String,
    /// Collection name
    pub collection: String,
    /// Vector dimensionality
    pub dimensions: usize,
    /// Distance metric for the collection
    pub distance_metric: DistanceMetric,
    /// External embedding provider, required for `store`
    pub embedding_provider: Option<Arc<dyn ragcore_core::EmbeddingProvider>>,
    /// Optional API key for managed Qdrant Cloud instances
    pub api_key: Option<String>,
}

impl QdrantConfig {
    /// Start a config with an endpoint and the documented defaults
    /// (collection `"documents"`, 1536 dimensions, cosine distance).
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            collection: "documents".to_string(),
            dimensions: DEFAULT_VECTOR_DIMENSIONS,
            distance_metric: DistanceMetric::Cosine,
            embedding_provider: None,
            api_key: None,
        }
    }

    /// Override the collection name.
    #[must_use]
    pub fn with_collection(mut self, collection: impl Into<String>) -> Self {
        self.collection = collection.into();
        self
    }

    /// Override vector dimensionality.
    #[must_use]
    pub fn with_dimensions(mut self, dimensions: usize) -> Self {
        self.dimensions = dimensions;
        self
    }

    /// Attach an external embedding provider (required before `store`
    /// succeeds).
    #[must_use]
    pub fn with_embedding_provider(mut self, provider: Arc<dyn ragcore_core::EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Attach an API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

/// A schema property declaration for the GraphQL/Weaviate-like adapter.
#[derive(Debug, Clone)]
pub struct SchemaProperty {
    /// Property name
    pub name: String,
    /// Property data type
    pub data_type: PropertyType,
}

/// Strict property types the Weaviate-like schema accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyType {
    /// UTF-8 text
    Text,
    /// Array of UTF-8 strings
    TextArray,
    /// 64-bit integer
    Int,
    /// 64-bit float
    Number,
    /// Boolean
    Bool,
    /// RFC-3339 timestamp
    Date,
}

/// Configuration for the GraphQL/Weaviate-like adapter. Schema must be
/// supplied up front — `new` refuses to construct the adapter without one.
#[derive(Clone)]
pub struct WeaviateConfig {
    /// Base HTTP endpoint, e.g. `http://localhost:8080`
    pub endpoint: String,
    /// Class name (the collection-equivalent)
    pub class_name: String,
    /// Vectorizer module name, or `"none"` for pre-computed vectors only
    pub vectorizer: String,
    /// Typed property schema
    pub properties: Vec<SchemaProperty>,
    /// Optional API key
    pub api_key: Option<String>,
}

impl WeaviateConfig {
    /// Start a config. `class_name` and `properties` are required; an empty
    /// `properties` list is still valid (content-only documents), but the
    /// adapter will reject metadata keys with no matching property.
    pub fn new(endpoint: impl Into<String>, class_name: impl Into<String>, properties: Vec<SchemaProperty>) -> Self {
        Self {
            endpoint: endpoint.into(),
            class_name: class_name.into(),
            vectorizer: "none".to_string(),
            properties,
            api_key: None,
        }
    }

    /// Override the vectorizer module.
    #[must_use]
    pub fn with_vectorizer(mut self, vectorizer: impl Into<String>) -> Self {
        self.vectorizer = vectorizer.into();
        self
    }

    /// Attach an API key.
    #[must_use]
    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }
}

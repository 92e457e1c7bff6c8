//! GraphQL/document-store adapter, Weaviate-like.
//!
//! Unlike the other adapters, schema is not inferred: [`WeaviateStore::connect`]
//! refuses to proceed without a [`WeaviateConfig`] carrying a typed property
//! list, and every write validates metadata fields against it before anything
//! touches the wire.

use crate::config::{PropertyType, WeaviateConfig};
use async_trait::async_trait;
use ragcore_core::{
    AutoEmbeddingCapable, Document, EmbeddingConfig, Error, HealthStatus, Metadata, MetadataValue, Result,
    SearchQuery, SearchResult, Store,
};
use reqwest::Client;
use serde_json::{json, Value};

/// GraphQL/Weaviate-like [`Store`] implementation.
pub struct WeaviateStore {
    client: Client,
    endpoint: String,
    config: WeaviateConfig,
}

impl WeaviateStore {
    /// Connect, requiring a non-empty schema up front.
    pub async fn connect(config: WeaviateConfig) -> Result<Self> {
        if config.endpoint.trim().is_empty() {
            return Err(Error::configuration("weaviate adapter requires a non-empty endpoint"));
        }
        if config.class_name.trim().is_empty() {
            return Err(Error::configuration("weaviate adapter requires a non-empty class name"));
        }

        let client = Client::new();
        let store = Self {
            client,
            endpoint: config.endpoint.clone(),
            config,
        };
        store.ensure_schema().await?;
        Ok(store)
    }

    fn authorized(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.config.api_key {
            Some(key) => builder.bearer_auth(key),
            None => builder,
        }
    }

    /// Create the class if it's absent. An existing class is trusted as-is —
    /// deep schema comparison is out of scope.
    async fn ensure_schema(&self) -> Result<()> {
        let check_url = format!("{}/v1/schema/{}", self.endpoint, self.config.class_name);
        let response = self
            .authorized(self.client.get(&check_url))
            .send()
            .await
            .map_err(|e| Error::transport_with_source("failed to query weaviate schema", e))?;
        if response.status().is_success() {
            return Ok(());
        }

        let properties: Vec<Value> = self
            .config
            .properties
            .iter()
            .map(|p| {
                json!({
                    "name": p.name,
                    "dataType": [weaviate_data_type(p.data_type)],
                })
            })
            .collect();

        let body = json!({
            "class": self.config.class_name,
            "vectorizer": self.config.vectorizer,
            "properties": properties,
        });

        let create_url = format!("{}/v1/schema", self.endpoint);
        let response = self
            .authorized(self.client.post(&create_url).json(&body))
            .send()
            .await
            .map_err(|e| Error::transport_with_source("failed to create weaviate class", e))?;
        if !response.status().is_success() {
            return Err(Error::configuration(format!(
                "failed to create weaviate class {}: {}",
                self.config.class_name,
                response.status()
            )));
        }
        Ok(())
    }

    fn validate_metadata(&self, metadata: &Metadata) -> Result<()> {
        for key in metadata.keys() {
            if key == "vector" {
                continue;
            }
            if !self.config.properties.iter().any(|p| &p.name == key) {
                return Err(Error::bad_request(format!("property {key} not in schema")));
            }
        }
        Ok(())
    }

    fn metadata_to_properties(metadata: &Metadata) -> Value {
        let map: serde_json::Map<String, Value> = metadata
            .iter()
            .filter(|(k, _)| k.as_str() != "vector")
            .map(|(k, v)| (k.clone(), metadata_value_to_json(v)))
            .collect();
        Value::Object(map)
    }

    async fn graphql(&self, query: &str) -> Result<Value> {
        let url = format!("{}/v1/graphql", self.endpoint);
        let response = self
            .authorized(self.client.post(&url).json(&json!({ "query": query })))
            .send()
            .await
            .map_err(|e| Error::transport_with_source("weaviate graphql request failed", e))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::transport_with_source("failed to parse weaviate graphql response", e))?;
        if let Some(errors) = body.get("errors") {
            return Err(Error::transport(format!("weaviate graphql error: {errors}")));
        }
        Ok(body)
    }
}

fn weaviate_data_type(property_type: PropertyType) -> &'static str {
    match property_type {
        PropertyType::Text => "text",
        PropertyType::TextArray => "text[]",
        PropertyType::Int => "int",
        PropertyType::Number => "number",
        PropertyType::Bool => "boolean",
        PropertyType::Date => "date",
    }
}

fn metadata_value_to_json(value: &MetadataValue) -> Value {
    match value {
        MetadataValue::String(s) => json!(s),
        MetadataValue::Int(i) => json!(i),
        MetadataValue::Float(f) => json!(f),
        MetadataValue::Bool(b) => json!(b),
        MetadataValue::Date(d) => json!(d.to_rfc3339()),
        MetadataValue::StringArray(items) => json!(items),
        MetadataValue::Json(j) => j.clone(),
    }
}

fn json_to_metadata(properties: &Value) -> Metadata {
    let mut metadata = Metadata::new();
    if let Some(map) = properties.as_object() {
        for (k, v) in map {
            let value = match v {
                Value::String(s) => MetadataValue::String(s.clone()),
                Value::Number(n) if n.is_i64() => MetadataValue::Int(n.as_i64().unwrap()),
                Value::Number(n) => MetadataValue::Float(n.as_f64().unwrap_or(0.0)),
                Value::Bool(b) => MetadataValue::Bool(*b),
                other => MetadataValue::Json(other.clone()),
            };
            metadata.insert(k.clone(), value);
        }
    }
    metadata
}

#[async_trait]
impl Store for WeaviateStore {
    async fn search(&self, query: &SearchQuery) -> Result<SearchResult> {
        let vectorizer_active = self.config.vectorizer != "none";
        let has_text = !query.text.is_empty();
        let has_vector = query.has_vector();

        let distance = 1.0 - query.threshold;
        let property_names: Vec<&str> = self.config.properties.iter().map(|p| p.name.as_str()).collect();
        let fields = property_names.join(" ");

        let search_clause = if has_text && vectorizer_active {
            format!("nearText: {{ concepts: [\"{}\"], distance: {distance} }}", escape_graphql_string(&query.text))
        } else if has_vector {
            let vector = query.vector.as_ref().unwrap();
            let vector_literal = format!("[{}]", vector.iter().map(|v| v.to_string()).collect::<Vec<_>>().join(","));
            format!("nearVector: {{ vector: {vector_literal}, distance: {distance} }}")
        } else {
            return Err(Error::bad_request(
                "weaviate search requires either query text with an active vectorizer or a pre-computed vector",
            ));
        };

        let limit = if query.limit > 0 { query.limit } else { 10 };
        let graphql_query = format!(
            "{{ Get {{ {class}({search_clause}, limit: {limit}) {{ {fields} _additional {{ id certainty }} }} }} }}",
            class = self.config.class_name,
        );

        let body = self.graphql(&graphql_query).await?;
        let items = body["data"]["Get"][&self.config.class_name].as_array().cloned().unwrap_or_default();

        let documents: Vec<Document> = items
            .into_iter()
            .map(|item| {
                let id = item["_additional"]["id"].as_str().unwrap_or_default().to_string();
                let score = item["_additional"]["certainty"].as_f64();
                let content = item.get("content").and_then(|v| v.as_str()).unwrap_or_default().to_string();
                Document {
                    id,
                    content,
                    metadata: json_to_metadata(&item),
                    score,
                    created: None,
                    updated: None,
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
        for doc in &documents {
            self.validate_metadata(&doc.metadata)?;
        }

        let mut succeeded = 0usize;
        let mut failures: Vec<String> = Vec::new();

        let objects: Vec<Value> = documents
            .iter()
            .map(|doc| {
                let mut properties = Self::metadata_to_properties(&doc.metadata);
                properties["content"] = json!(doc.content);
                let mut object = json!({
                    "class": self.config.class_name,
                    "id": doc.id,
                    "properties": properties,
                });
                if let Some(vector_value) = doc.metadata.get("vector") {
                    if let MetadataValue::Json(vector_json) = vector_value {
                        object["vector"] = vector_json.clone();
                    }
                }
                object
            })
            .collect();

        let url = format!("{}/v1/batch/objects", self.endpoint);
        let response = self
            .authorized(self.client.post(&url).json(&json!({ "objects": objects })))
            .send()
            .await
            .map_err(|e| Error::transport_with_source("weaviate batch write failed", e))?;

        let results: Vec<Value> = response
            .json()
            .await
            .map_err(|e| Error::transport_with_source("failed to parse weaviate batch response", e))?;

        for result in results {
            let errors = result["result"]["errors"]["error"].as_array();
            match errors {
                Some(errs) if !errs.is_empty() => {
                    let message = errs[0]["message"].as_str().unwrap_or("unknown weaviate error").to_string();
                    failures.push(message);
                }
                _ => succeeded += 1,
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
        if ids.len() == 1 {
            let url = format!("{}/v1/objects/{}/{}", self.endpoint, self.config.class_name, ids[0]);
            self.authorized(self.client.delete(&url))
                .send()
                .await
                .map_err(|e| Error::transport_with_source("weaviate delete failed", e))?;
            return Ok(());
        }

        let clauses: Vec<Value> = ids
            .iter()
            .map(|id| json!({ "path": ["id"], "operator": "Equal", "valueText": id }))
            .collect();
        let body = json!({
            "match": {
                "class": self.config.class_name,
                "where": { "operator": "Or", "operands": clauses },
            }
        });
        let url = format!("{}/v1/batch/objects", self.endpoint);
        self.authorized(self.client.delete(&url).json(&body))
            .send()
            .await
            .map_err(|e| Error::transport_with_source("weaviate batch delete failed", e))?;
        Ok(())
    }

    async fn health(&self) -> Result<HealthStatus> {
        let url = format!("{}/v1/nodes", self.endpoint);
        let response = self
            .authorized(self.client.get(&url))
            .send()
            .await
            .map_err(|e| Error::transport_with_source("weaviate health check failed", e))?;
        let body: Value = response
            .json()
            .await
            .map_err(|e| Error::transport_with_source("failed to parse weaviate node status", e))?;
        let any_healthy = body["nodes"]
            .as_array()
            .map(|nodes| nodes.iter().any(|n| n["status"].as_str() == Some("HEALTHY")))
            .unwrap_or(false);
        if any_healthy {
            Ok(HealthStatus::healthy())
        } else {
            Ok(HealthStatus::unhealthy("no healthy weaviate nodes reported"))
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }

    fn as_auto_embedding(&self) -> Option<&dyn AutoEmbeddingCapable> {
        Some(self)
    }
}

impl AutoEmbeddingCapable for WeaviateStore {
    fn supports_auto_embedding(&self) -> bool {
        self.config.vectorizer != "none"
    }

    fn embedding_config(&self) -> EmbeddingConfig {
        EmbeddingConfig {
            model: self.config.vectorizer.clone(),
            dimensions: 0,
            provider: format!("weaviate-{}", self.config.vectorizer),
        }
    }
}

fn escape_graphql_string(text: &str) -> String {
    text.replace('\\', "\\\\").replace('"', "\\\"")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SchemaProperty;

    fn config() -> WeaviateConfig {
        WeaviateConfig::new(
            "http://localhost:8080",
            "Document",
            vec![SchemaProperty {
                name: "topic".to_string(),
                data_type: PropertyType::Text,
            }],
        )
    }

    #[test]
    fn weaviate_data_type_mapping() {
        assert_eq!(weaviate_data_type(PropertyType::Text), "text");
        assert_eq!(weaviate_data_type(PropertyType::TextArray), "text[]");
        assert_eq!(weaviate_data_type(PropertyType::Date), "date");
    }

    #[test]
    fn escape_graphql_string_handles_quotes() {
        assert_eq!(escape_graphql_string("say \"hi\""), "say \\\"hi\\\"");
    }

    #[test]
    fn schema_config_requires_class_name() {
        let cfg = config();
        assert_eq!(cfg.class_name, "Document");
        assert_eq!(cfg.properties.len(), 1);
    }
}

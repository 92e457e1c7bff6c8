//! Document metadata value union
//!
//! Backends map this abstract scalar union onto their own native types;
//! unsupported types fall back to a string representation, and dates are
//! serialized as RFC-3339 UTC strings when the store lacks a native time
//! type.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single metadata value.
///
/// Input documents may also carry genuinely free-form JSON under
/// [`MetadataValue::Json`]; adapters that cannot represent it natively fall
/// back to `to_string()`-style rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MetadataValue {
    /// UTF-8 string scalar
    String(String),
    /// 64-bit signed integer scalar
    Int(i64),
    /// 64-bit float scalar
    Float(f64),
    /// Boolean scalar
    Bool(bool),
    /// Timestamp scalar
    Date(DateTime<Utc>),
    /// Array of strings
    StringArray(Vec<String>),
    /// Free-form JSON, accepted on input only; adapters needing a strict
    /// schema (e.g. the GraphQL/Weaviate-like adapter) reject fields that
    /// don't coerce into one of the scalar variants above.
    Json(serde_json::Value),
}

impl MetadataValue {
    /// Render this value as a string, the universal fallback representation
    /// adapters use when their native type system cannot hold it directly.
    pub fn to_string_repr(&self) -> String {
        match self {
            Self::String(s) => s.clone(),
            Self::Int(i) => i.to_string(),
            Self::Float(f) => f.to_string(),
            Self::Bool(b) => b.to_string(),
            Self::Date(d) => d.to_rfc3339(),
            Self::StringArray(items) => items.join(","),
            Self::Json(v) => v.to_string(),
        }
    }
}

impl From<String> for MetadataValue {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<&str> for MetadataValue {
    fn from(value: &str) -> Self {
        Self::String(value.to_string())
    }
}

impl From<i64> for MetadataValue {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for MetadataValue {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for MetadataValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<DateTime<Utc>> for MetadataValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

/// Metadata map attached to a [`crate::document::Document`] or used as a
/// [`crate::query::SearchQuery`] filter.
pub type Metadata = HashMap<String, MetadataValue>;

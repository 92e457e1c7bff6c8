//! Core data types and store abstraction for backend-agnostic vector search.
//!
//! This crate defines the vocabulary every other `ragcore-*` crate builds
//! on: the [`Document`]/[`SearchQuery`]/[`SearchResult`] value objects, the
//! [`Store`] port, and the optional capability traits a backend adapter may
//! additionally implement. It has no opinion on *how* a backend is reached
//! (`ragcore-providers`) or how results get turned into an LLM context
//! (`ragcore-strategy`, `ragcore-search`).

pub mod capabilities;
pub mod constants;
pub mod document;
pub mod embedding;
pub mod error;
pub mod metadata;
pub mod options;
pub mod query;
pub mod result;
pub mod store;
pub mod strategy;

pub use capabilities::{
    AutoEmbeddingCapable, DiversificationProvider, EmbeddingCapable, EmbeddingConfig, RerankingProvider,
    TokenEstimator, WordRatioTokenEstimator,
};
pub use document::Document;
pub use embedding::EmbeddingProvider;
pub use error::{Error, Result};
pub use metadata::{Metadata, MetadataValue};
pub use options::SearchOptions;
pub use query::SearchQuery;
pub use result::SearchResult;
pub use store::{HealthStatus, Store};
pub use strategy::{ProcessingMode, SimilarityAlgorithm, Strategy};

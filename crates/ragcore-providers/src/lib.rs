//! Concrete backend adapters for the `ragcore` retrieval engine.
//!
//! Each adapter implements [`ragcore_core::Store`] (and, where applicable,
//! the optional capability traits) against a specific transport. The
//! in-memory adapter is always available; the rest are gated behind Cargo
//! features so a deployment only pulls in the client libraries it needs.

pub mod config;
pub mod memory;
pub mod registry;

#[cfg(feature = "pgvector")]
pub mod pgvector;

#[cfg(feature = "qdrant")]
pub mod qdrant;

#[cfg(feature = "weaviate")]
pub mod weaviate;

pub use memory::InMemoryStore;
pub use registry::{is_registered, list_providers, ProviderDescriptor};

#[cfg(feature = "pgvector")]
pub use pgvector::PgVectorStore;

#[cfg(feature = "qdrant")]
pub use qdrant::QdrantStore;

#[cfg(feature = "weaviate")]
pub use weaviate::WeaviateStore;

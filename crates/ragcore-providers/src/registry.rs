//! Provider registry
//!
//! Lists the backend adapters compiled into this binary via a `linkme`
//! distributed slice. Adapter configuration is not uniform enough for a
//! single `factory(&Config)` signature: pgvector, qdrant, and weaviate each
//! take a distinctly shaped, typed config and an async `connect`, so this
//! registry only answers "what is compiled in", not "construct me one by
//! name". Callers still go through each adapter's own `connect` directly.

use linkme::distributed_slice;

/// Describes one compiled-in backend adapter.
pub struct ProviderDescriptor {
    /// Adapter name, matching its Cargo feature (`memory`, `pgvector`, `qdrant`, `weaviate`)
    pub name: &'static str,
    /// Human-readable description
    pub description: &'static str,
}

#[distributed_slice]
pub static PROVIDERS: [ProviderDescriptor] = [..];

#[distributed_slice(PROVIDERS)]
static MEMORY_PROVIDER: ProviderDescriptor = ProviderDescriptor {
    name: "memory",
    description: "In-memory, non-persistent store for testing and bootstrap",
};

#[cfg(feature = "pgvector")]
#[distributed_slice(PROVIDERS)]
static PGVECTOR_PROVIDER: ProviderDescriptor = ProviderDescriptor {
    name: "pgvector",
    description: "Relational store with a pgvector-style cosine-distance column",
};

#[cfg(feature = "qdrant")]
#[distributed_slice(PROVIDERS)]
static QDRANT_PROVIDER: ProviderDescriptor = ProviderDescriptor {
    name: "qdrant",
    description: "gRPC vector store with native RRF-fused diversification",
};

#[cfg(feature = "weaviate")]
#[distributed_slice(PROVIDERS)]
static WEAVIATE_PROVIDER: ProviderDescriptor = ProviderDescriptor {
    name: "weaviate",
    description: "GraphQL document store with a strict, declared schema",
};

/// List every adapter compiled into this binary.
pub fn list_providers() -> Vec<(&'static str, &'static str)> {
    PROVIDERS.iter().map(|p| (p.name, p.description)).collect()
}

/// Whether an adapter with the given name is compiled in.
pub fn is_registered(name: &str) -> bool {
    PROVIDERS.iter().any(|p| p.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_provider_is_always_registered() {
        assert!(is_registered("memory"));
    }

    #[test]
    fn unknown_provider_is_not_registered() {
        assert!(!is_registered("does-not-exist"));
    }

    #[test]
    fn list_providers_includes_descriptions() {
        let providers = list_providers();
        assert!(providers.iter().any(|(name, _)| *name == "memory"));
    }
}

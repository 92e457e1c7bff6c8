//! Default constants for the retrieval core
//!
//! Every optional numeric/string knob on [`crate::options::SearchOptions`]
//! has a single authoritative default defined here, resolved at read time,
//! not at construction time.

/// Default MMR diversity lambda (balances relevance vs. novelty)
pub const DEFAULT_DIVERSITY_LAMBDA: f64 = 0.5;

/// Default multiplier applied to `limit` to size the MMR candidate pool
pub const DEFAULT_CANDIDATES_MULTIPLIER: f64 = 2.0;

/// Default maximum number of documents the diverse strategy selects
pub const DEFAULT_MAX_DIVERSE_RESULTS: usize = 10;

/// Default multiplier applied to `limit` when requesting native reranking
pub const DEFAULT_RERANK_MULTIPLIER: f64 = 2.0;

/// Default word limit for the summary strategy's truncation
pub const DEFAULT_SUMMARY_WORD_LIMIT: usize = 500;

/// Default token estimation ratio (tokens per whitespace-delimited word)
pub const DEFAULT_TOKEN_ESTIMATION_RATIO: f64 = 1.33;

/// Default separator joining assembled context document contents
pub const DEFAULT_SEPARATOR: &str = "\n\n---\n\n";

/// Default vector dimensionality assumed by adapters when not configured
pub const DEFAULT_VECTOR_DIMENSIONS: usize = 1536;

/// Reciprocal Rank Fusion constant `k`
pub const RRF_K: f64 = 60.0;

/// Batch size adapters chunk bulk writes at
pub const DEFAULT_WRITE_BATCH_SIZE: usize = 100;

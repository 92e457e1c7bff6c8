//! Value Object: SearchOptions
//!
//! Controls orchestrator behavior. Every optional numeric
//! knob is either a value or "unset"; accessors resolve the default at read
//! time so that, e.g., an explicit `0.0` lambda is never confused with
//! "unset".

use crate::constants::{
    DEFAULT_CANDIDATES_MULTIPLIER, DEFAULT_DIVERSITY_LAMBDA, DEFAULT_MAX_DIVERSE_RESULTS,
    DEFAULT_RERANK_MULTIPLIER, DEFAULT_SEPARATOR, DEFAULT_SUMMARY_WORD_LIMIT,
};
use crate::embedding::EmbeddingProvider;
use crate::metadata::Metadata;
use crate::strategy::{ProcessingMode, SimilarityAlgorithm, Strategy};
use std::sync::Arc;

/// Orchestrator-facing search options.
///
/// Cloning is cheap: the only non-`Copy` fields are small strings/maps and
/// an `Arc<dyn EmbeddingProvider>`.
#[derive(Clone, Default)]
pub struct SearchOptions {
    /// Minimum similarity in `[0, 1]`; `0.0` disables filtering
    pub threshold: f64,
    /// Maximum results; `<= 0` means backend default
    pub limit: i64,
    /// AND-combined equality filter over metadata fields
    pub filter: Metadata,
    /// Explicit fallback embedding provider
    pub embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    /// How native and post-search processing combine
    pub processing_mode: ProcessingMode,
    /// Strategy selector; `None` means "return the raw SearchResult JSON"
    pub strategy: Option<Strategy>,

    /// Context-assembly token cap; `None` or `Some(0)` means uncapped
    max_tokens: Option<usize>,
    /// Context-assembly separator between document contents
    separator: Option<String>,
    /// Summary strategy word-truncation limit
    summary_word_limit: Option<usize>,

    /// MMR diversity lambda
    diversity_lambda: Option<f64>,
    /// MMR candidate-pool size multiplier (applied to `limit`)
    candidates_multiplier: Option<f64>,
    /// MMR maximum selected-result count
    max_diverse_results: Option<usize>,
    /// MMR text-similarity algorithm
    similarity_algorithm: Option<SimilarityAlgorithm>,
    /// Whether to pick the similarity algorithm adaptively by document length
    adaptive_algorithm: Option<bool>,

    /// Multiplier applied to `limit` when requesting native reranking
    rerank_multiplier: Option<f64>,
}

impl std::fmt::Debug for SearchOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SearchOptions")
            .field("threshold", &self.threshold)
            .field("limit", &self.limit)
            .field("filter", &self.filter)
            .field("has_embedding_provider", &self.embedding_provider.is_some())
            .field("processing_mode", &self.processing_mode)
            .field("strategy", &self.strategy)
            .field("max_tokens", &self.max_tokens)
            .field("separator", &self.separator)
            .field("summary_word_limit", &self.summary_word_limit)
            .field("diversity_lambda", &self.diversity_lambda)
            .field("candidates_multiplier", &self.candidates_multiplier)
            .field("max_diverse_results", &self.max_diverse_results)
            .field("similarity_algorithm", &self.similarity_algorithm)
            .field("adaptive_algorithm", &self.adaptive_algorithm)
            .field("rerank_multiplier", &self.rerank_multiplier)
            .finish()
    }
}

impl SearchOptions {
    /// Start from all-default options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Select a strategy (switches the orchestrator from JSON to context
    /// output, ).
    #[must_use]
    pub fn with_strategy(mut self, strategy: Strategy) -> Self {
        self.strategy = Some(strategy);
        self
    }

    /// Override the processing mode.
    #[must_use]
    pub fn with_processing_mode(mut self, mode: ProcessingMode) -> Self {
        self.processing_mode = mode;
        self
    }

    /// Set the context-assembly token cap.
    #[must_use]
    pub fn with_max_tokens(mut self, max_tokens: usize) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    /// Set the context-assembly separator.
    #[must_use]
    pub fn with_separator(mut self, separator: impl Into<String>) -> Self {
        self.separator = Some(separator.into());
        self
    }

    /// Set the summary strategy's word-truncation limit.
    #[must_use]
    pub fn with_summary_word_limit(mut self, limit: usize) -> Self {
        self.summary_word_limit = Some(limit);
        self
    }

    /// Set the MMR diversity lambda.
    #[must_use]
    pub fn with_diversity_lambda(mut self, lambda: f64) -> Self {
        self.diversity_lambda = Some(lambda);
        self
    }

    /// Set the MMR candidate-pool multiplier.
    #[must_use]
    pub fn with_candidates_multiplier(mut self, multiplier: f64) -> Self {
        self.candidates_multiplier = Some(multiplier);
        self
    }

    /// Set the MMR maximum selected-result count.
    #[must_use]
    pub fn with_max_diverse_results(mut self, max: usize) -> Self {
        self.max_diverse_results = Some(max);
        self
    }

    /// Set the MMR text-similarity algorithm explicitly (ignored if adaptive
    /// selection is also enabled).
    #[must_use]
    pub fn with_similarity_algorithm(mut self, algorithm: SimilarityAlgorithm) -> Self {
        self.similarity_algorithm = Some(algorithm);
        self
    }

    /// Enable/disable adaptive similarity-algorithm selection.
    #[must_use]
    pub fn with_adaptive_algorithm(mut self, adaptive: bool) -> Self {
        self.adaptive_algorithm = Some(adaptive);
        self
    }

    /// Set the native-reranking `limit` multiplier.
    #[must_use]
    pub fn with_rerank_multiplier(mut self, multiplier: f64) -> Self {
        self.rerank_multiplier = Some(multiplier);
        self
    }

    /// Resolved token cap; `0` means uncapped.
    pub fn max_tokens(&self) -> usize {
        self.max_tokens.unwrap_or(0)
    }

    /// Resolved separator.
    pub fn separator(&self) -> &str {
        self.separator.as_deref().unwrap_or(DEFAULT_SEPARATOR)
    }

    /// Resolved summary word-truncation limit.
    pub fn summary_word_limit(&self) -> usize {
        self.summary_word_limit.unwrap_or(DEFAULT_SUMMARY_WORD_LIMIT)
    }

    /// Resolved MMR diversity lambda.
    pub fn diversity_lambda(&self) -> f64 {
        self.diversity_lambda.unwrap_or(DEFAULT_DIVERSITY_LAMBDA)
    }

    /// Resolved MMR candidate-pool multiplier.
    pub fn candidates_multiplier(&self) -> f64 {
        self.candidates_multiplier.unwrap_or(DEFAULT_CANDIDATES_MULTIPLIER)
    }

    /// Resolved MMR maximum selected-result count.
    pub fn max_diverse_results(&self) -> usize {
        self.max_diverse_results.unwrap_or(DEFAULT_MAX_DIVERSE_RESULTS)
    }

    /// Resolved MMR text-similarity algorithm (only consulted directly when
    /// adaptive selection is off).
    pub fn similarity_algorithm(&self) -> SimilarityAlgorithm {
        self.similarity_algorithm.unwrap_or_default()
    }

    /// Whether adaptive similarity-algorithm selection is enabled.
    pub fn adaptive_algorithm(&self) -> bool {
        self.adaptive_algorithm.unwrap_or(false)
    }

    /// Resolved native-reranking `limit` multiplier.
    pub fn rerank_multiplier(&self) -> f64 {
        self.rerank_multiplier.unwrap_or(DEFAULT_RERANK_MULTIPLIER)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_knobs_resolve_to_documented_defaults() {
        let opts = SearchOptions::new();
        assert_eq!(opts.max_tokens(), 0);
        assert_eq!(opts.separator(), DEFAULT_SEPARATOR);
        assert_eq!(opts.summary_word_limit(), 500);
        assert_eq!(opts.diversity_lambda(), 0.5);
        assert_eq!(opts.candidates_multiplier(), 2.0);
        assert_eq!(opts.max_diverse_results(), 10);
        assert_eq!(opts.rerank_multiplier(), 2.0);
        assert!(!opts.adaptive_algorithm());
    }

    #[test]
    fn explicit_zero_lambda_is_not_confused_with_unset() {
        let opts = SearchOptions::new().with_diversity_lambda(0.0);
        assert_eq!(opts.diversity_lambda(), 0.0);
    }

    #[test]
    fn builder_overrides_take_effect() {
        let opts = SearchOptions::new()
            .with_max_tokens(800)
            .with_separator("\n\n")
            .with_strategy(Strategy::Relevant);
        assert_eq!(opts.max_tokens(), 800);
        assert_eq!(opts.separator(), "\n\n");
        assert_eq!(opts.strategy, Some(Strategy::Relevant));
    }
}

//! Token-bounded context assembly.

use ragcore_core::{Document, SearchOptions, Store, TokenEstimator, WordRatioTokenEstimator};

/// Walk `documents` in order, estimating tokens per document via the store's
/// [`TokenEstimator`] if it implements one, else [`WordRatioTokenEstimator`].
/// Stops including documents at the first that would push the running total
/// over `options.max_tokens()` (when set to a positive value); concatenates
/// included content with `options.separator()`.
pub fn assemble(store: &dyn Store, documents: &[Document], options: &SearchOptions) -> String {
    let fallback = WordRatioTokenEstimator::default();
    let estimator: &dyn TokenEstimator = store.as_token_estimator().unwrap_or(&fallback);
    let max_tokens = options.max_tokens();

    let mut included: Vec<&str> = Vec::with_capacity(documents.len());
    let mut running_total = 0usize;

    for doc in documents {
        let cost = estimator.estimate(&doc.content);
        if max_tokens > 0 && running_total + cost > max_tokens {
            break;
        }
        running_total += cost;
        included.push(doc.content.as_str());
    }

    included.join(options.separator())
}

//! Maximum Marginal Relevance selection.
//!
//! Starts from the highest-scoring document and iteratively picks the
//! remaining candidate maximizing `λ·score − (1−λ)·max_similarity_to_selected`,
//! stopping once `max_results` is reached or candidates are exhausted.

use crate::similarity::{adaptive_algorithm, similarity};
use ragcore_core::{Document, SimilarityAlgorithm};

/// MMR selection parameters.
#[derive(Debug, Clone, Copy)]
pub struct MmrParams {
    /// Balances relevance (1.0) against novelty (0.0)
    pub lambda: f64,
    /// Maximum number of documents to select
    pub max_results: usize,
    /// Text-similarity algorithm used for the novelty term
    pub algorithm: SimilarityAlgorithm,
    /// When true, `algorithm` is overridden by average-document-length
    /// adaptive selection
    pub adaptive: bool,
}

/// Select a diverse subset of `candidates` via MMR.
///
/// `candidates` is assumed already sorted by descending `score` (callers pass
/// the raw search results; this function does not re-sort ties). Documents
/// with no `score` are treated as `0.0` for the relevance term.
pub fn select(candidates: &[Document], params: MmrParams) -> Vec<Document> {
    if candidates.is_empty() || params.max_results == 0 {
        return Vec::new();
    }

    let algorithm = if params.adaptive {
        adaptive_algorithm(average_char_len(candidates))
    } else {
        params.algorithm
    };

    let mut remaining: Vec<usize> = (0..candidates.len()).collect();
    let mut selected: Vec<usize> = Vec::with_capacity(params.max_results.min(candidates.len()));

    // Seed with the highest-scoring candidate.
    let first = remaining
        .iter()
        .copied()
        .max_by(|&a, &b| score_of(&candidates[a]).total_cmp(&score_of(&candidates[b])))
        .expect("remaining is non-empty");
    remaining.retain(|&i| i != first);
    selected.push(first);

    while selected.len() < params.max_results && !remaining.is_empty() {
        let mut best_idx = 0usize;
        let mut best_value = f64::NEG_INFINITY;

        for (pos, &candidate_idx) in remaining.iter().enumerate() {
            let relevance = score_of(&candidates[candidate_idx]);
            let max_sim = selected
                .iter()
                .map(|&sel_idx| {
                    similarity(
                        algorithm,
                        &candidates[candidate_idx].content,
                        &candidates[sel_idx].content,
                    )
                })
                .fold(0.0f64, f64::max);

            let mmr_value = params.lambda * relevance - (1.0 - params.lambda) * max_sim;
            if mmr_value > best_value {
                best_value = mmr_value;
                best_idx = pos;
            }
        }

        let chosen = remaining.remove(best_idx);
        selected.push(chosen);
    }

    selected.into_iter().map(|i| candidates[i].clone()).collect()
}

fn score_of(doc: &Document) -> f64 {
    doc.score.unwrap_or(0.0)
}

fn average_char_len(docs: &[Document]) -> f64 {
    if docs.is_empty() {
        return 0.0;
    }
    let total: usize = docs.iter().map(|d| d.content.chars().count()).sum();
    total as f64 / docs.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(id: &str, content: &str, score: f64) -> Document {
        Document::new(id, content).with_score(score)
    }

    #[test]
    fn selects_highest_scoring_document_first() {
        let docs = vec![doc("a", "apples and oranges", 0.4), doc("b", "rocket science", 0.9)];
        let params = MmrParams {
            lambda: 0.5,
            max_results: 2,
            algorithm: SimilarityAlgorithm::Cosine,
            adaptive: false,
        };
        let selected = select(&docs, params);
        assert_eq!(selected[0].id, "b");
    }

    #[test]
    fn caps_at_max_results() {
        let docs = vec![
            doc("a", "alpha beta gamma", 0.9),
            doc("b", "delta epsilon zeta", 0.8),
            doc("c", "eta theta iota", 0.7),
        ];
        let params = MmrParams {
            lambda: 0.5,
            max_results: 2,
            algorithm: SimilarityAlgorithm::Jaccard,
            adaptive: false,
        };
        let selected = select(&docs, params);
        assert_eq!(selected.len(), 2);
    }

    #[test]
    fn avoids_near_duplicate_content() {
        let docs = vec![
            doc("a", "the quick brown fox jumps over the lazy dog", 0.95),
            doc("b", "the quick brown fox jumps over a lazy dog", 0.94),
            doc("c", "completely unrelated penguin migration patterns", 0.5),
        ];
        let params = MmrParams {
            lambda: 0.5,
            max_results: 2,
            algorithm: SimilarityAlgorithm::Jaccard,
            adaptive: false,
        };
        let selected = select(&docs, params);
        let ids: Vec<&str> = selected.iter().map(|d| d.id.as_str()).collect();
        assert!(ids.contains(&"a"));
        assert!(ids.contains(&"c"), "expected diverse pick, got {ids:?}");
    }

    #[test]
    fn empty_candidates_yield_empty_selection() {
        let params = MmrParams {
            lambda: 0.5,
            max_results: 5,
            algorithm: SimilarityAlgorithm::Cosine,
            adaptive: false,
        };
        assert!(select(&[], params).is_empty());
    }
}

//! Strategy and processing-mode enumerations.
//!
//! `Strategy` names a post-search ordering/selection policy; `ProcessingMode`
//! decides how native backend capabilities and post-search processing
//! combine for a given strategy.

use serde::{Deserialize, Serialize};

/// A named policy for selecting and ordering retrieved documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    /// Stable sort by `score` descending
    Relevant,
    /// Stable sort by `created` descending
    Recent,
    /// No reordering; truncate each document's content
    Summary,
    /// Maximum Marginal Relevance selection
    Diverse,
}

impl Strategy {
    /// Parse a strategy from its wire name, returning `None` for unknown
    /// values (callers surface "unknown strategy" bad-request).
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "relevant" => Some(Self::Relevant),
            "recent" => Some(Self::Recent),
            "summary" => Some(Self::Summary),
            "diverse" => Some(Self::Diverse),
            _ => None,
        }
    }

    /// Whether the search orchestrator defines a native routing path for
    /// this strategy at all.
    pub fn has_native_path(self) -> bool {
        matches!(self, Self::Relevant | Self::Diverse)
    }
}

/// How native backend capability and post-search processing combine when a
/// strategy is selected. Has no effect when no strategy is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingMode {
    /// Try native routing first; fall back to plain search + post-processing
    /// on unavailability or soft-failure.
    #[default]
    Auto,
    /// Native only; error if the store doesn't implement the capability.
    Native,
    /// Plain search + post-processing only; native capability is ignored.
    Post,
    /// Invoke both; native documents take precedence, post-processing still
    /// runs to enforce ordering and token caps.
    Both,
}

/// Pluggable text-similarity algorithm used by MMR.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SimilarityAlgorithm {
    /// Character 2-gram cosine similarity
    Cosine,
    /// Word-set Jaccard similarity
    Jaccard,
    /// Edit-distance-based similarity (`1 - jaro_winkler_distance`)
    JaroWinkler,
    /// Word-set Sorensen-Dice similarity
    SorensenDice,
    /// `0.7 * cosine + 0.3 * jaccard`
    Hybrid,
}

impl Default for SimilarityAlgorithm {
    /// Hybrid blends character- and word-level signal, making it a
    /// reasonable default when the caller hasn't chosen adaptive selection
    /// or an explicit algorithm.
    fn default() -> Self {
        Self::Hybrid
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(Strategy::parse("ReLeVaNt"), Some(Strategy::Relevant));
        assert_eq!(Strategy::parse("bogus"), None);
    }

    #[test]
    fn native_path_only_for_relevant_and_diverse() {
        assert!(Strategy::Relevant.has_native_path());
        assert!(Strategy::Diverse.has_native_path());
        assert!(!Strategy::Recent.has_native_path());
        assert!(!Strategy::Summary.has_native_path());
    }
}

//! Pluggable text-similarity algorithms used by MMR diversification.
//!
//! All functions return a similarity in `[0, 1]`; degenerate inputs (empty
//! strings, or a zero-length pair) return `0.0` rather than `1.0` — treating
//! two empty strings as "identical" invites pathological MMR convergence
//! (everything looks maximally similar to nothing).

use ragcore_core::SimilarityAlgorithm;
use std::collections::HashSet;

/// Dispatch to the similarity function named by `algorithm`.
pub fn similarity(algorithm: SimilarityAlgorithm, a: &str, b: &str) -> f64 {
    match algorithm {
        SimilarityAlgorithm::Cosine => cosine_2gram(a, b),
        SimilarityAlgorithm::Jaccard => jaccard(a, b),
        SimilarityAlgorithm::JaroWinkler => jaro_winkler_similarity(a, b),
        SimilarityAlgorithm::SorensenDice => sorensen_dice(a, b),
        SimilarityAlgorithm::Hybrid => hybrid(a, b),
    }
}

/// Choose an algorithm by average document character length:
/// `<100` → jaccard, `100..=1000` → cosine, `>1000` → hybrid.
pub fn adaptive_algorithm(avg_char_len: f64) -> SimilarityAlgorithm {
    if avg_char_len < 100.0 {
        SimilarityAlgorithm::Jaccard
    } else if avg_char_len <= 1000.0 {
        SimilarityAlgorithm::Cosine
    } else {
        SimilarityAlgorithm::Hybrid
    }
}

fn char_bigrams(s: &str) -> Vec<String> {
    let chars: Vec<char> = s.chars().collect();
    if chars.len() < 2 {
        return Vec::new();
    }
    chars.windows(2).map(|w| w.iter().collect()).collect()
}

fn word_set(s: &str) -> HashSet<String> {
    s.split_whitespace().map(|w| w.to_lowercase()).collect()
}

/// Character 2-gram cosine similarity.
pub fn cosine_2gram(a: &str, b: &str) -> f64 {
    let bigrams_a = char_bigrams(a);
    let bigrams_b = char_bigrams(b);
    if bigrams_a.is_empty() || bigrams_b.is_empty() {
        return 0.0;
    }

    let mut counts_a: std::collections::HashMap<&str, i32> = std::collections::HashMap::new();
    for g in &bigrams_a {
        *counts_a.entry(g.as_str()).or_insert(0) += 1;
    }
    let mut counts_b: std::collections::HashMap<&str, i32> = std::collections::HashMap::new();
    for g in &bigrams_b {
        *counts_b.entry(g.as_str()).or_insert(0) += 1;
    }

    let mut dot = 0.0f64;
    for (g, count_a) in &counts_a {
        if let Some(count_b) = counts_b.get(g) {
            dot += f64::from(*count_a) * f64::from(*count_b);
        }
    }

    let norm_a: f64 = counts_a.values().map(|c| f64::from(*c).powi(2)).sum::<f64>().sqrt();
    let norm_b: f64 = counts_b.values().map(|c| f64::from(*c).powi(2)).sum::<f64>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Word-set Jaccard similarity: `|A ∩ B| / |A ∪ B|`.
pub fn jaccard(a: &str, b: &str) -> f64 {
    let set_a = word_set(a);
    let set_b = word_set(b);
    if set_a.is_empty() && set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    let union = set_a.union(&set_b).count();
    if union == 0 {
        return 0.0;
    }
    intersection as f64 / union as f64
}

/// Word-set Sorensen-Dice similarity: `2|A ∩ B| / (|A| + |B|)`.
pub fn sorensen_dice(a: &str, b: &str) -> f64 {
    let set_a = word_set(a);
    let set_b = word_set(b);
    if set_a.is_empty() || set_b.is_empty() {
        return 0.0;
    }
    let intersection = set_a.intersection(&set_b).count();
    (2.0 * intersection as f64) / (set_a.len() + set_b.len()) as f64
}

/// `0.7 * cosine_2gram + 0.3 * jaccard`.
pub fn hybrid(a: &str, b: &str) -> f64 {
    0.7 * cosine_2gram(a, b) + 0.3 * jaccard(a, b)
}

/// Jaro-Winkler similarity, `1 - distance`; stored directly as a similarity
/// rather than a distance.
pub fn jaro_winkler_similarity(a: &str, b: &str) -> f64 {
    let jaro = jaro_similarity(a, b);
    if jaro == 0.0 {
        return 0.0;
    }

    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let max_prefix = 4usize.min(a_chars.len()).min(b_chars.len());
    let mut prefix_len = 0;
    for i in 0..max_prefix {
        if a_chars[i] == b_chars[i] {
            prefix_len += 1;
        } else {
            break;
        }
    }

    const SCALING_FACTOR: f64 = 0.1;
    jaro + (prefix_len as f64 * SCALING_FACTOR * (1.0 - jaro))
}

fn jaro_similarity(a: &str, b: &str) -> f64 {
    let a_chars: Vec<char> = a.chars().collect();
    let b_chars: Vec<char> = b.chars().collect();
    let (a_len, b_len) = (a_chars.len(), b_chars.len());

    if a_len == 0 && b_len == 0 {
        return 0.0;
    }
    if a_len == 0 || b_len == 0 {
        return 0.0;
    }

    let match_distance = (a_len.max(b_len) / 2).saturating_sub(1);
    let mut a_matches = vec![false; a_len];
    let mut b_matches = vec![false; b_len];
    let mut matches = 0usize;

    for i in 0..a_len {
        let start = i.saturating_sub(match_distance);
        let end = (i + match_distance + 1).min(b_len);
        for j in start..end {
            if b_matches[j] || a_chars[i] != b_chars[j] {
                continue;
            }
            a_matches[i] = true;
            b_matches[j] = true;
            matches += 1;
            break;
        }
    }

    if matches == 0 {
        return 0.0;
    }

    let mut transpositions = 0usize;
    let mut b_index = 0;
    for i in 0..a_len {
        if !a_matches[i] {
            continue;
        }
        while !b_matches[b_index] {
            b_index += 1;
        }
        if a_chars[i] != b_chars[b_index] {
            transpositions += 1;
        }
        b_index += 1;
    }
    let transpositions = transpositions / 2;

    let matches_f = matches as f64;
    (matches_f / a_len as f64 + matches_f / b_len as f64 + (matches_f - transpositions as f64) / matches_f) / 3.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn identical_strings_are_maximally_similar() {
        assert!((cosine_2gram("hello world", "hello world") - 1.0).abs() < 1e-9);
        assert!((jaccard("hello world", "hello world") - 1.0).abs() < 1e-9);
        assert!((sorensen_dice("hello world", "hello world") - 1.0).abs() < 1e-9);
        assert!((jaro_winkler_similarity("hello", "hello") - 1.0).abs() < 1e-9);
    }

    #[test]
    fn empty_pair_is_zero_not_one() {
        assert_eq!(cosine_2gram("", ""), 0.0);
        assert_eq!(jaccard("", ""), 0.0);
        assert_eq!(sorensen_dice("", ""), 0.0);
        assert_eq!(jaro_winkler_similarity("", ""), 0.0);
    }

    #[test]
    fn disjoint_strings_have_low_similarity() {
        assert_eq!(jaccard("apple banana", "cucumber durian"), 0.0);
    }

    #[test]
    fn adaptive_selection_matches_documented_thresholds() {
        assert_eq!(adaptive_algorithm(50.0), SimilarityAlgorithm::Jaccard);
        assert_eq!(adaptive_algorithm(500.0), SimilarityAlgorithm::Cosine);
        assert_eq!(adaptive_algorithm(1500.0), SimilarityAlgorithm::Hybrid);
        assert_eq!(adaptive_algorithm(100.0), SimilarityAlgorithm::Cosine);
        assert_eq!(adaptive_algorithm(1000.0), SimilarityAlgorithm::Cosine);
    }

    #[test]
    fn jaro_winkler_rewards_shared_prefix() {
        let sim = jaro_winkler_similarity("martha", "marhta");
        assert!(sim > jaro_similarity("martha", "marhta"));
    }
}

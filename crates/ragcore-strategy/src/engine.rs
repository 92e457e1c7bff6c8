//! Post-search selection and ordering.
//!
//! Given a document list and the resolved [`SearchOptions`] knobs, produces
//! the re-ordered, possibly filtered/truncated list a strategy names. This
//! is the "post" half of the orchestrator's native/post split;
//! `ragcore-search` is the only intended caller, but the engine has no
//! dependency on it — lower layers never depend on the orchestrator above
//! them.

use crate::mmr::{self, MmrParams};
use ragcore_core::{Document, Error, Result, SearchOptions, Strategy};

/// Apply `strategy` to `documents` using the knobs resolved from `options`.
///
/// Unknown strategies cannot reach this function (the `Strategy` enum is
/// closed), but an exhaustive match with no wildcard arm keeps that
/// guarantee enforced at compile time.
pub fn apply(strategy: Strategy, documents: Vec<Document>, options: &SearchOptions) -> Result<Vec<Document>> {
    tracing::debug!(?strategy, candidates = documents.len(), "applying post-search strategy");
    match strategy {
        Strategy::Relevant => Ok(sort_relevant(documents)),
        Strategy::Recent => Ok(sort_recent(documents)),
        Strategy::Summary => Ok(summarize(documents, options.summary_word_limit())),
        Strategy::Diverse => Ok(diversify(documents, options)),
    }
}

/// Stable sort by `score` descending; ties preserve input order.
fn sort_relevant(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| {
        let sa = a.score.unwrap_or(0.0);
        let sb = b.score.unwrap_or(0.0);
        sb.total_cmp(&sa)
    });
    documents
}

/// Stable sort by `created` descending; ties preserve input order. Documents
/// with no `created` timestamp sort as if created at the Unix epoch.
fn sort_recent(mut documents: Vec<Document>) -> Vec<Document> {
    documents.sort_by(|a, b| {
        let ca = a.created.unwrap_or_default();
        let cb = b.created.unwrap_or_default();
        cb.cmp(&ca)
    });
    documents
}

/// Truncate each document's `content` to the first `limit` whitespace-
/// delimited words, appending `...` iff truncation occurred. `limit == 0`
/// yields `...` alone for every document with non-empty content.
fn summarize(mut documents: Vec<Document>, limit: usize) -> Vec<Document> {
    for doc in &mut documents {
        doc.content = truncate_words(&doc.content, limit);
    }
    documents
}

fn truncate_words(content: &str, limit: usize) -> String {
    let words: Vec<&str> = content.split_whitespace().collect();
    if words.len() <= limit {
        return content.to_string();
    }
    let mut truncated = words[..limit].join(" ");
    truncated.push_str("...");
    truncated
}

/// Apply MMR diversification using the options' resolved MMR knobs.
fn diversify(documents: Vec<Document>, options: &SearchOptions) -> Vec<Document> {
    let params = MmrParams {
        lambda: options.diversity_lambda(),
        max_results: options.max_diverse_results(),
        algorithm: options.similarity_algorithm(),
        adaptive: options.adaptive_algorithm(),
    };
    mmr::select(&documents, params)
}

/// Parse a strategy name, surfacing "unknown strategy" bad
/// request rather than panicking or silently defaulting.
pub fn parse_strategy(name: &str) -> Result<Strategy> {
    Strategy::parse(name).ok_or_else(|| Error::bad_request(format!("unknown strategy: {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn doc(id: &str, score: f64) -> Document {
        Document::new(id, format!("content for {id}")).with_score(score)
    }

    #[test]
    fn relevant_sorts_descending_and_preserves_ties() {
        let docs = vec![doc("a", 0.5), doc("b", 0.9), doc("c", 0.5)];
        let opts = SearchOptions::new();
        let sorted = apply(Strategy::Relevant, docs, &opts).unwrap();
        let ids: Vec<&str> = sorted.iter().map(|d| d.id.as_str()).collect();
        assert_eq!(ids, vec!["b", "a", "c"]);
    }

    #[test]
    fn recent_sorts_descending_by_created() {
        let now = Utc::now();
        let mut old = Document::new("old", "x");
        old.created = Some(now - Duration::days(5));
        let mut new = Document::new("new", "y");
        new.created = Some(now);
        let opts = SearchOptions::new();
        let sorted = apply(Strategy::Recent, vec![old, new], &opts).unwrap();
        assert_eq!(sorted[0].id, "new");
        assert_eq!(sorted[1].id, "old");
    }

    #[test]
    fn summary_truncates_and_appends_ellipsis() {
        let doc = Document::new("a", "one two three four five");
        let opts = SearchOptions::new().with_summary_word_limit(3);
        let summarized = apply(Strategy::Summary, vec![doc], &opts).unwrap();
        assert_eq!(summarized[0].content, "one two three...");
    }

    #[test]
    fn summary_zero_limit_yields_ellipsis_alone() {
        let doc = Document::new("a", "one two three");
        let opts = SearchOptions::new().with_summary_word_limit(0);
        let summarized = apply(Strategy::Summary, vec![doc], &opts).unwrap();
        assert_eq!(summarized[0].content, "...");
    }

    #[test]
    fn summary_does_not_truncate_short_content() {
        let doc = Document::new("a", "short");
        let opts = SearchOptions::new().with_summary_word_limit(500);
        let summarized = apply(Strategy::Summary, vec![doc], &opts).unwrap();
        assert_eq!(summarized[0].content, "short");
    }

    #[test]
    fn diverse_caps_at_max_diverse_results() {
        let docs = vec![doc("a", 0.9), doc("b", 0.8), doc("c", 0.7)];
        let opts = SearchOptions::new().with_max_diverse_results(2);
        let selected = apply(Strategy::Diverse, docs, &opts).unwrap();
        assert!(selected.len() <= 2);
    }

    #[test]
    fn unknown_strategy_name_is_bad_request() {
        let err = parse_strategy("bogus").unwrap_err();
        assert!(matches!(err, Error::BadRequest { .. }));
    }
}

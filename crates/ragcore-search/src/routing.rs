//! Native routing table and processing-mode dispatch.

use ragcore_core::{Document, Error, ProcessingMode, Result, SearchOptions, SearchQuery, Store, Strategy};

/// The outcome of deciding how a strategy's documents were produced.
pub struct RoutedDocuments {
    /// The document list to feed into context assembly
    pub documents: Vec<Document>,
    /// When `true`, the strategy engine must NOT reorder `documents` — the
    /// backend already applied the strategy natively. Token-cap enforcement in context assembly still applies.
    pub native_processed: bool,
}

/// Attempt the native routing path for `strategy` against `store`: `relevant`
/// routes through `RerankingProvider`, `diverse` through
/// `DiversificationProvider`, `recent`/`summary` have no native path.
/// Returns `Ok(None)` when no native capability is available for this
/// strategy/store combination (not an error).
async fn try_native(
    store: &dyn Store,
    strategy: Strategy,
    query: &SearchQuery,
    options: &SearchOptions,
) -> Result<Option<Vec<Document>>> {
    match strategy {
        Strategy::Relevant => {
            let Some(reranker) = store.as_reranking() else {
                return Ok(None);
            };
            let top_k = scale_limit(query.limit, options.rerank_multiplier());
            let result = reranker.search_reranked(query, top_k).await?;
            Ok(Some(result.documents))
        }
        Strategy::Diverse => {
            let Some(diversifier) = store.as_diversification() else {
                return Ok(None);
            };
            let candidates_limit = scale_limit(query.limit, options.candidates_multiplier());
            let result = diversifier
                .search_diverse(query, candidates_limit, options.diversity_lambda())
                .await?;
            Ok(Some(result.documents))
        }
        Strategy::Recent | Strategy::Summary => Ok(None),
    }
}

fn scale_limit(limit: i64, multiplier: f64) -> i64 {
    if limit <= 0 {
        return limit;
    }
    ((limit as f64) * multiplier).round() as i64
}

/// Resolve the document list a selected strategy should operate on,
/// dispatching per `options.processing_mode`.
pub async fn route(
    store: &dyn Store,
    strategy: Strategy,
    query: &SearchQuery,
    options: &SearchOptions,
) -> Result<RoutedDocuments> {
    match options.processing_mode {
        ProcessingMode::Native => {
            if !strategy.has_native_path() {
                return Err(Error::configuration(format!(
                    "native processing is not available for strategy {strategy:?}: no native routing path is defined"
                )));
            }
            match try_native(store, strategy, query, options).await? {
                Some(documents) => Ok(RoutedDocuments {
                    documents,
                    native_processed: true,
                }),
                None => Err(Error::configuration(format!(
                    "native processing is not available: store does not implement the capability required for strategy {strategy:?}"
                ))),
            }
        }
        ProcessingMode::Post => {
            let result = store.search(query).await?;
            Ok(RoutedDocuments {
                documents: result.documents,
                native_processed: false,
            })
        }
        ProcessingMode::Auto => {
            if strategy.has_native_path() {
                match try_native(store, strategy, query, options).await {
                    Ok(Some(documents)) => {
                        return Ok(RoutedDocuments {
                            documents,
                            native_processed: true,
                        });
                    }
                    Ok(None) => {
                        tracing::debug!(?strategy, "native capability unavailable, falling back to post-search");
                    }
                    Err(err) => {
                        tracing::warn!(?strategy, error = %err, "native routing failed, falling back to post-search");
                    }
                }
            }
            let result = store.search(query).await?;
            Ok(RoutedDocuments {
                documents: result.documents,
                native_processed: false,
            })
        }
        ProcessingMode::Both => {
            let native_documents = if strategy.has_native_path() {
                try_native(store, strategy, query, options).await.unwrap_or(None)
            } else {
                None
            };
            let search_documents = store.search(query).await?.documents;

            match native_documents {
                Some(documents) if !documents.is_empty() => Ok(RoutedDocuments {
                    documents,
                    native_processed: true,
                }),
                _ => Ok(RoutedDocuments {
                    documents: search_documents,
                    native_processed: false,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_limit_leaves_non_positive_limit_as_backend_default() {
        assert_eq!(scale_limit(0, 2.0), 0);
        assert_eq!(scale_limit(-1, 2.0), -1);
    }

    #[test]
    fn scale_limit_applies_multiplier_and_rounds() {
        assert_eq!(scale_limit(3, 2.0), 6);
        assert_eq!(scale_limit(5, 1.5), 8);
    }
}

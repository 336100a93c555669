//! Retrieval over the index collaborator with graceful degradation.
//!
//! Every failure mode resolves to an empty result list with a status
//! describing what happened: the domain gate rejecting the query, the
//! index being unreachable or empty, the query embedding failing, or both
//! search transports failing. Callers treat "no results" as a normal
//! outcome, never an exception.

use airguide_embed::EmbeddingProvider;
use airguide_index::VectorIndex;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::gate;
use crate::types::{QueryResult, Retrieval, RetrievalStatus};

/// Embeds queries and searches the index with a sequential transport
/// fallback.
pub struct RetrievalService {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
}

impl RetrievalService {
    /// Create a service over the collaborator handles.
    pub fn new(index: Arc<dyn VectorIndex>, embedder: Arc<dyn EmbeddingProvider>) -> Self {
        Self { index, embedder }
    }

    /// Retrieve the `top_k` most relevant chunks for a query.
    pub async fn retrieve(&self, query: &str, top_k: usize) -> Retrieval {
        // Gate before spending an embedding or index call.
        if !gate::is_in_domain(query) {
            debug!("Query rejected by domain gate");
            return Retrieval::empty(RetrievalStatus::OutOfDomain);
        }

        // Reachable and non-empty, or there is nothing to search.
        if !self.index.healthy().await {
            warn!("Index unavailable or empty; returning no results");
            return Retrieval::empty(RetrievalStatus::Unavailable);
        }

        let vector = match self.embedder.embed(query).await {
            Ok(vector) => vector,
            Err(e) => {
                warn!("Query embedding failed: {}; returning no results", e);
                return Retrieval::empty(RetrievalStatus::Unavailable);
            }
        };

        let hits = match self.index.search(&vector, top_k).await {
            Ok(hits) => hits,
            Err(primary_err) => {
                // Sequential fallback only, never speculative.
                warn!(
                    "Primary search transport failed: {}; trying fallback",
                    primary_err
                );
                match self.index.search_fallback(&vector, top_k).await {
                    Ok(hits) => hits,
                    Err(fallback_err) => {
                        warn!(
                            "Fallback search transport failed: {}; returning no results",
                            fallback_err
                        );
                        return Retrieval::empty(RetrievalStatus::Unavailable);
                    }
                }
            }
        };

        // Normalize, dropping hits with no payload text. Order is the
        // index's descending-score order; ties keep arrival order.
        let results: Vec<QueryResult> = hits
            .into_iter()
            .filter_map(|hit| {
                let payload = hit.payload?;
                if payload.text.trim().is_empty() {
                    return None;
                }
                Some(QueryResult {
                    text: payload.text,
                    title: payload.title,
                    url: payload.url,
                    chunk_id: payload.chunk_id,
                    score: hit.score,
                })
            })
            .collect();

        debug!("Retrieved {} results", results.len());

        let status = if results.is_empty() {
            RetrievalStatus::NoMatches
        } else {
            RetrievalStatus::Found
        };

        Retrieval { results, status }
    }
}

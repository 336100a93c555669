//! Query-path boundary operation.
//!
//! Composes the synchronous chain gate -> retrieve -> synthesize ->
//! format into the single `answer` operation the boundary layer exposes.
//! "No relevant documents" is a legitimate response shape, not an error.

use airguide_embed::EmbeddingProvider;
use airguide_index::VectorIndex;
use std::sync::Arc;

use airguide_core::AppResult;

use crate::format;
use crate::retrieval::RetrievalService;
use crate::synthesize::AnswerSynthesizer;
use crate::types::AnswerResponse;

/// Answers domain questions over the indexed corpus.
pub struct AnswerService {
    retrieval: RetrievalService,
    synthesizer: AnswerSynthesizer,
    top_k: usize,
}

impl AnswerService {
    /// Build the service over the collaborator handles.
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        top_k: usize,
    ) -> AppResult<Self> {
        Ok(Self {
            retrieval: RetrievalService::new(index, embedder),
            synthesizer: AnswerSynthesizer::new()?,
            top_k,
        })
    }

    /// Answer a query.
    ///
    /// Request-scoped and stateless: concurrent calls share only the
    /// read-only collaborator handles.
    pub async fn answer(&self, query: &str) -> AnswerResponse {
        let retrieval = self.retrieval.retrieve(query, self.top_k).await;

        tracing::debug!(
            "Retrieval finished with status {:?} and {} results",
            retrieval.status,
            retrieval.results.len()
        );

        let answer = self.synthesizer.synthesize(&retrieval.results, query);

        AnswerResponse {
            answer: format::to_markup(&answer.body),
            sources: answer.sources,
            status: retrieval.status,
        }
    }
}

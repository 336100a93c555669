//! Query-path type definitions.

use serde::{Deserialize, Serialize};

/// A normalized retrieval hit.
///
/// Ephemeral, produced per query, ordered by descending score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QueryResult {
    /// Chunk text
    pub text: String,

    /// Source document title
    pub title: String,

    /// Source origin URL, when the document has one
    pub url: Option<String>,

    /// Chunk position within its source
    pub chunk_id: u32,

    /// Relevance score from the index
    pub score: f32,
}

/// Outcome category of a retrieval call.
///
/// Degradation paths (out-of-domain, unreachable index) and the genuine
/// "no documents matched" case resolve to the same empty result list, but
/// the boundary layer surfaces them differently: only `NoMatches` is a
/// not-found condition worth reporting distinctly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetrievalStatus {
    /// Results were found
    Found,

    /// Query was in-domain and the index healthy, but nothing matched
    NoMatches,

    /// Query rejected by the domain gate before any retrieval work
    OutOfDomain,

    /// Index unreachable, empty, or both transports failed
    Unavailable,
}

/// Result of a retrieval call: ordered hits plus outcome category.
#[derive(Debug, Clone)]
pub struct Retrieval {
    /// Hits in descending score order, at most `top_k`
    pub results: Vec<QueryResult>,

    /// Outcome category
    pub status: RetrievalStatus,
}

impl Retrieval {
    pub fn empty(status: RetrievalStatus) -> Self {
        Self {
            results: Vec::new(),
            status,
        }
    }
}

/// A citation attached to an answer.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceRef {
    /// Source document title
    pub title: String,

    /// Source origin URL, when the document has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Chunk position within its source
    pub chunk_id: u32,

    /// Truncated preview of the cited chunk
    pub snippet: String,
}

/// A synthesized answer before markup conversion.
#[derive(Debug, Clone)]
pub struct Answer {
    /// Answer body in lightweight markup (bold spans, bullet and
    /// numbered lines)
    pub body: String,

    /// Citations, in retrieval order
    pub sources: Vec<SourceRef>,
}

/// The boundary-layer response for one query.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerResponse {
    /// Render-ready answer markup
    pub answer: String,

    /// Citations, in retrieval order
    pub sources: Vec<SourceRef>,

    /// Retrieval outcome category
    pub status: RetrievalStatus,
}

//! Data types for index interaction: payload shape, points, and search
//! hits.

use serde::{Deserialize, Serialize};

/// Payload stored alongside each vector.
///
/// Carries everything the query path needs to build citations without a
/// second lookup: the chunk text, its source attribution, and the content
/// hash of the source at ingestion time (stale points from a re-ingested
/// source carry an older hash).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChunkPayload {
    /// Chunk text
    pub text: String,

    /// Source document title
    pub title: String,

    /// Source origin URL, when the document has one
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,

    /// Chunk position within its source (0-based)
    pub chunk_id: u32,

    /// Content hash of the source file at ingestion time
    pub source_content_hash: String,
}

/// A point to be written to the index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexedPoint {
    /// Unique point id (generated, not content-derived)
    pub id: String,

    /// Embedding vector; length must equal the collection dimensionality
    pub vector: Vec<f32>,

    /// Attached payload
    pub payload: ChunkPayload,
}

/// A single search hit, ranked by similarity.
#[derive(Debug, Clone)]
pub struct ScoredPoint {
    /// Point id
    pub id: String,

    /// Similarity score (higher is more similar)
    pub score: f32,

    /// Payload, when the hit carried one
    pub payload: Option<ChunkPayload>,
}

/// Similarity metric for a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DistanceMetric {
    Cosine,
    Dot,
    Euclid,
}

impl DistanceMetric {
    /// Wire name used by the index service.
    pub fn as_str(&self) -> &'static str {
        match self {
            DistanceMetric::Cosine => "Cosine",
            DistanceMetric::Dot => "Dot",
            DistanceMetric::Euclid => "Euclid",
        }
    }
}

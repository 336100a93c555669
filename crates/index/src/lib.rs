//! Vector index collaborator clients.
//!
//! The index engine is an external collaborator: a named collection of
//! fixed-dimension vectors with payloads, answering nearest-neighbor
//! queries. This crate defines the trait boundary, a REST client for a
//! Qdrant-compatible service with a schema-strict primary transport and a
//! lenient fallback transport, and an in-memory index for tests and
//! offline development.

pub mod memory;
pub mod qdrant;
pub mod types;

pub use memory::MemoryIndex;
pub use qdrant::QdrantIndex;
pub use types::{ChunkPayload, DistanceMetric, IndexedPoint, ScoredPoint};

use airguide_core::AppResult;

/// Trait for vector index backends.
///
/// Implementations must be safe to share across concurrent in-flight
/// queries. The index is mutated only by the ingestion batch job; the
/// query path only searches and counts.
#[async_trait::async_trait]
pub trait VectorIndex: Send + Sync {
    /// Ensure the target collection exists with the given dimensionality
    /// and metric.
    ///
    /// Idempotent: a conflict on creation is success. An existing
    /// collection is never deleted or recreated; if it cannot be
    /// introspected, implementations proceed optimistically.
    async fn ensure_collection(&self, dimensions: usize, metric: DistanceMetric)
        -> AppResult<()>;

    /// Insert or overwrite a batch of points.
    async fn upsert(&self, points: Vec<IndexedPoint>) -> AppResult<()>;

    /// Nearest-neighbor search, payload included, descending score.
    async fn search(&self, vector: &[f32], limit: usize) -> AppResult<Vec<ScoredPoint>>;

    /// Search over a secondary transport against the same logical
    /// collection.
    ///
    /// Backends with a single transport fall back to `search`.
    async fn search_fallback(&self, vector: &[f32], limit: usize) -> AppResult<Vec<ScoredPoint>> {
        self.search(vector, limit).await
    }

    /// Number of points in the collection.
    async fn count(&self) -> AppResult<u64>;

    /// Whether the collection is reachable and holds at least one point.
    async fn healthy(&self) -> bool {
        matches!(self.count().await, Ok(n) if n > 0)
    }
}

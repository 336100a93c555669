//! In-memory vector index.
//!
//! Cosine similarity over a flat point list. Used by tests and offline
//! development; the contract matches the remote index: upsert overwrites
//! by id, search returns descending scores with payloads.

use airguide_core::{AppError, AppResult};
use async_trait::async_trait;
use std::sync::Mutex;

use crate::types::{DistanceMetric, IndexedPoint, ScoredPoint};
use crate::VectorIndex;

/// In-memory index backend.
#[derive(Debug, Default)]
pub struct MemoryIndex {
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    dimensions: Option<usize>,
    points: Vec<IndexedPoint>,
}

impl MemoryIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }
}

fn cosine(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let na: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let nb: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if na == 0.0 || nb == 0.0 {
        0.0
    } else {
        dot / (na * nb)
    }
}

#[async_trait]
impl VectorIndex for MemoryIndex {
    async fn ensure_collection(
        &self,
        dimensions: usize,
        _metric: DistanceMetric,
    ) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Index("memory index lock poisoned".to_string()))?;
        match inner.dimensions {
            None => {
                inner.dimensions = Some(dimensions);
                Ok(())
            }
            // Re-ensuring with the same dimensionality is a no-op.
            Some(existing) if existing == dimensions => Ok(()),
            Some(existing) => Err(AppError::Config(format!(
                "Collection has dimensionality {}, expected {}",
                existing, dimensions
            ))),
        }
    }

    async fn upsert(&self, points: Vec<IndexedPoint>) -> AppResult<()> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Index("memory index lock poisoned".to_string()))?;

        if let Some(dimensions) = inner.dimensions {
            if let Some(bad) = points.iter().find(|p| p.vector.len() != dimensions) {
                return Err(AppError::Index(format!(
                    "Point {} has {} dimensions, collection expects {}",
                    bad.id,
                    bad.vector.len(),
                    dimensions
                )));
            }
        }

        for point in points {
            if let Some(existing) = inner.points.iter_mut().find(|p| p.id == point.id) {
                *existing = point;
            } else {
                inner.points.push(point);
            }
        }
        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> AppResult<Vec<ScoredPoint>> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Index("memory index lock poisoned".to_string()))?;

        let mut hits: Vec<ScoredPoint> = inner
            .points
            .iter()
            .map(|p| ScoredPoint {
                id: p.id.clone(),
                score: cosine(vector, &p.vector),
                payload: Some(p.payload.clone()),
            })
            .collect();

        hits.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        hits.truncate(limit);
        Ok(hits)
    }

    async fn count(&self) -> AppResult<u64> {
        let inner = self
            .inner
            .lock()
            .map_err(|_| AppError::Index("memory index lock poisoned".to_string()))?;
        Ok(inner.points.len() as u64)
    }
}

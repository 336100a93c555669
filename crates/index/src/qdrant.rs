//! REST client for a Qdrant-compatible vector index service.
//!
//! Two transports share one endpoint. The primary transport deserializes
//! responses into strict typed structs, so a protocol or schema drift
//! surfaces as an error. The fallback transport re-issues the search and
//! reads the response leniently as loose JSON, extracting whatever fields
//! are present. The retrieval service tries the primary first and falls
//! back sequentially, never speculatively.
//!
//! Collection management is conservative: create-if-missing, conflict on
//! creation treated as success, and an existing collection is never
//! deleted or recreated — a co-located healthy index must survive
//! re-ingestion.

use airguide_core::{AppError, AppResult};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};

use crate::types::{ChunkPayload, DistanceMetric, IndexedPoint, ScoredPoint};
use crate::VectorIndex;

/// REST client for the index collaborator.
#[derive(Debug, Clone)]
pub struct QdrantIndex {
    client: Client,
    base_url: String,
    collection: String,
}

#[derive(Debug, Serialize)]
struct CreateCollectionRequest {
    vectors: VectorParams,
}

#[derive(Debug, Serialize)]
struct VectorParams {
    size: usize,
    distance: &'static str,
}

#[derive(Debug, Deserialize)]
struct CollectionInfoResponse {
    result: CollectionInfo,
}

#[derive(Debug, Deserialize)]
struct CollectionInfo {
    config: CollectionConfig,
}

#[derive(Debug, Deserialize)]
struct CollectionConfig {
    params: CollectionParams,
}

#[derive(Debug, Deserialize)]
struct CollectionParams {
    vectors: VectorInfo,
}

#[derive(Debug, Deserialize)]
struct VectorInfo {
    size: usize,
}

#[derive(Debug, Serialize)]
struct UpsertRequest<'a> {
    points: &'a [IndexedPoint],
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    vector: &'a [f32],
    limit: usize,
    with_payload: bool,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    result: Vec<SearchHit>,
}

/// Strict hit shape used by the primary transport; payload fields that do
/// not match [`ChunkPayload`] make the whole response a schema error.
#[derive(Debug, Deserialize)]
struct SearchHit {
    id: Value,
    score: f32,
    payload: Option<ChunkPayload>,
}

#[derive(Debug, Serialize)]
struct CountRequest {
    exact: bool,
}

#[derive(Debug, Deserialize)]
struct CountResponse {
    result: CountResult,
}

#[derive(Debug, Deserialize)]
struct CountResult {
    count: u64,
}

impl QdrantIndex {
    /// Create a new client for the given endpoint and collection.
    pub fn new(url: &str, collection: &str, timeout_secs: u64) -> AppResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .build()
            .map_err(|e| AppError::Index(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: url.trim_end_matches('/').to_string(),
            collection: collection.to_string(),
        })
    }

    fn collection_url(&self) -> String {
        format!("{}/collections/{}", self.base_url, self.collection)
    }

    async fn create_collection(
        &self,
        dimensions: usize,
        metric: DistanceMetric,
    ) -> AppResult<()> {
        let request = CreateCollectionRequest {
            vectors: VectorParams {
                size: dimensions,
                distance: metric.as_str(),
            },
        };

        let response = self
            .client
            .put(self.collection_url())
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Collection create failed: {}", e)))?;

        let status = response.status();
        if status.is_success() || status == StatusCode::CONFLICT {
            // Conflict means another run created it first; that is fine.
            debug!("Collection '{}' ready ({})", self.collection, status);
            return Ok(());
        }

        let body = response.text().await.unwrap_or_default();
        if body.contains("already exists") {
            return Ok(());
        }

        Err(AppError::Index(format!(
            "Collection create failed ({}): {}",
            status, body
        )))
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn ensure_collection(
        &self,
        dimensions: usize,
        metric: DistanceMetric,
    ) -> AppResult<()> {
        let response = match self.client.get(self.collection_url()).send().await {
            Ok(response) => response,
            Err(e) => {
                return Err(AppError::Index(format!(
                    "Index service unreachable at {}: {}",
                    self.base_url, e
                )))
            }
        };

        let status = response.status();

        if status == StatusCode::NOT_FOUND {
            debug!("Collection '{}' missing, creating", self.collection);
            return self.create_collection(dimensions, metric).await;
        }

        if status.is_success() {
            // Verify dimensionality when the info is readable; an
            // uninspectable response is not grounds to touch the
            // collection, so proceed optimistically.
            return match response.json::<CollectionInfoResponse>().await {
                Ok(info) => {
                    let existing = info.result.config.params.vectors.size;
                    if existing != dimensions {
                        return Err(AppError::Config(format!(
                            "Collection '{}' has dimensionality {}, expected {}",
                            self.collection, existing, dimensions
                        )));
                    }
                    Ok(())
                }
                Err(e) => {
                    warn!(
                        "Could not introspect collection '{}' ({}); proceeding",
                        self.collection, e
                    );
                    Ok(())
                }
            };
        }

        let body = response.text().await.unwrap_or_default();
        warn!(
            "Unexpected collection info response ({}): {}; proceeding",
            status, body
        );
        Ok(())
    }

    async fn upsert(&self, points: Vec<IndexedPoint>) -> AppResult<()> {
        if points.is_empty() {
            return Ok(());
        }

        let url = format!("{}/points?wait=true", self.collection_url());
        let request = UpsertRequest { points: &points };

        let response = self
            .client
            .put(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Upsert failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Index(format!(
                "Upsert failed ({}): {}",
                status, body
            )));
        }

        debug!(
            "Upserted {} points into '{}'",
            points.len(),
            self.collection
        );
        Ok(())
    }

    async fn search(&self, vector: &[f32], limit: usize) -> AppResult<Vec<ScoredPoint>> {
        let url = format!("{}/points/search", self.collection_url());
        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Index(format!(
                "Search failed ({}): {}",
                status, body
            )));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| AppError::Index(format!("Search response schema mismatch: {}", e)))?;

        Ok(body
            .result
            .into_iter()
            .map(|hit| ScoredPoint {
                id: point_id_to_string(&hit.id),
                score: hit.score,
                payload: hit.payload,
            })
            .collect())
    }

    async fn search_fallback(&self, vector: &[f32], limit: usize) -> AppResult<Vec<ScoredPoint>> {
        let url = format!("{}/points/search", self.collection_url());
        let request = SearchRequest {
            vector,
            limit,
            with_payload: true,
        };

        debug!("Searching '{}' over fallback transport", self.collection);

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Fallback search failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Index(format!(
                "Fallback search failed ({}): {}",
                status, body
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Index(format!("Fallback search unreadable: {}", e)))?;

        Ok(parse_hits_lenient(&body))
    }

    async fn count(&self) -> AppResult<u64> {
        let url = format!("{}/points/count", self.collection_url());

        let response = self
            .client
            .post(&url)
            .json(&CountRequest { exact: true })
            .send()
            .await
            .map_err(|e| AppError::Index(format!("Count failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Index(format!(
                "Count failed ({}): {}",
                status, body
            )));
        }

        let body: CountResponse = response
            .json()
            .await
            .map_err(|e| AppError::Index(format!("Count response unreadable: {}", e)))?;

        Ok(body.result.count)
    }
}

fn point_id_to_string(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

/// Extract hits from a loose JSON search response, keeping whatever fields
/// are present. Hits with no usable payload text come back with an empty
/// payload and are dropped during normalization.
fn parse_hits_lenient(body: &Value) -> Vec<ScoredPoint> {
    let hits = match body.get("result").and_then(Value::as_array) {
        Some(hits) => hits,
        None => return Vec::new(),
    };

    hits.iter()
        .filter_map(|hit| {
            let score = hit.get("score").and_then(Value::as_f64)? as f32;
            let id = hit
                .get("id")
                .map(point_id_to_string)
                .unwrap_or_default();

            let payload = hit.get("payload").map(|p| ChunkPayload {
                text: string_field(p, "text"),
                title: string_field(p, "title"),
                url: p
                    .get("url")
                    .and_then(Value::as_str)
                    .map(|s| s.to_string()),
                chunk_id: p.get("chunk_id").and_then(Value::as_u64).unwrap_or(0) as u32,
                source_content_hash: string_field(p, "source_content_hash"),
            });

            Some(ScoredPoint { id, score, payload })
        })
        .collect()
}

fn string_field(value: &Value, key: &str) -> String {
    value
        .get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

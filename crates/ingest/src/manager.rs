//! Ingestion orchestration.
//!
//! Per source: hash, skip if unchanged, extract, chunk, embed, upsert in
//! one batch, then record the new hash. Sources are independent; a
//! failing source is logged and left out of the updated metadata so the
//! next run retries it.

use airguide_core::{AppError, AppResult};
use airguide_embed::EmbeddingProvider;
use airguide_index::{ChunkPayload, DistanceMetric, IndexedPoint, VectorIndex};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use uuid::Uuid;

use crate::chunker;
use crate::extract;
use crate::sources::DocumentSource;
use crate::versions::{self, ContentVersionStore};

/// Chunking parameters for an ingestion run.
#[derive(Debug, Clone, Copy)]
pub struct ChunkingParams {
    pub size: usize,
    pub overlap: usize,
}

/// Statistics from an ingestion run.
#[derive(Debug, Clone, Serialize)]
pub struct IngestStats {
    /// Number of sources in the batch
    pub sources_total: u32,

    /// Sources skipped because their content hash was unchanged
    pub skipped: u32,

    /// Sources chunked, embedded, and upserted this run
    pub ingested: u32,

    /// Sources that failed and will be retried next run
    pub failed: u32,

    /// Chunks written to the index
    pub chunks_written: u32,

    /// Duration in seconds
    pub duration_secs: f64,

    /// When the run finished
    pub completed_at: DateTime<Utc>,
}

enum SourceOutcome {
    Unchanged,
    Ingested { chunks: u32 },
}

/// Orchestrates the ingestion batch job.
pub struct IngestionManager {
    index: Arc<dyn VectorIndex>,
    embedder: Arc<dyn EmbeddingProvider>,
    store: ContentVersionStore,
    chunking: ChunkingParams,
}

impl IngestionManager {
    /// Create a manager over the collaborator handles.
    pub fn new(
        index: Arc<dyn VectorIndex>,
        embedder: Arc<dyn EmbeddingProvider>,
        store: ContentVersionStore,
        chunking: ChunkingParams,
    ) -> Self {
        Self {
            index,
            embedder,
            store,
            chunking,
        }
    }

    /// Ingest a batch of sources.
    ///
    /// The collection is ensured once up front; a dimensionality conflict
    /// there is fatal. After the batch, the updated metadata is persisted
    /// in full.
    pub async fn ingest(&self, sources: &[DocumentSource]) -> AppResult<IngestStats> {
        let start = Instant::now();

        tracing::info!("Starting ingestion of {} sources", sources.len());

        let mut metadata = self.store.load()?;

        self.index
            .ensure_collection(self.embedder.dimensions(), DistanceMetric::Cosine)
            .await?;

        let mut stats = IngestStats {
            sources_total: sources.len() as u32,
            skipped: 0,
            ingested: 0,
            failed: 0,
            chunks_written: 0,
            duration_secs: 0.0,
            completed_at: Utc::now(),
        };

        for source in sources {
            match self.process_source(source, &mut metadata).await {
                Ok(SourceOutcome::Unchanged) => {
                    tracing::debug!("Source '{}' unchanged, skipping", source.filename());
                    stats.skipped += 1;
                }
                Ok(SourceOutcome::Ingested { chunks }) => {
                    stats.ingested += 1;
                    stats.chunks_written += chunks;
                }
                Err(e) => {
                    // Leave the source out of the metadata so the next run
                    // retries it; the rest of the batch continues.
                    tracing::warn!("Source '{}' failed: {}", source.filename(), e);
                    stats.failed += 1;
                }
            }
        }

        self.store.save(&metadata)?;

        stats.duration_secs = start.elapsed().as_secs_f64();
        stats.completed_at = Utc::now();

        tracing::info!(
            "Ingestion finished: {} ingested, {} skipped, {} failed, {} chunks in {:.2}s",
            stats.ingested,
            stats.skipped,
            stats.failed,
            stats.chunks_written,
            stats.duration_secs
        );

        Ok(stats)
    }

    async fn process_source(
        &self,
        source: &DocumentSource,
        metadata: &mut BTreeMap<String, String>,
    ) -> AppResult<SourceOutcome> {
        let filename = source.filename();
        let hash = versions::hash_file(&source.file_path)?;

        if metadata.get(&filename) == Some(&hash) {
            return Ok(SourceOutcome::Unchanged);
        }

        let text = extract::extract_text(&source.file_path)?;
        let chunks = chunker::chunk_text(&text, self.chunking.size, self.chunking.overlap);

        if chunks.is_empty() {
            tracing::warn!("Source '{}' produced no chunks", filename);
            metadata.insert(filename, hash);
            return Ok(SourceOutcome::Ingested { chunks: 0 });
        }

        let embeddings = self.embedder.embed_batch(&chunks).await?;

        if embeddings.len() != chunks.len() {
            return Err(AppError::Embedding(format!(
                "Embedded {} of {} chunks for '{}'",
                embeddings.len(),
                chunks.len(),
                filename
            )));
        }

        let points: Vec<IndexedPoint> = chunks
            .into_iter()
            .zip(embeddings)
            .enumerate()
            .map(|(i, (text, vector))| IndexedPoint {
                id: Uuid::new_v4().to_string(),
                vector,
                payload: ChunkPayload {
                    text,
                    title: source.title.clone(),
                    url: source.origin_url.clone(),
                    chunk_id: i as u32,
                    source_content_hash: hash.clone(),
                },
            })
            .collect();

        let count = points.len() as u32;

        // One batch call per source; stale points from a previous version
        // of this source are superseded, never merged.
        self.index.upsert(points).await?;

        metadata.insert(filename.clone(), hash);

        tracing::info!("Ingested '{}': {} chunks", filename, count);
        Ok(SourceOutcome::Ingested { chunks: count })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use airguide_embed::HashEmbedder;
    use airguide_index::MemoryIndex;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    const DIMS: usize = 64;

    fn manager(index: Arc<MemoryIndex>, temp: &Path) -> IngestionManager {
        IngestionManager::new(
            index,
            Arc::new(HashEmbedder::new(DIMS)),
            ContentVersionStore::new(temp.join("meta.json")),
            ChunkingParams {
                size: 10,
                overlap: 2,
            },
        )
    }

    fn source(dir: &Path, name: &str, words: usize) -> DocumentSource {
        let path = dir.join(name);
        let text = (0..words)
            .map(|i| format!("word{}", i))
            .collect::<Vec<_>>()
            .join(" ");
        fs::write(&path, text).unwrap();
        DocumentSource {
            title: name.to_string(),
            origin_url: None,
            file_path: path,
        }
    }

    #[tokio::test]
    async fn test_ingest_writes_chunks_and_metadata() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let manager = manager(index.clone(), temp.path());

        let sources = vec![source(temp.path(), "a.txt", 25)];
        let stats = manager.ingest(&sources).await.unwrap();

        // 25 words, size 10, overlap 2 -> starts at 0, 8, 16, 24
        assert_eq!(stats.ingested, 1);
        assert_eq!(stats.chunks_written, 4);
        assert_eq!(index.count().await.unwrap(), 4);

        let metadata = ContentVersionStore::new(temp.path().join("meta.json"))
            .load()
            .unwrap();
        assert!(metadata.contains_key("a.txt"));
    }

    #[tokio::test]
    async fn test_unchanged_source_is_skipped() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let manager = manager(index.clone(), temp.path());

        let sources = vec![source(temp.path(), "a.txt", 25)];
        manager.ingest(&sources).await.unwrap();

        let count_before = index.count().await.unwrap();
        let metadata_before = ContentVersionStore::new(temp.path().join("meta.json"))
            .load()
            .unwrap();

        // Second run: zero upserts, metadata unchanged.
        let stats = manager.ingest(&sources).await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.ingested, 0);
        assert_eq!(index.count().await.unwrap(), count_before);

        let metadata_after = ContentVersionStore::new(temp.path().join("meta.json"))
            .load()
            .unwrap();
        assert_eq!(metadata_before, metadata_after);
    }

    #[tokio::test]
    async fn test_changed_byte_triggers_reingest_of_that_source_only() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let manager = manager(index.clone(), temp.path());

        let sources = vec![
            source(temp.path(), "a.txt", 25),
            source(temp.path(), "b.txt", 12),
        ];
        manager.ingest(&sources).await.unwrap();

        let store = ContentVersionStore::new(temp.path().join("meta.json"));
        let before = store.load().unwrap();

        // Flip one byte of b.txt.
        let b_path = temp.path().join("b.txt");
        let mut bytes = fs::read(&b_path).unwrap();
        bytes[0] = b'X';
        fs::write(&b_path, bytes).unwrap();

        let stats = manager.ingest(&sources).await.unwrap();
        assert_eq!(stats.skipped, 1);
        assert_eq!(stats.ingested, 1);

        let after = store.load().unwrap();
        assert_eq!(before["a.txt"], after["a.txt"]);
        assert_ne!(before["b.txt"], after["b.txt"]);
    }

    #[tokio::test]
    async fn test_failing_source_does_not_abort_batch() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let manager = manager(index.clone(), temp.path());

        let missing = DocumentSource {
            title: "Missing".to_string(),
            origin_url: None,
            file_path: temp.path().join("missing.txt"),
        };
        let sources = vec![missing, source(temp.path(), "good.txt", 12)];

        let stats = manager.ingest(&sources).await.unwrap();
        assert_eq!(stats.failed, 1);
        assert_eq!(stats.ingested, 1);

        // The failed source stays out of the metadata so it is retried.
        let metadata = ContentVersionStore::new(temp.path().join("meta.json"))
            .load()
            .unwrap();
        assert!(!metadata.contains_key("missing.txt"));
        assert!(metadata.contains_key("good.txt"));
    }

    #[tokio::test]
    async fn test_empty_source_yields_zero_chunks_and_completes() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let manager = manager(index.clone(), temp.path());

        let sources = vec![
            source(temp.path(), "full.txt", 25),
            source(temp.path(), "empty.txt", 0),
        ];

        let stats = manager.ingest(&sources).await.unwrap();
        assert_eq!(stats.ingested, 2);
        assert_eq!(stats.failed, 0);
        assert_eq!(index.count().await.unwrap(), 4);

        // The empty source is recorded so it is not retried while unchanged.
        let metadata = ContentVersionStore::new(temp.path().join("meta.json"))
            .load()
            .unwrap();
        assert!(metadata.contains_key("empty.txt"));
    }

    #[tokio::test]
    async fn test_payload_carries_source_attribution() {
        let temp = TempDir::new().unwrap();
        let index = Arc::new(MemoryIndex::new());
        let manager = manager(index.clone(), temp.path());

        let path = temp.path().join("hp.txt");
        fs::write(&path, "heat pump basics explained simply").unwrap();
        let sources = vec![DocumentSource {
            title: "Heat Pump Basics".to_string(),
            origin_url: Some("https://example.com/hp.pdf".to_string()),
            file_path: path,
        }];

        manager.ingest(&sources).await.unwrap();

        let embedder = HashEmbedder::new(DIMS);
        let query = embedder.embed("heat pump basics").await.unwrap();
        let hits = index.search(&query, 1).await.unwrap();
        let payload = hits[0].payload.as_ref().unwrap();

        assert_eq!(payload.title, "Heat Pump Basics");
        assert_eq!(payload.url.as_deref(), Some("https://example.com/hp.pdf"));
        assert_eq!(payload.chunk_id, 0);
        assert!(!payload.source_content_hash.is_empty());
    }
}

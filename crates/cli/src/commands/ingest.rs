//! Ingest command handler.
//!
//! Runs the offline ingestion batch job: discover sources, then hash,
//! chunk, embed, and upsert each changed one.

use airguide_core::{config::AppConfig, AppError, AppResult};
use airguide_embed::create_provider;
use airguide_index::QdrantIndex;
use airguide_ingest::manager::ChunkingParams;
use airguide_ingest::{sources, ContentVersionStore, IngestionManager};
use clap::Args;
use std::sync::Arc;

/// Ingest source documents into the index
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Output the run statistics as JSON
    #[arg(long)]
    pub json: bool,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command");

        let sources = sources::load_sources(&config.docs_dir)?;
        if sources.is_empty() {
            tracing::warn!("No sources found in {:?}", config.docs_dir);
        }

        let embedder = create_provider(&config.embedding)?;
        let index = Arc::new(QdrantIndex::new(
            &config.index.url,
            &config.index.collection,
            config.index.timeout_secs,
        )?);

        let manager = IngestionManager::new(
            index,
            embedder,
            ContentVersionStore::new(&config.metadata_path),
            ChunkingParams {
                size: config.chunking.size,
                overlap: config.chunking.overlap,
            },
        );

        let stats = manager.ingest(&sources).await?;

        if self.json {
            let json = serde_json::to_string_pretty(&stats)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("ingest {}", config.index.collection);
            println!("  sources:  {}", stats.sources_total);
            println!("  ingested: {}", stats.ingested);
            println!("  skipped:  {}", stats.skipped);
            println!("  failed:   {}", stats.failed);
            println!("  chunks:   {}", stats.chunks_written);
            println!("  took:     {:.2}s", stats.duration_secs);
        }

        Ok(())
    }
}

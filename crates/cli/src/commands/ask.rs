//! Ask command handler.
//!
//! Runs one query through the pipeline and prints the answer with its
//! citations. "No relevant documents" is a legitimate outcome surfaced
//! distinctly, not an error.

use airguide_answer::{AnswerService, RetrievalStatus};
use airguide_core::{config::AppConfig, AppError, AppResult};
use airguide_embed::create_provider;
use airguide_index::QdrantIndex;
use clap::Args;
use std::sync::Arc;

/// Ask a question over the indexed corpus
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The question to ask
    pub query: String,

    /// Number of chunks to retrieve
    #[arg(short = 'k', long)]
    pub top_k: Option<usize>,

    /// Output the full response as JSON
    #[arg(long)]
    pub json: bool,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let embedder = create_provider(&config.embedding)?;
        let index = Arc::new(QdrantIndex::new(
            &config.index.url,
            &config.index.collection,
            config.index.timeout_secs,
        )?);

        let top_k = self.top_k.unwrap_or(config.retrieval.top_k);
        let service = AnswerService::new(index, embedder, top_k)?;

        let response = service.answer(&self.query).await;

        if self.json {
            let json = serde_json::to_string_pretty(&response)
                .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
            return Ok(());
        }

        println!("{}", response.answer);

        if !response.sources.is_empty() {
            println!();
            println!("Sources:");
            for source in &response.sources {
                match &source.url {
                    Some(url) => println!(
                        "  {} (chunk {}, {}): {}",
                        source.title, source.chunk_id, url, source.snippet
                    ),
                    None => println!(
                        "  {} (chunk {}): {}",
                        source.title, source.chunk_id, source.snippet
                    ),
                }
            }
        }

        // The one condition worth surfacing distinctly: in-domain query,
        // healthy index, zero hits.
        if response.status == RetrievalStatus::NoMatches {
            eprintln!("note: no relevant documents matched this query");
        }

        Ok(())
    }
}

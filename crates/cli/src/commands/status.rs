//! Status command handler.
//!
//! Reports index reachability and point count.

use airguide_core::{config::AppConfig, AppError, AppResult};
use airguide_index::{QdrantIndex, VectorIndex};
use clap::Args;

/// Show index health and point count
#[derive(Args, Debug)]
pub struct StatusCommand {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

impl StatusCommand {
    /// Execute the status command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing status command");

        let index = QdrantIndex::new(
            &config.index.url,
            &config.index.collection,
            config.index.timeout_secs,
        )?;

        let (reachable, points) = match index.count().await {
            Ok(points) => (true, points),
            Err(e) => {
                tracing::warn!("Index not reachable: {}", e);
                (false, 0)
            }
        };

        if self.json {
            let json = serde_json::to_string_pretty(&serde_json::json!({
                "collection": config.index.collection,
                "url": config.index.url,
                "reachable": reachable,
                "points": points,
                "healthy": reachable && points > 0,
            }))
            .map_err(|e| AppError::Serialization(e.to_string()))?;
            println!("{}", json);
        } else {
            println!("collection: {}", config.index.collection);
            println!("url:        {}", config.index.url);
            println!("reachable:  {}", reachable);
            println!("points:     {}", points);
        }

        Ok(())
    }
}

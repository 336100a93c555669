//! Embedding provider trait and factory.

use airguide_core::config::EmbeddingConfig;
use airguide_core::{AppError, AppResult};
use std::sync::Arc;

/// Trait for embedding providers.
///
/// Implementations must be safe to share across concurrent in-flight
/// queries; the query path holds a read-only handle.
#[async_trait::async_trait]
pub trait EmbeddingProvider: Send + Sync + std::fmt::Debug {
    /// Get provider name (e.g., "ollama", "hash")
    fn provider_name(&self) -> &str;

    /// Get model identifier
    fn model_name(&self) -> &str;

    /// Get embedding dimensions
    fn dimensions(&self) -> usize;

    /// Generate embeddings for multiple texts in a batch.
    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>>;

    /// Generate embedding for a single text (convenience method).
    async fn embed(&self, text: &str) -> AppResult<Vec<f32>> {
        let mut results = self.embed_batch(&[text.to_string()]).await?;
        results
            .pop()
            .ok_or_else(|| AppError::Embedding("No embedding returned".to_string()))
    }
}

/// Create an embedding provider based on configuration.
pub fn create_provider(config: &EmbeddingConfig) -> AppResult<Arc<dyn EmbeddingProvider>> {
    match config.provider.as_str() {
        "ollama" => {
            let provider = super::ollama::OllamaEmbedder::new(config)?;
            Ok(Arc::new(provider))
        }

        "hash" => {
            let provider = super::hash::HashEmbedder::new(config.dimensions);
            Ok(Arc::new(provider))
        }

        _ => Err(AppError::Config(format!(
            "Unknown embedding provider: '{}'. Supported providers: ollama, hash",
            config.provider
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hash_config() -> EmbeddingConfig {
        EmbeddingConfig {
            provider: "hash".to_string(),
            endpoint: String::new(),
            model: "token-hash-v1".to_string(),
            dimensions: 384,
        }
    }

    #[test]
    fn test_create_hash_provider() {
        let provider = create_provider(&hash_config()).unwrap();
        assert_eq!(provider.provider_name(), "hash");
        assert_eq!(provider.dimensions(), 384);
    }

    #[test]
    fn test_create_unknown_provider() {
        let mut config = hash_config();
        config.provider = "unknown".to_string();

        let result = create_provider(&config);
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("Unknown embedding provider"));
    }

    #[tokio::test]
    async fn test_provider_embed_single() {
        let provider = create_provider(&hash_config()).unwrap();

        let embedding = provider.embed("heat pump sizing").await.unwrap();
        assert_eq!(embedding.len(), 384);
    }
}

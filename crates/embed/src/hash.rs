//! Deterministic hash-based embedding provider.
//!
//! Maps word and word-bigram hashes onto vector dimensions, producing
//! stable, content-dependent unit vectors. Not semantically meaningful,
//! but overlapping texts land near each other, which is enough for tests
//! and offline development without a model service.

use airguide_core::AppResult;
use async_trait::async_trait;

use crate::provider::EmbeddingProvider;

/// Offline embedding provider for tests and development.
#[derive(Debug)]
pub struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    /// Create a new hash embedder with the given dimensionality.
    pub fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }

    fn embed_text(&self, text: &str) -> Vec<f32> {
        let mut embedding = vec![0.0f32; self.dimensions];

        let lower = text.to_lowercase();
        let words: Vec<&str> = lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|w| w.len() > 1)
            .collect();

        for word in &words {
            let idx = (fnv1a(word.as_bytes()) as usize) % self.dimensions;
            embedding[idx] += 1.0;
        }

        // Word bigrams carry local context so phrases like "heat pump"
        // differ from the same words far apart.
        for pair in words.windows(2) {
            let bigram = format!("{} {}", pair[0], pair[1]);
            let idx = (fnv1a(bigram.as_bytes()) as usize) % self.dimensions;
            embedding[idx] += 0.5;
        }

        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            for v in &mut embedding {
                *v /= norm;
            }
        }

        embedding
    }
}

fn fnv1a(bytes: &[u8]) -> u64 {
    let mut hash: u64 = 0xcbf29ce484222325;
    for &b in bytes {
        hash ^= b as u64;
        hash = hash.wrapping_mul(0x100000001b3);
    }
    hash
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    fn provider_name(&self) -> &str {
        "hash"
    }

    fn model_name(&self) -> &str {
        "token-hash-v1"
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    async fn embed_batch(&self, texts: &[String]) -> AppResult<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|text| self.embed_text(text)).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_dimensions_and_names() {
        let embedder = HashEmbedder::new(384);
        assert_eq!(embedder.dimensions(), 384);
        assert_eq!(embedder.provider_name(), "hash");
        assert_eq!(embedder.model_name(), "token-hash-v1");
    }

    #[tokio::test]
    async fn test_unit_vector() {
        let embedder = HashEmbedder::new(384);
        let embedding = embedder.embed("heat pump sizing guide").await.unwrap();

        assert_eq!(embedding.len(), 384);
        let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 0.001);
    }

    #[tokio::test]
    async fn test_deterministic() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("refrigerant charge").await.unwrap();
        let b = embedder.embed("refrigerant charge").await.unwrap();
        assert_eq!(a, b);
    }

    #[tokio::test]
    async fn test_different_texts_differ() {
        let embedder = HashEmbedder::new(384);
        let a = embedder.embed("heat pump installation").await.unwrap();
        let b = embedder.embed("duct leakage testing").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_similar_texts_closer_than_unrelated() {
        let embedder = HashEmbedder::new(384);
        let q = embedder.embed("heat pump efficiency").await.unwrap();
        let near = embedder
            .embed("the heat pump efficiency depends on outdoor temperature")
            .await
            .unwrap();
        let far = embedder
            .embed("unrelated gardening advice about tomato plants")
            .await
            .unwrap();

        let dot = |a: &[f32], b: &[f32]| -> f32 { a.iter().zip(b).map(|(x, y)| x * y).sum() };
        assert!(dot(&q, &near) > dot(&q, &far));
    }

    #[tokio::test]
    async fn test_empty_text_zero_vector() {
        let embedder = HashEmbedder::new(384);
        let embedding = embedder.embed("").await.unwrap();
        assert!(embedding.iter().all(|&x| x == 0.0));
    }

    #[tokio::test]
    async fn test_batch() {
        let embedder = HashEmbedder::new(128);
        let texts = vec!["one".to_string(), "two".to_string()];
        let embeddings = embedder.embed_batch(&texts).await.unwrap();
        assert_eq!(embeddings.len(), 2);
        assert!(embeddings.iter().all(|e| e.len() == 128));
    }
}

//! Embedding collaborator clients.
//!
//! The embedding model is an external collaborator: text in, fixed-length
//! vector out. This crate defines the provider trait, an HTTP client for a
//! local Ollama-compatible service, and a deterministic hash-based provider
//! for tests and offline development.

pub mod hash;
pub mod ollama;
pub mod provider;

pub use hash::HashEmbedder;
pub use ollama::OllamaEmbedder;
pub use provider::{create_provider, EmbeddingProvider};

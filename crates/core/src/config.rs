//! Configuration management for the Airguide assistant.
//!
//! Loads and merges configuration from multiple sources:
//! - Environment variables
//! - Command-line flags
//! - Config file (airguide.yaml)
//!
//! Invalid chunking or embedding parameters are configuration errors and
//! fatal at startup, never per-call failures.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::{AppError, AppResult};

/// Main application configuration.
///
/// Holds the settings shared by the ingestion batch job and the query
/// pipeline: collaborator endpoints, the target collection, chunking
/// parameters, and retrieval depth.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Directory holding the source documents (and optional sources.yaml)
    pub docs_dir: PathBuf,

    /// Path to the persisted ingestion metadata (filename -> content hash)
    pub metadata_path: PathBuf,

    /// Optional config file path
    #[serde(skip)]
    pub config_file: Option<PathBuf>,

    /// Vector index collaborator settings
    pub index: IndexConfig,

    /// Embedding collaborator settings
    pub embedding: EmbeddingConfig,

    /// Chunking parameters
    pub chunking: ChunkingConfig,

    /// Retrieval parameters
    pub retrieval: RetrievalConfig,

    /// Log level override
    #[serde(skip)]
    pub log_level: Option<String>,

    /// Verbose mode (enables debug logging)
    #[serde(skip)]
    pub verbose: bool,

    /// Disable colored output
    #[serde(skip)]
    pub no_color: bool,
}

/// Vector index collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexConfig {
    /// Base URL of the index service (REST endpoint)
    pub url: String,

    /// Name of the collection holding the document vectors
    pub collection: String,

    /// Per-request timeout for index transports, in seconds
    #[serde(rename = "timeoutSecs", default = "default_index_timeout")]
    pub timeout_secs: u64,
}

/// Embedding collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingConfig {
    /// Provider name ("ollama" or "hash")
    pub provider: String,

    /// HTTP endpoint of the embedding service
    pub endpoint: String,

    /// Model identifier
    pub model: String,

    /// Embedding vector dimensionality.
    ///
    /// Fixed system-wide: ingestion-time and query-time embeddings must
    /// agree with the collection's dimensionality.
    pub dimensions: usize,
}

/// Chunking configuration (whitespace-token windows).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkingConfig {
    /// Window size in words
    #[serde(default = "default_chunk_size")]
    pub size: usize,

    /// Overlap between consecutive windows, in words
    #[serde(default = "default_chunk_overlap")]
    pub overlap: usize,
}

/// Retrieval configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalConfig {
    /// Number of nearest neighbors to request per query
    #[serde(rename = "topK", default = "default_top_k")]
    pub top_k: usize,
}

fn default_index_timeout() -> u64 {
    10
}

fn default_chunk_size() -> usize {
    500
}

fn default_chunk_overlap() -> usize {
    50
}

fn default_top_k() -> usize {
    5
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from("docs/sources"),
            metadata_path: PathBuf::from("docs/sources/.ingested.json"),
            config_file: None,
            index: IndexConfig {
                url: "http://localhost:6333".to_string(),
                collection: "hvac_docs".to_string(),
                timeout_secs: default_index_timeout(),
            },
            embedding: EmbeddingConfig {
                provider: "ollama".to_string(),
                endpoint: "http://localhost:11434".to_string(),
                model: "nomic-embed-text".to_string(),
                dimensions: 768,
            },
            chunking: ChunkingConfig {
                size: default_chunk_size(),
                overlap: default_chunk_overlap(),
            },
            retrieval: RetrievalConfig {
                top_k: default_top_k(),
            },
            log_level: None,
            verbose: false,
            no_color: false,
        }
    }
}

/// Config file structure (all sections optional).
#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    docs: Option<DocsSection>,
    index: Option<IndexConfig>,
    embedding: Option<EmbeddingConfig>,
    chunking: Option<ChunkingConfig>,
    retrieval: Option<RetrievalConfig>,
    logging: Option<LoggingSection>,
}

#[derive(Debug, Clone, Deserialize)]
struct DocsSection {
    dir: Option<PathBuf>,
    #[serde(rename = "metadataPath")]
    metadata_path: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
struct LoggingSection {
    level: Option<String>,
    color: Option<bool>,
}

impl AppConfig {
    /// Load configuration from environment variables and defaults.
    ///
    /// Environment variables:
    /// - `AIRGUIDE_CONFIG`: Path to config file (default: ./airguide.yaml)
    /// - `AIRGUIDE_DOCS_DIR`: Source documents directory
    /// - `AIRGUIDE_INDEX_URL`: Index service base URL
    /// - `AIRGUIDE_COLLECTION`: Collection name
    /// - `AIRGUIDE_EMBED_ENDPOINT`: Embedding service endpoint
    /// - `AIRGUIDE_EMBED_MODEL`: Embedding model identifier
    /// - `RUST_LOG`: Log level
    /// - `NO_COLOR`: Disable colored output
    pub fn load() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(config_file) = std::env::var("AIRGUIDE_CONFIG") {
            config.config_file = Some(PathBuf::from(config_file));
        }

        // Load from YAML config file if it exists
        let config_path = config
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from("airguide.yaml"));

        if config_path.exists() {
            config.merge_yaml(&config_path)?;
        }

        // Environment variables override YAML config
        if let Ok(docs_dir) = std::env::var("AIRGUIDE_DOCS_DIR") {
            config.docs_dir = PathBuf::from(docs_dir);
        }

        if let Ok(url) = std::env::var("AIRGUIDE_INDEX_URL") {
            config.index.url = url;
        }

        if let Ok(collection) = std::env::var("AIRGUIDE_COLLECTION") {
            config.index.collection = collection;
        }

        if let Ok(endpoint) = std::env::var("AIRGUIDE_EMBED_ENDPOINT") {
            config.embedding.endpoint = endpoint;
        }

        if let Ok(model) = std::env::var("AIRGUIDE_EMBED_MODEL") {
            config.embedding.model = model;
        }

        config.log_level = std::env::var("RUST_LOG").ok();

        if std::env::var("NO_COLOR").is_ok() {
            config.no_color = true;
        }

        Ok(config)
    }

    /// Merge a YAML configuration file into this config.
    fn merge_yaml(&mut self, path: &PathBuf) -> AppResult<()> {
        let contents = std::fs::read_to_string(path).map_err(|e| {
            AppError::Config(format!("Failed to read config file {:?}: {}", path, e))
        })?;

        let config_file: ConfigFile = serde_yaml::from_str(&contents).map_err(|e| {
            AppError::Config(format!("Failed to parse config file {:?}: {}", path, e))
        })?;

        if let Some(docs) = config_file.docs {
            if let Some(dir) = docs.dir {
                self.docs_dir = dir;
            }
            if let Some(metadata_path) = docs.metadata_path {
                self.metadata_path = metadata_path;
            }
        }

        if let Some(index) = config_file.index {
            self.index = index;
        }

        if let Some(embedding) = config_file.embedding {
            self.embedding = embedding;
        }

        if let Some(chunking) = config_file.chunking {
            self.chunking = chunking;
        }

        if let Some(retrieval) = config_file.retrieval {
            self.retrieval = retrieval;
        }

        if let Some(logging) = config_file.logging {
            if let Some(level) = logging.level {
                self.log_level = Some(level);
            }
            if let Some(color) = logging.color {
                self.no_color = !color;
            }
        }

        Ok(())
    }

    /// Apply CLI overrides to the configuration.
    ///
    /// CLI flags take precedence over environment variables and the
    /// config file.
    pub fn with_overrides(
        mut self,
        config_file: Option<PathBuf>,
        docs_dir: Option<PathBuf>,
        index_url: Option<String>,
        collection: Option<String>,
        log_level: Option<String>,
        verbose: bool,
        no_color: bool,
    ) -> Self {
        if let Some(config_file) = config_file {
            self.config_file = Some(config_file);
        }

        if let Some(docs_dir) = docs_dir {
            self.docs_dir = docs_dir;
        }

        if let Some(index_url) = index_url {
            self.index.url = index_url;
        }

        if let Some(collection) = collection {
            self.index.collection = collection;
        }

        if let Some(log_level) = log_level {
            self.log_level = Some(log_level);
        }

        if verbose {
            self.verbose = true;
            if self.log_level.is_none() {
                self.log_level = Some("debug".to_string());
            }
        }

        if no_color {
            self.no_color = true;
        }

        self
    }

    /// Validate the configuration.
    ///
    /// Chunk overlap must be strictly smaller than the chunk size, and the
    /// embedding dimensionality must be non-zero. These are fatal startup
    /// errors: a dimensionality mismatch between ingestion and query time
    /// corrupts retrieval silently, so it is rejected before any work runs.
    pub fn validate(&self) -> AppResult<()> {
        if self.chunking.size == 0 {
            return Err(AppError::Config(
                "Chunk size must be greater than zero".to_string(),
            ));
        }

        if self.chunking.overlap >= self.chunking.size {
            return Err(AppError::Config(format!(
                "Chunk overlap ({}) must be smaller than chunk size ({})",
                self.chunking.overlap, self.chunking.size
            )));
        }

        if self.embedding.dimensions == 0 {
            return Err(AppError::Config(
                "Embedding dimensionality must be greater than zero".to_string(),
            ));
        }

        if self.retrieval.top_k == 0 {
            return Err(AppError::Config(
                "Retrieval top_k must be greater than zero".to_string(),
            ));
        }

        let known_providers = ["ollama", "hash"];
        if !known_providers.contains(&self.embedding.provider.as_str()) {
            return Err(AppError::Config(format!(
                "Unknown embedding provider: {}. Supported: {}",
                self.embedding.provider,
                known_providers.join(", ")
            )));
        }

        Ok(())
    }
}

//! Document ingestion subsystem.
//!
//! Turns source documents into searchable, versioned chunks: read source,
//! hash, skip if unchanged, chunk, embed, upsert. Each source is processed
//! independently; a failure in one never aborts the batch.

pub mod chunker;
pub mod extract;
pub mod manager;
pub mod sources;
pub mod versions;

pub use manager::{IngestStats, IngestionManager};
pub use sources::DocumentSource;
pub use versions::ContentVersionStore;

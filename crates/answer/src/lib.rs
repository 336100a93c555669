//! Query subsystem: domain gating, retrieval, answer synthesis, and
//! markup formatting.
//!
//! The query path is a synchronous chain with graceful degradation:
//! gate -> retrieve -> synthesize -> format. Retrieval failures and
//! out-of-domain queries resolve to empty results, never errors; the
//! synthesizer always produces a user-safe answer body.

pub mod format;
pub mod gate;
pub mod retrieval;
pub mod service;
pub mod synthesize;
pub mod templates;
pub mod types;

pub use retrieval::RetrievalService;
pub use service::AnswerService;
pub use synthesize::AnswerSynthesizer;
pub use types::{Answer, AnswerResponse, QueryResult, Retrieval, RetrievalStatus, SourceRef};

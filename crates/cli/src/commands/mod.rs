//! Command handlers for the Airguide CLI.

mod ask;
mod ingest;
mod status;

pub use ask::AskCommand;
pub use ingest::IngestCommand;
pub use status::StatusCommand;

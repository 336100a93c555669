//! Airguide CLI
//!
//! Boundary layer for the HVAC design assistant: document ingestion,
//! question answering, and index status.

mod commands;

use clap::{Parser, Subcommand};
use commands::{AskCommand, IngestCommand, StatusCommand};
use airguide_core::{config::AppConfig, logging, AppResult};
use std::path::PathBuf;

/// Airguide - retrieval-backed HVAC design assistant
#[derive(Parser, Debug)]
#[command(name = "airguide")]
#[command(about = "Answer HVAC design questions from an indexed document corpus", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, env = "AIRGUIDE_CONFIG")]
    config: Option<PathBuf>,

    /// Source documents directory
    #[arg(short, long, global = true, env = "AIRGUIDE_DOCS_DIR")]
    docs_dir: Option<PathBuf>,

    /// Index service base URL
    #[arg(long, global = true, env = "AIRGUIDE_INDEX_URL")]
    index_url: Option<String>,

    /// Index collection name
    #[arg(long, global = true, env = "AIRGUIDE_COLLECTION")]
    collection: Option<String>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, global = true, env = "RUST_LOG")]
    log_level: Option<String>,

    /// Enable verbose output (sets log level to debug)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    no_color: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Ingest source documents into the index
    Ingest(IngestCommand),

    /// Ask a question over the indexed corpus
    Ask(AskCommand),

    /// Show index health and point count
    Status(StatusCommand),
}

#[tokio::main]
async fn main() -> AppResult<()> {
    let cli = Cli::parse();

    let config = AppConfig::load()?;
    let config = config.with_overrides(
        cli.config,
        cli.docs_dir,
        cli.index_url,
        cli.collection,
        cli.log_level,
        cli.verbose,
        cli.no_color,
    );

    // Configuration errors are fatal before any work starts.
    config.validate()?;

    logging::init_logging(config.log_level.as_deref(), config.no_color)?;

    tracing::info!("Airguide starting");
    tracing::debug!("Docs dir: {:?}", config.docs_dir);
    tracing::debug!("Index: {} / {}", config.index.url, config.index.collection);

    let command_name = match &cli.command {
        Commands::Ingest(_) => "ingest",
        Commands::Ask(_) => "ask",
        Commands::Status(_) => "status",
    };
    let _span = tracing::info_span!("command", name = command_name).entered();

    let result = match cli.command {
        Commands::Ingest(cmd) => cmd.execute(&config).await,
        Commands::Ask(cmd) => cmd.execute(&config).await,
        Commands::Status(cmd) => cmd.execute(&config).await,
    };

    match &result {
        Ok(_) => tracing::info!("Command completed successfully"),
        Err(e) => tracing::error!("Command failed: {}", e),
    }

    result
}

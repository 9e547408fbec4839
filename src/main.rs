//! DailyFetch - scheduled news digest client
//!
#![doc = "DailyFetch - scheduled news digest client"]
#![doc = "Main entry point for the DailyFetch CLI."]

use anyhow::Result;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use dailyfetch::cli::{Cli, Commands};
use dailyfetch::commands;
use dailyfetch::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize tracing
    init_tracing();

    // Parse command line arguments
    let cli = Cli::parse_args();

    // Mirror a CLI transcript-database override into the environment so the
    // storage initializer picks it up without threading the path through.
    if let Some(db_path) = &cli.transcripts_db {
        std::env::set_var("DAILYFETCH_TRANSCRIPTS_DB", db_path);
        tracing::info!("Using transcript DB override from CLI: {}", db_path);
    }

    // Load configuration
    let config_path = cli.config.as_deref().unwrap_or("config/config.yaml");
    let config = Config::load(config_path)?;

    // Validate configuration
    config.validate()?;

    // Execute command
    match cli.command {
        Commands::Schedule { command } => {
            tracing::info!("Starting schedule command");
            commands::schedule::run_schedule(config, command).await?;
            Ok(())
        }
        Commands::Chat { fetch_id } => {
            tracing::info!("Starting assistant chat for fetch {}", fetch_id);
            commands::chat::run_chat(config, fetch_id).await?;
            Ok(())
        }
        Commands::Transcripts { command } => {
            tracing::info!("Starting transcripts command");
            commands::transcripts::run_transcripts(config, command)?;
            Ok(())
        }
    }
}

/// Initialize tracing subscriber with environment filter
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("dailyfetch=info"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

//! Mixtape - Spotify now-playing OAuth bridge
//!
//! Main entry point for the mixtape CLI.

use anyhow::Result;
use clap::{Parser, Subcommand};

mod commands;

use commands::serve;

// ─────────────────────────────────────────────────────────────────────────────
// CLI Structure
// ─────────────────────────────────────────────────────────────────────────────

/// Mixtape - Spotify now-playing OAuth bridge
#[derive(Parser)]
#[command(name = "mixtape")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run the OAuth bridge server
    Serve(serve::ServeArgs),
}

// ─────────────────────────────────────────────────────────────────────────────
// Main
// ─────────────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing — console (human-readable) + rotating JSON file
    let filter = if cli.verbose {
        "mixtape=debug,mixtape_config=debug,mixtape_oauth=debug,mixtape_spotify=debug,mixtape_server=debug,info"
    } else {
        "mixtape=info,mixtape_config=info,mixtape_oauth=info,mixtape_spotify=info,mixtape_server=info,warn"
    };

    let log_dir = mixtape_config::xdg_config_dir()
        .map(|d| d.join("logs"))
        .unwrap_or_else(|| std::path::PathBuf::from("logs"));
    let file_appender = tracing_appender::rolling::daily(&log_dir, "mixtape.log");
    let (non_blocking, _guard) = tracing_appender::non_blocking(file_appender);

    use tracing_subscriber::prelude::*;
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(true)
                .with_filter(tracing_subscriber::EnvFilter::new(filter)),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(non_blocking)
                .with_filter(tracing_subscriber::EnvFilter::new(
                    "mixtape=trace,mixtape_config=trace,mixtape_oauth=trace,mixtape_spotify=trace,mixtape_server=trace,info",
                )),
        )
        .init();

    match cli.command {
        Commands::Serve(args) => serve::run(args).await,
    }
}

//! Melspec CLI - Mel Feature Extraction
//!
//! Command-line interface for the melspec feature extractor.

use anyhow::Result;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use melspec::cli::{commands, Cli, Commands};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logger; RUST_LOG takes precedence over --verbose
    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    info!("Melspec v{}", env!("CARGO_PKG_VERSION"));

    handle_command(cli.command)
}

fn handle_command(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Extract {
            input,
            config,
            output,
        } => commands::extract(&input, config.as_deref(), output.as_deref()),
        Commands::Filters { config } => commands::filters(config.as_deref()),
        Commands::InitConfig { path } => commands::init_config(&path),
    }
}

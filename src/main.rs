//! typesniff - File type detection from leading bytes
//!
//! Detects extension and MIME type of files by content and stores uploads
//! in a local object store under content-derived keys.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use typesniff::cli::{commands, Cli, Commands};
use typesniff::config::Config;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = if cli.verbose { "typesniff=debug" } else { "typesniff=info" };
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(false).with_writer(std::io::stderr).compact())
        .with(EnvFilter::from_default_env().add_directive(level.parse()?))
        .init();

    let config_path = cli.config.clone().unwrap_or_else(Config::default_path);
    let config = commands::load_config(&cli)?;

    match &cli.command {
        Commands::Detect(args) => commands::run_detect(args, &config).await?,
        Commands::Put(args) => commands::run_put(args, &config).await?,
        Commands::Rules(args) => commands::run_rules(args, &config)?,
        Commands::Config(args) => commands::run_config(args, &config, &config_path)?,
    }

    Ok(())
}

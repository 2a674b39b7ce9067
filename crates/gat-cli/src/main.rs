use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use gat_cli::commands::activity::{self, ActivityRequest};
use gat_cli::{Cli, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing with verbose flag support; stdout is reserved for the report
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    // Use try_init to avoid panic if tracing is already initialized (e.g., in tests)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let config =
        Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    let request = ActivityRequest::from_cli(&cli, &config)?;
    tracing::debug!(?request, "validated request");

    let mut stdout = std::io::stdout().lock();
    activity::run(&mut stdout, &request, &config)
}

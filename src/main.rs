use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod events;
mod health;
mod mock;
mod reply;
mod store;
mod ui;

use config::Config;

#[derive(Parser)]
#[command(name = "symptomate")]
#[command(version)]
#[command(about = "Terminal chat client for a symptom-checking assistant", long_about = None)]
struct Cli {
    /// Use the offline keyword responder instead of the backend
    #[arg(long)]
    mock: bool,

    /// Override the backend base URL
    #[arg(long)]
    api_url: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Show your recent health history
    History,
    /// Clear the persisted chat history
    Clear,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load()?;
    if let Some(url) = cli.api_url {
        config.api_base_url = url;
    }

    init_tracing(&config)?;

    match cli.command {
        None => app::run(config, cli.mock).await,
        Some(Commands::History) => commands::show_history(&config).await,
        Some(Commands::Clear) => commands::clear_history(&config),
    }
}

/// Diagnostics go to a log file; the TUI owns the terminal.
fn init_tracing(config: &Config) -> Result<()> {
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(config.log_path())
        .context("Failed to open log file")?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("symptomate=info")),
        )
        .with_writer(std::sync::Arc::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

use anyhow::Result;
use clap::Parser;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing::error;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod app;
mod bulk;
mod catalog;
mod cli;
mod config;
mod pagination;
mod selection;
mod tui;

use cli::Cli;

#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    if let Err(e) = dotenvy::dotenv() {
        // Don't error if .env file doesn't exist
        tracing::debug!("No .env file found or error loading it: {}", e);
    }

    let cli = Cli::parse();
    let interactive = cli.is_interactive();

    // Set up panic hook so a crash never leaves the terminal in raw mode
    std::panic::set_hook(Box::new(move |panic_info| {
        if interactive {
            tui::force_restore_terminal();
        }
        error!("Application panicked: {}", panic_info);
        eprintln!("catpick panicked: {}", panic_info);
        std::process::exit(1);
    }));

    if let Err(e) = init_logging(cli.debug, interactive) {
        eprintln!("Failed to initialize logging: {}", e);
        std::process::exit(1);
    }

    if let Err(e) = cli.execute().await {
        error!("Application error: {}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn init_logging(debug: bool, interactive: bool) -> Result<()> {
    let default_filter = if debug { "catpick=debug" } else { "catpick=info" };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if interactive {
        // Log lines would corrupt the alternate screen, so they go to a file
        let path = log_file_path();
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir)?;
        }
        let file = OpenOptions::new().create(true).append(true).open(&path)?;

        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_ansi(false).with_writer(Mutex::new(file)))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {}", e))?;
    }

    Ok(())
}

fn log_file_path() -> PathBuf {
    config::Config::resolve_data_dir().join("catpick.log")
}

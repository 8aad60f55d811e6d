//! CLI entry point for hoopchat

mod commands;
mod render;
mod repl;

use anyhow::{Context, Result};
use clap::Parser;
use parking_lot::Mutex;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::io::BufReader;
use tracing::info;

use hoopchat_core::config::validate::validate_config;
use hoopchat_core::config::ConfigLoader;
use hoopchat_core::logging::init_logging;
use hoopchat_core::preferences::{FilePreferences, ThemePreference};
use hoopchat_core::session::{ChatController, SessionStore};
use hoopchat_providers::HttpAnswerClient;

use crate::repl::Repl;

#[derive(Parser)]
#[command(name = "hoopchat")]
#[command(about = "Ask basketball questions from the terminal")]
#[command(version)]
struct Cli {
    /// Configuration directory
    #[arg(short, long)]
    config_dir: Option<PathBuf>,

    /// Base URL of the chat API, overriding config and environment
    #[arg(short, long)]
    base_url: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = match cli.config_dir {
        Some(dir) => ConfigLoader::with_dir(dir),
        None => ConfigLoader::new(),
    };

    let mut config = loader
        .load()
        .with_context(|| format!("Failed to load config from {}", loader.config_dir().display()))?;
    if let Some(base_url) = cli.base_url {
        config.api.base_url = base_url;
        validate_config(&config).context("Invalid --base-url")?;
    }

    config.logging.dir = resolve_log_dir(loader.config_dir(), &config.logging.dir);
    let _log_guard = init_logging(&config.logging);
    info!("Using chat API at {}", config.api.base_url);

    let preferences = FilePreferences::open(loader.config_dir())
        .context("Failed to open preferences")?;
    let theme = ThemePreference::load(preferences);

    let client = HttpAnswerClient::from_config(&config.api);
    let controller = ChatController::new(
        Arc::new(Mutex::new(SessionStore::new())),
        Arc::new(client),
    );

    Repl::new(controller, theme)
        .run(BufReader::new(tokio::io::stdin()))
        .await
}

/// Relative log directories live under the config directory
fn resolve_log_dir(config_dir: &Path, dir: &str) -> String {
    let dir = Path::new(dir);
    if dir.is_absolute() {
        dir.display().to_string()
    } else {
        config_dir.join(dir).display().to_string()
    }
}

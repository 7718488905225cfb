//! CLI module for Registry Cache
//!
//! Provides subcommands:
//! - `serve`: run the warming scheduler until shutdown
//! - `warm`: run one warming sweep in the foreground
//! - `get`: resolve a single entity through the cache

pub mod get;
pub mod serve;
pub mod warm;

use clap::{Parser, Subcommand};
use tracing::warn;

use crate::config::AppConfig;
use crate::infrastructure::logging;

/// Registry Cache - lazy resolution and warming of registry entities
#[derive(Parser)]
#[command(name = "registry-cache")]
#[command(version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Run the background warming scheduler
    Serve,

    /// Run a single warming sweep and report the result
    Warm(warm::WarmArgs),

    /// Resolve one entity by id
    Get(get::GetArgs),
}

/// Loads `.env` and the layered configuration, then installs logging
pub(crate) fn bootstrap() -> AppConfig {
    dotenvy::dotenv().ok();

    let (config, load_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e)),
    };

    logging::init_logging(&config.logging);

    if let Some(e) = load_error {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    config
}

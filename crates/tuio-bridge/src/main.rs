//! TUIO touch bridge: entry point.
//!
//! Listens for TUIO 1.1 2D-cursor bundles on UDP and prints one JSON object
//! per touch event to stdout.
//!
//! # Usage
//!
//! ```text
//! tuio-bridge [OPTIONS]
//!
//! Options:
//!   --config <PATH>   TOML config file [default: tuio-bridge.toml]
//!   --bind   <IP>     Address to listen on (overrides the config file)
//!   --port   <PORT>   UDP port to listen on (overrides the config file)
//! ```
//!
//! # Environment variable overrides
//!
//! | Variable      | Description                |
//! |---------------|----------------------------|
//! | `TUIO_CONFIG` | Config file path           |
//! | `TUIO_BIND`   | Listen address             |
//! | `TUIO_PORT`   | Listen port                |
//! | `RUST_LOG`    | Log filter (overrides `log_level`) |
//!
//! Logs go to stderr so stdout carries only events.

use std::path::PathBuf;
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};

use anyhow::Context;
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use tuio_bridge::domain::AppConfig;
use tuio_bridge::infrastructure::{load_config, run_bridge};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Turns a TUIO 2D-cursor stream into touch lifecycle events.
#[derive(Debug, Parser)]
#[command(
    name = "tuio-bridge",
    about = "TUIO 2D-cursor to touch event bridge",
    version
)]
struct Cli {
    /// TOML config file.  A missing file means built-in defaults.
    #[arg(long, default_value = "tuio-bridge.toml", env = "TUIO_CONFIG")]
    config: PathBuf,

    /// IP address to bind the UDP socket to.
    #[arg(long, env = "TUIO_BIND")]
    bind: Option<String>,

    /// UDP port to listen on.
    #[arg(long, env = "TUIO_PORT")]
    port: Option<u16>,
}

impl Cli {
    /// Loads the config file and applies the CLI overrides on top.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be loaded or the overridden bind
    /// address is invalid.
    fn into_app_config(self) -> anyhow::Result<AppConfig> {
        let mut config = load_config(&self.config)
            .with_context(|| format!("failed to load config from {}", self.config.display()))?;
        self.apply_overrides(&mut config)?;
        Ok(config)
    }

    fn apply_overrides(&self, config: &mut AppConfig) -> anyhow::Result<()> {
        if let Some(bind) = &self.bind {
            config.network.bind_address = bind.clone();
        }
        if let Some(port) = self.port {
            config.network.port = port;
        }
        config.validate().context("invalid configuration")?;
        Ok(())
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.into_app_config()?;

    // RUST_LOG wins; otherwise the configured level.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!(
        "TUIO bridge starting: udp={}:{}, zones={}",
        config.network.bind_address,
        config.network.port,
        config.effective_zones().len()
    );

    let running = Arc::new(AtomicBool::new(true));
    let running_clone = Arc::clone(&running);

    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, shutting down");
                running_clone.store(false, Ordering::Relaxed);
            }
            Err(e) => {
                tracing::error!("failed to listen for Ctrl+C signal: {e}");
            }
        }
    });

    run_bridge(config, running).await?;

    info!("TUIO bridge stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

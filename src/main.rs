// =============================================================================
// market-brief — Main Entry Point
// =============================================================================
//
// stdout carries only the report; logs and errors go to stderr.
// =============================================================================

// ── Module declarations ──────────────────────────────────────────────────────
mod analysis;
mod binance;
mod cli;
mod config;
mod indicators;
mod market_data;
mod narrator;

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::cli::{Cli, Command};
use crate::config::AppConfig;

#[tokio::main]
async fn main() -> ExitCode {
    // ── 1. Environment & logging ─────────────────────────────────────────
    let _ = dotenv::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // ── 2. Run ───────────────────────────────────────────────────────────
    match run(cli).await {
        Ok(output) => {
            println!("{output}");
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<String> {
    let mut config =
        AppConfig::load_or_default(&cli.config).context("Error loading configuration")?;
    config.apply_env();
    config.validate().context("Error in configuration")?;
    debug!(config = ?config, "effective configuration");

    match cli.command {
        Command::Analyze { symbol, raw } => {
            let report = cli::analyze(&config, &symbol, raw).await?;
            Ok(report.to_string())
        }
        Command::Config => cli::render_config(&config),
    }
}

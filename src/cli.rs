// =============================================================================
// Command-line front-end
// =============================================================================
//
// `analyze` runs fetch, indicators and narration inside one request span and
// returns the finished report; `config` shows the effective settings.
// =============================================================================

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use clap::{Parser, Subcommand};
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::analysis::{analyze_snapshot, FrameAnalysis};
use crate::binance::BinanceClient;
use crate::config::AppConfig;
use crate::market_data::fetch_snapshot;
use crate::narrator::{build_prompt, NarratorClient};

/// Config file read when `--config` is not given.
pub const DEFAULT_CONFIG_PATH: &str = "market_brief.json";

#[derive(Debug, Parser)]
#[command(
    name = "market-brief",
    version,
    about = "Indicator snapshot and narrated brief for a Binance spot symbol"
)]
pub struct Cli {
    /// Configuration file (JSON)
    #[arg(short, long, global = true, default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Fetch klines, compute indicators and print a brief
    Analyze {
        /// Symbol, e.g. BTCUSDT or btc
        symbol: String,

        /// Print the indicator bundles as JSON, skipping narration
        #[arg(short, long)]
        raw: bool,
    },
    /// Print the effective configuration (secrets redacted)
    Config,
}

/// Trim, uppercase and append `quote` when it is not already part of the symbol.
pub fn normalize_symbol(raw: &str, quote: &str) -> String {
    let symbol = raw.trim().to_uppercase();
    let quote = quote.trim().to_uppercase();
    if quote.is_empty() || symbol.contains(&quote) {
        symbol
    } else {
        format!("{symbol}{quote}")
    }
}

/// Finished output for one `analyze` request.
#[derive(Debug, Clone)]
pub struct Report {
    pub symbol: String,
    pub generated_at: DateTime<Utc>,
    pub request_id: Uuid,
    pub body: String,
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Analysis for {}", self.symbol)?;
        writeln!(
            f,
            "{}",
            self.generated_at.to_rfc3339_opts(SecondsFormat::Secs, true)
        )?;
        writeln!(f)?;
        writeln!(f, "{}", self.body.trim_end())?;
        writeln!(f)?;
        write!(f, "request {}", self.request_id)
    }
}

/// Per-timeframe bundles as a JSON object keyed by interval, `null` when absent.
pub fn raw_body(frames: &[FrameAnalysis]) -> Result<String> {
    let map: serde_json::Map<String, serde_json::Value> = frames
        .iter()
        .map(|f| Ok((f.timeframe.clone(), serde_json::to_value(&f.analysis)?)))
        .collect::<Result<_, serde_json::Error>>()?;
    serde_json::to_string_pretty(&map).context("failed to encode analysis")
}

/// Configuration rendered for `market-brief config`.  The API key is never
/// serialised, so only its presence is reported.
pub fn render_config(config: &AppConfig) -> Result<String> {
    let mut json = serde_json::to_value(config).context("failed to encode config")?;
    if let Some(narrator) = json.get_mut("narrator").and_then(|n| n.as_object_mut()) {
        let shown = if config.has_api_key() { "<redacted>" } else { "<unset>" };
        narrator.insert("api_key".into(), shown.into());
    }
    serde_json::to_string_pretty(&json).context("failed to encode config")
}

/// Run one `analyze` request end to end.
pub async fn analyze(config: &AppConfig, raw_symbol: &str, raw: bool) -> Result<Report> {
    let symbol = normalize_symbol(raw_symbol, &config.quote_asset);
    let request_id = Uuid::new_v4();
    let span = info_span!("analyze", symbol = %symbol, request_id = %request_id);

    async {
        let fetch_failed = || format!("Error fetching market data for {symbol}");
        let client = BinanceClient::new(
            &config.binance_base_url,
            Duration::from_secs(config.binance_timeout_secs),
        )
        .with_context(fetch_failed)?;
        let snapshot = fetch_snapshot(&client, &symbol, &config.intervals, config.kline_limit)
            .await
            .with_context(fetch_failed)?;

        let frames = analyze_snapshot(&snapshot, &config.indicators);

        let narrate = !raw && config.has_api_key();
        if !raw && !narrate {
            warn!("no narrator API key configured, printing raw analysis");
        }

        let body = if narrate {
            let narrate_failed = || format!("Error generating analysis for {symbol}");
            let narrator = NarratorClient::new(&config.narrator).with_context(narrate_failed)?;
            let prompt = build_prompt(&symbol, &frames);
            narrator.summarize(&prompt).await.with_context(narrate_failed)?
        } else {
            raw_body(&frames)?
        };

        info!(frames = frames.len(), narrated = narrate, "report ready");

        Ok::<_, anyhow::Error>(Report {
            symbol: symbol.clone(),
            generated_at: Utc::now(),
            request_id,
            body,
        })
    }
    .instrument(span)
    .await
}

// =============================================================================
// Configuration — JSON file with serde defaults, environment overrides
// =============================================================================
//
// Every field carries `#[serde(default)]` so that a partial (or absent) file
// still yields a usable configuration.  Credentials normally arrive through
// the environment (`.env` is loaded at startup); the narrator API key is
// accepted from the file as well but never serialised back out.
//
// Environment overrides:
//   DEEPSEEK_API_KEY        narrator bearer token
//   AI_ENDPOINT             chat-completions URL
//   AI_MODEL                model name
//   MARKET_BRIEF_INTERVALS  comma-separated kline intervals
// =============================================================================

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::binance::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT_SECS};

/// Kline intervals accepted by Binance.
pub const SUPPORTED_INTERVALS: &[&str] = &[
    "1m", "3m", "5m", "15m", "30m", "1h", "2h", "4h", "6h", "8h", "12h", "1d", "3d", "1w", "1M",
];

/// Largest `limit` the klines endpoint accepts.
const MAX_KLINE_LIMIT: u32 = 1000;

// =============================================================================
// Default-value helpers (required by serde `default = "..."` attribute)
// =============================================================================

fn default_binance_base_url() -> String {
    DEFAULT_BASE_URL.to_string()
}

fn default_binance_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_intervals() -> Vec<String> {
    vec!["1h".to_string(), "15m".to_string()]
}

fn default_kline_limit() -> u32 {
    100
}

fn default_quote_asset() -> String {
    "USDT".to_string()
}

fn default_macd_fast() -> usize {
    12
}

fn default_macd_slow() -> usize {
    26
}

fn default_macd_signal() -> usize {
    9
}

fn default_period() -> usize {
    14
}

fn default_endpoint() -> String {
    "https://api.deepseek.com/chat/completions".to_string()
}

fn default_model() -> String {
    "deepseek-coder".to_string()
}

fn default_timeout_secs() -> u64 {
    60
}

// =============================================================================
// IndicatorParams
// =============================================================================

/// Periods used for every timeframe's indicator bundle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorParams {
    #[serde(default = "default_macd_fast")]
    pub macd_fast: usize,

    #[serde(default = "default_macd_slow")]
    pub macd_slow: usize,

    #[serde(default = "default_macd_signal")]
    pub macd_signal: usize,

    #[serde(default = "default_period")]
    pub adx_period: usize,

    #[serde(default = "default_period")]
    pub mfi_period: usize,
}

impl Default for IndicatorParams {
    fn default() -> Self {
        Self {
            macd_fast: default_macd_fast(),
            macd_slow: default_macd_slow(),
            macd_signal: default_macd_signal(),
            adx_period: default_period(),
            mfi_period: default_period(),
        }
    }
}

// =============================================================================
// NarratorConfig
// =============================================================================

/// Remote text-generation endpoint settings.
#[derive(Clone, Serialize, Deserialize)]
pub struct NarratorConfig {
    /// OpenAI-compatible chat-completions URL.
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_model")]
    pub model: String,

    /// Whole-request timeout in seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Bearer token; read from file or environment, never written out.
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
}

impl Default for NarratorConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            model: default_model(),
            timeout_secs: default_timeout_secs(),
            api_key: None,
        }
    }
}

impl NarratorConfig {
    /// The configured key, trimmed; `None` when absent or blank.
    pub fn bearer_token(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl std::fmt::Debug for NarratorConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NarratorConfig")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .field("timeout_secs", &self.timeout_secs)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

// =============================================================================
// AppConfig
// =============================================================================

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default = "default_binance_base_url")]
    pub binance_base_url: String,

    /// Whole-request timeout for kline fetches, in seconds.
    #[serde(default = "default_binance_timeout_secs")]
    pub binance_timeout_secs: u64,

    /// Timeframes analysed per request, in report order.
    #[serde(default = "default_intervals")]
    pub intervals: Vec<String>,

    /// Candles fetched per timeframe.
    #[serde(default = "default_kline_limit")]
    pub kline_limit: u32,

    /// Appended to bare base-asset symbols (`btc` => `BTCUSDT`).
    #[serde(default = "default_quote_asset")]
    pub quote_asset: String,

    #[serde(default)]
    pub indicators: IndicatorParams,

    #[serde(default)]
    pub narrator: NarratorConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            binance_base_url: default_binance_base_url(),
            binance_timeout_secs: default_binance_timeout_secs(),
            intervals: default_intervals(),
            kline_limit: default_kline_limit(),
            quote_asset: default_quote_asset(),
            indicators: IndicatorParams::default(),
            narrator: NarratorConfig::default(),
        }
    }
}

impl AppConfig {
    /// Load configuration from a JSON file at `path`.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config from {}", path.display()))?;

        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("failed to parse config from {}", path.display()))?;

        info!(
            path = %path.display(),
            intervals = ?config.intervals,
            kline_limit = config.kline_limit,
            "config loaded"
        );

        Ok(config)
    }

    /// Like [`AppConfig::load`], but a missing file yields the defaults.
    /// A file that exists and fails to parse is still an error.
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            warn!(path = %path.display(), "config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    /// Apply overrides from the process environment.
    pub fn apply_env(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Apply overrides from `lookup`; empty values are ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        if let Some(key) = get("DEEPSEEK_API_KEY") {
            self.narrator.api_key = Some(key);
        }
        if let Some(endpoint) = get("AI_ENDPOINT") {
            self.narrator.endpoint = endpoint;
        }
        if let Some(model) = get("AI_MODEL") {
            self.narrator.model = model;
        }
        if let Some(list) = get("MARKET_BRIEF_INTERVALS") {
            self.intervals = list
                .split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect();
        }
    }

    /// Reject settings that would make every indicator come back empty or
    /// that Binance would refuse.
    pub fn validate(&self) -> Result<()> {
        let p = &self.indicators;
        if p.macd_fast == 0 || p.macd_slow == 0 || p.macd_signal == 0 {
            anyhow::bail!("MACD periods must be greater than zero");
        }
        if p.macd_fast >= p.macd_slow {
            anyhow::bail!(
                "MACD fast period ({}) must be shorter than slow period ({})",
                p.macd_fast,
                p.macd_slow
            );
        }
        if p.adx_period == 0 || p.mfi_period == 0 {
            anyhow::bail!("ADX and MFI periods must be greater than zero");
        }
        if self.kline_limit == 0 || self.kline_limit > MAX_KLINE_LIMIT {
            anyhow::bail!(
                "kline_limit must be between 1 and {MAX_KLINE_LIMIT}, got {}",
                self.kline_limit
            );
        }
        if self.binance_timeout_secs == 0 || self.narrator.timeout_secs == 0 {
            anyhow::bail!("request timeouts must be greater than zero");
        }
        if self.intervals.is_empty() {
            anyhow::bail!("at least one kline interval is required");
        }
        if let Some(bad) = self
            .intervals
            .iter()
            .find(|iv| !SUPPORTED_INTERVALS.contains(&iv.as_str()))
        {
            anyhow::bail!("unsupported kline interval '{bad}'");
        }
        Ok(())
    }

    pub fn has_api_key(&self) -> bool {
        self.narrator.bearer_token().is_some()
    }
}

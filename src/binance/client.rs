// =============================================================================
// Binance REST API Client — public market data
// =============================================================================
//
// Only unsigned endpoints are used, so no API key or secret is held.  Binance
// returns numeric kline fields as JSON strings; both strings and numbers are
// accepted when parsing.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::{debug, instrument, warn};

use super::rate_limit::{klines_weight, RateLimitTracker};
use crate::market_data::Candle;

/// Default REST host.
pub const DEFAULT_BASE_URL: &str = "https://api.binance.com";

/// Default whole-request timeout for market-data calls, in seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Binance REST API client for public market data.
#[derive(Clone)]
pub struct BinanceClient {
    base_url: String,
    client: reqwest::Client,
    rate_limit: Arc<RateLimitTracker>,
}

impl BinanceClient {
    /// Create a client against `base_url`; a trailing slash is dropped.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let base_url = base_url.into().trim_end_matches('/').to_string();

        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build reqwest client")?;

        debug!(
            base_url = %base_url,
            timeout_secs = timeout.as_secs(),
            "BinanceClient initialised"
        );

        Ok(Self {
            base_url,
            client,
            rate_limit: Arc::new(RateLimitTracker::new()),
        })
    }

    /// GET /api/v3/klines (public, unsigned).
    ///
    /// Returns candles oldest-first, as Binance sends them.  The newest
    /// candle may still be in progress.
    #[instrument(skip(self), name = "binance::get_klines")]
    pub async fn get_klines(
        &self,
        symbol: &str,
        interval: &str,
        limit: u32,
    ) -> Result<Vec<Candle>> {
        if !self.rate_limit.can_send_request(klines_weight(limit)) {
            anyhow::bail!("Binance request weight budget exhausted, retry in a minute");
        }

        let url = format!("{}/api/v3/klines", self.base_url);
        let limit = limit.to_string();

        let resp = self
            .client
            .get(&url)
            .query(&[("symbol", symbol), ("interval", interval), ("limit", limit.as_str())])
            .send()
            .await
            .context("GET /api/v3/klines request failed")?;

        self.rate_limit.update_from_headers(resp.headers());

        let status = resp.status();
        let body: serde_json::Value = resp
            .json()
            .await
            .context("failed to parse klines response")?;

        if !status.is_success() {
            anyhow::bail!(
                "Binance GET /api/v3/klines returned {}: {}",
                status,
                body
            );
        }

        let candles = parse_klines(&body)?;
        debug!(
            symbol,
            interval,
            count = candles.len(),
            used_weight = self.rate_limit.used_weight(),
            "klines fetched"
        );
        Ok(candles)
    }
}

/// Parse Binance's array-of-arrays klines payload.
///
/// Array indices:
///   [0] openTime, [1] open, [2] high, [3] low, [4] close, [5] volume,
///   [6] closeTime; [7..=10] volume breakdowns are not used
pub fn parse_klines(body: &serde_json::Value) -> Result<Vec<Candle>> {
    let raw = body
        .as_array()
        .context("klines response is not an array")?;

    let mut candles = Vec::with_capacity(raw.len());

    for entry in raw {
        let arr = entry
            .as_array()
            .context("kline entry is not an array")?;

        if arr.len() < 11 {
            warn!("skipping malformed kline entry with {} elements", arr.len());
            continue;
        }

        let open_time = parse_millis(&arr[0]).context("bad kline open time")?;
        let open = parse_str_f64(&arr[1])?;
        let high = parse_str_f64(&arr[2])?;
        let low = parse_str_f64(&arr[3])?;
        let close = parse_str_f64(&arr[4])?;
        let volume = parse_str_f64(&arr[5])?;
        let close_time = parse_millis(&arr[6]).context("bad kline close time")?;

        candles.push(Candle::new(open_time, open, high, low, close, volume, close_time));
    }

    Ok(candles)
}

/// Millisecond timestamps arrive as JSON integers.
fn parse_millis(val: &serde_json::Value) -> Result<i64> {
    val.as_i64()
        .with_context(|| format!("expected integer milliseconds, got: {val}"))
}

/// Parse a JSON value that may be either a string or a number into `f64`.
fn parse_str_f64(val: &serde_json::Value) -> Result<f64> {
    if let Some(s) = val.as_str() {
        s.parse::<f64>()
            .with_context(|| format!("failed to parse '{s}' as f64"))
    } else if let Some(n) = val.as_f64() {
        Ok(n)
    } else {
        anyhow::bail!("expected string or number, got: {val}")
    }
}

impl std::fmt::Debug for BinanceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BinanceClient")
            .field("base_url", &self.base_url)
            .field("rate_limit", &self.rate_limit)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn kline(open_time: i64, close: &str) -> serde_json::Value {
        json!([
            open_time, "100.0", "105.5", "99.5", close, "1234.5",
            open_time + 3_599_999, "123450.0", 321, "600.0", "60000.0", "0"
        ])
    }

    #[test]
    fn parses_string_encoded_fields() {
        let body = json!([kline(1_700_000_000_000, "104.25")]);
        let candles = parse_klines(&body).unwrap();
        assert_eq!(candles.len(), 1);
        let c = &candles[0];
        assert_eq!(c.open_time, 1_700_000_000_000);
        assert_eq!(c.close_time, 1_700_003_599_999);
        assert!((c.high - 105.5).abs() < f64::EPSILON);
        assert!((c.low - 99.5).abs() < f64::EPSILON);
        assert!((c.close - 104.25).abs() < f64::EPSILON);
        assert!((c.volume - 1234.5).abs() < f64::EPSILON);
    }

    #[test]
    fn keeps_order_and_skips_short_entries() {
        let body = json!([
            kline(0, "1.0"),
            [1, "2.0", "2.0"],
            kline(3_600_000, "3.0")
        ]);
        let closes: Vec<f64> = parse_klines(&body).unwrap().iter().map(|c| c.close).collect();
        assert_eq!(closes, vec![1.0, 3.0]);
    }

    #[test]
    fn accepts_numeric_fields() {
        let body = json!([[0, 1.0, 2.0, 0.5, 1.5, 10.0, 59_999, 15.0, 3, 5.0, 7.5, "0"]]);
        let candles = parse_klines(&body).unwrap();
        assert!((candles[0].close - 1.5).abs() < f64::EPSILON);
    }

    #[test]
    fn rejects_non_array_payload() {
        let body = json!({ "code": -1121, "msg": "Invalid symbol." });
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn rejects_unparseable_price() {
        let body = json!([kline(0, "not-a-number")]);
        assert!(parse_klines(&body).is_err());
    }

    #[test]
    fn rejects_malformed_timestamps() {
        let mut entry = kline(0, "1.0");
        entry[0] = json!("yesterday");
        assert!(parse_klines(&json!([entry])).is_err());

        let mut entry = kline(0, "1.0");
        entry[6] = json!(null);
        assert!(parse_klines(&json!([entry])).is_err());
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let client =
            BinanceClient::new("https://api.binance.com/", Duration::from_secs(DEFAULT_TIMEOUT_SECS))
                .unwrap();
        assert_eq!(client.base_url, "https://api.binance.com");
    }
}

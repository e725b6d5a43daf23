// =============================================================================
// Market Snapshot — every configured interval for one symbol
// =============================================================================
//
// Interval fetches run concurrently; frames keep the configured order.
// =============================================================================

use anyhow::{Context, Result};
use futures_util::future::try_join_all;
use tracing::{info, instrument};

use super::Candle;
use crate::binance::BinanceClient;

/// Candles for one interval of a symbol.
#[derive(Debug, Clone)]
pub struct Frame {
    pub interval: String,
    pub candles: Vec<Candle>,
}

/// Every requested interval of one symbol, in the order requested.
#[derive(Debug, Clone)]
pub struct MarketSnapshot {
    pub symbol: String,
    pub frames: Vec<Frame>,
}

/// Fetch `limit` klines for each of `intervals` concurrently.
///
/// Any single failure fails the whole snapshot.
#[instrument(skip(client, intervals), fields(intervals = intervals.len()))]
pub async fn fetch_snapshot(
    client: &BinanceClient,
    symbol: &str,
    intervals: &[String],
    limit: u32,
) -> Result<MarketSnapshot> {
    let fetches = intervals.iter().map(|interval| async move {
        let candles = client
            .get_klines(symbol, interval, limit)
            .await
            .with_context(|| format!("failed to fetch {interval} klines for {symbol}"))?;
        Ok::<_, anyhow::Error>(Frame {
            interval: interval.clone(),
            candles,
        })
    });

    let frames = try_join_all(fetches).await?;

    info!(
        symbol,
        frames = ?frames.iter().map(|f| (f.interval.as_str(), f.candles.len())).collect::<Vec<_>>(),
        "market snapshot fetched"
    );

    Ok(MarketSnapshot {
        symbol: symbol.to_string(),
        frames,
    })
}

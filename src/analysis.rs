// =============================================================================
// Per-timeframe Technical Analysis
// =============================================================================
//
// Reduces a candle window to the "current" reading of each indicator: the last
// element of its series.  An indicator whose series is empty (window too short)
// is reported as absent rather than failing the whole bundle.
// =============================================================================

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::IndicatorParams;
use crate::indicators::{calculate_adx, calculate_macd, calculate_mfi, calculate_obv, MacdPoint};
use crate::market_data::{Candle, CandleColumns, MarketSnapshot};

/// Latest indicator readings for one timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TechnicalAnalysis {
    pub timeframe: String,
    pub candles: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub macd: Option<MacdPoint>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adx: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub obv: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mfi: Option<f64>,
}

/// A timeframe label with its analysis, `None` when no candles were supplied.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    pub timeframe: String,
    pub analysis: Option<TechnicalAnalysis>,
}

/// Analyse one oldest-first candle window.
///
/// Returns `None` only for an empty window.
pub fn analyze_candles(
    candles: &[Candle],
    timeframe: &str,
    params: &IndicatorParams,
) -> Option<TechnicalAnalysis> {
    if candles.is_empty() {
        return None;
    }

    let cols = CandleColumns::from_candles(candles);

    let macd = calculate_macd(&cols.closes, params.macd_fast, params.macd_slow, params.macd_signal)
        .last()
        .copied();
    let adx = calculate_adx(&cols.highs, &cols.lows, &cols.closes, params.adx_period)
        .last()
        .copied();
    let obv = calculate_obv(&cols.closes, &cols.volumes).last().copied();
    let mfi = calculate_mfi(
        &cols.highs,
        &cols.lows,
        &cols.closes,
        &cols.volumes,
        params.mfi_period,
    )
    .last()
    .copied();

    debug!(
        timeframe,
        candles = cols.len(),
        has_macd = macd.is_some(),
        has_adx = adx.is_some(),
        has_mfi = mfi.is_some(),
        "timeframe analysed"
    );

    Some(TechnicalAnalysis {
        timeframe: timeframe.to_string(),
        candles: cols.len(),
        macd,
        adx,
        obv,
        mfi,
    })
}

/// Analyse every frame of `snapshot`, preserving frame order.
pub fn analyze_snapshot(snapshot: &MarketSnapshot, params: &IndicatorParams) -> Vec<FrameAnalysis> {
    let frames: Vec<FrameAnalysis> = snapshot
        .frames
        .iter()
        .map(|frame| FrameAnalysis {
            timeframe: frame.interval.clone(),
            analysis: analyze_candles(&frame.candles, &frame.interval, params),
        })
        .collect();

    debug!(
        symbol = %snapshot.symbol,
        frames = frames.len(),
        empty = frames.iter().filter(|f| f.analysis.is_none()).count(),
        "snapshot analysed"
    );
    frames
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::market_data::Frame;

    fn candles(n: usize) -> Vec<Candle> {
        (0..n)
            .map(|i| {
                let base = 100.0 + (i as f64 * 0.25).sin() * 6.0 + i as f64 * 0.2;
                Candle::new(
                    i as i64 * 3_600_000,
                    base,
                    base + 1.5,
                    base - 1.5,
                    base + 0.5,
                    1_000.0 + (i % 7) as f64 * 50.0,
                    i as i64 * 3_600_000 + 3_599_999,
                )
            })
            .collect()
    }

    #[test]
    fn empty_window_is_absent() {
        assert!(analyze_candles(&[], "1h", &IndicatorParams::default()).is_none());
    }

    #[test]
    fn full_window_reports_every_indicator() {
        let a = analyze_candles(&candles(100), "1h", &IndicatorParams::default()).unwrap();
        assert_eq!(a.timeframe, "1h");
        assert_eq!(a.candles, 100);
        assert!(a.macd.is_some());
        assert!(a.obv.is_some());
        let adx = a.adx.unwrap();
        let mfi = a.mfi.unwrap();
        assert!((0.0..=100.0).contains(&adx));
        assert!((0.0..=100.0).contains(&mfi));
    }

    #[test]
    fn short_window_drops_only_the_indicators_it_cannot_support() {
        // 20 candles: OBV and MFI(14) work, ADX(14) needs 27, MACD needs 34.
        let a = analyze_candles(&candles(20), "15m", &IndicatorParams::default()).unwrap();
        assert!(a.macd.is_none());
        assert!(a.adx.is_none());
        assert!(a.obv.is_some());
        assert!(a.mfi.is_some());
    }

    #[test]
    fn readings_are_last_series_values() {
        let c = candles(60);
        let params = IndicatorParams::default();
        let a = analyze_candles(&c, "1h", &params).unwrap();

        let cols = CandleColumns::from_candles(&c);
        let obv = calculate_obv(&cols.closes, &cols.volumes);
        assert_eq!(a.obv, obv.last().copied());
        let macd = calculate_macd(&cols.closes, 12, 26, 9);
        assert_eq!(a.macd, macd.last().copied());
    }

    #[test]
    fn absent_fields_are_omitted_from_json() {
        let a = analyze_candles(&candles(5), "15m", &IndicatorParams::default()).unwrap();
        let json = serde_json::to_value(&a).unwrap();
        assert!(json.get("macd").is_none());
        assert!(json.get("adx").is_none());
        assert!(json.get("mfi").is_none());
        assert!(json.get("obv").is_some());
        assert_eq!(json["timeframe"], "15m");
    }

    #[test]
    fn snapshot_frames_keep_their_order() {
        let snapshot = MarketSnapshot {
            symbol: "ETHUSDT".into(),
            frames: vec![
                Frame {
                    interval: "1h".into(),
                    candles: candles(50),
                },
                Frame {
                    interval: "15m".into(),
                    candles: Vec::new(),
                },
            ],
        };
        let out = analyze_snapshot(&snapshot, &IndicatorParams::default());
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].timeframe, "1h");
        assert!(out[0].analysis.is_some());
        assert_eq!(out[1].timeframe, "15m");
        assert!(out[1].analysis.is_none());
    }
}

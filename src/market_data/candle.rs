// =============================================================================
// Candles — OHLCV samples and their column view
// =============================================================================
//
// Candles arrive oldest-first.  The indicators consume parallel slices, so
// `CandleColumns` splits a window into one vector per field.
// =============================================================================

use serde::{Deserialize, Serialize};

/// A single OHLCV candle from the Binance klines endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub open_time: i64,
    pub close_time: i64,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl Candle {
    pub fn new(
        open_time: i64,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
        close_time: i64,
    ) -> Self {
        Self {
            open_time,
            close_time,
            open,
            high,
            low,
            close,
            volume,
        }
    }
}

/// Parallel oldest-first columns of the fields the indicators consume.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CandleColumns {
    pub highs: Vec<f64>,
    pub lows: Vec<f64>,
    pub closes: Vec<f64>,
    pub volumes: Vec<f64>,
}

impl CandleColumns {
    pub fn from_candles(candles: &[Candle]) -> Self {
        let mut cols = Self {
            highs: Vec::with_capacity(candles.len()),
            lows: Vec::with_capacity(candles.len()),
            closes: Vec::with_capacity(candles.len()),
            volumes: Vec::with_capacity(candles.len()),
        };
        for c in candles {
            cols.highs.push(c.high);
            cols.lows.push(c.low);
            cols.closes.push(c.close);
            cols.volumes.push(c.volume);
        }
        cols
    }

    pub fn len(&self) -> usize {
        self.closes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.closes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn columns_preserve_order() {
        let candles = vec![
            Candle::new(0, 1.0, 2.0, 0.5, 1.5, 10.0, 59_999),
            Candle::new(60_000, 1.5, 3.0, 1.0, 2.5, 20.0, 119_999),
        ];
        let cols = CandleColumns::from_candles(&candles);
        assert_eq!(cols.len(), 2);
        assert_eq!(cols.highs, vec![2.0, 3.0]);
        assert_eq!(cols.lows, vec![0.5, 1.0]);
        assert_eq!(cols.closes, vec![1.5, 2.5]);
        assert_eq!(cols.volumes, vec![10.0, 20.0]);
    }

    #[test]
    fn empty_candles_give_empty_columns() {
        assert!(CandleColumns::from_candles(&[]).is_empty());
    }
}

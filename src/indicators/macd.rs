// =============================================================================
// Moving Average Convergence Divergence (MACD)
// =============================================================================
//
//   MACD line   = EMA(fast) - EMA(slow)
//   Signal line = EMA(signal) of the MACD line
//   Histogram   = MACD line - Signal line
//
// Alignment on the input timeline (standard 12/26/9):
//   MACD line starts at `slow - 1`            (index 25)
//   Signal    starts at `slow - 1 + signal - 1` (index 33)
// =============================================================================

use serde::{Deserialize, Serialize};

use super::ema::calculate_ema;
use super::series::{Aligned, Series};

/// One MACD reading.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MacdPoint {
    pub macd: f64,
    pub signal: f64,
    pub histogram: f64,
}

/// Compute MACD over `closes`.
///
/// Returns one [`MacdPoint`] per input index from the combined warm-up
/// `max(fast, slow) - 1 + signal - 1` through the last close.  Empty when any
/// period is zero, there are fewer than `slow` closes, or the MACD line is too
/// short to seed the signal EMA.
pub fn calculate_macd(
    closes: &[f64],
    fast: usize,
    slow: usize,
    signal: usize,
) -> Aligned<MacdPoint> {
    if fast == 0 || slow == 0 || signal == 0 || closes.len() < slow {
        return Aligned::empty();
    }

    let ema_fast = calculate_ema(closes, fast);
    let ema_slow = calculate_ema(closes, slow);
    if ema_fast.is_empty() || ema_slow.is_empty() {
        return Aligned::empty();
    }

    // The line is defined where both EMAs are.
    let line_start = ema_fast.start.max(ema_slow.start);
    let line: Vec<f64> = ema_fast
        .from_index(line_start)
        .iter()
        .zip(ema_slow.from_index(line_start))
        .map(|(f, s)| f - s)
        .collect();
    let macd_line = Series::new(line_start, line);

    let signal_line = calculate_ema(&macd_line.values, signal).shifted(macd_line.start);
    if signal_line.is_empty() {
        return Aligned::empty();
    }

    let points = macd_line
        .from_index(signal_line.start)
        .iter()
        .zip(&signal_line.values)
        .map(|(&macd, &signal)| MacdPoint {
            macd,
            signal,
            histogram: macd - signal,
        })
        .collect();

    Aligned::new(signal_line.start, points)
}

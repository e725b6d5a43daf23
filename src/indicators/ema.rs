// =============================================================================
// Exponential Moving Average (EMA)
// =============================================================================
//
// EMA gives more weight to recent prices, making it more responsive to new
// information than the Simple Moving Average (SMA).
//
// Formula:
//   multiplier = 2 / (period + 1)
//   EMA_t      = value_t * multiplier + EMA_{t-1} * (1 - multiplier)
//
// The very first EMA value is seeded with the SMA of the first `period` values
// and sits at input index `period - 1`.
// =============================================================================

use super::series::Series;

/// Compute the EMA series for `data` with look-back `period`.
///
/// The result starts at input index `period - 1`; it has
/// `data.len() - period + 1` values.
///
/// # Edge cases
/// - `period == 0` => empty series
/// - `data.len() < period` => empty series
/// - `period == 1` => the input itself (multiplier is 1)
pub fn calculate_ema(data: &[f64], period: usize) -> Series {
    if period == 0 || data.len() < period {
        return Series::empty();
    }

    let multiplier = 2.0 / (period + 1) as f64;

    // Seed: SMA of the first `period` values.
    let sma: f64 = data[..period].iter().sum::<f64>() / period as f64;

    let mut values = Vec::with_capacity(data.len() - period + 1);
    values.push(sma);

    let mut prev_ema = sma;
    for &value in &data[period..] {
        let ema = value * multiplier + prev_ema * (1.0 - multiplier);
        values.push(ema);
        prev_ema = ema;
    }

    Series::new(period - 1, values)
}

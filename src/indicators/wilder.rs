// =============================================================================
// Wilder's Smoothing (running-sum form)
// =============================================================================
//
// The recursion used by the directional-movement family:
//   S_{period-1} = sum of the first `period` values
//   S_t          = S_{t-1} - S_{t-1} / period + value_t
//
// Unlike EMA the seed is a SUM, so the smoothed values live on a scale of
// roughly `period` times the input.  Ratios of two such series (DI) cancel
// the scale; a single smoothed series does not.
// =============================================================================

use super::series::Series;

/// Apply Wilder's running-sum smoothing to `data`.
///
/// The result starts at input index `period - 1`.  Returns an empty series
/// when `period == 0` or `data.len() < period`.
pub fn wilder_smooth(data: &[f64], period: usize) -> Series {
    if period == 0 || data.len() < period {
        return Series::empty();
    }

    let period_f = period as f64;
    let seed: f64 = data[..period].iter().sum();

    let mut values = Vec::with_capacity(data.len() - period + 1);
    values.push(seed);

    let mut prev = seed;
    for &value in &data[period..] {
        let next = prev - prev / period_f + value;
        values.push(next);
        prev = next;
    }

    Series::new(period - 1, values)
}

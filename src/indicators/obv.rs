// =============================================================================
// On-Balance Volume (OBV)
// =============================================================================
//
//   OBV_0 = 0
//   OBV_t = OBV_{t-1} + volume_t   if close_t > close_{t-1}
//         = OBV_{t-1} - volume_t   if close_t < close_{t-1}
//         = OBV_{t-1}              otherwise
//
// Cumulative and unbounded; only its slope and divergence from price carry
// meaning.  No warm-up: one value per input bar.
// =============================================================================

use std::cmp::Ordering;

use super::series::Series;

/// Compute OBV.  Empty when the slices differ in length or are empty.
pub fn calculate_obv(closes: &[f64], volumes: &[f64]) -> Series {
    if closes.is_empty() || closes.len() != volumes.len() {
        return Series::empty();
    }

    let mut values = Vec::with_capacity(closes.len());
    let mut obv = 0.0;
    values.push(obv);

    for i in 1..closes.len() {
        match closes[i].partial_cmp(&closes[i - 1]) {
            Some(Ordering::Greater) => obv += volumes[i],
            Some(Ordering::Less) => obv -= volumes[i],
            _ => {}
        }
        values.push(obv);
    }

    Series::new(0, values)
}

// =============================================================================
// Money Flow Index (MFI)
// =============================================================================
//
// A volume-weighted RSI built on typical price.
//
//   typical  = (high + low + close) / 3
//   raw flow = typical * volume
//
// A bar's raw flow counts as positive when typical price rose versus the
// previous bar, negative when it fell, and in neither bucket when flat.
//
//   ratio = sum(positive, period) / sum(negative, period)
//   MFI   = 100 - 100 / (1 + ratio)
//
// A window with no negative flow saturates at 100.
// =============================================================================

use super::series::Series;

/// Compute MFI with a trailing window of `period` bars.
///
/// The first value belongs to input index `period`, so the series has
/// `len - period` values.  Empty when `period` is zero, the slices differ in
/// length, or there are not more than `period` bars.
pub fn calculate_mfi(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    volumes: &[f64],
    period: usize,
) -> Series {
    let n = highs.len();
    if period == 0 || lows.len() != n || closes.len() != n || volumes.len() != n || n <= period {
        return Series::empty();
    }

    let typical: Vec<f64> = (0..n)
        .map(|i| (highs[i] + lows[i] + closes[i]) / 3.0)
        .collect();

    let mut positive = vec![0.0; n];
    let mut negative = vec![0.0; n];
    for i in 1..n {
        let raw_flow = typical[i] * volumes[i];
        if typical[i] > typical[i - 1] {
            positive[i] = raw_flow;
        } else if typical[i] < typical[i - 1] {
            negative[i] = raw_flow;
        }
    }

    let values = (period..n)
        .map(|i| {
            let window = i + 1 - period..=i;
            let pos: f64 = positive[window.clone()].iter().sum();
            let neg: f64 = negative[window].iter().sum();
            if neg == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + pos / neg)
            }
        })
        .collect();

    Series::new(period, values)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Bars {
        highs: Vec<f64>,
        lows: Vec<f64>,
        closes: Vec<f64>,
        volumes: Vec<f64>,
    }

    /// Bars whose typical price equals `mid`.
    fn bars(mids: &[f64], volume: f64) -> Bars {
        Bars {
            highs: mids.iter().map(|m| m + 1.0).collect(),
            lows: mids.iter().map(|m| m - 1.0).collect(),
            closes: mids.to_vec(),
            volumes: vec![volume; mids.len()],
        }
    }

    fn mfi(b: &Bars, period: usize) -> Series {
        calculate_mfi(&b.highs, &b.lows, &b.closes, &b.volumes, period)
    }

    #[test]
    fn requires_more_than_period_bars() {
        let b = bars(&[1.0; 14], 10.0);
        assert!(mfi(&b, 14).is_empty());
        let b = bars(&[1.0; 15], 10.0);
        assert_eq!(mfi(&b, 14).len(), 1);
    }

    #[test]
    fn zero_period_and_mismatch_are_empty() {
        let b = bars(&[1.0, 2.0, 3.0, 4.0], 10.0);
        assert!(mfi(&b, 0).is_empty());
        assert!(calculate_mfi(&b.highs, &b.lows, &b.closes, &b.volumes[..3], 2).is_empty());
    }

    #[test]
    fn output_is_aligned_at_period() {
        let mids: Vec<f64> = (0..40).map(|i| 50.0 + (i as f64 * 0.5).sin() * 4.0).collect();
        let out = mfi(&bars(&mids, 7.0), 14);
        assert_eq!(out.start, 14);
        assert_eq!(out.len(), 40 - 14);
        assert_eq!(out.end(), 40);
    }

    #[test]
    fn rising_prices_saturate_at_100() {
        let mids: Vec<f64> = (1..=30).map(|i| i as f64).collect();
        let out = mfi(&bars(&mids, 5.0), 14);
        assert!(out.values.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn flat_prices_contribute_to_neither_bucket() {
        // No negative flow at all => saturation, even though nothing rose.
        let out = mfi(&bars(&[20.0; 20], 5.0), 5);
        assert!(out.values.iter().all(|&v| v == 100.0));
    }

    #[test]
    fn falling_prices_read_zero() {
        let mids: Vec<f64> = (1..=30).rev().map(|i| i as f64).collect();
        let out = mfi(&bars(&mids, 5.0), 14);
        for v in &out.values {
            assert!(v.abs() < 1e-12);
        }
    }

    #[test]
    fn hand_computed_window() {
        // typical: 10, 12, 11, 13 ; volume 1
        // flows:   -, +12, -11, +13
        // period 3 at i=3: pos = 12 + 13 = 25, neg = 11 => 100 - 100/(1+25/11)
        let out = mfi(&bars(&[10.0, 12.0, 11.0, 13.0], 1.0), 3);
        assert_eq!(out.len(), 1);
        let expected = 100.0 - 100.0 / (1.0 + 25.0 / 11.0);
        assert!((out.values[0] - expected).abs() < 1e-9);
    }

    #[test]
    fn values_stay_in_range() {
        let mids: Vec<f64> = (0..80).map(|i| 30.0 + (i as f64 * 0.7).cos() * 6.0).collect();
        let out = mfi(&bars(&mids, 12.0), 14);
        for &v in &out.values {
            assert!((0.0..=100.0).contains(&v));
        }
    }
}

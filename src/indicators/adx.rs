// =============================================================================
// Average Directional Index (ADX)
// =============================================================================
//
// ADX quantifies trend **strength** regardless of direction.
//
// Calculation pipeline:
//   1. Compute True Range (TR) per bar; bar 0 has no predecessor and is 0.
//   2. Compute +DM (positive directional movement) and -DM per bar.
//   3. Apply Wilder's running-sum smoothing (period) to TR, +DM and -DM.
//   4. Derive +DI = smoothed(+DM) / smoothed(TR) * 100
//            -DI = smoothed(-DM) / smoothed(TR) * 100
//   5. DX  = |+DI - -DI| / (+DI + -DI) * 100
//   6. ADX = Wilder's smoothing of DX, divided by `period` to return from the
//            running-sum scale to the 0..100 scale.
//
// Timeline:
//   TR / DM           index 0 ..
//   smoothed, DI, DX  index period - 1 ..
//   ADX               index 2 * period - 2 ..
//
// Interpretation:
//   ADX > 25  => trending market
//   ADX < 20  => ranging / choppy market
// =============================================================================

use super::series::Series;
use super::wilder::wilder_smooth;

/// All stages of the directional-movement system, each on the input timeline.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalIndex {
    pub plus_di: Series,
    pub minus_di: Series,
    pub dx: Series,
    pub adx: Series,
}

/// True Range for every bar; index 0 is left at zero.
pub fn true_range(highs: &[f64], lows: &[f64], closes: &[f64]) -> Vec<f64> {
    let n = highs.len().min(lows.len()).min(closes.len());
    let mut tr = vec![0.0; n];
    for i in 1..n {
        let prev_close = closes[i - 1];
        tr[i] = (highs[i] - lows[i])
            .max((highs[i] - prev_close).abs())
            .max((lows[i] - prev_close).abs());
    }
    tr
}

/// +DM and -DM for every bar; index 0 is left at zero in both.
///
/// At most one of the two is non-zero for any bar.
pub fn directional_movement(highs: &[f64], lows: &[f64]) -> (Vec<f64>, Vec<f64>) {
    let n = highs.len().min(lows.len());
    let mut plus_dm = vec![0.0; n];
    let mut minus_dm = vec![0.0; n];

    for i in 1..n {
        let up_move = highs[i] - highs[i - 1];
        let down_move = lows[i - 1] - lows[i];

        if up_move > down_move && up_move > 0.0 {
            plus_dm[i] = up_move;
        }
        if down_move > up_move && down_move > 0.0 {
            minus_dm[i] = down_move;
        }
    }

    (plus_dm, minus_dm)
}

/// Compute +DI, -DI, DX and ADX.
///
/// Returns `None` when:
/// - `period` is zero.
/// - The three input slices differ in length.
/// - There are fewer than `2 * period - 1` bars (`period` bars seed the
///   TR/DM smoothing, another `period - 1` DX values seed the ADX).
pub fn calculate_directional(
    highs: &[f64],
    lows: &[f64],
    closes: &[f64],
    period: usize,
) -> Option<DirectionalIndex> {
    if period == 0 {
        return None;
    }
    let n = highs.len();
    if lows.len() != n || closes.len() != n || n < 2 * period - 1 {
        return None;
    }

    let tr = true_range(highs, lows, closes);
    let (plus_dm, minus_dm) = directional_movement(highs, lows);

    let smooth_tr = wilder_smooth(&tr, period);
    let smooth_plus = wilder_smooth(&plus_dm, period);
    let smooth_minus = wilder_smooth(&minus_dm, period);
    let di_start = smooth_tr.start;

    let (plus_di, minus_di): (Vec<f64>, Vec<f64>) = smooth_tr
        .values
        .iter()
        .zip(&smooth_plus.values)
        .zip(&smooth_minus.values)
        .map(|((&tr, &plus), &minus)| {
            if tr != 0.0 {
                (100.0 * plus / tr, 100.0 * minus / tr)
            } else {
                (0.0, 0.0)
            }
        })
        .unzip();

    let dx: Vec<f64> = plus_di
        .iter()
        .zip(&minus_di)
        .map(|(&plus, &minus)| {
            let di_sum = plus + minus;
            if di_sum != 0.0 {
                100.0 * (plus - minus).abs() / di_sum
            } else {
                0.0
            }
        })
        .collect();

    let adx_sum = wilder_smooth(&dx, period).shifted(di_start);
    if adx_sum.is_empty() {
        return None;
    }
    let period_f = period as f64;
    let adx = Series::new(
        adx_sum.start,
        adx_sum.values.iter().map(|v| v / period_f).collect(),
    );

    Some(DirectionalIndex {
        plus_di: Series::new(di_start, plus_di),
        minus_di: Series::new(di_start, minus_di),
        dx: Series::new(di_start, dx),
        adx,
    })
}

/// ADX series only; empty whenever [`calculate_directional`] yields `None`.
pub fn calculate_adx(highs: &[f64], lows: &[f64], closes: &[f64], period: usize) -> Series {
    calculate_directional(highs, lows, closes, period)
        .map(|d| d.adx)
        .unwrap_or_else(Series::empty)
}

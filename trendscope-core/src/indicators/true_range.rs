//! True range and Wilder smoothing, shared by the Keltner channel and ADX.

use crate::domain::Bar;

/// True range: max(high-low, |high-prev_close|, |low-prev_close|).
///
/// The first bar has no previous close, so TR[0] is NaN.
pub fn true_range(bars: &[Bar]) -> Vec<f64> {
    let mut tr = vec![f64::NAN; bars.len()];

    for (i, w) in bars.windows(2).enumerate() {
        let (prev, bar) = (&w[0], &w[1]);
        let pc = prev.close;
        tr[i + 1] = (bar.high - bar.low)
            .max((bar.high - pc).abs())
            .max((bar.low - pc).abs());
    }

    tr
}

/// Apply Wilder smoothing to a series. Alpha = 1/period.
///
/// Seed: mean of the first `period` consecutive non-NaN values. A NaN after
/// the seed ends the series (every later value stays NaN).
pub fn wilder_smooth(values: &[f64], period: usize) -> Vec<f64> {
    let n = values.len();
    let mut result = vec![f64::NAN; n];

    if n < period || period == 0 {
        return result;
    }

    let seed_start = (0..=n - period).find(|&i| values[i..i + period].iter().all(|v| !v.is_nan()));
    let Some(seed_start) = seed_start else {
        return result;
    };
    let seed_end = seed_start + period;

    let seed = values[seed_start..seed_end].iter().sum::<f64>() / period as f64;
    result[seed_end - 1] = seed;

    let alpha = 1.0 / period as f64;
    let mut prev = seed;
    for i in seed_end..n {
        if values[i].is_nan() {
            return result;
        }
        let smoothed = alpha * values[i] + (1.0 - alpha) * prev;
        result[i] = smoothed;
        prev = smoothed;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_ohlc_bars, DEFAULT_EPSILON};

    #[test]
    fn true_range_basic() {
        let bars = make_ohlc_bars(&[
            (100.0, 105.0, 95.0, 102.0),  // no previous close
            (102.0, 108.0, 100.0, 106.0), // max(8, |108-102|, |100-102|) = 8
            (106.0, 107.0, 98.0, 99.0),   // max(9, |107-106|, |98-106|) = 9
        ]);
        let tr = true_range(&bars);
        assert!(tr[0].is_nan());
        assert_approx(tr[1], 8.0, DEFAULT_EPSILON);
        assert_approx(tr[2], 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_gap_up() {
        let bars = make_ohlc_bars(&[
            (98.0, 102.0, 97.0, 100.0),
            (110.0, 115.0, 108.0, 112.0), // max(7, |115-100|, |108-100|) = 15
        ]);
        assert_approx(true_range(&bars)[1], 15.0, DEFAULT_EPSILON);
    }

    #[test]
    fn true_range_empty() {
        assert!(true_range(&[]).is_empty());
    }

    #[test]
    fn wilder_seed_skips_leading_nan() {
        // Seed = mean(8, 9, 6) at index 3; next = 6/3 + (2/3)*(23/3) = 64/9
        let values = [f64::NAN, 8.0, 9.0, 6.0, 6.0];
        let result = wilder_smooth(&values, 3);
        assert!(result[..3].iter().all(|v| v.is_nan()));
        assert_approx(result[3], 23.0 / 3.0, DEFAULT_EPSILON);
        assert_approx(result[4], 64.0 / 9.0, DEFAULT_EPSILON);
    }

    #[test]
    fn wilder_nan_after_seed_stops() {
        let result = wilder_smooth(&[1.0, 2.0, 3.0, f64::NAN, 5.0], 2);
        assert_approx(result[1], 1.5, DEFAULT_EPSILON);
        assert!(result[3].is_nan());
        assert!(result[4].is_nan());
    }

    #[test]
    fn wilder_too_short() {
        assert!(wilder_smooth(&[1.0, 2.0], 3).iter().all(|v| v.is_nan()));
        assert!(wilder_smooth(&[1.0, 2.0], 0).iter().all(|v| v.is_nan()));
    }
}

//! Directional Movement Index (Wilder): +DI, -DI and ADX.
//!
//! Steps:
//! 1. Compute +DM and -DM from consecutive bars
//! 2. Smooth +DM, -DM, and TR over `di_period` (Wilder, alpha = 1/period)
//! 3. +DI = 100 * smoothed(+DM) / smoothed(TR), -DI likewise
//! 4. DX = 100 * |+DI - -DI| / (+DI + -DI)
//! 5. ADX = DX Wilder-smoothed over `adx_period`
//!
//! First valid DI at index `di_period`, first valid ADX at
//! `di_period + adx_period - 1`.

use super::true_range::{true_range, wilder_smooth};
use crate::domain::Bar;

/// The three DMI output lines, each the same length as the input.
#[derive(Debug, Clone, Default)]
pub struct DirectionalLines {
    pub plus_di: Vec<f64>,
    pub minus_di: Vec<f64>,
    pub adx: Vec<f64>,
}

#[derive(Debug, Clone)]
pub struct Dmi {
    di_period: usize,
    adx_period: usize,
}

impl Dmi {
    pub fn new(di_period: usize, adx_period: usize) -> Self {
        assert!(di_period >= 1, "DI period must be >= 1");
        assert!(adx_period >= 1, "ADX period must be >= 1");
        Self {
            di_period,
            adx_period,
        }
    }

    /// Bars before the first valid ADX value.
    pub fn lookback(&self) -> usize {
        self.di_period + self.adx_period - 1
    }

    pub fn compute(&self, bars: &[Bar]) -> DirectionalLines {
        let n = bars.len();
        let mut plus_dm = vec![f64::NAN; n];
        let mut minus_dm = vec![f64::NAN; n];

        for (i, w) in bars.windows(2).enumerate() {
            let up = w[1].high - w[0].high;
            let down = w[0].low - w[1].low;
            plus_dm[i + 1] = if up > down && up > 0.0 { up } else { 0.0 };
            minus_dm[i + 1] = if down > up && down > 0.0 { down } else { 0.0 };
        }

        let smooth_tr = wilder_smooth(&true_range(bars), self.di_period);
        let smooth_plus = wilder_smooth(&plus_dm, self.di_period);
        let smooth_minus = wilder_smooth(&minus_dm, self.di_period);

        let mut plus_di = vec![f64::NAN; n];
        let mut minus_di = vec![f64::NAN; n];
        let mut dx = vec![f64::NAN; n];
        for i in 0..n {
            let (tr, p, m) = (smooth_tr[i], smooth_plus[i], smooth_minus[i]);
            if tr.is_nan() || p.is_nan() || m.is_nan() || tr == 0.0 {
                continue;
            }

            plus_di[i] = 100.0 * p / tr;
            minus_di[i] = 100.0 * m / tr;
            let di_sum = plus_di[i] + minus_di[i];
            dx[i] = if di_sum == 0.0 {
                0.0
            } else {
                100.0 * (plus_di[i] - minus_di[i]).abs() / di_sum
            };
        }

        DirectionalLines {
            plus_di,
            minus_di,
            adx: wilder_smooth(&dx, self.adx_period),
        }
    }
}

//! Keltner Channel for squeeze detection — SMA +/- mean true range multiplier.
//!
//! Two bands (separate Indicator instances) around SMA(close, period):
//! - Upper: sma + mult * SMA(true range, period)
//! - Lower: sma - mult * SMA(true range, period)
//!
//! True range has no value on the first bar, so the range average (and with
//! it both bands) starts one bar after the close average.
//! Lookback: period.

use super::sma::sma_of_series;
use super::true_range::true_range;
use super::Indicator;
use crate::domain::Bar;

/// Which band of the Keltner Channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeltnerBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Keltner {
    period: usize,
    multiplier: f64,
    band: KeltnerBand,
    name: String,
}

impl Keltner {
    fn with_band(period: usize, multiplier: f64, band: KeltnerBand) -> Self {
        assert!(period >= 1, "Keltner period must be >= 1");
        let label = match band {
            KeltnerBand::Upper => "upper",
            KeltnerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("keltner_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, KeltnerBand::Upper)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, KeltnerBand::Lower)
    }
}

impl Indicator for Keltner {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let closes: Vec<f64> = bars.iter().map(|b| b.close).collect();
        let middle = sma_of_series(&closes, self.period);
        let range_ma = sma_of_series(&true_range(bars), self.period);
        let sign = if self.band == KeltnerBand::Upper { 1.0 } else { -1.0 };

        middle
            .iter()
            .zip(&range_ma)
            .map(|(&m, &r)| m + sign * self.multiplier * r)
            .collect()
    }
}

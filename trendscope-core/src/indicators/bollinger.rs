//! Bollinger Bands — moving average +/- standard deviation multiplier.
//!
//! Two bands (separate Indicator instances) around SMA(close, period):
//! - Upper: sma + mult * stddev(close, period)
//! - Lower: sma - mult * stddev(close, period)
//!
//! Uses population stddev (divide by N).
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Bollinger Bands to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BollingerBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Bollinger {
    period: usize,
    multiplier: f64,
    band: BollingerBand,
    name: String,
}

impl Bollinger {
    fn with_band(period: usize, multiplier: f64, band: BollingerBand) -> Self {
        assert!(period >= 1, "Bollinger period must be >= 1");
        let label = match band {
            BollingerBand::Upper => "upper",
            BollingerBand::Lower => "lower",
        };
        Self {
            period,
            multiplier,
            band,
            name: format!("bollinger_{label}_{period}_{multiplier}"),
        }
    }

    pub fn upper(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Upper)
    }

    pub fn lower(period: usize, multiplier: f64) -> Self {
        Self::with_band(period, multiplier, BollingerBand::Lower)
    }
}

impl Indicator for Bollinger {
    fn name(&self) -> &str {
        &self.name
    }

    fn lookback(&self) -> usize {
        self.period.saturating_sub(1)
    }

    fn compute(&self, bars: &[Bar]) -> Vec<f64> {
        let n = bars.len();
        let mut result = vec![f64::NAN; n];

        if n < self.period {
            return result;
        }

        for i in (self.period - 1)..n {
            let window = &bars[i + 1 - self.period..=i];
            if window.iter().any(|bar| bar.close.is_nan()) {
                continue;
            }

            let mean = window.iter().map(|bar| bar.close).sum::<f64>() / self.period as f64;

            let variance = window
                .iter()
                .map(|bar| {
                    let diff = bar.close - mean;
                    diff * diff
                })
                .sum::<f64>()
                / self.period as f64;
            let width = self.multiplier * variance.sqrt();

            result[i] = match self.band {
                BollingerBand::Upper => mean + width,
                BollingerBand::Lower => mean - width,
            };
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::indicators::{assert_approx, make_bars, sma_of_series, DEFAULT_EPSILON};

    #[test]
    fn bollinger_warmup_is_nan() {
        let bars = make_bars(&[10.0, 11.0, 12.0, 13.0, 14.0]);
        let result = Bollinger::lower(3, 2.0).compute(&bars);

        assert!(result[0].is_nan());
        assert!(result[1].is_nan());
        assert!(!result[2].is_nan());
    }

    #[test]
    fn bollinger_population_stddev() {
        // Window [10, 11, 12]: variance = 2/3, width = 2 * sqrt(2/3)
        let bars = make_bars(&[10.0, 11.0, 12.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        assert_approx(upper[2], 11.0 + 2.0 * (2.0f64 / 3.0).sqrt(), DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_bands_straddle_the_sma() {
        let closes = [10.0, 11.0, 12.0, 13.0, 14.0];
        let bars = make_bars(&closes);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let middle = sma_of_series(&closes, 3);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);

        for i in 2..5 {
            assert_approx(middle[i] - lower[i], upper[i] - middle[i], DEFAULT_EPSILON);
        }
    }

    #[test]
    fn bollinger_constant_price_zero_width() {
        let bars = make_bars(&[100.0, 100.0, 100.0, 100.0]);
        let upper = Bollinger::upper(3, 2.0).compute(&bars);
        let lower = Bollinger::lower(3, 2.0).compute(&bars);
        assert_approx(upper[2], 100.0, DEFAULT_EPSILON);
        assert_approx(lower[2], 100.0, DEFAULT_EPSILON);
    }

    #[test]
    fn bollinger_names_and_lookback() {
        assert_eq!(Bollinger::upper(20, 2.0).lookback(), 19);
        assert_eq!(Bollinger::lower(20, 2.0).name(), "bollinger_lower_20_2");
    }
}

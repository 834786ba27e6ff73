//! Donchian Channel — highest high / lowest low over a lookback window.
//!
//! Produces two series (exposed as separate Indicator instances):
//! - Upper: max(high[t-period+1..=t])
//! - Lower: min(low[t-period+1..=t])
//!
//! The squeeze momentum source uses the channel midpoint.
//! Lookback: period - 1.

use super::Indicator;
use crate::domain::Bar;

/// Which band of the Donchian channel to compute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DonchianBand {
    Upper,
    Lower,
}

#[derive(Debug, Clone)]
pub struct Donchian {
    period: usize,
    band: DonchianBand,
    name: String,
}

impl Donchian {
    pub fn upper(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Upper,
            name: format!("donchian_upper_{period}"),
        }
    }

    pub fn lower(period: usize) -> Self {
        assert!(period >= 1, "Donchian period must be >= 1");
        Self {
            period,
            band: DonchianBand::Lower,
            name: format!("donchian_lower_{period}"),
        }
    }
}

impl Indicator for Donchian {
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
            let extreme = match self.band {
                DonchianBand::Upper => window
                    .iter()
                    .map(|b| b.high)
                    .try_fold(f64::NEG_INFINITY, |acc, v| (!v.is_nan()).then(|| acc.max(v))),
                DonchianBand::Lower => window
                    .iter()
                    .map(|b| b.low)
                    .try_fold(f64::INFINITY, |acc, v| (!v.is_nan()).then(|| acc.min(v))),
            };
            result[i] = extreme.unwrap_or(f64::NAN);
        }

        result
    }
}

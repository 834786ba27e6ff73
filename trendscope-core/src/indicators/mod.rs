//! Indicator math.
//!
//! Every indicator is a pure function of bar history: bars in, a numeric
//! series of the same length out, with `f64::NAN` during warmup. Single-series
//! indicators implement [`Indicator`]; multi-series ones (Bollinger, Keltner,
//! Donchian) are exposed as one instance per band. Derived series (volume
//! averages, the squeeze momentum source) go through the `*_of_series`
//! helpers, which take a pre-extracted slice.

pub mod adx;
pub mod bollinger;
pub mod donchian;
pub mod ema;
pub mod keltner;
pub mod linreg;
pub mod rsi;
pub mod sma;
pub mod true_range;

pub use adx::{DirectionalLines, Dmi};
pub use bollinger::{Bollinger, BollingerBand};
pub use donchian::{Donchian, DonchianBand};
pub use ema::{ema_of_series, Ema};
pub use keltner::{Keltner, KeltnerBand};
pub use linreg::linreg_of_series;
pub use rsi::{rsi_of_series, Rsi};
pub use sma::{sma_of_series, Sma};
pub use true_range::{true_range, wilder_smooth};

use crate::domain::Bar;

/// Trait for bar-driven indicators.
///
/// No value at bar t may depend on bars after t: truncating the input must
/// leave every earlier output unchanged.
pub trait Indicator: Send + Sync {
    /// Human-readable name (e.g., "ema_55", "rsi_14").
    fn name(&self) -> &str;

    /// Number of leading bars that are always `f64::NAN`.
    fn lookback(&self) -> usize;

    /// Compute the indicator for the entire bar series.
    ///
    /// Returns a `Vec<f64>` of the same length as `bars`.
    fn compute(&self, bars: &[Bar]) -> Vec<f64>;
}

/// Most recent non-NaN value of an indicator series.
pub fn last_valid(values: &[f64]) -> Option<f64> {
    values.iter().rev().copied().find(|v| !v.is_nan())
}

/// The two most recent non-NaN values, newest first.
pub fn last_two_valid(values: &[f64]) -> (Option<f64>, Option<f64>) {
    let mut valid = values.iter().rev().copied().filter(|v| !v.is_nan());
    let current = valid.next();
    let previous = valid.next();
    (current, previous)
}

/// Create synthetic bars from close prices for testing.
///
/// Generates plausible OHLV: open = prev_close (or close for first bar),
/// high = max(open,close) + 1.0, low = min(open,close) - 1.0, volume = 1000.
#[cfg(test)]
pub fn make_bars(closes: &[f64]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| {
            let open = if i == 0 { close } else { closes[i - 1] };
            Bar {
                timestamp: base + chrono::Duration::hours(i as i64),
                open,
                high: open.max(close) + 1.0,
                low: open.min(close) - 1.0,
                close,
                volume: 1000.0,
            }
        })
        .collect()
}

/// Create bars from explicit (open, high, low, close) tuples for testing.
#[cfg(test)]
pub fn make_ohlc_bars(data: &[(f64, f64, f64, f64)]) -> Vec<Bar> {
    use chrono::TimeZone;
    let base = chrono::Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
    data.iter()
        .enumerate()
        .map(|(i, &(open, high, low, close))| Bar {
            timestamp: base + chrono::Duration::hours(i as i64),
            open,
            high,
            low,
            close,
            volume: 1000.0,
        })
        .collect()
}

/// Assert two f64 values are approximately equal (within epsilon).
#[cfg(test)]
pub fn assert_approx(actual: f64, expected: f64, epsilon: f64) {
    assert!(
        (actual - expected).abs() < epsilon,
        "assert_approx failed: actual={actual}, expected={expected}, diff={}, epsilon={epsilon}",
        (actual - expected).abs()
    );
}

/// Default epsilon for indicator tests.
#[cfg(test)]
pub const DEFAULT_EPSILON: f64 = 1e-10;

//! Synthetic market data for demos and tests.
//!
//! Produces a seeded random walk per (seed, symbol, timeframe). These bars are
//! clearly fake; reports built on them carry the source name `synthetic`.

use super::provider::{DataError, MarketDataSource};
use crate::domain::{Bar, Timeframe};
use chrono::{DateTime, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Bars generated when the live price is requested.
const LIVE_PRICE_BARS: usize = 200;

#[derive(Debug, Clone)]
pub struct SyntheticSource {
    seed: u64,
    anchor: DateTime<Utc>,
}

impl SyntheticSource {
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            anchor: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).single().unwrap_or_default(),
        }
    }

    fn rng_for(&self, symbol: &str, timeframe: Timeframe) -> StdRng {
        let mut hasher = blake3::Hasher::new();
        hasher.update(&self.seed.to_le_bytes());
        hasher.update(symbol.as_bytes());
        hasher.update(timeframe.code().as_bytes());
        StdRng::from_seed(*hasher.finalize().as_bytes())
    }

    /// Generate `count` bars ending at `anchor + count * bar_duration`.
    pub fn generate(&self, symbol: &str, timeframe: Timeframe, count: usize) -> Vec<Bar> {
        let mut rng = self.rng_for(symbol, timeframe);
        let step = timeframe.bar_duration();

        let mut price: f64 = rng.gen_range(5.0..500.0);
        let drift: f64 = rng.gen_range(-0.002..0.002);

        (0..count)
            .map(|i| {
                let ret: f64 = drift + rng.gen_range(-0.02..0.02);
                let open = price;
                let close = price * (1.0 + ret);
                let high = open.max(close) * (1.0 + rng.gen_range(0.0..0.01));
                let low = open.min(close) * (1.0 - rng.gen_range(0.0..0.01));
                let volume = rng.gen_range(500.0..5_000.0);
                price = close;
                Bar {
                    timestamp: self.anchor + step * i as i32,
                    open,
                    high,
                    low,
                    close,
                    volume,
                }
            })
            .collect()
    }
}

impl MarketDataSource for SyntheticSource {
    fn name(&self) -> &str {
        "synthetic"
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let count = timeframe.adjusted_limit(limit);
        if count == 0 {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
            });
        }
        Ok(self.generate(symbol, timeframe, count))
    }

    /// Last close of the hourly walk.
    fn last_price(&self, symbol: &str) -> Result<f64, DataError> {
        self.generate(symbol, Timeframe::OneHour, LIVE_PRICE_BARS)
            .last()
            .map(|b| b.close)
            .ok_or(DataError::Empty {
                symbol: symbol.to_string(),
            })
    }
}

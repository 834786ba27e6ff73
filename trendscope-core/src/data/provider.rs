//! Market data source trait and structured error types.
//!
//! The core never talks to an exchange itself. Anything that can hand over
//! bars for a symbol/timeframe and a last-traded price implements
//! `MarketDataSource`; the CLI ships a CSV reader and a synthetic generator.

use crate::domain::{Bar, Timeframe};
use thiserror::Error;

/// Structured error types for data operations.
#[derive(Debug, Error)]
pub enum DataError {
    #[error("i/o error reading {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("csv error in {path}: {source}")]
    Csv {
        path: String,
        #[source]
        source: csv::Error,
    },

    #[error("invalid timestamp {value} in {path}")]
    InvalidTimestamp { path: String, value: i64 },

    #[error("symbol not found: {symbol} ({timeframe})")]
    SymbolNotFound { symbol: String, timeframe: String },

    #[error("no bars available for {symbol}")]
    Empty { symbol: String },
}

/// Trait for market data sources (CSV exports, synthetic data, exchange adapters).
pub trait MarketDataSource: Send + Sync {
    /// Human-readable name of this source.
    fn name(&self) -> &str;

    /// Fetch up to `limit` of the most recent bars, oldest first.
    ///
    /// Implementations apply `Timeframe::adjusted_limit` themselves. Bars are
    /// returned raw; callers sanitize them.
    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError>;

    /// Most recent traded price for `symbol`.
    fn last_price(&self, symbol: &str) -> Result<f64, DataError>;
}

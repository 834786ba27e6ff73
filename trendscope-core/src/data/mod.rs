//! Data layer: source trait, CSV and synthetic sources, series sanitizing.

pub mod csv_source;
pub mod provider;
pub mod sanitize;
pub mod synthetic;

pub use csv_source::CsvSource;
pub use provider::{DataError, MarketDataSource};
pub use sanitize::{SanitizeReport, SeriesSanitizer};
pub use synthetic::SyntheticSource;

/// Default watchlist: the twenty most liquid USDT spot pairs.
pub const DEFAULT_WATCHLIST: [&str; 20] = [
    "BTC/USDT",
    "ETH/USDT",
    "BNB/USDT",
    "ADA/USDT",
    "XRP/USDT",
    "SOL/USDT",
    "DOT/USDT",
    "DOGE/USDT",
    "AVAX/USDT",
    "MATIC/USDT",
    "LTC/USDT",
    "LINK/USDT",
    "GALA/USDT",
    "ATOM/USDT",
    "UNI/USDT",
    "XLM/USDT",
    "ALGO/USDT",
    "VET/USDT",
    "FIL/USDT",
    "ETC/USDT",
];

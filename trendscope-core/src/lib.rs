//! TrendScope Core — technical analysis and rule-based trade signals.
//!
//! Turns a window of OHLCV bars for one instrument into:
//! - Indicator states (RSI, EMA/SMA stack, volume, trend, squeeze momentum, ADX/DI)
//! - An immutable analysis snapshot with a data-quality grade
//! - A five-criterion buy/sell score and recommendation
//! - A tiered LONG plan, a SHORT plan, or a reason to wait
//! - A hold/exit review for an already-open position
//!
//! Everything is synchronous and deterministic: the same bars always produce
//! the same report. Data comes in through the `MarketDataSource` trait.

pub mod analysis;
pub mod config;
pub mod data;
pub mod domain;
pub mod engine;
pub mod error;
pub mod fingerprint;
pub mod indicators;
pub mod pipeline;
pub mod signals;

pub use analysis::{AnalysisAssembler, AnalysisSnapshot};
pub use config::TrendScopeConfig;
pub use error::AnalysisError;
pub use pipeline::{analyze_symbol, review_position, AnalysisReport, PositionReport};

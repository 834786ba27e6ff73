//! Domain types: bars, sanitized series and timeframes.

pub mod bar;
pub mod series;
pub mod timeframe;

pub use bar::Bar;
pub use series::Series;
pub use timeframe::{HoldingGuidance, ParseTimeframeError, Timeframe, TradeStyle};

//! Bar timeframes in exchange notation, plus the holding guidance attached to
//! trade plans produced on each timeframe.

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Bar limit applied to long timeframes, which exchanges serve sparsely.
pub const LONG_TIMEFRAME_BAR_CAP: usize = 100;

const MINUTES_PER_HOUR: u32 = 60;
const MINUTES_PER_DAY: u32 = 24 * MINUTES_PER_HOUR;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Timeframe {
    #[serde(rename = "15m")]
    FifteenMinutes,
    #[serde(rename = "1h")]
    OneHour,
    #[serde(rename = "4h")]
    FourHours,
    #[serde(rename = "1d")]
    OneDay,
    #[serde(rename = "3d")]
    ThreeDays,
    #[serde(rename = "1w")]
    OneWeek,
    #[serde(rename = "1M")]
    OneMonth,
}

impl Timeframe {
    pub const ALL: [Timeframe; 7] = [
        Timeframe::FifteenMinutes,
        Timeframe::OneHour,
        Timeframe::FourHours,
        Timeframe::OneDay,
        Timeframe::ThreeDays,
        Timeframe::OneWeek,
        Timeframe::OneMonth,
    ];

    /// Exchange code (`15m`, `1h`, ..., `1M`).
    pub fn code(self) -> &'static str {
        match self {
            Timeframe::FifteenMinutes => "15m",
            Timeframe::OneHour => "1h",
            Timeframe::FourHours => "4h",
            Timeframe::OneDay => "1d",
            Timeframe::ThreeDays => "3d",
            Timeframe::OneWeek => "1w",
            Timeframe::OneMonth => "1M",
        }
    }

    /// Nominal bar spacing. A month is treated as 30 days.
    pub fn bar_duration(self) -> Duration {
        match self {
            Timeframe::FifteenMinutes => Duration::minutes(15),
            Timeframe::OneHour => Duration::hours(1),
            Timeframe::FourHours => Duration::hours(4),
            Timeframe::OneDay => Duration::days(1),
            Timeframe::ThreeDays => Duration::days(3),
            Timeframe::OneWeek => Duration::weeks(1),
            Timeframe::OneMonth => Duration::days(30),
        }
    }

    fn is_long(self) -> bool {
        matches!(
            self,
            Timeframe::ThreeDays | Timeframe::OneWeek | Timeframe::OneMonth
        )
    }

    /// Number of bars to request from a source for `requested` bars.
    pub fn adjusted_limit(self, requested: usize) -> usize {
        if self.is_long() {
            requested.min(LONG_TIMEFRAME_BAR_CAP)
        } else {
            requested
        }
    }

    /// How long a position opened on this timeframe is expected to run.
    pub fn holding_guidance(self) -> HoldingGuidance {
        let (style, min, max, review) = match self {
            Timeframe::FifteenMinutes => (TradeStyle::Scalp, 15, 90, 2 * MINUTES_PER_HOUR),
            Timeframe::OneHour => (
                TradeStyle::Intraday,
                2 * MINUTES_PER_HOUR,
                8 * MINUTES_PER_HOUR,
                12 * MINUTES_PER_HOUR,
            ),
            Timeframe::OneDay => (
                TradeStyle::MediumSwing,
                3 * MINUTES_PER_DAY,
                15 * MINUTES_PER_DAY,
                7 * MINUTES_PER_DAY,
            ),
            Timeframe::OneWeek => (
                TradeStyle::MediumTerm,
                14 * MINUTES_PER_DAY,
                56 * MINUTES_PER_DAY,
                30 * MINUTES_PER_DAY,
            ),
            Timeframe::OneMonth => (
                TradeStyle::LongTerm,
                30 * MINUTES_PER_DAY,
                180 * MINUTES_PER_DAY,
                90 * MINUTES_PER_DAY,
            ),
            // 3d has no guidance of its own and shares the 4h swing profile.
            Timeframe::FourHours | Timeframe::ThreeDays => (
                TradeStyle::ShortSwing,
                MINUTES_PER_DAY,
                5 * MINUTES_PER_DAY,
                3 * MINUTES_PER_DAY,
            ),
        };
        HoldingGuidance {
            style,
            min_hold_minutes: min,
            max_hold_minutes: max,
            review_after_minutes: review,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Error for unknown timeframe codes.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown timeframe '{0}' (expected one of 15m, 1h, 4h, 1d, 3d, 1w, 1M)")]
pub struct ParseTimeframeError(pub String);

impl FromStr for Timeframe {
    type Err = ParseTimeframeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Timeframe::ALL
            .into_iter()
            .find(|tf| tf.code() == s.trim())
            .ok_or_else(|| ParseTimeframeError(s.to_string()))
    }
}

/// Trading style implied by the timeframe a plan was computed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TradeStyle {
    Scalp,
    Intraday,
    ShortSwing,
    MediumSwing,
    MediumTerm,
    LongTerm,
}

/// Expected holding window and review cadence, in minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HoldingGuidance {
    pub style: TradeStyle,
    pub min_hold_minutes: u32,
    pub max_hold_minutes: u32,
    /// Re-evaluate (or abandon a stalled trade) after this long.
    pub review_after_minutes: u32,
}

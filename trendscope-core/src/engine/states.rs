//! Indicator state records produced by `IndicatorEngine`.
//!
//! Every status field is a closed enum serialized in SCREAMING_SNAKE_CASE.
//! Each state has a neutral default used below its sufficiency gate.

use serde::{Deserialize, Serialize};

// ── Moving averages ──────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CrossStatus {
    BullishCross,
    BearishCross,
    NeutralCross,
    Indeterminate,
    Error,
}

impl CrossStatus {
    pub fn is_bullish(self) -> bool {
        self == CrossStatus::BullishCross
    }

    pub fn is_bearish(self) -> bool {
        self == CrossStatus::BearishCross
    }
}

/// Direction shared by the moving-average stack and the DMI lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Direction {
    Bullish,
    Bearish,
    Neutral,
}

impl Direction {
    /// Strict comparison: ties are neutral.
    pub fn compare(up: f64, down: f64) -> Self {
        if up > down {
            Direction::Bullish
        } else if up < down {
            Direction::Bearish
        } else {
            Direction::Neutral
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MovingAverageState {
    pub ema_fast: f64,
    pub ema_slow: f64,
    pub sma: f64,
    pub cross_status: CrossStatus,
    pub trend_direction: Direction,
    /// price - ema_slow
    pub price_vs_slow_abs: f64,
    /// (price - ema_slow) / ema_slow * 100
    pub price_vs_slow_pct: f64,
}

impl MovingAverageState {
    fn flat(price: f64, cross_status: CrossStatus) -> Self {
        Self {
            ema_fast: price,
            ema_slow: price,
            sma: price,
            cross_status,
            trend_direction: Direction::Neutral,
            price_vs_slow_abs: 0.0,
            price_vs_slow_pct: 0.0,
        }
    }

    /// Not enough bars: every average reads as the current price.
    pub fn indeterminate(price: f64) -> Self {
        Self::flat(price, CrossStatus::Indeterminate)
    }

    /// Computation failed: same shape as `indeterminate`, flagged ERROR.
    pub fn error(price: f64) -> Self {
        Self::flat(price, CrossStatus::Error)
    }
}

// ── Volume ───────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum VolumeTrend {
    VeryHigh,
    High,
    Normal,
    Low,
    Neutral,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VolumeState {
    pub trend: VolumeTrend,
    /// Latest volume over its moving average.
    pub ratio: f64,
}

impl VolumeState {
    pub fn neutral() -> Self {
        Self {
            trend: VolumeTrend::Neutral,
            ratio: 1.0,
        }
    }
}

// ── Trend classification ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendLabel {
    StrongBullish,
    StrongBearish,
    Bullish,
    Bearish,
    Lateral,
    Indeterminate,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TrendStrength {
    High,
    Medium,
    Low,
    InsufficientData,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrendState {
    pub label: TrendLabel,
    /// Change over the whole window, first close to last, in percent.
    pub pct_change: f64,
    /// Change over the medium window, in percent (0 when the window is short).
    pub medium_pct_change: f64,
    pub strength: TrendStrength,
}

impl TrendState {
    pub fn indeterminate() -> Self {
        Self {
            label: TrendLabel::Indeterminate,
            pct_change: 0.0,
            medium_pct_change: 0.0,
            strength: TrendStrength::InsufficientData,
        }
    }

    pub fn error() -> Self {
        Self {
            label: TrendLabel::Error,
            pct_change: 0.0,
            medium_pct_change: 0.0,
            strength: TrendStrength::Error,
        }
    }
}

// ── Squeeze momentum ─────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SqueezeStatus {
    SqueezeOn,
    SqueezeOff,
    NoSqueeze,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumTrend {
    BullishStrong,
    BullishWeak,
    BearishStrong,
    BearishWeak,
    Neutral,
}

impl MomentumTrend {
    pub fn is_bullish(self) -> bool {
        matches!(self, MomentumTrend::BullishStrong | MomentumTrend::BullishWeak)
    }

    pub fn is_bearish(self) -> bool {
        matches!(self, MomentumTrend::BearishStrong | MomentumTrend::BearishWeak)
    }

    /// Classify the latest oscillator reading against the one before it.
    ///
    /// Zero counts as the bearish side. With no previous reading the value is
    /// compared with itself, which lands on the weak branch of its sign.
    pub fn classify(current: f64, previous: Option<f64>) -> Self {
        let previous = previous.unwrap_or(current);
        if current > 0.0 {
            if current > previous {
                MomentumTrend::BullishStrong
            } else {
                MomentumTrend::BullishWeak
            }
        } else if current < previous {
            MomentumTrend::BearishStrong
        } else {
            MomentumTrend::BearishWeak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SqueezeState {
    /// Latest momentum oscillator reading.
    pub value: f64,
    pub status: SqueezeStatus,
    pub momentum_trend: MomentumTrend,
}

impl SqueezeState {
    pub fn neutral() -> Self {
        Self {
            value: 0.0,
            status: SqueezeStatus::NoSqueeze,
            momentum_trend: MomentumTrend::Neutral,
        }
    }

    pub fn error() -> Self {
        Self {
            status: SqueezeStatus::Error,
            ..Self::neutral()
        }
    }
}

// ── ADX / DI ─────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AdxStrength {
    VeryStrong,
    Strong,
    Moderate,
    Weak,
}

impl AdxStrength {
    pub fn from_adx(adx: f64) -> Self {
        if adx > 50.0 {
            AdxStrength::VeryStrong
        } else if adx > 25.0 {
            AdxStrength::Strong
        } else if adx > 20.0 {
            AdxStrength::Moderate
        } else {
            AdxStrength::Weak
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdxState {
    pub adx: f64,
    pub plus_di: f64,
    pub minus_di: f64,
    pub strength: AdxStrength,
    pub above_key_level: bool,
    pub direction: Direction,
}

impl AdxState {
    pub fn neutral() -> Self {
        Self {
            adx: 0.0,
            plus_di: 0.0,
            minus_di: 0.0,
            strength: AdxStrength::Weak,
            above_key_level: false,
            direction: Direction::Neutral,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn momentum_classification() {
        assert_eq!(MomentumTrend::classify(2.0, Some(1.0)), MomentumTrend::BullishStrong);
        assert_eq!(MomentumTrend::classify(2.0, Some(3.0)), MomentumTrend::BullishWeak);
        assert_eq!(MomentumTrend::classify(-2.0, Some(-1.0)), MomentumTrend::BearishStrong);
        assert_eq!(MomentumTrend::classify(-2.0, Some(-3.0)), MomentumTrend::BearishWeak);
    }

    #[test]
    fn single_momentum_point_is_weak() {
        assert_eq!(MomentumTrend::classify(1.5, None), MomentumTrend::BullishWeak);
        assert_eq!(MomentumTrend::classify(-1.5, None), MomentumTrend::BearishWeak);
    }

    #[test]
    fn zero_momentum_is_bearish_side() {
        assert_eq!(MomentumTrend::classify(0.0, Some(1.0)), MomentumTrend::BearishStrong);
        assert_eq!(MomentumTrend::classify(0.0, Some(-1.0)), MomentumTrend::BearishWeak);
    }

    #[test]
    fn adx_strength_bands() {
        assert_eq!(AdxStrength::from_adx(50.1), AdxStrength::VeryStrong);
        assert_eq!(AdxStrength::from_adx(50.0), AdxStrength::Strong);
        assert_eq!(AdxStrength::from_adx(25.0), AdxStrength::Moderate);
        assert_eq!(AdxStrength::from_adx(20.0), AdxStrength::Weak);
        assert_eq!(AdxStrength::from_adx(0.0), AdxStrength::Weak);
    }

    #[test]
    fn direction_ties_are_neutral() {
        assert_eq!(Direction::compare(1.0, 1.0), Direction::Neutral);
        assert_eq!(Direction::compare(2.0, 1.0), Direction::Bullish);
        assert_eq!(Direction::compare(1.0, 2.0), Direction::Bearish);
    }

    #[test]
    fn statuses_serialize_screaming_snake() {
        assert_eq!(
            serde_json::to_string(&CrossStatus::BullishCross).unwrap(),
            "\"BULLISH_CROSS\""
        );
        assert_eq!(
            serde_json::to_string(&MomentumTrend::BearishWeak).unwrap(),
            "\"BEARISH_WEAK\""
        );
        assert_eq!(
            serde_json::to_string(&TrendStrength::InsufficientData).unwrap(),
            "\"INSUFFICIENT_DATA\""
        );
    }

    #[test]
    fn neutral_defaults() {
        let ma = MovingAverageState::indeterminate(42.0);
        assert_eq!(ma.ema_slow, 42.0);
        assert_eq!(ma.cross_status, CrossStatus::Indeterminate);
        assert_eq!(MovingAverageState::error(42.0).cross_status, CrossStatus::Error);
        assert_eq!(VolumeState::neutral().ratio, 1.0);
        assert_eq!(SqueezeState::error().momentum_trend, MomentumTrend::Neutral);
        assert_eq!(SqueezeState::error().status, SqueezeStatus::Error);
        assert!(!AdxState::neutral().above_key_level);
    }
}

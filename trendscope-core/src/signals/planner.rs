//! Entry, stop and target levels for a trade idea.
//!
//! LONG plans are tiered by momentum and by where price sits relative to the
//! fast and slow EMAs. SHORT plans are flat percentages off the current price.
//! Anything else is a `Wait` with the first missing condition.

use super::scorer::RSI_BUY_CEILING;
use crate::analysis::AnalysisSnapshot;
use serde::{Deserialize, Serialize};

const STRONG_ADX: f64 = 23.0;
const MODERATE_ADX: f64 = 18.0;
const MODERATE_RSI_CEILING: f64 = 70.0;
const SHORT_RSI_FLOOR: f64 = 70.0;

const STOP_BELOW_SLOW_EMA: f64 = 0.98;
const TARGET1_FACTOR: f64 = 1.02;
const TARGET2_FACTOR: f64 = 1.04;
const SHORT_STOP_FACTOR: f64 = 1.02;
const SHORT_TARGET_FACTOR: f64 = 0.96;

/// Slack when comparing a reward/risk ratio to a class boundary.
const RATIO_TOLERANCE: f64 = 1e-9;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MomentumTier {
    Strong,
    Moderate,
    Weak,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryTier {
    Aggressive,
    Medium,
    Conservative,
}

/// Which branch of the entry ladder chose the entry price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryRationale {
    /// Strong momentum, price within 2% of the slow EMA.
    ImmediateIdealPrice,
    /// Strong momentum, price within 1% of the fast EMA.
    NowGoodLevel,
    /// Strong momentum outweighs an extended price.
    MomentumOutweighsPrice,
    /// Moderate momentum, price within 1% of the slow EMA.
    IdealPrice,
    /// Moderate momentum, price at or below the fast EMA.
    AcceptableLevel,
    /// Moderate momentum, price too high: wait for a pullback.
    AwaitPullback,
    /// Weak momentum, price right at the slow EMA.
    CautiousIdealPrice,
    /// Weak momentum: wait for a better price.
    AwaitBetterPrice,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RiskRewardClass {
    /// Reward at least twice the risk.
    Double,
    Better,
    Even,
    Worse,
}

impl RiskRewardClass {
    /// Ratio and class for a reward against a risk; non-positive risk is WORSE
    /// with no ratio.
    pub fn assess(reward: f64, risk: f64) -> (Option<f64>, Self) {
        if risk.is_nan() || risk <= 0.0 {
            return (None, RiskRewardClass::Worse);
        }
        let ratio = reward / risk;
        let class = if ratio + RATIO_TOLERANCE >= 2.0 {
            RiskRewardClass::Double
        } else if ratio + RATIO_TOLERANCE >= 1.5 {
            RiskRewardClass::Better
        } else if ratio + RATIO_TOLERANCE >= 1.0 {
            RiskRewardClass::Even
        } else {
            RiskRewardClass::Worse
        };
        (Some(ratio), class)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradePlan {
    pub momentum_tier: MomentumTier,
    pub entry_tier: EntryTier,
    pub entry_rationale: EntryRationale,
    pub entry_price: f64,
    pub stop_price: f64,
    pub target1: f64,
    pub target2: f64,
    pub risk_reward_ratio: Option<f64>,
    pub risk_reward_class: RiskRewardClass,
    /// Distance from the current price to the entry, percent of price.
    pub entry_gap_pct: f64,
    /// Current price is within 1% above the entry.
    pub current_price_is_entry: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShortPlan {
    pub entry_price: f64,
    pub stop_price: f64,
    pub target: f64,
    pub risk_reward_ratio: Option<f64>,
    pub risk_reward_class: RiskRewardClass,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum WaitReason {
    MissingBullishCross,
    MissingBullishMomentum,
    RsiTooHigh,
    ConditionsNotOptimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "verdict", content = "detail", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PlanVerdict {
    Long(TradePlan),
    Short(ShortPlan),
    Wait(WaitReason),
}

impl PlanVerdict {
    pub fn is_trade(&self) -> bool {
        !matches!(self, PlanVerdict::Wait(_))
    }
}

pub struct TradePlanner;

impl TradePlanner {
    pub fn momentum_tier(snapshot: &AnalysisSnapshot) -> MomentumTier {
        let bullish = snapshot.squeeze.momentum_trend.is_bullish();
        let adx = snapshot.adx.adx;
        if bullish && adx > STRONG_ADX && snapshot.rsi < RSI_BUY_CEILING {
            MomentumTier::Strong
        } else if bullish && adx > MODERATE_ADX && snapshot.rsi < MODERATE_RSI_CEILING {
            MomentumTier::Moderate
        } else {
            MomentumTier::Weak
        }
    }

    pub fn plan(snapshot: &AnalysisSnapshot) -> PlanVerdict {
        let cross = snapshot.moving_averages.cross_status;
        let momentum = snapshot.squeeze.momentum_trend;

        if cross.is_bullish() && momentum.is_bullish() {
            return PlanVerdict::Long(Self::long_plan(snapshot));
        }
        if cross.is_bearish() && momentum.is_bearish() && snapshot.rsi > SHORT_RSI_FLOOR {
            return PlanVerdict::Short(Self::short_plan(snapshot.current_price));
        }

        let reason = if !cross.is_bullish() {
            WaitReason::MissingBullishCross
        } else if !momentum.is_bullish() {
            WaitReason::MissingBullishMomentum
        } else if snapshot.rsi > RSI_BUY_CEILING {
            WaitReason::RsiTooHigh
        } else {
            WaitReason::ConditionsNotOptimal
        };
        PlanVerdict::Wait(reason)
    }

    fn long_plan(snapshot: &AnalysisSnapshot) -> TradePlan {
        let price = snapshot.current_price;
        let ema_fast = snapshot.moving_averages.ema_fast;
        let ema_slow = snapshot.moving_averages.ema_slow;

        let aggressive = price;
        let medium = price.min(ema_fast * 0.998);
        let conservative = ema_slow * 0.995;

        let momentum_tier = Self::momentum_tier(snapshot);
        let (entry_tier, entry_rationale, entry_price) = match momentum_tier {
            MomentumTier::Strong if price <= ema_slow * 1.02 => {
                (EntryTier::Aggressive, EntryRationale::ImmediateIdealPrice, aggressive)
            }
            MomentumTier::Strong if price <= ema_fast * 1.01 => {
                (EntryTier::Aggressive, EntryRationale::NowGoodLevel, aggressive)
            }
            MomentumTier::Strong => (EntryTier::Medium, EntryRationale::MomentumOutweighsPrice, medium),
            MomentumTier::Moderate if price <= ema_slow * 1.01 => {
                (EntryTier::Aggressive, EntryRationale::IdealPrice, aggressive)
            }
            MomentumTier::Moderate if price <= ema_fast => {
                (EntryTier::Aggressive, EntryRationale::AcceptableLevel, aggressive)
            }
            MomentumTier::Moderate => {
                (EntryTier::Conservative, EntryRationale::AwaitPullback, conservative)
            }
            MomentumTier::Weak if price <= ema_slow * 1.005 => {
                (EntryTier::Aggressive, EntryRationale::CautiousIdealPrice, aggressive)
            }
            MomentumTier::Weak => {
                (EntryTier::Conservative, EntryRationale::AwaitBetterPrice, conservative)
            }
        };

        let stop_price = ema_slow * STOP_BELOW_SLOW_EMA;
        let target1 = price * TARGET1_FACTOR;
        let target2 = price * TARGET2_FACTOR;
        let (risk_reward_ratio, risk_reward_class) =
            RiskRewardClass::assess(target1 - price, price - stop_price);

        let entry_gap_pct = if price != 0.0 {
            (price - entry_price).abs() / price * 100.0
        } else {
            0.0
        };

        TradePlan {
            momentum_tier,
            entry_tier,
            entry_rationale,
            entry_price,
            stop_price,
            target1,
            target2,
            risk_reward_ratio,
            risk_reward_class,
            entry_gap_pct,
            current_price_is_entry: price <= entry_price * 1.01,
        }
    }

    fn short_plan(price: f64) -> ShortPlan {
        let stop_price = price * SHORT_STOP_FACTOR;
        let target = price * SHORT_TARGET_FACTOR;
        let (risk_reward_ratio, risk_reward_class) =
            RiskRewardClass::assess(price - target, stop_price - price);
        ShortPlan {
            entry_price: price,
            stop_price,
            target,
            risk_reward_ratio,
            risk_reward_class,
        }
    }
}

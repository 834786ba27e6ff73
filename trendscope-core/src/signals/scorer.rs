//! Five-criterion buy/sell scoring.
//!
//! Each side is an ordered table of (criterion, predicate). A criterion is worth
//! one point; scores are points out of five, as a percentage, so always a
//! multiple of 20.

use crate::analysis::AnalysisSnapshot;
use crate::engine::{CrossStatus, Direction};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Largest |price vs slow EMA| (percent) still counted as a pullback entry.
pub const PULLBACK_BAND_PCT: f64 = 3.0;
/// Price this far above the slow EMA (percent) counts as overextended.
pub const EXTENDED_PCT: f64 = 5.0;
pub const RSI_BUY_CEILING: f64 = 65.0;
pub const RSI_SELL_FLOOR: f64 = 70.0;

const STRONG_SCORE: f64 = 70.0;
const STRONG_MARGIN: f64 = 15.0;
const CONFIRMATION_SCORE: f64 = 50.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Criterion {
    EmaBullishCross,
    PullbackToSlowEma,
    BullishMomentum,
    AdxBullish,
    RsiBelowCeiling,
    EmaBearishCross,
    PriceExtended,
    BearishMomentum,
    AdxBearish,
    RsiAboveFloor,
}

impl Criterion {
    pub fn label(self) -> &'static str {
        match self {
            Criterion::EmaBullishCross => "fast EMA above slow EMA",
            Criterion::PullbackToSlowEma => "price within 3% of slow EMA",
            Criterion::BullishMomentum => "bullish squeeze momentum",
            Criterion::AdxBullish => "+DI above -DI",
            Criterion::RsiBelowCeiling => "RSI below 65",
            Criterion::EmaBearishCross => "fast EMA below slow EMA",
            Criterion::PriceExtended => "price more than 5% above slow EMA",
            Criterion::BearishMomentum => "bearish squeeze momentum",
            Criterion::AdxBearish => "-DI above +DI",
            Criterion::RsiAboveFloor => "RSI above 70",
        }
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

type Rule = (Criterion, fn(&AnalysisSnapshot) -> bool);

fn ema_bullish(s: &AnalysisSnapshot) -> bool {
    s.moving_averages.cross_status.is_bullish()
}
fn near_slow_ema(s: &AnalysisSnapshot) -> bool {
    s.moving_averages.price_vs_slow_pct.abs() <= PULLBACK_BAND_PCT
}
fn momentum_bullish(s: &AnalysisSnapshot) -> bool {
    s.squeeze.momentum_trend.is_bullish()
}
fn adx_bullish(s: &AnalysisSnapshot) -> bool {
    s.adx.direction == Direction::Bullish
}
fn rsi_below_ceiling(s: &AnalysisSnapshot) -> bool {
    s.rsi < RSI_BUY_CEILING
}

fn ema_bearish(s: &AnalysisSnapshot) -> bool {
    s.moving_averages.cross_status.is_bearish()
}
fn extended(s: &AnalysisSnapshot) -> bool {
    s.moving_averages.price_vs_slow_pct > EXTENDED_PCT
}
fn momentum_bearish(s: &AnalysisSnapshot) -> bool {
    s.squeeze.momentum_trend.is_bearish()
}
fn adx_bearish(s: &AnalysisSnapshot) -> bool {
    s.adx.direction == Direction::Bearish
}
fn rsi_above_floor(s: &AnalysisSnapshot) -> bool {
    s.rsi > RSI_SELL_FLOOR
}

pub const BUY_RULES: [Rule; 5] = [
    (Criterion::EmaBullishCross, ema_bullish),
    (Criterion::PullbackToSlowEma, near_slow_ema),
    (Criterion::BullishMomentum, momentum_bullish),
    (Criterion::AdxBullish, adx_bullish),
    (Criterion::RsiBelowCeiling, rsi_below_ceiling),
];

pub const SELL_RULES: [Rule; 5] = [
    (Criterion::EmaBearishCross, ema_bearish),
    (Criterion::PriceExtended, extended),
    (Criterion::BearishMomentum, momentum_bearish),
    (Criterion::AdxBearish, adx_bearish),
    (Criterion::RsiAboveFloor, rsi_above_floor),
];

fn satisfied(rules: &[Rule], snapshot: &AnalysisSnapshot) -> Vec<Criterion> {
    rules
        .iter()
        .filter(|(_, holds)| holds(snapshot))
        .map(|(criterion, _)| *criterion)
        .collect()
}

pub fn satisfied_buy_criteria(snapshot: &AnalysisSnapshot) -> Vec<Criterion> {
    satisfied(&BUY_RULES, snapshot)
}

pub fn satisfied_sell_criteria(snapshot: &AnalysisSnapshot) -> Vec<Criterion> {
    satisfied(&SELL_RULES, snapshot)
}

fn score_pct(points: usize, total: usize) -> f64 {
    // Multiply first so 1/5 lands on exactly 20.
    points as f64 * 100.0 / total as f64
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SignalSide {
    StrongLong,
    StrongShort,
    Equilibrium,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Bias {
    Bullish,
    Bearish,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecommendationOutcome {
    pub side: SignalSide,
    pub buy_score_pct: f64,
    pub sell_score_pct: f64,
    /// Criteria met on the decided side (the bias side for EQUILIBRIUM), in table order.
    pub satisfied_criteria: Vec<Criterion>,
    /// Leaning of an EQUILIBRIUM outcome.
    pub bias: Option<Bias>,
    /// Cross that would have unlocked a strong signal.
    pub missing_confirmation: Option<CrossStatus>,
}

pub struct SignalScorer;

impl SignalScorer {
    pub fn score(snapshot: &AnalysisSnapshot) -> RecommendationOutcome {
        let buy = satisfied_buy_criteria(snapshot);
        let sell = satisfied_sell_criteria(snapshot);
        let buy_score_pct = score_pct(buy.len(), BUY_RULES.len());
        let sell_score_pct = score_pct(sell.len(), SELL_RULES.len());
        let cross = snapshot.moving_averages.cross_status;

        if buy_score_pct >= STRONG_SCORE
            && buy_score_pct > sell_score_pct + STRONG_MARGIN
            && cross.is_bullish()
        {
            return RecommendationOutcome {
                side: SignalSide::StrongLong,
                buy_score_pct,
                sell_score_pct,
                satisfied_criteria: buy,
                bias: None,
                missing_confirmation: None,
            };
        }

        if sell_score_pct >= STRONG_SCORE
            && sell_score_pct > buy_score_pct + STRONG_MARGIN
            && cross.is_bearish()
        {
            return RecommendationOutcome {
                side: SignalSide::StrongShort,
                buy_score_pct,
                sell_score_pct,
                satisfied_criteria: sell,
                bias: None,
                missing_confirmation: None,
            };
        }

        let missing_confirmation = if !cross.is_bullish() && buy_score_pct > CONFIRMATION_SCORE {
            Some(CrossStatus::BullishCross)
        } else if !cross.is_bearish() && sell_score_pct > CONFIRMATION_SCORE {
            Some(CrossStatus::BearishCross)
        } else {
            None
        };

        let (bias, satisfied_criteria) = if buy_score_pct > sell_score_pct {
            (Bias::Bullish, buy)
        } else {
            (Bias::Bearish, sell)
        };

        RecommendationOutcome {
            side: SignalSide::Equilibrium,
            buy_score_pct,
            sell_score_pct,
            satisfied_criteria,
            bias: Some(bias),
            missing_confirmation,
        }
    }
}

//! Re-evaluating an open position against a fresh snapshot.

use crate::analysis::AnalysisSnapshot;
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Share of a SPOT holding to sell on a deep loss.
pub const PARTIAL_SELL_FRACTION: f64 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionSide {
    Long,
    Short,
    Spot,
}

impl fmt::Display for PositionSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
            PositionSide::Spot => "SPOT",
        };
        f.write_str(s)
    }
}

impl FromStr for PositionSide {
    type Err = AnalysisError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "long" => Ok(PositionSide::Long),
            "short" => Ok(PositionSide::Short),
            "spot" => Ok(PositionSide::Spot),
            other => Err(AnalysisError::invalid(
                "side",
                format!("unknown position side '{other}' (expected long, short or spot)"),
            )),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PositionAction {
    Hold,
    HoldCautious,
    Close,
    SellConsider,
    SellPartial,
    HoldWait,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReview {
    pub side: PositionSide,
    pub entry_price: f64,
    pub current_price: f64,
    pub pnl: f64,
    pub pnl_pct: f64,
    pub action: PositionAction,
    /// Raised (LONG) or lowered (SHORT) protective stop.
    pub stop_price: Option<f64>,
    pub target_price: Option<f64>,
    /// Price at which a SPOT sale is suggested.
    pub trigger_price: Option<f64>,
    pub sell_fraction: Option<f64>,
}

/// Parse a user-typed price, accepting `,` as the decimal separator.
pub fn parse_price(text: &str) -> Result<f64, AnalysisError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(AnalysisError::invalid("price", "empty"));
    }
    let price: f64 = trimmed
        .replace(',', ".")
        .parse()
        .map_err(|_| AnalysisError::invalid("price", format!("'{trimmed}' is not a number")))?;
    check_price("price", price)?;
    Ok(price)
}

fn check_price(field: &'static str, price: f64) -> Result<(), AnalysisError> {
    if !price.is_finite() || price <= 0.0 {
        return Err(AnalysisError::invalid(field, format!("must be a positive number, got {price}")));
    }
    Ok(())
}

pub struct PositionEvaluator;

impl PositionEvaluator {
    pub fn evaluate(
        entry_price: f64,
        current_price: f64,
        side: PositionSide,
        snapshot: &AnalysisSnapshot,
    ) -> Result<PositionReview, AnalysisError> {
        check_price("entry_price", entry_price)?;
        check_price("current_price", current_price)?;

        let pnl = match side {
            PositionSide::Long | PositionSide::Spot => current_price - entry_price,
            PositionSide::Short => entry_price - current_price,
        };
        let pnl_pct = pnl / entry_price * 100.0;

        let mut review = PositionReview {
            side,
            entry_price,
            current_price,
            pnl,
            pnl_pct,
            action: PositionAction::HoldWait,
            stop_price: None,
            target_price: None,
            trigger_price: None,
            sell_fraction: None,
        };

        let cross = snapshot.moving_averages.cross_status;
        let momentum = snapshot.squeeze.momentum_trend;

        match side {
            PositionSide::Long => {
                if cross.is_bullish() && momentum.is_bullish() {
                    Self::hold_with_trend(&mut review, 1.01, 1.03);
                } else {
                    review.action = PositionAction::Close;
                }
            }
            PositionSide::Short => {
                if cross.is_bearish() && momentum.is_bearish() {
                    Self::hold_with_trend(&mut review, 0.99, 0.97);
                } else {
                    review.action = PositionAction::Close;
                }
            }
            // Strict loss thresholds, except that a 10.0% loss on a bearish cross
            // already counts as a sell.
            PositionSide::Spot => {
                if cross.is_bullish() && pnl_pct < -5.0 {
                    review.action = PositionAction::Hold;
                    review.trigger_price = Some(entry_price * 0.99);
                } else if cross.is_bearish() && pnl_pct <= -10.0 {
                    review.action = PositionAction::SellConsider;
                    review.trigger_price = Some(current_price * 1.02);
                } else if pnl_pct < -20.0 {
                    review.action = PositionAction::SellPartial;
                    review.trigger_price = Some(current_price);
                    review.sell_fraction = Some(PARTIAL_SELL_FRACTION);
                } else {
                    review.action = PositionAction::HoldWait;
                    review.target_price = Some(entry_price * 1.05);
                }
            }
        }

        Ok(review)
    }

    fn hold_with_trend(review: &mut PositionReview, stop_factor: f64, target_factor: f64) {
        if review.pnl > 0.0 {
            review.action = PositionAction::Hold;
            if review.pnl_pct > 2.0 {
                review.stop_price = Some(review.entry_price * stop_factor);
            }
            review.target_price = Some(review.current_price * target_factor);
        } else {
            review.action = PositionAction::HoldCautious;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CrossStatus, Direction, MomentumTrend};
    use crate::indicators::assert_approx;
    use crate::signals::scorer::tests::snapshot;

    fn with(cross: CrossStatus, momentum: MomentumTrend) -> AnalysisSnapshot {
        snapshot(cross, momentum, Direction::Neutral, 50.0, 0.0)
    }

    #[test]
    fn parse_price_accepts_comma_decimal() {
        assert_eq!(parse_price("0,0114").unwrap(), 0.0114);
        assert_eq!(parse_price(" 110816 ").unwrap(), 110816.0);
        assert!(matches!(
            parse_price(""),
            Err(AnalysisError::InvalidInput { field: "price", .. })
        ));
        assert!(parse_price("abc").is_err());
        assert!(parse_price("-3").is_err());
        assert!(parse_price("0").is_err());
        assert!(parse_price("inf").is_err());
    }

    #[test]
    fn side_parses_case_insensitively() {
        assert_eq!("LONG".parse::<PositionSide>().unwrap(), PositionSide::Long);
        assert_eq!("Short".parse::<PositionSide>().unwrap(), PositionSide::Short);
        assert_eq!("spot".parse::<PositionSide>().unwrap(), PositionSide::Spot);
        assert!("margin".parse::<PositionSide>().is_err());
    }

    #[test]
    fn rejects_bad_prices() {
        let s = with(CrossStatus::BullishCross, MomentumTrend::BullishStrong);
        assert!(PositionEvaluator::evaluate(0.0, 10.0, PositionSide::Long, &s).is_err());
        assert!(PositionEvaluator::evaluate(10.0, f64::NAN, PositionSide::Long, &s).is_err());
    }

    #[test]
    fn long_in_profit_with_trend_holds_and_raises_stop() {
        let s = with(CrossStatus::BullishCross, MomentumTrend::BullishWeak);
        let r = PositionEvaluator::evaluate(100.0, 105.0, PositionSide::Long, &s).unwrap();
        assert_eq!(r.action, PositionAction::Hold);
        assert_approx(r.pnl, 5.0, 1e-12);
        assert_approx(r.pnl_pct, 5.0, 1e-12);
        assert_approx(r.stop_price.unwrap(), 101.0, 1e-9);
        assert_approx(r.target_price.unwrap(), 108.15, 1e-9);
    }

    #[test]
    fn long_small_profit_keeps_stop() {
        let s = with(CrossStatus::BullishCross, MomentumTrend::BullishStrong);
        let r = PositionEvaluator::evaluate(100.0, 101.0, PositionSide::Long, &s).unwrap();
        assert_eq!(r.action, PositionAction::Hold);
        assert_eq!(r.stop_price, None);
    }

    #[test]
    fn long_outcomes() {
        let trend = with(CrossStatus::BullishCross, MomentumTrend::BullishStrong);
        let r = PositionEvaluator::evaluate(100.0, 95.0, PositionSide::Long, &trend).unwrap();
        assert_eq!(r.action, PositionAction::HoldCautious);

        let broken = with(CrossStatus::BullishCross, MomentumTrend::BearishWeak);
        let r = PositionEvaluator::evaluate(100.0, 120.0, PositionSide::Long, &broken).unwrap();
        assert_eq!(r.action, PositionAction::Close);
    }

    #[test]
    fn short_outcomes() {
        let trend = with(CrossStatus::BearishCross, MomentumTrend::BearishStrong);
        let r = PositionEvaluator::evaluate(100.0, 90.0, PositionSide::Short, &trend).unwrap();
        assert_eq!(r.action, PositionAction::Hold);
        assert_approx(r.pnl, 10.0, 1e-12);
        assert_approx(r.stop_price.unwrap(), 99.0, 1e-9);
        assert_approx(r.target_price.unwrap(), 87.3, 1e-9);

        let r = PositionEvaluator::evaluate(100.0, 101.0, PositionSide::Short, &trend).unwrap();
        assert_eq!(r.action, PositionAction::HoldCautious);

        let against = with(CrossStatus::BullishCross, MomentumTrend::BearishStrong);
        let r = PositionEvaluator::evaluate(100.0, 90.0, PositionSide::Short, &against).unwrap();
        assert_eq!(r.action, PositionAction::Close);
    }

    #[test]
    fn spot_bearish_ten_percent_loss_considers_selling() {
        let s = with(CrossStatus::BearishCross, MomentumTrend::BearishWeak);
        let r = PositionEvaluator::evaluate(100.0, 90.0, PositionSide::Spot, &s).unwrap();
        assert_eq!(r.action, PositionAction::SellConsider);
        assert_approx(r.pnl_pct, -10.0, 1e-12);
        assert_approx(r.trigger_price.unwrap(), 91.8, 1e-9);
    }

    #[test]
    fn spot_ladder() {
        let bullish = with(CrossStatus::BullishCross, MomentumTrend::BullishWeak);
        let r = PositionEvaluator::evaluate(100.0, 90.0, PositionSide::Spot, &bullish).unwrap();
        assert_eq!(r.action, PositionAction::Hold);
        assert_approx(r.trigger_price.unwrap(), 99.0, 1e-9);

        let neutral = with(CrossStatus::NeutralCross, MomentumTrend::Neutral);
        let r = PositionEvaluator::evaluate(100.0, 75.0, PositionSide::Spot, &neutral).unwrap();
        assert_eq!(r.action, PositionAction::SellPartial);
        assert_eq!(r.sell_fraction, Some(0.5));
        assert_eq!(r.trigger_price, Some(75.0));

        let r = PositionEvaluator::evaluate(100.0, 97.0, PositionSide::Spot, &neutral).unwrap();
        assert_eq!(r.action, PositionAction::HoldWait);
        assert_approx(r.target_price.unwrap(), 105.0, 1e-9);
    }

    #[test]
    fn spot_thresholds_at_the_boundaries() {
        let spot = |current: f64, cross: CrossStatus| {
            let s = with(cross, MomentumTrend::Neutral);
            PositionEvaluator::evaluate(100.0, current, PositionSide::Spot, &s)
                .unwrap()
                .action
        };

        assert_eq!(spot(95.0, CrossStatus::BullishCross), PositionAction::HoldWait);
        assert_eq!(spot(94.9, CrossStatus::BullishCross), PositionAction::Hold);

        assert_eq!(spot(90.0, CrossStatus::BearishCross), PositionAction::SellConsider);
        assert_eq!(spot(90.0, CrossStatus::NeutralCross), PositionAction::HoldWait);
        assert_eq!(spot(90.0, CrossStatus::BullishCross), PositionAction::Hold);

        assert_eq!(spot(80.0, CrossStatus::NeutralCross), PositionAction::HoldWait);
        assert_eq!(spot(79.9, CrossStatus::NeutralCross), PositionAction::SellPartial);
    }
}

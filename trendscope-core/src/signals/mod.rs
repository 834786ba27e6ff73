//! Decision layer: scoring, trade planning and position review.

pub mod planner;
pub mod position;
pub mod scorer;

pub use planner::{
    EntryRationale, EntryTier, MomentumTier, PlanVerdict, RiskRewardClass, ShortPlan, TradePlan,
    TradePlanner, WaitReason,
};
pub use position::{
    parse_price, PositionAction, PositionEvaluator, PositionReview, PositionSide,
    PARTIAL_SELL_FRACTION,
};
pub use scorer::{
    satisfied_buy_criteria, satisfied_sell_criteria, Bias, Criterion, RecommendationOutcome,
    SignalScorer, SignalSide,
};

//! End-to-end glue: fetch, sanitize, assemble, then score and plan (or review).

use crate::analysis::{AnalysisAssembler, AnalysisSnapshot};
use crate::config::TrendScopeConfig;
use crate::data::{DataError, MarketDataSource, SanitizeReport, SeriesSanitizer};
use crate::domain::{HoldingGuidance, Series, Timeframe};
use crate::error::AnalysisError;
use crate::fingerprint::DatasetHash;
use crate::signals::{
    PlanVerdict, PositionEvaluator, PositionReview, PositionSide, RecommendationOutcome,
    SignalScorer, TradePlanner,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error(transparent)]
    Data(#[from] DataError),

    #[error(transparent)]
    Analysis(#[from] AnalysisError),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub source: String,
    pub dataset_hash: DatasetHash,
    pub sanitize: SanitizeReport,
    pub snapshot: AnalysisSnapshot,
    pub outcome: RecommendationOutcome,
    pub plan: PlanVerdict,
    /// Present only when the plan is a trade.
    pub holding: Option<HoldingGuidance>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionRequest {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub side: PositionSide,
    pub entry_price: f64,
    /// Use this price instead of asking the source for its last price.
    pub current_price: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PositionReport {
    pub symbol: String,
    pub timeframe: Timeframe,
    pub source: String,
    pub dataset_hash: DatasetHash,
    pub snapshot: AnalysisSnapshot,
    pub review: PositionReview,
}

fn load_series(
    source: &dyn MarketDataSource,
    symbol: &str,
    timeframe: Timeframe,
    config: &TrendScopeConfig,
) -> Result<(Series, SanitizeReport, DatasetHash), DataError> {
    let raw = source.fetch_bars(symbol, timeframe, config.data.bar_limit)?;
    let (series, report) = SeriesSanitizer::sanitize(raw);
    let hash = DatasetHash::of(symbol, timeframe.code(), &series);
    tracing::debug!(
        symbol,
        %timeframe,
        bars = series.len(),
        hash = hash.short(),
        "series loaded"
    );
    Ok((series, report, hash))
}

fn assembler(config: &TrendScopeConfig) -> AnalysisAssembler {
    AnalysisAssembler::new(config.indicators.clone(), config.assembly.clone())
}

/// Analyze one symbol on one timeframe.
pub fn analyze_symbol(
    source: &dyn MarketDataSource,
    symbol: &str,
    timeframe: Timeframe,
    config: &TrendScopeConfig,
) -> Result<AnalysisReport, DataError> {
    let (series, sanitize, dataset_hash) = load_series(source, symbol, timeframe, config)?;
    let snapshot = assembler(config).assemble(&series);
    let outcome = SignalScorer::score(&snapshot);
    let plan = TradePlanner::plan(&snapshot);
    let holding = plan.is_trade().then(|| timeframe.holding_guidance());

    tracing::debug!(
        symbol,
        %timeframe,
        side = ?outcome.side,
        buy = outcome.buy_score_pct,
        sell = outcome.sell_score_pct,
        "analysis complete"
    );

    Ok(AnalysisReport {
        symbol: symbol.to_string(),
        timeframe,
        source: source.name().to_string(),
        dataset_hash,
        sanitize,
        snapshot,
        outcome,
        plan,
        holding,
    })
}

/// Review an open position against a fresh snapshot.
pub fn review_position(
    source: &dyn MarketDataSource,
    request: &PositionRequest,
    config: &TrendScopeConfig,
) -> Result<PositionReport, PipelineError> {
    let current_price = match request.current_price {
        Some(price) => price,
        None => source.last_price(&request.symbol)?,
    };
    let (series, _, dataset_hash) =
        load_series(source, &request.symbol, request.timeframe, config)?;
    let snapshot = assembler(config).assemble(&series);
    let review =
        PositionEvaluator::evaluate(request.entry_price, current_price, request.side, &snapshot)?;

    Ok(PositionReport {
        symbol: request.symbol.clone(),
        timeframe: request.timeframe,
        source: source.name().to_string(),
        dataset_hash,
        snapshot,
        review,
    })
}

//! Combines indicator states into an `AnalysisSnapshot`.

use super::snapshot::{AnalysisSnapshot, DataQuality, QualityGrade};
use crate::data::SeriesSanitizer;
use crate::domain::{Bar, Series};
use crate::engine::{
    AdxState, IndicatorEngine, IndicatorSettings, MovingAverageState, SqueezeState, TrendState,
    VolumeState, NEUTRAL_RSI,
};
use crate::error::AnalysisError;
use serde::{Deserialize, Serialize};

/// Length thresholds for a full analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AssemblySettings {
    /// Below this many bars the fallback snapshot is returned.
    pub min_full_bars: usize,
    /// At or above this many bars data quality is EXCELLENT, otherwise GOOD.
    pub excellent_bars: usize,
}

impl Default for AssemblySettings {
    fn default() -> Self {
        Self {
            min_full_bars: 100,
            excellent_bars: 100,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct AnalysisAssembler {
    engine: IndicatorEngine,
    settings: AssemblySettings,
}

impl AnalysisAssembler {
    pub fn new(indicators: IndicatorSettings, settings: AssemblySettings) -> Self {
        Self {
            engine: IndicatorEngine::new(indicators),
            settings,
        }
    }

    /// Build a snapshot. Never fails: short or faulty input yields the fallback.
    pub fn assemble(&self, series: &Series) -> AnalysisSnapshot {
        match self.try_assemble(series) {
            Ok(snapshot) => snapshot,
            Err(err @ AnalysisError::InsufficientData { .. }) => {
                tracing::debug!(%err, "using fallback snapshot");
                self.fallback(series)
            }
            Err(err) => {
                tracing::warn!(%err, "assembly degraded to fallback snapshot");
                self.fallback(series)
            }
        }
    }

    /// Sanitize raw bars, then assemble.
    pub fn assemble_bars(&self, raw: Vec<Bar>) -> AnalysisSnapshot {
        let (series, _) = SeriesSanitizer::sanitize(raw);
        self.assemble(&series)
    }

    pub fn try_assemble(&self, series: &Series) -> Result<AnalysisSnapshot, AnalysisError> {
        let records = series.len();
        if records < self.settings.min_full_bars {
            return Err(AnalysisError::InsufficientData {
                available: records,
                required: self.settings.min_full_bars,
            });
        }

        let current_price = series
            .last_close()
            .filter(|p| p.is_finite())
            .ok_or_else(|| AnalysisError::ComputationFault {
                indicator: "current_price",
                reason: "last close is not a finite number".to_string(),
            })?;

        let grade = if records >= self.settings.excellent_bars {
            QualityGrade::Excellent
        } else {
            QualityGrade::Good
        };

        Ok(AnalysisSnapshot {
            current_price,
            rsi: self.engine.rsi(series),
            moving_averages: self.engine.moving_averages(series),
            volume: self.engine.volume(series),
            trend: self.engine.trend(series),
            squeeze: self.engine.squeeze(series),
            adx: self.engine.adx(series),
            data_quality: DataQuality { grade, records },
        })
    }

    /// Neutral snapshot priced at the last close (0 when there is none).
    pub fn fallback(&self, series: &Series) -> AnalysisSnapshot {
        let price = series.last_close().filter(|p| p.is_finite()).unwrap_or(0.0);
        AnalysisSnapshot {
            current_price: price,
            rsi: NEUTRAL_RSI,
            moving_averages: MovingAverageState::indeterminate(price),
            volume: VolumeState::neutral(),
            trend: TrendState::indeterminate(),
            squeeze: SqueezeState::neutral(),
            adx: AdxState::neutral(),
            data_quality: DataQuality {
                grade: QualityGrade::Insufficient,
                records: series.len(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::{CrossStatus, MomentumTrend, TrendLabel, VolumeTrend};
    use crate::indicators::make_bars;

    fn closes(n: usize) -> Vec<f64> {
        (0..n).map(|i| 100.0 + (i as f64 * 0.3).sin() * 5.0 + i as f64 * 0.1).collect()
    }

    #[test]
    fn short_series_gets_fallback() {
        let series = Series::from_sorted(make_bars(&closes(10)));
        let snapshot = AnalysisAssembler::default().assemble(&series);

        assert!(snapshot.is_fallback());
        assert_eq!(snapshot.data_quality.to_string(), "INSUFFICIENT (10 records)");
        assert_eq!(snapshot.rsi, 50.0);
        assert_eq!(snapshot.current_price, series.last_close().unwrap());
        assert_eq!(snapshot.moving_averages.cross_status, CrossStatus::Indeterminate);
        assert_eq!(snapshot.moving_averages.ema_slow, snapshot.current_price);
        assert_eq!(snapshot.volume.trend, VolumeTrend::Neutral);
        assert_eq!(snapshot.trend.label, TrendLabel::Indeterminate);
        assert_eq!(snapshot.squeeze.momentum_trend, MomentumTrend::Neutral);
        assert_eq!(snapshot.adx.adx, 0.0);
    }

    #[test]
    fn empty_series_prices_at_zero() {
        let snapshot = AnalysisAssembler::default().assemble(&Series::default());
        assert_eq!(snapshot.current_price, 0.0);
        assert_eq!(snapshot.data_quality.records, 0);
    }

    #[test]
    fn full_series_is_excellent() {
        let series = Series::from_sorted(make_bars(&closes(150)));
        let snapshot = AnalysisAssembler::default().assemble(&series);

        assert_eq!(snapshot.data_quality.grade, QualityGrade::Excellent);
        assert_eq!(snapshot.data_quality.records, 150);
        assert!((0.0..=100.0).contains(&snapshot.rsi));
        assert_ne!(snapshot.moving_averages.cross_status, CrossStatus::Indeterminate);
        assert_ne!(snapshot.trend.label, TrendLabel::Indeterminate);
    }

    #[test]
    fn lowered_minimum_grades_good() {
        let assembler = AnalysisAssembler::new(
            IndicatorSettings::default(),
            AssemblySettings {
                min_full_bars: 60,
                excellent_bars: 100,
            },
        );
        let snapshot = assembler.assemble(&Series::from_sorted(make_bars(&closes(80))));
        assert_eq!(snapshot.data_quality.grade, QualityGrade::Good);
        assert!(!snapshot.is_fallback());
    }

    #[test]
    fn non_finite_price_degrades_to_fallback() {
        let mut bars = make_bars(&closes(120));
        if let Some(last) = bars.last_mut() {
            last.close = f64::INFINITY;
        }
        let snapshot = AnalysisAssembler::default().assemble(&Series::from_sorted(bars));
        assert!(snapshot.is_fallback());
        assert_eq!(snapshot.current_price, 0.0);
        assert_eq!(snapshot.data_quality.records, 120);
    }

    #[test]
    fn assemble_bars_sanitizes_first() {
        let mut bars = make_bars(&closes(101));
        bars[50].close = f64::NAN;
        let snapshot = AnalysisAssembler::default().assemble_bars(bars);
        assert_eq!(snapshot.data_quality.records, 100);
        assert_eq!(snapshot.data_quality.grade, QualityGrade::Excellent);
    }
}

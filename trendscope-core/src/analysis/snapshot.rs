//! The immutable result of one analysis pass.

use crate::engine::{AdxState, MovingAverageState, SqueezeState, TrendState, VolumeState};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum QualityGrade {
    Excellent,
    Good,
    Insufficient,
}

impl fmt::Display for QualityGrade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            QualityGrade::Excellent => "EXCELLENT",
            QualityGrade::Good => "GOOD",
            QualityGrade::Insufficient => "INSUFFICIENT",
        };
        f.write_str(label)
    }
}

/// How much history backed the snapshot. Displays as `EXCELLENT (120 records)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataQuality {
    pub grade: QualityGrade,
    pub records: usize,
}

impl fmt::Display for DataQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({} records)", self.grade, self.records)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisSnapshot {
    pub current_price: f64,
    pub rsi: f64,
    pub moving_averages: MovingAverageState,
    pub volume: VolumeState,
    pub trend: TrendState,
    pub squeeze: SqueezeState,
    pub adx: AdxState,
    pub data_quality: DataQuality,
}

impl AnalysisSnapshot {
    pub fn is_fallback(&self) -> bool {
        self.data_quality.grade == QualityGrade::Insufficient
    }
}

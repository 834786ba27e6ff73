//! Content fingerprint of a sanitized series.

use crate::domain::Series;
use serde::{Deserialize, Serialize};
use std::fmt;

/// BLAKE3 hex digest over every bar of a series.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DatasetHash(pub String);

impl DatasetHash {
    /// Hash symbol, timeframe code and every bar's timestamp and OHLCV values.
    ///
    /// Two reports with the same hash were computed from identical input.
    pub fn of(symbol: &str, timeframe: &str, series: &Series) -> Self {
        let mut hasher = blake3::Hasher::new();
        hasher.update(symbol.as_bytes());
        hasher.update(timeframe.as_bytes());
        for bar in series.bars() {
            hasher.update(&bar.timestamp.timestamp_millis().to_le_bytes());
            hasher.update(&bar.open.to_le_bytes());
            hasher.update(&bar.high.to_le_bytes());
            hasher.update(&bar.low.to_le_bytes());
            hasher.update(&bar.close.to_le_bytes());
            hasher.update(&bar.volume.to_le_bytes());
        }
        Self(hasher.finalize().to_hex().to_string())
    }

    /// First 12 hex characters, for log lines.
    pub fn short(&self) -> &str {
        &self.0[..self.0.len().min(12)]
    }
}

impl fmt::Display for DatasetHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

//! Series sanitizing: drop non-finite rows, sort by time, dedupe timestamps.
//!
//! The result may be empty; callers decide what length is enough.

use crate::domain::{Bar, Series};
use serde::{Deserialize, Serialize};

/// What the sanitizer removed or noticed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SanitizeReport {
    pub input_len: usize,
    pub dropped_non_finite: usize,
    pub dropped_duplicates: usize,
    /// Surviving bars with zero volume. Kept, but they flatten volume ratios.
    pub zero_volume_bars: usize,
}

impl SanitizeReport {
    pub fn output_len(&self) -> usize {
        self.input_len - self.dropped_non_finite - self.dropped_duplicates
    }

    pub fn is_clean(&self) -> bool {
        self.dropped_non_finite == 0 && self.dropped_duplicates == 0
    }
}

pub struct SeriesSanitizer;

impl SeriesSanitizer {
    /// Clean raw bars into a `Series`.
    ///
    /// Rows with any non-finite field are removed first. The rest are sorted
    /// by timestamp (stable, so input order breaks ties) and only the first
    /// bar of each timestamp is kept.
    pub fn sanitize(raw: Vec<Bar>) -> (Series, SanitizeReport) {
        let input_len = raw.len();

        let mut bars: Vec<Bar> = raw.into_iter().filter(Bar::is_finite).collect();
        let dropped_non_finite = input_len - bars.len();

        bars.sort_by_key(|b| b.timestamp);
        let before_dedup = bars.len();
        bars.dedup_by(|later, earlier| later.timestamp == earlier.timestamp);
        let dropped_duplicates = before_dedup - bars.len();

        let report = SanitizeReport {
            input_len,
            dropped_non_finite,
            dropped_duplicates,
            zero_volume_bars: bars.iter().filter(|b| b.volume == 0.0).count(),
        };

        if !report.is_clean() {
            tracing::debug!(
                input = input_len,
                non_finite = dropped_non_finite,
                duplicates = dropped_duplicates,
                "sanitizer dropped rows"
            );
        }
        if report.zero_volume_bars > 0 {
            tracing::debug!(count = report.zero_volume_bars, "zero-volume bars in series");
        }

        (Series::from_sorted(bars), report)
    }
}

//! Series — an ordered, sanitized window of bars for one instrument.

use super::Bar;

/// Time-ascending bars with unique timestamps and finite fields.
///
/// Only `SeriesSanitizer` builds a `Series` from untrusted input; tests and
/// sources that already guarantee the invariants may use `from_sorted`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Series {
    bars: Vec<Bar>,
}

impl Series {
    /// Wrap bars already known to be sorted, unique and finite.
    pub fn from_sorted(bars: Vec<Bar>) -> Self {
        debug_assert!(bars.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
        Self { bars }
    }

    pub fn bars(&self) -> &[Bar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    /// Close of the most recent bar.
    pub fn last_close(&self) -> Option<f64> {
        self.bars.last().map(|b| b.close)
    }

    pub fn closes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn volumes(&self) -> Vec<f64> {
        self.bars.iter().map(|b| b.volume).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone, Utc};

    fn bars(closes: &[f64]) -> Vec<Bar> {
        let base = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        closes
            .iter()
            .enumerate()
            .map(|(i, &c)| Bar {
                timestamp: base + Duration::hours(i as i64),
                open: c,
                high: c + 1.0,
                low: c - 1.0,
                close: c,
                volume: 10.0 * (i + 1) as f64,
            })
            .collect()
    }

    #[test]
    fn column_accessors() {
        let s = Series::from_sorted(bars(&[1.0, 2.0, 3.0]));
        assert_eq!(s.len(), 3);
        assert_eq!(s.closes(), vec![1.0, 2.0, 3.0]);
        assert_eq!(s.volumes(), vec![10.0, 20.0, 30.0]);
        assert_eq!(s.last_close(), Some(3.0));
    }

    #[test]
    fn empty_series() {
        let s = Series::default();
        assert!(s.is_empty());
        assert_eq!(s.last_close(), None);
        assert!(s.closes().is_empty());
    }
}

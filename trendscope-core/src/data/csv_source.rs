//! CSV-backed market data source.
//!
//! Files use the exchange kline layout with a header row:
//! `timestamp,open,high,low,close,volume`, timestamp in epoch milliseconds.
//! Rows are expected in chronological order, as exchanges export them.
//!
//! Two layouts are supported:
//! - a single file serving every symbol and timeframe (ad-hoc analysis)
//! - a directory of `<SYMBOL>_<timeframe>.csv` files, where the symbol has its
//!   `/` removed (`BTC/USDT` on 4h reads `BTCUSDT_4h.csv`)

use super::provider::{DataError, MarketDataSource};
use crate::domain::{Bar, Timeframe};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::path::{Path, PathBuf};

#[derive(Debug, Deserialize)]
struct KlineRow {
    timestamp: i64,
    open: f64,
    high: f64,
    low: f64,
    close: f64,
    volume: f64,
}

#[derive(Debug, Clone)]
enum Layout {
    File(PathBuf),
    Directory(PathBuf),
}

#[derive(Debug, Clone)]
pub struct CsvSource {
    layout: Layout,
    name: String,
}

impl CsvSource {
    /// Serve every request from one file.
    pub fn file(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        Self {
            name: format!("csv:{}", path.display()),
            layout: Layout::File(path),
        }
    }

    /// Resolve `<SYMBOL>_<timeframe>.csv` under `dir`.
    pub fn directory(dir: impl Into<PathBuf>) -> Self {
        let dir = dir.into();
        Self {
            name: format!("csv-dir:{}", dir.display()),
            layout: Layout::Directory(dir),
        }
    }

    /// File name used for a symbol/timeframe pair in directory layout.
    pub fn file_name(symbol: &str, timeframe: Timeframe) -> String {
        format!("{}_{}.csv", symbol.replace('/', ""), timeframe.code())
    }

    fn path_for(&self, symbol: &str, timeframe: Timeframe) -> PathBuf {
        match &self.layout {
            Layout::File(path) => path.clone(),
            Layout::Directory(dir) => dir.join(Self::file_name(symbol, timeframe)),
        }
    }

    /// Read every row of a kline CSV file.
    pub fn read_bars(path: &Path) -> Result<Vec<Bar>, DataError> {
        let display = path.display().to_string();
        let file = std::fs::File::open(path).map_err(|source| DataError::Io {
            path: display.clone(),
            source,
        })?;

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_reader(std::io::BufReader::new(file));

        let mut bars = Vec::new();
        for row in reader.deserialize::<KlineRow>() {
            let row = row.map_err(|source| DataError::Csv {
                path: display.clone(),
                source,
            })?;
            let timestamp = DateTime::<Utc>::from_timestamp_millis(row.timestamp)
                .ok_or(DataError::InvalidTimestamp {
                    path: display.clone(),
                    value: row.timestamp,
                })?;
            bars.push(Bar {
                timestamp,
                open: row.open,
                high: row.high,
                low: row.low,
                close: row.close,
                volume: row.volume,
            });
        }

        Ok(bars)
    }

    fn load(&self, symbol: &str, timeframe: Timeframe) -> Result<Vec<Bar>, DataError> {
        let path = self.path_for(symbol, timeframe);
        if !path.exists() {
            return Err(DataError::SymbolNotFound {
                symbol: symbol.to_string(),
                timeframe: timeframe.code().to_string(),
            });
        }
        let bars = Self::read_bars(&path)?;
        if bars.is_empty() {
            return Err(DataError::Empty {
                symbol: symbol.to_string(),
            });
        }
        Ok(bars)
    }
}

impl MarketDataSource for CsvSource {
    fn name(&self) -> &str {
        &self.name
    }

    fn fetch_bars(
        &self,
        symbol: &str,
        timeframe: Timeframe,
        limit: usize,
    ) -> Result<Vec<Bar>, DataError> {
        let mut bars = self.load(symbol, timeframe)?;
        let limit = timeframe.adjusted_limit(limit);
        if bars.len() > limit {
            bars.drain(..bars.len() - limit);
        }
        tracing::debug!(source = %self.name, symbol, %timeframe, bars = bars.len(), "fetched bars");
        Ok(bars)
    }

    /// Last close of the finest timeframe available for the symbol.
    fn last_price(&self, symbol: &str) -> Result<f64, DataError> {
        let timeframe = match &self.layout {
            Layout::File(_) => Timeframe::FifteenMinutes,
            Layout::Directory(_) => Timeframe::ALL
                .into_iter()
                .find(|&tf| self.path_for(symbol, tf).exists())
                .ok_or_else(|| DataError::SymbolNotFound {
                    symbol: symbol.to_string(),
                    timeframe: "any".to_string(),
                })?,
        };
        let bars = self.load(symbol, timeframe)?;
        bars.last().map(|b| b.close).ok_or(DataError::Empty {
            symbol: symbol.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU64, Ordering};

    static TEST_COUNTER: AtomicU64 = AtomicU64::new(0);

    fn temp_dir() -> PathBuf {
        let id = TEST_COUNTER.fetch_add(1, Ordering::Relaxed);
        let dir = std::env::temp_dir().join(format!(
            "trendscope_csv_test_{}_{id}",
            std::process::id()
        ));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();
        dir
    }

    fn write_klines(path: &Path, closes: &[f64]) {
        let mut out = String::from("timestamp,open,high,low,close,volume\n");
        for (i, c) in closes.iter().enumerate() {
            let ts = 1_700_000_000_000i64 + i as i64 * 3_600_000;
            out.push_str(&format!("{ts},{c},{},{},{c},12.5\n", c + 1.0, c - 1.0));
        }
        std::fs::write(path, out).unwrap();
    }

    #[test]
    fn reads_kline_file() {
        let dir = temp_dir();
        let path = dir.join("btc.csv");
        write_klines(&path, &[100.0, 101.0, 102.0]);

        let bars = CsvSource::read_bars(&path).unwrap();
        assert_eq!(bars.len(), 3);
        assert_eq!(bars[2].close, 102.0);
        assert_eq!(bars[0].high, 101.0);
        assert_eq!(bars[1].volume, 12.5);
        assert_eq!(bars[0].timestamp.timestamp_millis(), 1_700_000_000_000);
    }

    #[test]
    fn fetch_keeps_most_recent_rows() {
        let dir = temp_dir();
        let path = dir.join("eth.csv");
        let closes: Vec<f64> = (0..10).map(|i| 10.0 + i as f64).collect();
        write_klines(&path, &closes);

        let source = CsvSource::file(&path);
        let bars = source.fetch_bars("ETH/USDT", Timeframe::OneHour, 4).unwrap();
        assert_eq!(bars.len(), 4);
        assert_eq!(bars[0].close, 16.0);
        assert_eq!(source.last_price("ETH/USDT").unwrap(), 19.0);
    }

    #[test]
    fn long_timeframes_are_capped_at_one_hundred() {
        let dir = temp_dir();
        let closes: Vec<f64> = (0..150).map(|i| 1.0 + i as f64).collect();
        write_klines(&dir.join(CsvSource::file_name("SOL/USDT", Timeframe::OneWeek)), &closes);

        let source = CsvSource::directory(&dir);
        let bars = source.fetch_bars("SOL/USDT", Timeframe::OneWeek, 5000).unwrap();
        assert_eq!(bars.len(), 100);
        assert_eq!(bars[99].close, 150.0);
    }

    #[test]
    fn directory_layout_resolves_symbol_files() {
        let dir = temp_dir();
        write_klines(&dir.join("BTCUSDT_4h.csv"), &[50.0, 60.0]);
        write_klines(&dir.join("BTCUSDT_1h.csv"), &[55.0, 61.5]);

        let source = CsvSource::directory(&dir);
        assert_eq!(source.fetch_bars("BTC/USDT", Timeframe::FourHours, 100).unwrap().len(), 2);
        // Finest timeframe wins for the live price.
        assert_eq!(source.last_price("BTC/USDT").unwrap(), 61.5);

        let err = source.fetch_bars("BTC/USDT", Timeframe::OneDay, 100).unwrap_err();
        assert!(matches!(err, DataError::SymbolNotFound { .. }));
        assert!(source.last_price("DOGE/USDT").is_err());
    }

    #[test]
    fn empty_file_is_an_error() {
        let dir = temp_dir();
        let path = dir.join("empty.csv");
        std::fs::write(&path, "timestamp,open,high,low,close,volume\n").unwrap();
        let err = CsvSource::file(&path)
            .fetch_bars("X/USDT", Timeframe::OneDay, 10)
            .unwrap_err();
        assert!(matches!(err, DataError::Empty { .. }));
    }

    #[test]
    fn malformed_row_is_a_csv_error() {
        let dir = temp_dir();
        let path = dir.join("bad.csv");
        std::fs::write(&path, "timestamp,open,high,low,close,volume\n1,abc,2,0.5,1,1\n").unwrap();
        assert!(matches!(
            CsvSource::read_bars(&path).unwrap_err(),
            DataError::Csv { .. }
        ));
    }

    #[test]
    fn non_finite_values_pass_through_for_the_sanitizer() {
        let dir = temp_dir();
        let path = dir.join("nan.csv");
        std::fs::write(&path, "timestamp,open,high,low,close,volume\n1,1,2,0.5,NaN,1\n").unwrap();
        let bars = CsvSource::read_bars(&path).unwrap();
        assert!(bars[0].close.is_nan());
    }
}

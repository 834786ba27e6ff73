//! TOML configuration.
//!
//! Every section and field is optional; an empty file yields the defaults.
//!
//! ```toml
//! [indicators]
//! ema_slow = 50
//!
//! [assembly]
//! min_full_bars = 80
//!
//! [data]
//! bar_limit = 200
//! watchlist = ["BTC/USDT", "ETH/USDT"]
//! ```

use crate::analysis::AssemblySettings;
use crate::data::DEFAULT_WATCHLIST;
use crate::engine::IndicatorSettings;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataSettings {
    /// Bars requested per analysis (long timeframes are capped further).
    pub bar_limit: usize,
    pub watchlist: Vec<String>,
}

impl Default for DataSettings {
    fn default() -> Self {
        Self {
            bar_limit: 100,
            watchlist: DEFAULT_WATCHLIST.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrendScopeConfig {
    pub indicators: IndicatorSettings,
    pub assembly: AssemblySettings,
    pub data: DataSettings,
}

impl TrendScopeConfig {
    /// Load and validate a config file.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml(&content)
    }

    /// Parse and validate a config string.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml(&self) -> Result<String, ConfigError> {
        Ok(toml::to_string_pretty(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.indicators.validate().map_err(ConfigError::Invalid)?;
        if self.assembly.min_full_bars == 0 {
            return Err(ConfigError::Invalid("min_full_bars must be >= 1".into()));
        }
        if self.data.bar_limit == 0 {
            return Err(ConfigError::Invalid("bar_limit must be >= 1".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_toml_is_default() {
        let config = TrendScopeConfig::from_toml("").unwrap();
        assert_eq!(config, TrendScopeConfig::default());
        assert_eq!(config.data.watchlist.len(), 20);
        assert_eq!(config.indicators.ema_slow, 55);
        assert_eq!(config.assembly.min_full_bars, 100);
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config = TrendScopeConfig::from_toml(
            "[indicators]\nema_slow = 50\n\n[data]\nwatchlist = [\"BTC/USDT\"]\n",
        )
        .unwrap();
        assert_eq!(config.indicators.ema_slow, 50);
        assert_eq!(config.indicators.ema_fast, 10);
        assert_eq!(config.data.watchlist, vec!["BTC/USDT".to_string()]);
        assert_eq!(config.data.bar_limit, 100);
    }

    #[test]
    fn toml_roundtrip() {
        let mut config = TrendScopeConfig::default();
        config.indicators.kc_mult = 1.25;
        config.assembly.excellent_bars = 150;
        let text = config.to_toml().unwrap();
        assert_eq!(TrendScopeConfig::from_toml(&text).unwrap(), config);
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(matches!(
            TrendScopeConfig::from_toml("[indicators]\nrsi_period = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TrendScopeConfig::from_toml("[data]\nbar_limit = 0\n"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            TrendScopeConfig::from_toml("[indicators]\nrsi_period = \"x\"\n"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TrendScopeConfig::from_file(Path::new("/nonexistent/trendscope.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}

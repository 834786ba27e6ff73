//! Indicator parameters.

use serde::{Deserialize, Serialize};

/// Periods and multipliers for every indicator the engine computes.
///
/// Missing TOML keys fall back to the field defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorSettings {
    pub rsi_period: usize,
    pub ema_fast: usize,
    pub ema_slow: usize,
    pub sma_period: usize,
    pub volume_period: usize,
    /// Bars back for the medium trend change (inclusive of the last bar).
    pub trend_medium_window: usize,
    pub bb_length: usize,
    pub bb_mult: f64,
    pub kc_length: usize,
    pub kc_mult: f64,
    pub di_length: usize,
    pub adx_length: usize,
    pub adx_key_level: f64,
    /// Extra bars required on top of an indicator's own period.
    pub gate_margin: usize,
}

impl Default for IndicatorSettings {
    fn default() -> Self {
        Self {
            rsi_period: 14,
            ema_fast: 10,
            ema_slow: 55,
            sma_period: 20,
            volume_period: 20,
            trend_medium_window: 20,
            bb_length: 20,
            bb_mult: 2.0,
            kc_length: 20,
            kc_mult: 1.5,
            di_length: 14,
            adx_length: 14,
            adx_key_level: 23.0,
            gate_margin: 20,
        }
    }
}

impl IndicatorSettings {
    pub fn rsi_gate(&self) -> usize {
        self.rsi_period + self.gate_margin
    }

    pub fn moving_average_gate(&self) -> usize {
        self.ema_slow
    }

    pub fn volume_gate(&self) -> usize {
        self.volume_period
    }

    pub fn squeeze_gate(&self) -> usize {
        self.bb_length.max(self.kc_length) + self.gate_margin
    }

    pub fn adx_gate(&self) -> usize {
        self.di_length.max(self.adx_length) + self.gate_margin
    }

    /// Reject zero periods and non-positive multipliers.
    pub fn validate(&self) -> Result<(), String> {
        let periods = [
            ("rsi_period", self.rsi_period),
            ("ema_fast", self.ema_fast),
            ("ema_slow", self.ema_slow),
            ("sma_period", self.sma_period),
            ("volume_period", self.volume_period),
            ("trend_medium_window", self.trend_medium_window),
            ("bb_length", self.bb_length),
            ("kc_length", self.kc_length),
            ("di_length", self.di_length),
            ("adx_length", self.adx_length),
        ];
        if let Some((name, _)) = periods.iter().find(|(_, p)| *p == 0) {
            return Err(format!("{name} must be >= 1"));
        }

        let multipliers = [("bb_mult", self.bb_mult), ("kc_mult", self.kc_mult)];
        if let Some((name, m)) = multipliers.iter().find(|(_, m)| !(m.is_finite() && *m > 0.0)) {
            return Err(format!("{name} must be a positive number, got {m}"));
        }

        if !self.adx_key_level.is_finite() {
            return Err("adx_key_level must be finite".to_string());
        }
        Ok(())
    }
}

//! Indicator engine: turns a sanitized series into indicator states.
//!
//! Every public method is total. A sufficiency gate runs first; below it the
//! indicator returns its neutral default. Above it the fallible `try_*`
//! counterpart runs, and a `ComputationFault` is mapped to the indicator's
//! ERROR variant (or neutral default) with a warning. One indicator failing
//! never affects another.

pub mod settings;
pub mod states;

pub use settings::IndicatorSettings;
pub use states::{
    AdxState, AdxStrength, CrossStatus, Direction, MomentumTrend, MovingAverageState,
    SqueezeState, SqueezeStatus, TrendLabel, TrendState, TrendStrength, VolumeState, VolumeTrend,
};

use crate::domain::Series;
use crate::error::AnalysisError;
use crate::indicators::{
    last_two_valid, last_valid, linreg_of_series, sma_of_series, Bollinger, Dmi, Donchian, Ema,
    Indicator, Keltner, Rsi, Sma,
};

/// RSI reported when it cannot be computed.
pub const NEUTRAL_RSI: f64 = 50.0;

fn fault(indicator: &'static str, reason: impl Into<String>) -> AnalysisError {
    AnalysisError::ComputationFault {
        indicator,
        reason: reason.into(),
    }
}

fn gate(series: &Series, required: usize) -> Result<(), AnalysisError> {
    if series.len() < required {
        return Err(AnalysisError::InsufficientData {
            available: series.len(),
            required,
        });
    }
    Ok(())
}

/// Resolve a fallible computation to a value, logging why it degraded.
fn resolve<T>(indicator: &'static str, result: Result<T, AnalysisError>, fallback: T, on_fault: T) -> T {
    match result {
        Ok(value) => value,
        Err(err @ AnalysisError::InsufficientData { .. }) => {
            tracing::debug!(indicator, %err, "indicator below sufficiency gate");
            fallback
        }
        Err(err) => {
            tracing::warn!(indicator, %err, "indicator degraded");
            on_fault
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct IndicatorEngine {
    settings: IndicatorSettings,
}

impl IndicatorEngine {
    pub fn new(settings: IndicatorSettings) -> Self {
        Self { settings }
    }

    // ── RSI ──────────────────────────────────────────────────────────

    /// Latest Wilder RSI, or 50 when unavailable.
    pub fn rsi(&self, series: &Series) -> f64 {
        resolve("rsi", self.try_rsi(series), NEUTRAL_RSI, NEUTRAL_RSI)
    }

    pub fn try_rsi(&self, series: &Series) -> Result<f64, AnalysisError> {
        gate(series, self.settings.rsi_gate())?;
        let values = Rsi::new(self.settings.rsi_period).compute(series.bars());
        match last_valid(&values) {
            Some(rsi) if !(0.0..=100.0).contains(&rsi) => {
                Err(fault("rsi", format!("value {rsi} outside [0, 100]")))
            }
            Some(rsi) => Ok(rsi),
            None => Ok(NEUTRAL_RSI),
        }
    }

    // ── Moving averages ──────────────────────────────────────────────

    pub fn moving_averages(&self, series: &Series) -> MovingAverageState {
        let price = series.last_close().unwrap_or(0.0);
        resolve(
            "moving_averages",
            self.try_moving_averages(series),
            MovingAverageState::indeterminate(price),
            MovingAverageState::error(price),
        )
    }

    pub fn try_moving_averages(&self, series: &Series) -> Result<MovingAverageState, AnalysisError> {
        gate(series, self.settings.moving_average_gate())?;
        let bars = series.bars();
        let price = series
            .last_close()
            .ok_or_else(|| fault("moving_averages", "empty series"))?;

        let latest = |indicator: &dyn Indicator| {
            last_valid(&indicator.compute(bars))
                .filter(|v| v.is_finite())
                .ok_or_else(|| fault("moving_averages", format!("no valid {}", indicator.name())))
        };
        let ema_fast = latest(&Ema::new(self.settings.ema_fast))?;
        let ema_slow = latest(&Ema::new(self.settings.ema_slow))?;
        let sma = latest(&Sma::new(self.settings.sma_period))?;

        if ema_slow == 0.0 {
            return Err(fault("moving_averages", "slow EMA is zero"));
        }

        let cross_status = match Direction::compare(ema_fast, ema_slow) {
            Direction::Bullish => CrossStatus::BullishCross,
            Direction::Bearish => CrossStatus::BearishCross,
            Direction::Neutral => CrossStatus::NeutralCross,
        };
        let price_vs_slow_abs = price - ema_slow;

        Ok(MovingAverageState {
            ema_fast,
            ema_slow,
            sma,
            cross_status,
            trend_direction: Direction::compare(ema_fast, ema_slow),
            price_vs_slow_abs,
            price_vs_slow_pct: price_vs_slow_abs / ema_slow * 100.0,
        })
    }

    // ── Volume ───────────────────────────────────────────────────────

    pub fn volume(&self, series: &Series) -> VolumeState {
        resolve(
            "volume",
            self.try_volume(series),
            VolumeState::neutral(),
            VolumeState::neutral(),
        )
    }

    pub fn try_volume(&self, series: &Series) -> Result<VolumeState, AnalysisError> {
        gate(series, self.settings.volume_gate())?;
        let volumes = series.volumes();
        let average = last_valid(&sma_of_series(&volumes, self.settings.volume_period))
            .ok_or_else(|| fault("volume", "no valid volume average"))?;
        let latest = volumes
            .last()
            .copied()
            .ok_or_else(|| fault("volume", "empty series"))?;

        let ratio = if average > 0.0 { latest / average } else { 1.0 };
        if !ratio.is_finite() {
            return Err(fault("volume", format!("non-finite ratio {ratio}")));
        }

        let trend = if ratio > 2.0 {
            VolumeTrend::VeryHigh
        } else if ratio > 1.5 {
            VolumeTrend::High
        } else if ratio < 0.5 {
            VolumeTrend::Low
        } else {
            VolumeTrend::Normal
        };
        Ok(VolumeState { trend, ratio })
    }

    // ── Trend ────────────────────────────────────────────────────────

    pub fn trend(&self, series: &Series) -> TrendState {
        resolve(
            "trend",
            self.try_trend(series),
            TrendState::indeterminate(),
            TrendState::error(),
        )
    }

    /// Classify the medium-window and whole-window close changes.
    pub fn try_trend(&self, series: &Series) -> Result<TrendState, AnalysisError> {
        gate(series, 1)?;
        let closes = series.closes();
        let n = closes.len();
        let last = closes[n - 1];
        let pct = |base: f64| (last - base) / base * 100.0;

        let window = self.settings.trend_medium_window;
        let medium = if n >= window { pct(closes[n - window]) } else { 0.0 };
        let long = pct(closes[0]);
        if !medium.is_finite() || !long.is_finite() {
            return Err(fault("trend", format!("non-finite change ({medium}, {long})")));
        }

        let (label, strength) = if medium > 5.0 && long > 2.0 {
            (TrendLabel::StrongBullish, TrendStrength::High)
        } else if medium < -5.0 && long < -2.0 {
            (TrendLabel::StrongBearish, TrendStrength::High)
        } else if long > 2.0 {
            (TrendLabel::Bullish, TrendStrength::Medium)
        } else if long < -2.0 {
            (TrendLabel::Bearish, TrendStrength::Medium)
        } else {
            (TrendLabel::Lateral, TrendStrength::Low)
        };

        Ok(TrendState {
            label,
            pct_change: long,
            medium_pct_change: medium,
            strength,
        })
    }

    // ── Squeeze momentum ─────────────────────────────────────────────

    pub fn squeeze(&self, series: &Series) -> SqueezeState {
        resolve(
            "squeeze",
            self.try_squeeze(series),
            SqueezeState::neutral(),
            SqueezeState::error(),
        )
    }

    /// Bollinger-inside-Keltner squeeze plus linear-regression momentum.
    pub fn try_squeeze(&self, series: &Series) -> Result<SqueezeState, AnalysisError> {
        let s = &self.settings;
        gate(series, s.squeeze_gate())?;
        let bars = series.bars();

        let last = |indicator: &dyn Indicator| indicator.compute(bars).last().copied().unwrap_or(f64::NAN);
        let upper_bb = last(&Bollinger::upper(s.bb_length, s.bb_mult));
        let lower_bb = last(&Bollinger::lower(s.bb_length, s.bb_mult));
        let upper_kc = last(&Keltner::upper(s.kc_length, s.kc_mult));
        let lower_kc = last(&Keltner::lower(s.kc_length, s.kc_mult));

        // NaN bands compare false on both tests and land on NO_SQUEEZE.
        let status = if lower_bb > lower_kc && upper_bb < upper_kc {
            SqueezeStatus::SqueezeOn
        } else if lower_bb < lower_kc && upper_bb > upper_kc {
            SqueezeStatus::SqueezeOff
        } else {
            SqueezeStatus::NoSqueeze
        };

        let highest = Donchian::upper(s.kc_length).compute(bars);
        let lowest = Donchian::lower(s.kc_length).compute(bars);
        let source: Vec<f64> = bars
            .iter()
            .zip(highest.iter().zip(&lowest))
            .map(|(bar, (hh, ll))| {
                let midrange = (hh + ll) / 2.0;
                bar.close - (bar.close + midrange) / 2.0
            })
            .collect();
        let momentum = linreg_of_series(&source, s.kc_length);

        let (Some(value), previous) = last_two_valid(&momentum) else {
            return Ok(SqueezeState::neutral());
        };
        if !value.is_finite() {
            return Err(fault("squeeze", format!("non-finite momentum {value}")));
        }

        Ok(SqueezeState {
            value,
            status,
            momentum_trend: MomentumTrend::classify(value, previous),
        })
    }

    // ── ADX / DI ─────────────────────────────────────────────────────

    pub fn adx(&self, series: &Series) -> AdxState {
        resolve("adx", self.try_adx(series), AdxState::neutral(), AdxState::neutral())
    }

    pub fn try_adx(&self, series: &Series) -> Result<AdxState, AnalysisError> {
        let s = &self.settings;
        gate(series, s.adx_gate())?;
        let lines = Dmi::new(s.di_length, s.adx_length).compute(series.bars());

        let latest = |values: &[f64], what: &str| {
            last_valid(values)
                .filter(|v| v.is_finite())
                .ok_or_else(|| fault("adx", format!("no valid {what}")))
        };
        let adx = latest(&lines.adx, "ADX")?;
        let plus_di = latest(&lines.plus_di, "+DI")?;
        let minus_di = latest(&lines.minus_di, "-DI")?;

        Ok(AdxState {
            adx,
            plus_di,
            minus_di,
            strength: AdxStrength::from_adx(adx),
            above_key_level: adx > s.adx_key_level,
            direction: Direction::compare(plus_di, minus_di),
        })
    }
}

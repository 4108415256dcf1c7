//! Indicator parameters

use crate::error::{FrameError, Result};
use crate::utils::{validate_period, validate_range};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Windows, spans and multipliers for every indicator.
///
/// Missing fields in a loaded file fall back to the defaults below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    /// Span of the standalone close EMA
    pub ema_span: usize,
    /// Bollinger window
    pub bollinger_window: usize,
    /// Bollinger band width in standard deviations
    pub bollinger_width: f64,
    /// RSI window
    pub rsi_window: usize,
    /// MACD fast EMA span
    pub macd_fast: usize,
    /// MACD slow EMA span
    pub macd_slow: usize,
    /// MACD signal EMA span
    pub macd_signal: usize,
    /// ATR window
    pub atr_window: usize,
    /// MFI window
    pub mfi_window: usize,
    /// Envelope SMA window
    pub envelope_window: usize,
    /// Envelope offset as a fraction of the SMA
    pub envelope_offset: f64,
    /// Chaikin fast EMA span over the ADL
    pub chaikin_fast: usize,
    /// Chaikin slow EMA span over the ADL
    pub chaikin_slow: usize,
    /// Stochastic look-back window
    pub stochastic_k: usize,
    /// Stochastic %D smoothing window
    pub stochastic_d: usize,
    /// Short trend SMA window
    pub sma_short: usize,
    /// Long trend SMA window
    pub sma_long: usize,
    /// Window of the daily-return standard deviation
    pub volatility_window: usize,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            ema_span: 20,
            bollinger_window: 20,
            bollinger_width: 2.0,
            rsi_window: 14,
            macd_fast: 12,
            macd_slow: 26,
            macd_signal: 9,
            atr_window: 14,
            mfi_window: 14,
            envelope_window: 20,
            envelope_offset: 0.025,
            chaikin_fast: 3,
            chaikin_slow: 10,
            stochastic_k: 14,
            stochastic_d: 3,
            sma_short: 50,
            sma_long: 200,
            volatility_window: 21,
        }
    }
}

impl IndicatorConfig {
    /// Parses a JSON document and validates it.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and validates a JSON config file.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Largest window any indicator uses; shorter series leave trailing
    /// indicators entirely undefined rather than failing.
    pub fn largest_window(&self) -> usize {
        [
            self.ema_span,
            self.bollinger_window,
            self.rsi_window + 1,
            self.macd_slow,
            self.atr_window,
            self.mfi_window + 1,
            self.envelope_window,
            self.chaikin_slow,
            (self.stochastic_k + self.stochastic_d).saturating_sub(1),
            self.sma_short,
            self.sma_long,
            self.volatility_window + 1,
        ]
        .into_iter()
        .max()
        .unwrap_or(0)
    }

    /// Checks that every parameter is usable.
    ///
    /// # Errors
    /// [`FrameError::InvalidConfig`] for a zero window or span, a fast span
    /// not below its slow span, a non-finite or non-positive band width, or an envelope
    /// offset outside `[0, 1)`.
    pub fn validate(&self) -> Result<()> {
        let windows = [
            (self.ema_span, "ema_span"),
            (self.bollinger_window, "bollinger_window"),
            (self.rsi_window, "rsi_window"),
            (self.macd_fast, "macd_fast"),
            (self.macd_slow, "macd_slow"),
            (self.macd_signal, "macd_signal"),
            (self.atr_window, "atr_window"),
            (self.mfi_window, "mfi_window"),
            (self.envelope_window, "envelope_window"),
            (self.chaikin_fast, "chaikin_fast"),
            (self.chaikin_slow, "chaikin_slow"),
            (self.stochastic_k, "stochastic_k"),
            (self.stochastic_d, "stochastic_d"),
            (self.sma_short, "sma_short"),
            (self.sma_long, "sma_long"),
            (self.volatility_window, "volatility_window"),
        ];
        for (value, name) in windows {
            validate_period(value, 1, name).map_err(FrameError::InvalidConfig)?;
        }

        if self.macd_fast >= self.macd_slow {
            return Err(FrameError::InvalidConfig(
                "macd_fast must be smaller than macd_slow".to_string(),
            ));
        }
        if self.chaikin_fast >= self.chaikin_slow {
            return Err(FrameError::InvalidConfig(
                "chaikin_fast must be smaller than chaikin_slow".to_string(),
            ));
        }
        if !self.bollinger_width.is_finite() || self.bollinger_width <= 0.0 {
            return Err(FrameError::InvalidConfig(
                "bollinger_width must be greater than zero".to_string(),
            ));
        }
        validate_range(self.envelope_offset, 0.0, 1.0, "envelope_offset")
            .map_err(FrameError::InvalidConfig)?;

        Ok(())
    }
}

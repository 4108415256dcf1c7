//! # Trade Math
//!
//! Mathematical calculations for technical indicators.
//!
//! Every function in this crate is a batch transform: it takes whole
//! series and returns a series of the same length. Points that cannot be
//! computed (warm-up, division by zero) are `f64::NAN`, and an undefined
//! input anywhere in a window makes that window's output undefined.
//!
//! - [`rolling`]: trailing-window mean, sample standard deviation, min, max, sum
//! - [`moving_averages`]: exponential moving average and moving-average envelopes
//! - [`oscillators`]: RSI, MACD, Stochastic
//! - [`volatility`]: Bollinger Bands, ATR, return volatility
//! - [`volume`]: intrabar OBV, Money Flow Index, Chaikin Oscillator

use thiserror::Error;

// Indicator modules
pub mod moving_averages;
pub mod oscillators;
pub mod rolling;
pub mod volatility;
pub mod volume;

/// Errors that can occur in trading-related calculations
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Series length mismatch: expected {expected}, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
}

/// Result type for trading math operations
pub type Result<T> = std::result::Result<T, MathError>;

/// Marker for a point with no defined value.
pub const UNDEFINED: f64 = f64::NAN;

/// Returns `true` when `value` is a defined point.
#[inline]
pub fn is_defined(value: f64) -> bool {
    !value.is_nan()
}

pub(crate) fn check_window(window: usize, what: &str) -> Result<()> {
    if window == 0 {
        return Err(MathError::InvalidInput(format!(
            "{what} must be greater than zero"
        )));
    }
    Ok(())
}

pub(crate) fn check_same_len(expected: usize, others: &[&[f64]]) -> Result<()> {
    for series in others {
        if series.len() != expected {
            return Err(MathError::LengthMismatch {
                expected,
                actual: series.len(),
            });
        }
    }
    Ok(())
}

/// Elementwise `a - b`.
pub fn difference(a: &[f64], b: &[f64]) -> Result<Vec<f64>> {
    check_same_len(a.len(), &[b])?;
    Ok(a.iter().zip(b).map(|(x, y)| x - y).collect())
}

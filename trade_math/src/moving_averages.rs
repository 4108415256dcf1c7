//! Moving average calculation implementations
//!
//! Contains:
//! - Simple Moving Average (SMA)
//! - Exponential Moving Average (EMA)
//! - Moving-average envelopes

use crate::rolling::trailing_mean;
use crate::{check_window, MathError, Result};
use serde::{Deserialize, Serialize};

/// Simple moving average of `series` over `period` points.
pub fn simple_moving_average(series: &[f64], period: usize) -> Result<Vec<f64>> {
    check_window(period, "Period")?;
    trailing_mean(series, period)
}

/// Smoothing factor for an EMA of the given span: `2 / (span + 1)`.
pub fn ema_alpha(span: usize) -> f64 {
    2.0 / (span as f64 + 1.0)
}

/// Exponential moving average.
///
/// The first output equals the first input and every later output is
/// `alpha * x[i] + (1 - alpha) * ema[i-1]`. There is no warm-up gap and
/// earlier observations are not re-weighted, so early values differ from
/// an EMA seeded with a simple average.
///
/// An undefined input makes that output and every later one undefined.
pub fn ema(series: &[f64], span: usize) -> Result<Vec<f64>> {
    check_window(span, "Span")?;

    let alpha = ema_alpha(span);
    let mut out = Vec::with_capacity(series.len());
    let mut prev: Option<f64> = None;

    for &value in series {
        let current = match prev {
            None => value,
            Some(p) => alpha * value + (1.0 - alpha) * p,
        };
        out.push(current);
        prev = Some(current);
    }

    Ok(out)
}

/// Three aligned bands around a middle line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bands {
    /// Upper band
    pub upper: Vec<f64>,
    /// Middle line
    pub middle: Vec<f64>,
    /// Lower band
    pub lower: Vec<f64>,
}

/// Envelope at a fixed fractional offset around `middle`.
///
/// `upper = middle * (1 + offset)`, `lower = middle * (1 - offset)`.
pub fn envelope(middle: &[f64], offset: f64) -> Result<Bands> {
    if !(0.0..1.0).contains(&offset) {
        return Err(MathError::InvalidInput(
            "Envelope offset must be in [0, 1)".to_string(),
        ));
    }

    Ok(Bands {
        upper: middle.iter().map(|m| m * (1.0 + offset)).collect(),
        middle: middle.to_vec(),
        lower: middle.iter().map(|m| m * (1.0 - offset)).collect(),
    })
}

/// Moving-average envelope of `close`: a `period` SMA shifted by `offset`.
pub fn moving_average_envelope(close: &[f64], period: usize, offset: f64) -> Result<Bands> {
    let middle = simple_moving_average(close, period)?;
    envelope(&middle, offset)
}

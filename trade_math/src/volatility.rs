//! Volatility indicator implementations
//!
//! Contains:
//! - Bollinger Bands
//! - Average True Range (ATR), intrabar variant
//! - Daily returns and rolling return volatility

use crate::moving_averages::Bands;
use crate::rolling::{trailing_mean, trailing_std};
use crate::{check_same_len, check_window, MathError, Result, UNDEFINED};

/// Bands at `width` deviations around a middle line.
///
/// `upper = middle + width * deviation`, `lower = middle - width * deviation`.
/// A point is undefined wherever either input is.
pub fn bands_from_deviation(middle: &[f64], deviation: &[f64], width: f64) -> Result<Bands> {
    check_same_len(middle.len(), &[deviation])?;
    if width <= 0.0 {
        return Err(MathError::InvalidInput(
            "Band width must be greater than zero".to_string(),
        ));
    }

    let (upper, lower): (Vec<f64>, Vec<f64>) = middle
        .iter()
        .zip(deviation)
        .map(|(m, d)| (m + width * d, m - width * d))
        .unzip();

    Ok(Bands {
        upper,
        middle: middle.to_vec(),
        lower,
    })
}

/// Bollinger Bands: `period` SMA of `close` with `width` sample standard deviations.
pub fn bollinger_bands(close: &[f64], period: usize, width: f64) -> Result<Bands> {
    let middle = trailing_mean(close, period)?;
    let deviation = trailing_std(close, period)?;
    bands_from_deviation(&middle, &deviation, width)
}

/// Intrabar true range `|high - low|`.
///
/// The gap against the previous close that the canonical true range
/// includes is deliberately left out.
pub fn intrabar_range(high: &[f64], low: &[f64]) -> Result<Vec<f64>> {
    check_same_len(high.len(), &[low])?;
    Ok(high.iter().zip(low).map(|(h, l)| (h - l).abs()).collect())
}

/// Average of the intrabar true range over `period` points.
pub fn average_true_range(high: &[f64], low: &[f64], period: usize) -> Result<Vec<f64>> {
    check_window(period, "Period")?;
    let range = intrabar_range(high, low)?;
    trailing_mean(&range, period)
}

/// Simple returns `close[i] / close[i-1] - 1`, undefined at 0.
pub fn daily_returns(close: &[f64]) -> Vec<f64> {
    let mut out = vec![UNDEFINED; close.len()];
    for i in 1..close.len() {
        out[i] = if close[i - 1] == 0.0 {
            UNDEFINED
        } else {
            close[i] / close[i - 1] - 1.0
        };
    }
    out
}

/// Sample standard deviation of daily returns over `window` points.
pub fn return_volatility(close: &[f64], window: usize) -> Result<Vec<f64>> {
    trailing_std(&daily_returns(close), window)
}

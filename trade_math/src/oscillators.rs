//! Oscillator indicator implementations
//!
//! Contains:
//! - Relative Strength Index (RSI)
//! - Moving Average Convergence Divergence (MACD)
//! - Stochastic Oscillator

use crate::moving_averages::ema;
use crate::rolling::{first_difference, trailing_max, trailing_mean, trailing_min};
use crate::{check_same_len, check_window, difference, MathError, Result, UNDEFINED};
use serde::{Deserialize, Serialize};

/// RSI reported for a window with neither gains nor losses.
pub const FLAT_MARKET_RSI: f64 = 50.0;

/// Upward close-to-close moves, `max(delta, 0)`; undefined at 0.
pub fn gains(close: &[f64]) -> Vec<f64> {
    first_difference(close)
        .into_iter()
        .map(|d| if d.is_nan() { UNDEFINED } else { d.max(0.0) })
        .collect()
}

/// Downward close-to-close moves as positive numbers, `max(-delta, 0)`; undefined at 0.
pub fn losses(close: &[f64]) -> Vec<f64> {
    first_difference(close)
        .into_iter()
        .map(|d| if d.is_nan() { UNDEFINED } else { (-d).max(0.0) })
        .collect()
}

/// Combines average gain and average loss into RSI.
///
/// | avg gain | avg loss | RSI |
/// |---|---|---|
/// | any | > 0 | `100 - 100 / (1 + gain / loss)` |
/// | > 0 | 0 | 100 |
/// | 0 | 0 | [`FLAT_MARKET_RSI`] |
pub fn rsi_from_averages(avg_gain: &[f64], avg_loss: &[f64]) -> Result<Vec<f64>> {
    check_same_len(avg_gain.len(), &[avg_loss])?;

    Ok(avg_gain
        .iter()
        .zip(avg_loss)
        .map(|(&gain, &loss)| {
            if gain.is_nan() || loss.is_nan() {
                UNDEFINED
            } else if loss == 0.0 && gain == 0.0 {
                FLAT_MARKET_RSI
            } else if loss == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + gain / loss)
            }
        })
        .collect())
}

/// Relative Strength Index using simple trailing means of gains and losses.
///
/// The first defined point is at index `period`, since the move into
/// index 0 is unknown.
pub fn rsi(close: &[f64], period: usize) -> Result<Vec<f64>> {
    check_window(period, "Period")?;
    let avg_gain = trailing_mean(&gains(close), period)?;
    let avg_loss = trailing_mean(&losses(close), period)?;
    rsi_from_averages(&avg_gain, &avg_loss)
}

/// MACD line, signal line and histogram.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Macd {
    /// Fast EMA minus slow EMA
    pub macd: Vec<f64>,
    /// EMA of the MACD line
    pub signal: Vec<f64>,
    /// MACD line minus signal line
    pub histogram: Vec<f64>,
}

/// Assembles MACD from precomputed fast and slow EMAs.
pub fn macd_from_emas(fast: &[f64], slow: &[f64], signal_period: usize) -> Result<Macd> {
    let macd = difference(fast, slow)?;
    let signal = ema(&macd, signal_period)?;
    let histogram = difference(&macd, &signal)?;
    Ok(Macd {
        macd,
        signal,
        histogram,
    })
}

/// Moving Average Convergence Divergence of `close`.
pub fn macd(
    close: &[f64],
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
) -> Result<Macd> {
    if fast_period >= slow_period {
        return Err(MathError::InvalidInput(
            "Fast period must be smaller than slow period".to_string(),
        ));
    }

    let fast = ema(close, fast_period)?;
    let slow = ema(close, slow_period)?;
    macd_from_emas(&fast, &slow, signal_period)
}

/// Stochastic %K and %D.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stochastic {
    /// Position of close within the look-back range, 0-100
    pub k: Vec<f64>,
    /// Simple moving average of %K
    pub d: Vec<f64>,
}

/// `%K = 100 * (close - lowest) / (highest - lowest)`.
///
/// Undefined where the range is zero.
pub fn percent_k(close: &[f64], lowest_low: &[f64], highest_high: &[f64]) -> Result<Vec<f64>> {
    check_same_len(close.len(), &[lowest_low, highest_high])?;

    Ok(close
        .iter()
        .zip(lowest_low.iter().zip(highest_high))
        .map(|(&c, (&lo, &hi))| {
            let range = hi - lo;
            if range.is_nan() || range == 0.0 {
                UNDEFINED
            } else {
                100.0 * (c - lo) / range
            }
        })
        .collect())
}

/// Stochastic Oscillator over a `k_period` look-back with `d_period` smoothing.
pub fn stochastic(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    k_period: usize,
    d_period: usize,
) -> Result<Stochastic> {
    check_window(k_period, "K period")?;
    check_window(d_period, "D period")?;

    let lowest_low = trailing_min(low, k_period)?;
    let highest_high = trailing_max(high, k_period)?;
    let k = percent_k(close, &lowest_low, &highest_high)?;
    let d = trailing_mean(&k, d_period)?;
    Ok(Stochastic { k, d })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use rstest::rstest;

    #[test]
    fn test_rsi_flat_market_uses_fallback() {
        let close = vec![100.0; 20];
        let out = rsi(&close, 14).unwrap();

        assert!(out[..14].iter().all(|v| v.is_nan()));
        assert!(out[14..].iter().all(|&v| v == FLAT_MARKET_RSI));
    }

    #[test]
    fn test_rsi_no_losses_is_100() {
        let close: Vec<f64> = (0..20).map(|i| 100.0 + i as f64).collect();
        let out = rsi(&close, 14).unwrap();
        assert!(out[14..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_rsi_no_gains_is_0() {
        let close: Vec<f64> = (0..20).map(|i| 100.0 - i as f64).collect();
        let out = rsi(&close, 14).unwrap();
        assert!(out[14..].iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_rsi_known_value() {
        // Moves: +1, -1, +2 -> avg gain 1, avg loss 1/3, RS = 3, RSI = 75
        let out = rsi(&[10.0, 11.0, 10.0, 12.0], 3).unwrap();
        assert_relative_eq!(out[3], 75.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(0.5)]
    #[case(1.5)]
    #[case(3.0)]
    fn test_rsi_bounded(#[case] step: f64) {
        let close: Vec<f64> = (0..60)
            .map(|i| 100.0 + (i as f64 * step).sin() * 10.0)
            .collect();
        let out = rsi(&close, 14).unwrap();
        for v in out.into_iter().filter(|v| !v.is_nan()) {
            assert!((0.0..=100.0).contains(&v));
        }
    }

    #[test]
    fn test_macd_is_exact_difference_of_emas() {
        let close: Vec<f64> = (0..50).map(|i| 100.0 + (i as f64 * 0.4).sin() * 3.0).collect();
        let result = macd(&close, 12, 26, 9).unwrap();
        let fast = ema(&close, 12).unwrap();
        let slow = ema(&close, 26).unwrap();

        for i in 0..close.len() {
            assert_eq!(result.macd[i], fast[i] - slow[i]);
            assert_eq!(result.histogram[i], result.macd[i] - result.signal[i]);
        }
        assert_eq!(result.macd[0], 0.0);
        assert_eq!(result.signal[0], 0.0);
    }

    #[test]
    fn test_macd_rejects_inverted_periods() {
        assert!(macd(&[1.0, 2.0], 26, 12, 9).is_err());
    }

    #[test]
    fn test_stochastic_flat_range_is_undefined() {
        let price = vec![50.0; 20];
        let result = stochastic(&price, &price, &price, 14, 3).unwrap();
        assert!(result.k.iter().all(|v| v.is_nan()));
        assert!(result.d.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn test_stochastic_values() {
        let high = [110.0, 115.0, 120.0, 125.0];
        let low = [100.0, 105.0, 110.0, 115.0];
        let close = [105.0, 110.0, 115.0, 120.0];
        let result = stochastic(&high, &low, &close, 3, 2).unwrap();

        assert!(result.k[1].is_nan());
        // Window 0..=2: lowest 100, highest 120
        assert_relative_eq!(result.k[2], 75.0);
        // Window 1..=3: lowest 105, highest 125
        assert_relative_eq!(result.k[3], 75.0);
        assert!(result.d[2].is_nan());
        assert_relative_eq!(result.d[3], 75.0);
    }
}

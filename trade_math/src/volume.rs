//! Volume indicator implementations
//!
//! Contains:
//! - Intrabar On-Balance Volume (non-canonical OBV)
//! - Money Flow Index (MFI)
//! - Accumulation/Distribution Line and Chaikin Oscillator

use crate::moving_averages::ema;
use crate::rolling::{cumulative_sum_skipping_undefined, trailing_sum};
use crate::{check_same_len, check_window, difference, MathError, Result, UNDEFINED};

/// Per-bar term of the intrabar OBV: `volume * (close - open) / (high - low)`.
///
/// Undefined when `high == low`.
pub fn intrabar_volume_flow(
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
) -> Result<Vec<f64>> {
    check_same_len(open.len(), &[high, low, close, volume])?;

    Ok((0..open.len())
        .map(|i| {
            let range = high[i] - low[i];
            if range == 0.0 {
                UNDEFINED
            } else {
                volume[i] * (close[i] - open[i]) / range
            }
        })
        .collect())
}

/// On-Balance Volume weighted by where the bar closed inside its range.
///
/// This is not the sign-of-change accumulator usually called OBV: each bar
/// adds `volume * (close - open) / (high - low)`. Bars with `high == low`
/// are undefined and add nothing; the running total carries past them.
pub fn intrabar_obv(
    open: &[f64],
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
) -> Result<Vec<f64>> {
    let flow = intrabar_volume_flow(open, high, low, close, volume)?;
    Ok(cumulative_sum_skipping_undefined(&flow))
}

/// Typical price `(high + low + close) / 3`.
pub fn typical_price(high: &[f64], low: &[f64], close: &[f64]) -> Result<Vec<f64>> {
    check_same_len(high.len(), &[low, close])?;
    Ok((0..high.len())
        .map(|i| (high[i] + low[i] + close[i]) / 3.0)
        .collect())
}

/// Raw money flow split by direction of the typical price.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalFlow {
    /// `typical * volume` where typical rose, else 0
    pub positive: Vec<f64>,
    /// `typical * volume` where typical fell, else 0
    pub negative: Vec<f64>,
}

/// Splits raw money flow by whether the typical price rose or fell.
///
/// Index 0 has no prior typical price and is undefined in both series.
pub fn directional_money_flow(typical: &[f64], volume: &[f64]) -> Result<DirectionalFlow> {
    check_same_len(typical.len(), &[volume])?;

    let len = typical.len();
    let mut positive = vec![UNDEFINED; len];
    let mut negative = vec![UNDEFINED; len];

    for i in 1..len {
        let raw = typical[i] * volume[i];
        let (pos, neg) = if typical[i] > typical[i - 1] {
            (raw, 0.0)
        } else if typical[i] < typical[i - 1] {
            (0.0, raw)
        } else {
            (0.0, 0.0)
        };
        positive[i] = pos;
        negative[i] = neg;
    }

    Ok(DirectionalFlow { positive, negative })
}

/// Combines windowed positive and negative flow sums into MFI.
///
/// `neg == 0` with `pos > 0` gives 100. With both sums zero there is no
/// flow to compare and the point is undefined.
pub fn mfi_from_sums(positive: &[f64], negative: &[f64]) -> Result<Vec<f64>> {
    check_same_len(positive.len(), &[negative])?;

    Ok(positive
        .iter()
        .zip(negative)
        .map(|(&pos, &neg)| {
            if pos.is_nan() || neg.is_nan() {
                UNDEFINED
            } else if neg == 0.0 && pos == 0.0 {
                UNDEFINED
            } else if neg == 0.0 {
                100.0
            } else {
                100.0 - 100.0 / (1.0 + pos / neg)
            }
        })
        .collect())
}

/// Money Flow Index over `period` points.
pub fn money_flow_index(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    period: usize,
) -> Result<Vec<f64>> {
    check_window(period, "Period")?;
    let typical = typical_price(high, low, close)?;
    let flow = directional_money_flow(&typical, volume)?;
    let pos = trailing_sum(&flow.positive, period)?;
    let neg = trailing_sum(&flow.negative, period)?;
    mfi_from_sums(&pos, &neg)
}

/// Accumulation/Distribution Line.
///
/// Each bar adds `volume * (2*close - high - low) / (high - low)`; a bar
/// with `high == low` adds 0.
pub fn accumulation_distribution(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
) -> Result<Vec<f64>> {
    check_same_len(high.len(), &[low, close, volume])?;

    let mut total = 0.0;
    Ok((0..high.len())
        .map(|i| {
            let range = high[i] - low[i];
            let multiplier = if range == 0.0 {
                0.0
            } else {
                (2.0 * close[i] - high[i] - low[i]) / range
            };
            total += multiplier * volume[i];
            total
        })
        .collect())
}

/// Chaikin Oscillator from precomputed fast and slow EMAs of the ADL.
pub fn chaikin_from_emas(fast: &[f64], slow: &[f64]) -> Result<Vec<f64>> {
    difference(fast, slow)
}

/// Chaikin Oscillator: `ema(ADL, fast) - ema(ADL, slow)`.
pub fn chaikin_oscillator(
    high: &[f64],
    low: &[f64],
    close: &[f64],
    volume: &[f64],
    fast_period: usize,
    slow_period: usize,
) -> Result<Vec<f64>> {
    if fast_period >= slow_period {
        return Err(MathError::InvalidInput(
            "Fast period must be smaller than slow period".to_string(),
        ));
    }

    let adl = accumulation_distribution(high, low, close, volume)?;
    let fast = ema(&adl, fast_period)?;
    let slow = ema(&adl, slow_period)?;
    chaikin_from_emas(&fast, &slow)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_intrabar_obv_accumulates() {
        let open = [10.0, 11.0];
        let high = [12.0, 12.0];
        let low = [9.0, 10.0];
        let close = [11.5, 10.5];
        let volume = [300.0, 400.0];
        let obv = intrabar_obv(&open, &high, &low, &close, &volume).unwrap();

        assert_relative_eq!(obv[0], 150.0);
        assert_relative_eq!(obv[1], 150.0 - 100.0);
    }

    #[test]
    fn test_intrabar_obv_skips_zero_range_bars() {
        let open = [10.0, 10.0, 10.0];
        let high = [11.0, 10.0, 11.0];
        let low = [9.0, 10.0, 9.0];
        let close = [11.0, 10.0, 11.0];
        let volume = [100.0, 100.0, 100.0];
        let obv = intrabar_obv(&open, &high, &low, &close, &volume).unwrap();

        assert_eq!(obv[0], 50.0);
        assert!(obv[1].is_nan());
        assert_eq!(obv[2], 100.0);
    }

    #[test]
    fn test_mfi_rising_typical_is_100() {
        let high: Vec<f64> = (0..30).map(|i| 101.0 + i as f64).collect();
        let low: Vec<f64> = (0..30).map(|i| 99.0 + i as f64).collect();
        let close: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
        let volume = vec![1_000.0; 30];
        let mfi = money_flow_index(&high, &low, &close, &volume, 14).unwrap();

        assert!(mfi[..14].iter().all(|v| v.is_nan()));
        assert!(mfi[14..].iter().all(|&v| v == 100.0));
    }

    #[test]
    fn test_mfi_known_value() {
        // typical: 10, 11, 10, 12 with unit volume
        let typical = [10.0, 11.0, 10.0, 12.0];
        let flow = directional_money_flow(&typical, &[1.0; 4]).unwrap();
        let pos = trailing_sum(&flow.positive, 3).unwrap();
        let neg = trailing_sum(&flow.negative, 3).unwrap();
        let mfi = mfi_from_sums(&pos, &neg).unwrap();

        // pos = 11 + 12 = 23, neg = 10
        assert_relative_eq!(mfi[3], 100.0 - 100.0 / (1.0 + 2.3), epsilon = 1e-12);
    }

    #[test]
    fn test_mfi_without_flow_is_undefined() {
        let out = mfi_from_sums(&[0.0], &[0.0]).unwrap();
        assert!(out[0].is_nan());
    }

    #[test]
    fn test_adl_zero_range_contributes_nothing() {
        let high = [12.0, 10.0];
        let low = [10.0, 10.0];
        let close = [12.0, 10.0];
        let volume = [100.0, 500.0];
        let adl = accumulation_distribution(&high, &low, &close, &volume).unwrap();
        assert_eq!(adl, vec![100.0, 100.0]);
    }

    #[test]
    fn test_chaikin_starts_at_zero() {
        let high = [12.0, 13.0, 14.0];
        let low = [10.0, 11.0, 12.0];
        let close = [11.5, 12.0, 13.5];
        let volume = [100.0, 200.0, 300.0];
        let osc = chaikin_oscillator(&high, &low, &close, &volume, 3, 10).unwrap();
        assert_eq!(osc[0], 0.0);
        assert!(osc.iter().all(|v| v.is_finite()));
    }
}

//! Trailing-window aggregations
//!
//! Every window is trailing and includes the current point. The first
//! `window - 1` outputs are always undefined, and so is any output whose
//! window contains an undefined input.
//!
//! Each window is summed from scratch rather than maintained as a running
//! total, so a value that leaves the window leaves no rounding residue
//! behind (a window of zeros sums to exactly `0.0`).

use crate::{check_window, Result, UNDEFINED};

/// Applies `reduce` to every full trailing window of `series`.
fn trailing_apply<F>(series: &[f64], window: usize, reduce: F) -> Result<Vec<f64>>
where
    F: Fn(&[f64]) -> f64,
{
    check_window(window, "Window")?;

    let mut out = vec![UNDEFINED; series.len()];
    if series.len() < window {
        return Ok(out);
    }

    for i in (window - 1)..series.len() {
        let slice = &series[i + 1 - window..=i];
        if slice.iter().any(|v| v.is_nan()) {
            continue;
        }
        out[i] = reduce(slice);
    }

    Ok(out)
}

/// Arithmetic mean of the trailing window.
pub fn trailing_mean(series: &[f64], window: usize) -> Result<Vec<f64>> {
    trailing_apply(series, window, |w| w.iter().sum::<f64>() / w.len() as f64)
}

/// Sample standard deviation (divides by `window - 1`) of the trailing window.
///
/// A window of one has no sample deviation, so every output is undefined.
pub fn trailing_std(series: &[f64], window: usize) -> Result<Vec<f64>> {
    if window == 1 {
        return Ok(vec![UNDEFINED; series.len()]);
    }

    trailing_apply(series, window, |w| {
        let n = w.len() as f64;
        let mean = w.iter().sum::<f64>() / n;
        let variance = w.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / (n - 1.0);
        variance.sqrt()
    })
}

/// Minimum of the trailing window.
pub fn trailing_min(series: &[f64], window: usize) -> Result<Vec<f64>> {
    trailing_apply(series, window, |w| w.iter().copied().fold(f64::INFINITY, f64::min))
}

/// Maximum of the trailing window.
pub fn trailing_max(series: &[f64], window: usize) -> Result<Vec<f64>> {
    trailing_apply(series, window, |w| {
        w.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    })
}

/// Sum of the trailing window.
pub fn trailing_sum(series: &[f64], window: usize) -> Result<Vec<f64>> {
    trailing_apply(series, window, |w| w.iter().sum())
}

/// First difference: `out[i] = series[i] - series[i-1]`, undefined at 0.
pub fn first_difference(series: &[f64]) -> Vec<f64> {
    let mut out = vec![UNDEFINED; series.len()];
    for i in 1..series.len() {
        out[i] = series[i] - series[i - 1];
    }
    out
}

/// Running total of `series`.
///
/// Undefined inputs are skipped: their output point is undefined and they
/// add nothing to the total carried into later points.
pub fn cumulative_sum_skipping_undefined(series: &[f64]) -> Vec<f64> {
    let mut total = 0.0;
    series
        .iter()
        .map(|&v| {
            if v.is_nan() {
                UNDEFINED
            } else {
                total += v;
                total
            }
        })
        .collect()
}

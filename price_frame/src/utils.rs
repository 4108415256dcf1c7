//! Utility functions and helpers
//!
//! Fixture builders for tests and demos, and small parameter checks shared
//! by the configuration layer.

use crate::series::PricePoint;
use chrono::{DateTime, Duration, TimeZone, Utc};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn base_timestamp() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2023, 1, 2, 0, 0, 0)
        .single()
        .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
}

/// Builds a point `day` days after 2023-01-02.
pub fn point_at(day: i64, open: f64, high: f64, low: f64, close: f64, volume: f64) -> PricePoint {
    PricePoint::new(
        base_timestamp() + Duration::days(day),
        open,
        high,
        low,
        close,
        volume,
    )
}

/// Builds daily points whose open, high, low and close all equal `closes[i]`.
pub fn flat_bars(closes: &[f64], volume: f64) -> Vec<PricePoint> {
    closes
        .iter()
        .enumerate()
        .map(|(i, &c)| point_at(i as i64, c, c, c, c, volume))
        .collect()
}

/// Generate a deterministic random walk of daily OHLCV points
///
/// # Arguments
/// * `num_points` - Number of data points to generate
/// * `starting_price` - Initial price for the first data point
/// * `volatility` - Price volatility factor (0.0-1.0)
/// * `seed` - RNG seed; equal seeds give identical series
pub fn generate_test_data(
    num_points: usize,
    starting_price: f64,
    volatility: f64,
    seed: u64,
) -> Vec<PricePoint> {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut data = Vec::with_capacity(num_points);
    let mut current_price = starting_price;

    for i in 0..num_points {
        let price_change = current_price * volatility * (rng.gen::<f64>() - 0.5);
        let open = current_price;
        let close = (open + price_change).max(0.01);

        // Wicks sit outside the open/close body
        let high = open.max(close) + rng.gen::<f64>() * volatility * open * 0.5;
        let low = (open.min(close) - rng.gen::<f64>() * volatility * open * 0.5).max(0.005);

        let volume = rng.gen_range(1_000.0..10_000.0_f64).round();

        data.push(point_at(i as i64, open, high, low, close, volume));
        current_price = close;
    }

    data
}

/// Basic validation for window parameters
pub fn validate_period(period: usize, min_value: usize, name: &str) -> Result<(), String> {
    if period < min_value {
        return Err(format!("{name} must be at least {min_value}"));
    }
    Ok(())
}

/// Validate a value is within a half-open range `[min, max)`
pub fn validate_range(value: f64, min: f64, max: f64, name: &str) -> Result<(), String> {
    if !(min..max).contains(&value) {
        return Err(format!("{name} must be in [{min}, {max})"));
    }
    Ok(())
}

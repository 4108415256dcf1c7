//! # OHLCV Indicators
//!
//! `ohlcv_indicators` computes a fixed set of technical indicators over one
//! asset's validated OHLCV history and hands back an immutable, index-aligned
//! [`IndicatorSet`].
//!
//! The work is split across two crates, both re-exported here:
//!
//! - [`trade_math`]: rolling-window and exponential smoothing primitives, and
//!   the per-indicator formulas built from them
//! - [`price_frame`]: validated price series, configuration, and the
//!   memoizing engine that assembles every indicator into one set
//!
//! ## Example
//!
//! ```
//! use ohlcv_indicators::{compute_indicators, OutputKey, PriceSeries, PriceSummary};
//! use ohlcv_indicators::price_frame::utils::generate_test_data;
//!
//! let prices = PriceSeries::new(generate_test_data(60, 100.0, 0.05, 7)).unwrap();
//! let set = compute_indicators(&prices);
//!
//! let rsi = set.series(OutputKey::Rsi).unwrap();
//! assert_eq!(rsi.len(), 60);
//! assert!(rsi.get(13).is_none());
//!
//! let summary = PriceSummary::from_series(&prices).unwrap();
//! assert_eq!(summary.last_close, prices.closes()[59]);
//! ```

pub use price_frame;
pub use trade_math;

pub use price_frame::{
    compute_indicators, compute_indicators_with, compute_many, Field, FrameError,
    IndicatorConfig, IndicatorEngine, IndicatorKind, IndicatorSeries, IndicatorSet, OutputKey,
    PricePoint, PriceSeries, PriceSummary,
};

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use price_frame::utils::generate_test_data;

    #[test]
    fn test_reexports_compute_a_full_set() {
        let prices = PriceSeries::new(generate_test_data(220, 50.0, 0.03, 1)).unwrap();
        let set = compute_indicators(&prices);

        assert!(set.is_complete());
        assert_eq!(set.names().len(), 22);
        assert!(set.series(OutputKey::SmaLong).unwrap().get(199).is_some());
    }

    #[test]
    fn test_latest_values_match_series_tail() {
        let prices = PriceSeries::new(generate_test_data(40, 50.0, 0.03, 2)).unwrap();
        let set = compute_indicators(&prices);
        let latest = set.latest_values();

        let ema = set.series(OutputKey::Ema).unwrap();
        assert_relative_eq!(latest[&OutputKey::Ema].unwrap(), ema.get(39).unwrap());
        assert_eq!(latest[&OutputKey::SmaShort], None);
    }
}

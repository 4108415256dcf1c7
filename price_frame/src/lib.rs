//! # Price Frame
//!
//! `price_frame` turns a validated OHLCV price series into a complete,
//! index-aligned set of technical indicator series.
//!
//! ## Overview
//!
//! - [`PriceSeries`]: chronologically ordered OHLCV points, validated on construction
//! - [`IndicatorEngine`]: computes indicators on demand, memoizing every shared primitive
//! - [`IndicatorSet`]: the frozen result, one named series per indicator output
//! - [`IndicatorConfig`]: windows, spans and multipliers, loadable from JSON
//!
//! ## Usage Example
//!
//! ```
//! use price_frame::utils::generate_test_data;
//! use price_frame::{compute_indicators, IndicatorKind, PriceSeries};
//!
//! let prices = PriceSeries::new(generate_test_data(100, 100.0, 0.05, 42)).unwrap();
//! let set = compute_indicators(&prices);
//!
//! assert_eq!(set.len(), prices.len());
//! for series in set.select(&[IndicatorKind::Rsi, IndicatorKind::Macd]) {
//!     println!("{}: {:?}", series.name(), series.last());
//! }
//! ```

pub mod cache;
pub mod config;
pub mod engine;
pub mod error;
pub mod export;
pub mod kind;
pub mod loader;
pub mod series;
pub mod set;
pub mod summary;
// Fixtures and parameter checks
pub mod utils;
pub mod validation;

pub use cache::{CacheStats, PrimitiveCache};
pub use config::IndicatorConfig;
pub use engine::{compute_indicators, compute_indicators_with, compute_many, IndicatorEngine};
pub use error::{FrameError, MalformedKind, Result};
pub use kind::{IndicatorKind, OutputKey};
pub use series::{Field, PricePoint, PriceSeries};
pub use set::{IndicatorSeries, IndicatorSet};
pub use summary::PriceSummary;

//! Headline figures for a price series

use crate::series::PriceSeries;
use serde::{Deserialize, Serialize};

/// First and last close, their percent change, and total traded volume.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceSummary {
    pub first_close: f64,
    pub last_close: f64,
    /// `(last / first - 1) * 100`
    pub percent_change: f64,
    pub total_volume: f64,
}

impl PriceSummary {
    /// Summary of `series`, or `None` when it is empty.
    pub fn from_series(series: &PriceSeries) -> Option<Self> {
        let first = series.points().first()?;
        let last = series.points().last()?;

        Some(Self {
            first_close: first.close,
            last_close: last.close,
            percent_change: (last.close / first.close - 1.0) * 100.0,
            total_volume: series.points().iter().map(|p| p.volume).sum(),
        })
    }
}

//! OHLCV price points and the validated series built from them

use crate::error::Result;
use crate::validation::validate_points;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A raw field of a price point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Field {
    Open,
    High,
    Low,
    Close,
    Volume,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Open => "open",
            Field::High => "high",
            Field::Low => "low",
            Field::Close => "close",
            Field::Volume => "volume",
        };
        f.write_str(name)
    }
}

/// OHLCV values for one trading period
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    /// Start of the period
    pub timestamp: DateTime<Utc>,
    /// Open price
    pub open: f64,
    /// High price
    pub high: f64,
    /// Low price
    pub low: f64,
    /// Close price
    pub close: f64,
    /// Volume
    pub volume: f64,
}

impl PricePoint {
    /// Creates a price point.
    pub fn new(
        timestamp: DateTime<Utc>,
        open: f64,
        high: f64,
        low: f64,
        close: f64,
        volume: f64,
    ) -> Self {
        Self {
            timestamp,
            open,
            high,
            low,
            close,
            volume,
        }
    }

    /// Value of one field.
    pub fn field(&self, field: Field) -> f64 {
        match field {
            Field::Open => self.open,
            Field::High => self.high,
            Field::Low => self.low,
            Field::Close => self.close,
            Field::Volume => self.volume,
        }
    }
}

/// Chronologically ordered, validated price history for one asset.
///
/// Construction is the only way in, and it rejects malformed points, so
/// every `PriceSeries` has strictly increasing timestamps and consistent
/// OHLC bars. The series is never mutated afterwards.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriceSeries {
    points: Vec<PricePoint>,
}

impl PriceSeries {
    /// Validates `points` and wraps them.
    ///
    /// # Errors
    ///
    /// [`FrameError::MalformedInput`](crate::FrameError::MalformedInput) naming
    /// the first offending index.
    pub fn new(points: Vec<PricePoint>) -> Result<Self> {
        validate_points(&points)?;

        if let (Some(first), Some(last)) = (points.first(), points.last()) {
            tracing::debug!(
                len = points.len(),
                start = %first.timestamp,
                end = %last.timestamp,
                "price series accepted"
            );
        }

        Ok(Self { points })
    }

    /// Number of points.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// True when the series has no points.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All points in time order.
    pub fn points(&self) -> &[PricePoint] {
        &self.points
    }

    /// Point at `index`.
    pub fn get(&self, index: usize) -> Option<&PricePoint> {
        self.points.get(index)
    }

    /// Timestamps in order; this is the index every indicator aligns to.
    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.points.iter().map(|p| p.timestamp).collect()
    }

    /// One field as a column.
    pub fn column(&self, field: Field) -> Vec<f64> {
        self.points.iter().map(|p| p.field(field)).collect()
    }

    /// Close prices.
    pub fn closes(&self) -> Vec<f64> {
        self.column(Field::Close)
    }
}

impl<'de> Deserialize<'de> for PriceSeries {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let points = Vec::<PricePoint>::deserialize(deserializer)?;
        PriceSeries::new(points).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Vec<PricePoint>> for PriceSeries {
    type Error = crate::FrameError;

    fn try_from(points: Vec<PricePoint>) -> Result<Self> {
        PriceSeries::new(points)
    }
}

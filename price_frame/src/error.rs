//! Error types for the price_frame crate

use crate::series::Field;
use thiserror::Error;
use trade_math::MathError;

/// The rule a price point broke.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum MalformedKind {
    #[error("{field} is not a finite number")]
    NonFinite { field: Field },

    #[error("{field} price must be positive, got {value}")]
    NonPositivePrice { field: Field, value: f64 },

    #[error("volume cannot be negative, got {0}")]
    NegativeVolume(f64),

    #[error("high {high} is below low {low}")]
    HighBelowLow { high: f64, low: f64 },

    #[error("{field} {value} lies outside the bar range [{low}, {high}]")]
    OutsideRange {
        field: Field,
        value: f64,
        low: f64,
        high: f64,
    },

    #[error("duplicate timestamp")]
    DuplicateTimestamp,

    #[error("timestamp is earlier than the previous point")]
    NonMonotonicTimestamp,
}

/// Custom error types for the price_frame crate
#[derive(Debug, Error)]
pub enum FrameError {
    /// Input rejected before any computation ran
    #[error("Malformed input at index {index}: {kind}")]
    MalformedInput { index: usize, kind: MalformedKind },

    /// Configuration that the engine cannot run with
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Name that does not match any indicator kind or output
    #[error("Unknown indicator: {0}")]
    UnknownIndicator(String),

    /// Error from the indicator math
    #[error("Math error: {0}")]
    Math(#[from] MathError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl FrameError {
    pub(crate) fn malformed(index: usize, kind: MalformedKind) -> Self {
        FrameError::MalformedInput { index, kind }
    }
}

/// Result type with our custom error
pub type Result<T> = std::result::Result<T, FrameError>;

//! Input validation for price points.

use crate::error::{FrameError, MalformedKind, Result};
use crate::series::{Field, PricePoint};

const PRICE_FIELDS: [Field; 4] = [Field::Open, Field::High, Field::Low, Field::Close];

/// Checks every point and the ordering between neighbours.
///
/// # Errors
/// [`FrameError::MalformedInput`] at the first point that is non-finite,
/// has a non-positive price or negative volume, has `high < low` or an
/// open/close outside `[low, high]`, or whose timestamp does not strictly
/// follow the previous one.
pub fn validate_points(points: &[PricePoint]) -> Result<()> {
    for (i, point) in points.iter().enumerate() {
        validate_point(point).map_err(|kind| FrameError::malformed(i, kind))?;

        if i > 0 {
            let prev = points[i - 1].timestamp;
            if point.timestamp == prev {
                return Err(FrameError::malformed(i, MalformedKind::DuplicateTimestamp));
            }
            if point.timestamp < prev {
                return Err(FrameError::malformed(
                    i,
                    MalformedKind::NonMonotonicTimestamp,
                ));
            }
        }
    }

    Ok(())
}

fn validate_point(point: &PricePoint) -> std::result::Result<(), MalformedKind> {
    for field in PRICE_FIELDS.into_iter().chain([Field::Volume]) {
        if !point.field(field).is_finite() {
            return Err(MalformedKind::NonFinite { field });
        }
    }

    for field in PRICE_FIELDS {
        let value = point.field(field);
        if value <= 0.0 {
            return Err(MalformedKind::NonPositivePrice { field, value });
        }
    }

    if point.volume < 0.0 {
        return Err(MalformedKind::NegativeVolume(point.volume));
    }

    if point.high < point.low {
        return Err(MalformedKind::HighBelowLow {
            high: point.high,
            low: point.low,
        });
    }

    for field in [Field::Open, Field::Close] {
        let value = point.field(field);
        if value < point.low || value > point.high {
            return Err(MalformedKind::OutsideRange {
                field,
                value,
                low: point.low,
                high: point.high,
            });
        }
    }

    Ok(())
}

//! Loading price series from CSV
//!
//! The expected CSV format is:
//! timestamp,open,high,low,close,volume
//! 2023-01-02T00:00:00Z,100.5,101.2,100.4,100.8,5000

use crate::error::Result;
use crate::series::{PricePoint, PriceSeries};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Reads and validates a price series from CSV.
///
/// # Errors
/// [`FrameError::Csv`](crate::FrameError::Csv) for unreadable rows and
/// [`FrameError::MalformedInput`](crate::FrameError::MalformedInput) for
/// rows that parse but break a price rule.
pub fn read_prices<R: Read>(reader: R) -> Result<PriceSeries> {
    let mut rdr = csv::ReaderBuilder::new().trim(csv::Trim::All).from_reader(reader);
    let points = rdr
        .deserialize::<PricePoint>()
        .collect::<std::result::Result<Vec<_>, csv::Error>>()?;
    PriceSeries::new(points)
}

/// Reads and validates a price series from a CSV file.
pub fn read_prices_path<P: AsRef<Path>>(path: P) -> Result<PriceSeries> {
    let path = path.as_ref();
    tracing::debug!(path = %path.display(), "loading price series");
    read_prices(File::open(path)?)
}

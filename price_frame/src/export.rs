//! CSV export of an indicator set
//!
//! One row per timestamp: the RFC 3339 timestamp followed by one column per
//! output, in output order. Undefined points are written as empty cells.

use crate::error::Result;
use crate::set::IndicatorSet;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Writes `set` as CSV to `writer`.
pub fn write_csv<W: Write>(set: &IndicatorSet, writer: W) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);

    let mut header = vec!["timestamp"];
    header.extend(set.names());
    wtr.write_record(&header)?;

    for (i, timestamp) in set.index().iter().enumerate() {
        let mut row = Vec::with_capacity(header.len());
        row.push(timestamp.to_rfc3339());
        row.extend(
            set.iter()
                .map(|s| s.get(i).map(|v| v.to_string()).unwrap_or_default()),
        );
        wtr.write_record(&row)?;
    }

    wtr.flush()?;
    tracing::debug!(rows = set.len(), columns = header.len(), "indicator set exported");
    Ok(())
}

/// Writes `set` as CSV to a file, replacing it if it exists.
pub fn write_csv_path<P: AsRef<Path>>(set: &IndicatorSet, path: P) -> Result<()> {
    let file = File::create(path)?;
    write_csv(set, file)
}

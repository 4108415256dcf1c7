//! Immutable indicator results aligned to a price series.

use crate::error::{FrameError, Result};
use crate::kind::{IndicatorKind, OutputKey};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// One named indicator series, index-aligned with its price series.
///
/// `None` marks an undefined point (warm-up or division by zero).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSeries {
    key: OutputKey,
    values: Vec<Option<f64>>,
}

impl IndicatorSeries {
    /// Converts a raw series where NaN means undefined.
    pub fn from_raw(key: OutputKey, raw: &[f64]) -> Self {
        let values = raw
            .iter()
            .map(|&v| if v.is_finite() { Some(v) } else { None })
            .collect();
        Self { key, values }
    }

    /// Output this series holds.
    pub fn key(&self) -> OutputKey {
        self.key
    }

    /// Published name, e.g. `"RSI"` or `"BB_Upper"`.
    pub fn name(&self) -> &'static str {
        self.key.name()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`; `None` if undefined or out of range.
    pub fn get(&self, index: usize) -> Option<f64> {
        self.values.get(index).copied().flatten()
    }

    pub fn values(&self) -> &[Option<f64>] {
        &self.values
    }

    /// Value at the most recent index.
    pub fn last(&self) -> Option<f64> {
        self.values.last().copied().flatten()
    }

    /// Most recent defined value and its index.
    pub fn last_defined(&self) -> Option<(usize, f64)> {
        self.values
            .iter()
            .enumerate()
            .rev()
            .find_map(|(i, v)| v.map(|v| (i, v)))
    }

    /// Number of defined points.
    pub fn defined_count(&self) -> usize {
        self.values.iter().filter(|v| v.is_some()).count()
    }
}

/// Every indicator series for one price series.
///
/// Produced once per run and never modified afterwards. A kind that failed
/// to compute is listed in [`failures`](Self::failures) and has no series;
/// all other kinds are unaffected.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct IndicatorSet {
    index: Vec<DateTime<Utc>>,
    series: BTreeMap<OutputKey, IndicatorSeries>,
    failures: BTreeMap<IndicatorKind, String>,
}

impl IndicatorSet {
    pub(crate) fn new(
        index: Vec<DateTime<Utc>>,
        series: BTreeMap<OutputKey, IndicatorSeries>,
        failures: BTreeMap<IndicatorKind, String>,
    ) -> Self {
        Self {
            index,
            series,
            failures,
        }
    }

    /// Number of points in every series.
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Timestamps shared by every series.
    pub fn index(&self) -> &[DateTime<Utc>] {
        &self.index
    }

    /// Series for an output.
    pub fn series(&self, key: OutputKey) -> Option<&IndicatorSeries> {
        self.series.get(&key)
    }

    /// Series by published name.
    ///
    /// # Errors
    /// [`FrameError::UnknownIndicator`] if no output has that name.
    pub fn get(&self, name: &str) -> Result<Option<&IndicatorSeries>> {
        let key: OutputKey = name.parse()?;
        Ok(self.series(key))
    }

    /// All series in output order.
    pub fn iter(&self) -> impl Iterator<Item = &IndicatorSeries> {
        self.series.values()
    }

    /// Published names in output order.
    pub fn names(&self) -> Vec<&'static str> {
        self.series.keys().map(|k| k.name()).collect()
    }

    /// Kinds that failed, with the reason.
    pub fn failures(&self) -> &BTreeMap<IndicatorKind, String> {
        &self.failures
    }

    /// True when every kind produced its series.
    pub fn is_complete(&self) -> bool {
        self.failures.is_empty()
    }

    /// Series belonging to the chosen kinds, in output order.
    pub fn select(&self, kinds: &[IndicatorKind]) -> Vec<&IndicatorSeries> {
        self.series
            .values()
            .filter(|s| kinds.contains(&s.key().kind()))
            .collect()
    }

    /// Parses selection names like `"BB"` or `"MACD"` and selects them.
    pub fn select_by_names<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<&IndicatorSeries>> {
        let kinds = names
            .iter()
            .map(|n| n.as_ref().parse::<IndicatorKind>())
            .collect::<std::result::Result<Vec<_>, FrameError>>()?;
        Ok(self.select(&kinds))
    }

    /// Value of every series at the most recent index.
    pub fn latest_values(&self) -> BTreeMap<OutputKey, Option<f64>> {
        self.series.iter().map(|(k, s)| (*k, s.last())).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> IndicatorSet {
        let mut series = BTreeMap::new();
        series.insert(
            OutputKey::Rsi,
            IndicatorSeries::from_raw(OutputKey::Rsi, &[f64::NAN, 40.0, 60.0]),
        );
        series.insert(
            OutputKey::Macd,
            IndicatorSeries::from_raw(OutputKey::Macd, &[0.0, 0.1, f64::NAN]),
        );
        series.insert(
            OutputKey::MacdSignal,
            IndicatorSeries::from_raw(OutputKey::MacdSignal, &[0.0, 0.05, 0.07]),
        );
        let index = crate::utils::flat_bars(&[1.0, 1.0, 1.0], 0.0)
            .into_iter()
            .map(|p| p.timestamp)
            .collect();
        IndicatorSet::new(index, series, BTreeMap::new())
    }

    #[test]
    fn test_series_accessors() {
        let s = IndicatorSeries::from_raw(OutputKey::Atr, &[f64::NAN, 1.5, f64::NAN]);
        assert_eq!(s.name(), "ATR");
        assert_eq!(s.len(), 3);
        assert_eq!(s.get(0), None);
        assert_eq!(s.get(1), Some(1.5));
        assert_eq!(s.get(9), None);
        assert_eq!(s.last(), None);
        assert_eq!(s.last_defined(), Some((1, 1.5)));
        assert_eq!(s.defined_count(), 1);
    }

    #[test]
    fn test_get_by_name() {
        let set = sample_set();
        assert!(set.get("RSI").unwrap().is_some());
        assert!(set.get("ATR").unwrap().is_none());
        assert!(set.get("NOPE").is_err());
    }

    #[test]
    fn test_select_filters_by_kind() {
        let set = sample_set();
        let names: Vec<&str> = set
            .select(&[IndicatorKind::Macd])
            .into_iter()
            .map(IndicatorSeries::name)
            .collect();
        assert_eq!(names, vec!["MACD", "MACD_Signal"]);

        assert_eq!(set.select_by_names(&["rsi"]).unwrap().len(), 1);
        assert!(set.select_by_names(&["XYZ"]).is_err());
    }

    #[test]
    fn test_latest_values() {
        let latest = sample_set().latest_values();
        assert_eq!(latest[&OutputKey::Rsi], Some(60.0));
        assert_eq!(latest[&OutputKey::Macd], None);
        assert_eq!(latest[&OutputKey::MacdSignal], Some(0.07));
    }
}

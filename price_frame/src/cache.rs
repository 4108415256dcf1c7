//! Primitive cache for one computation run.
//!
//! Every raw column, derived series and window/smoothing result is stored
//! under a [`SeriesKey`] the first time it is needed, so indicators that
//! share a primitive (for example the close SMA used by both Bollinger
//! Bands and the envelope) never recompute it.

use crate::series::Field;
use std::collections::{hash_map::Entry, HashMap};
use std::sync::Arc;

/// Intermediate series built from raw fields before any windowing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Derived {
    /// `max(delta close, 0)`
    Gain,
    /// `max(-delta close, 0)`
    Loss,
    /// `|high - low|`
    TrueRange,
    /// Fast close EMA minus slow close EMA
    MacdLine,
    /// Accumulation/Distribution Line
    Adl,
    /// Stochastic %K
    PercentK,
    /// Raw money flow where typical price rose
    PositiveFlow,
    /// Raw money flow where typical price fell
    NegativeFlow,
    /// Simple daily returns of close
    DailyReturn,
}

/// Input a primitive is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Source {
    Field(Field),
    Derived(Derived),
}

impl From<Field> for Source {
    fn from(field: Field) -> Self {
        Source::Field(field)
    }
}

impl From<Derived> for Source {
    fn from(derived: Derived) -> Self {
        Source::Derived(derived)
    }
}

/// Window or smoothing operation with its parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Primitive {
    Mean(usize),
    Std(usize),
    Min(usize),
    Max(usize),
    Sum(usize),
    Ema(usize),
}

/// Cache key: a source as-is, or a primitive applied to a source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesKey {
    Source(Source),
    Primitive { op: Primitive, source: Source },
}

/// Hit/miss counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: usize,
    pub misses: usize,
}

/// Cache for computed series, scoped to one run.
#[derive(Debug, Default)]
pub struct PrimitiveCache {
    cache: HashMap<SeriesKey, Arc<[f64]>>,
    stats: CacheStats,
}

impl PrimitiveCache {
    /// Creates a new empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Checks if a series is already cached.
    pub fn contains(&self, key: &SeriesKey) -> bool {
        self.cache.contains_key(key)
    }

    /// Looks up a series, counting the hit or miss.
    pub fn lookup(&mut self, key: &SeriesKey) -> Option<Arc<[f64]>> {
        match self.cache.get(key) {
            Some(values) => {
                self.stats.hits += 1;
                Some(Arc::clone(values))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Stores a computed series; an existing entry is kept and returned.
    pub fn insert(&mut self, key: SeriesKey, values: Vec<f64>) -> Arc<[f64]> {
        match self.cache.entry(key) {
            Entry::Occupied(entry) => Arc::clone(entry.get()),
            Entry::Vacant(entry) => Arc::clone(entry.insert(Arc::from(values))),
        }
    }

    /// Number of cached series.
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Checks if the cache is empty.
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }

    /// Hit/miss counters so far.
    pub fn stats(&self) -> CacheStats {
        self.stats
    }
}

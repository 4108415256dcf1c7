//! Indicator engine: resolves each indicator's prerequisites on demand.
//!
//! Asking for an output computes only the primitives and derived series
//! its kind needs, stores them in the run's [`PrimitiveCache`], and freezes
//! the kind's outputs. A second request for anything already computed is a
//! lookup. [`IndicatorEngine::finish`] computes whatever is left and hands
//! back the [`IndicatorSet`].

use crate::cache::{CacheStats, Derived, Primitive, PrimitiveCache, SeriesKey, Source};
use crate::config::IndicatorConfig;
use crate::error::{FrameError, Result};
use crate::kind::{IndicatorKind, OutputKey};
use crate::series::{Field, PriceSeries};
use crate::set::{IndicatorSeries, IndicatorSet};
use std::collections::BTreeMap;
use std::sync::Arc;
use trade_math::{moving_averages, oscillators, rolling, volatility, volume};

/// One computation run over one price series.
#[derive(Debug)]
pub struct IndicatorEngine<'a> {
    prices: &'a PriceSeries,
    config: IndicatorConfig,
    cache: PrimitiveCache,
    frozen: BTreeMap<OutputKey, IndicatorSeries>,
}

impl<'a> IndicatorEngine<'a> {
    /// Engine with the default parameters.
    pub fn new(prices: &'a PriceSeries) -> Self {
        Self {
            prices,
            config: IndicatorConfig::default(),
            cache: PrimitiveCache::new(),
            frozen: BTreeMap::new(),
        }
    }

    /// Engine with custom parameters.
    ///
    /// # Errors
    /// [`FrameError::InvalidConfig`] if `config` does not validate.
    pub fn with_config(prices: &'a PriceSeries, config: IndicatorConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            prices,
            config,
            cache: PrimitiveCache::new(),
            frozen: BTreeMap::new(),
        })
    }

    pub fn config(&self) -> &IndicatorConfig {
        &self.config
    }

    /// Cache hit/miss counters for this run.
    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    /// Number of distinct series cached so far.
    pub fn cached_series(&self) -> usize {
        self.cache.len()
    }

    /// True once `key` has been computed and frozen.
    pub fn is_computed(&self, key: OutputKey) -> bool {
        self.frozen.contains_key(&key)
    }

    /// The series for `key`, computing its kind first if needed.
    pub fn output(&mut self, key: OutputKey) -> Result<&IndicatorSeries> {
        if !self.frozen.contains_key(&key) {
            self.compute_kind(key.kind())?;
        }
        self.frozen
            .get(&key)
            .ok_or_else(|| FrameError::UnknownIndicator(key.name().to_string()))
    }

    /// The series for every output of `kind`.
    pub fn indicator(&mut self, kind: IndicatorKind) -> Result<Vec<&IndicatorSeries>> {
        if kind.outputs().iter().any(|k| !self.frozen.contains_key(k)) {
            self.compute_kind(kind)?;
        }
        Ok(kind
            .outputs()
            .iter()
            .filter_map(|k| self.frozen.get(k))
            .collect())
    }

    /// Computes every remaining kind and returns the frozen set.
    ///
    /// A kind that fails is recorded in [`IndicatorSet::failures`]; the
    /// others are still computed.
    pub fn finish(mut self) -> IndicatorSet {
        tracing::debug!(len = self.prices.len(), "computing indicator set");
        let largest = self.config.largest_window();
        if self.prices.len() < largest {
            tracing::debug!(
                len = self.prices.len(),
                largest_window = largest,
                "series shorter than the largest window, trailing outputs stay undefined"
            );
        }

        let mut failures = BTreeMap::new();
        for kind in IndicatorKind::ALL {
            if kind.outputs().iter().all(|k| self.frozen.contains_key(k)) {
                continue;
            }
            if let Err(err) = self.compute_kind(kind) {
                tracing::warn!(indicator = %kind, error = %err, "indicator failed");
                failures.insert(kind, err.to_string());
            }
        }

        let stats = self.cache.stats();
        tracing::debug!(
            cached = self.cache.len(),
            hits = stats.hits,
            misses = stats.misses,
            "indicator set complete"
        );

        IndicatorSet::new(self.prices.timestamps(), self.frozen, failures)
    }

    fn compute_kind(&mut self, kind: IndicatorKind) -> Result<()> {
        tracing::debug!(indicator = %kind, "computing indicator");
        let c = self.config.clone();
        let close = Source::Field(Field::Close);

        let outputs: Vec<(OutputKey, Vec<f64>)> = match kind {
            IndicatorKind::Ema => {
                let ema = self.primitive(Primitive::Ema(c.ema_span), close)?;
                vec![(OutputKey::Ema, ema.to_vec())]
            }
            IndicatorKind::Bollinger => {
                let middle = self.primitive(Primitive::Mean(c.bollinger_window), close)?;
                let deviation = self.primitive(Primitive::Std(c.bollinger_window), close)?;
                let bands =
                    volatility::bands_from_deviation(&middle, &deviation, c.bollinger_width)?;
                vec![
                    (OutputKey::BollingerMiddle, bands.middle),
                    (OutputKey::BollingerUpper, bands.upper),
                    (OutputKey::BollingerLower, bands.lower),
                ]
            }
            IndicatorKind::Rsi => {
                let gain = self.primitive(Primitive::Mean(c.rsi_window), Derived::Gain.into())?;
                let loss = self.primitive(Primitive::Mean(c.rsi_window), Derived::Loss.into())?;
                vec![(OutputKey::Rsi, oscillators::rsi_from_averages(&gain, &loss)?)]
            }
            IndicatorKind::Macd => {
                let line = self.source(Derived::MacdLine.into())?;
                let signal = self.primitive(Primitive::Ema(c.macd_signal), Derived::MacdLine.into())?;
                let histogram = trade_math::difference(&line, &signal)?;
                vec![
                    (OutputKey::Macd, line.to_vec()),
                    (OutputKey::MacdSignal, signal.to_vec()),
                    (OutputKey::MacdHistogram, histogram),
                ]
            }
            IndicatorKind::Atr => {
                let range = self.source(Derived::TrueRange.into())?;
                let atr = self.primitive(Primitive::Mean(c.atr_window), Derived::TrueRange.into())?;
                vec![
                    (OutputKey::TrueRange, range.to_vec()),
                    (OutputKey::Atr, atr.to_vec()),
                ]
            }
            IndicatorKind::Obv => {
                let p = self.prices;
                let obv = volume::intrabar_obv(
                    &p.column(Field::Open),
                    &p.column(Field::High),
                    &p.column(Field::Low),
                    &p.column(Field::Close),
                    &p.column(Field::Volume),
                )?;
                vec![(OutputKey::Obv, obv)]
            }
            IndicatorKind::Mfi => {
                let pos = self.primitive(Primitive::Sum(c.mfi_window), Derived::PositiveFlow.into())?;
                let neg = self.primitive(Primitive::Sum(c.mfi_window), Derived::NegativeFlow.into())?;
                vec![(OutputKey::Mfi, volume::mfi_from_sums(&pos, &neg)?)]
            }
            IndicatorKind::Envelope => {
                let middle = self.primitive(Primitive::Mean(c.envelope_window), close)?;
                let bands = moving_averages::envelope(&middle, c.envelope_offset)?;
                vec![
                    (OutputKey::EnvelopeUpper, bands.upper),
                    (OutputKey::EnvelopeLower, bands.lower),
                ]
            }
            IndicatorKind::Chaikin => {
                let adl = self.source(Derived::Adl.into())?;
                let fast = self.primitive(Primitive::Ema(c.chaikin_fast), Derived::Adl.into())?;
                let slow = self.primitive(Primitive::Ema(c.chaikin_slow), Derived::Adl.into())?;
                vec![
                    (OutputKey::Adl, adl.to_vec()),
                    (OutputKey::ChaikinOscillator, volume::chaikin_from_emas(&fast, &slow)?),
                ]
            }
            IndicatorKind::Stochastic => {
                let k = self.source(Derived::PercentK.into())?;
                let d = self.primitive(Primitive::Mean(c.stochastic_d), Derived::PercentK.into())?;
                vec![
                    (OutputKey::StochasticK, k.to_vec()),
                    (OutputKey::StochasticD, d.to_vec()),
                ]
            }
            IndicatorKind::TrendSma => {
                let short = self.primitive(Primitive::Mean(c.sma_short), close)?;
                let long = self.primitive(Primitive::Mean(c.sma_long), close)?;
                vec![
                    (OutputKey::SmaShort, short.to_vec()),
                    (OutputKey::SmaLong, long.to_vec()),
                ]
            }
            IndicatorKind::ReturnVolatility => {
                let returns = self.source(Derived::DailyReturn.into())?;
                let vol = self.primitive(
                    Primitive::Std(c.volatility_window),
                    Derived::DailyReturn.into(),
                )?;
                vec![
                    (OutputKey::DailyReturn, returns.to_vec()),
                    (OutputKey::ReturnVolatility, vol.to_vec()),
                ]
            }
        };

        for (key, raw) in outputs {
            self.frozen
                .entry(key)
                .or_insert_with(|| IndicatorSeries::from_raw(key, &raw));
        }
        Ok(())
    }

    /// A raw column or derived series, from the cache when present.
    fn source(&mut self, source: Source) -> Result<Arc<[f64]>> {
        let key = SeriesKey::Source(source);
        if let Some(values) = self.cache.lookup(&key) {
            return Ok(values);
        }

        let values = match source {
            Source::Field(field) => self.prices.column(field),
            Source::Derived(derived) => self.derive(derived)?,
        };
        Ok(self.cache.insert(key, values))
    }

    /// A window or smoothing primitive over `source`, from the cache when present.
    fn primitive(&mut self, op: Primitive, source: Source) -> Result<Arc<[f64]>> {
        let key = SeriesKey::Primitive { op, source };
        if let Some(values) = self.cache.lookup(&key) {
            return Ok(values);
        }

        tracing::debug!(?op, ?source, "computing primitive");
        let input = self.source(source)?;
        let values = match op {
            Primitive::Mean(w) => rolling::trailing_mean(&input, w)?,
            Primitive::Std(w) => rolling::trailing_std(&input, w)?,
            Primitive::Min(w) => rolling::trailing_min(&input, w)?,
            Primitive::Max(w) => rolling::trailing_max(&input, w)?,
            Primitive::Sum(w) => rolling::trailing_sum(&input, w)?,
            Primitive::Ema(span) => moving_averages::ema(&input, span)?,
        };
        Ok(self.cache.insert(key, values))
    }

    fn derive(&mut self, derived: Derived) -> Result<Vec<f64>> {
        let c = &self.config;
        let (fast, slow, k_window) = (c.macd_fast, c.macd_slow, c.stochastic_k);
        let close = Source::Field(Field::Close);

        let values = match derived {
            Derived::Gain => oscillators::gains(&self.source(close)?),
            Derived::Loss => oscillators::losses(&self.source(close)?),
            Derived::TrueRange => {
                let high = self.source(Field::High.into())?;
                let low = self.source(Field::Low.into())?;
                volatility::intrabar_range(&high, &low)?
            }
            Derived::MacdLine => {
                let fast = self.primitive(Primitive::Ema(fast), close)?;
                let slow = self.primitive(Primitive::Ema(slow), close)?;
                trade_math::difference(&fast, &slow)?
            }
            Derived::Adl => {
                let high = self.source(Field::High.into())?;
                let low = self.source(Field::Low.into())?;
                let close = self.source(close)?;
                let vol = self.source(Field::Volume.into())?;
                volume::accumulation_distribution(&high, &low, &close, &vol)?
            }
            Derived::PercentK => {
                let lowest = self.primitive(Primitive::Min(k_window), Field::Low.into())?;
                let highest = self.primitive(Primitive::Max(k_window), Field::High.into())?;
                let close = self.source(close)?;
                oscillators::percent_k(&close, &lowest, &highest)?
            }
            Derived::PositiveFlow | Derived::NegativeFlow => {
                let high = self.source(Field::High.into())?;
                let low = self.source(Field::Low.into())?;
                let close = self.source(close)?;
                let vol = self.source(Field::Volume.into())?;
                let typical = volume::typical_price(&high, &low, &close)?;
                let flow = volume::directional_money_flow(&typical, &vol)?;

                // Both directions come out of one pass; keep the sibling too.
                let (wanted, other, other_key) = if derived == Derived::PositiveFlow {
                    (flow.positive, flow.negative, Derived::NegativeFlow)
                } else {
                    (flow.negative, flow.positive, Derived::PositiveFlow)
                };
                self.cache.insert(SeriesKey::Source(other_key.into()), other);
                wanted
            }
            Derived::DailyReturn => volatility::daily_returns(&self.source(close)?),
        };

        Ok(values)
    }
}

/// Computes the full indicator set with default parameters.
pub fn compute_indicators(prices: &PriceSeries) -> IndicatorSet {
    IndicatorEngine::new(prices).finish()
}

/// Computes the full indicator set with custom parameters.
///
/// # Errors
/// [`FrameError::InvalidConfig`] if `config` does not validate.
pub fn compute_indicators_with(
    prices: &PriceSeries,
    config: IndicatorConfig,
) -> Result<IndicatorSet> {
    Ok(IndicatorEngine::with_config(prices, config)?.finish())
}

/// Computes independent series in parallel.
///
/// Series are processed in batches of at most
/// [`std::thread::available_parallelism`] threads. Runs share nothing, so
/// the results are identical to computing each series on its own.
pub fn compute_many(
    series: &[PriceSeries],
    config: &IndicatorConfig,
) -> Result<Vec<IndicatorSet>> {
    config.validate()?;

    let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
    let mut sets = Vec::with_capacity(series.len());

    for batch in series.chunks(workers) {
        let computed = std::thread::scope(|scope| {
            let handles: Vec<_> = batch
                .iter()
                .map(|prices| {
                    let config = config.clone();
                    scope.spawn(move || {
                        IndicatorEngine::with_config(prices, config).map(IndicatorEngine::finish)
                    })
                })
                .collect();

            handles
                .into_iter()
                .map(|h| h.join().unwrap_or_else(|panic| std::panic::resume_unwind(panic)))
                .collect::<Result<Vec<_>>>()
        })?;
        sets.extend(computed);
    }

    Ok(sets)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{flat_bars, generate_test_data};
    use approx::assert_relative_eq;

    fn sample_prices(n: usize) -> PriceSeries {
        PriceSeries::new(generate_test_data(n, 100.0, 0.04, 11)).unwrap()
    }

    #[test]
    fn test_output_computes_only_its_prerequisites() {
        let prices = sample_prices(60);
        let mut engine = IndicatorEngine::new(&prices);

        engine.output(OutputKey::Macd).unwrap();

        assert!(engine.is_computed(OutputKey::MacdSignal));
        assert!(!engine.is_computed(OutputKey::Rsi));
        // close, ema 12, ema 26, macd line, ema 9 of the line
        assert_eq!(engine.cached_series(), 5);
    }

    #[test]
    fn test_shared_sma_is_computed_once() {
        let prices = sample_prices(60);
        let mut engine = IndicatorEngine::new(&prices);

        engine.indicator(IndicatorKind::Bollinger).unwrap();
        let after_bollinger = engine.cached_series();
        let misses = engine.cache_stats().misses;

        engine.indicator(IndicatorKind::Envelope).unwrap();
        assert_eq!(engine.cached_series(), after_bollinger);
        assert_eq!(engine.cache_stats().misses, misses);
    }

    #[test]
    fn test_repeated_reads_return_frozen_series() {
        let prices = sample_prices(40);
        let mut engine = IndicatorEngine::new(&prices);

        let first = engine.output(OutputKey::Rsi).unwrap().clone();
        let cached = engine.cached_series();
        let second = engine.output(OutputKey::Rsi).unwrap().clone();

        assert_eq!(first, second);
        assert_eq!(engine.cached_series(), cached);
    }

    #[test]
    fn test_money_flow_directions_share_one_pass() {
        let prices = sample_prices(40);
        let mut engine = IndicatorEngine::new(&prices);
        engine.output(OutputKey::Mfi).unwrap();

        // The negative flow is stored while deriving the positive one, so
        // its only lookup is a hit.
        assert_eq!(engine.cache_stats(), CacheStats { hits: 1, misses: 7 });
    }

    #[test]
    fn test_finish_contains_every_output() {
        let prices = sample_prices(250);
        let set = IndicatorEngine::new(&prices).finish();

        assert!(set.is_complete());
        assert_eq!(set.names().len(), OutputKey::all().count());
        for s in set.iter() {
            assert_eq!(s.len(), prices.len(), "{} misaligned", s.name());
        }
    }

    #[test]
    fn test_flat_market_rsi() {
        let prices = PriceSeries::new(flat_bars(&[50.0; 20], 1_000.0)).unwrap();
        let set = compute_indicators(&prices);
        let rsi = set.series(OutputKey::Rsi).unwrap();

        assert_eq!(rsi.defined_count(), 6);
        assert!(rsi.values()[14..].iter().all(|v| *v == Some(50.0)));
    }

    #[test]
    fn test_custom_config_changes_windows() {
        let prices = sample_prices(30);
        let config = IndicatorConfig {
            atr_window: 5,
            ..IndicatorConfig::default()
        };
        let set = compute_indicators_with(&prices, config).unwrap();
        let atr = set.series(OutputKey::Atr).unwrap();

        assert_eq!(atr.get(3), None);
        let tr = set.series(OutputKey::TrueRange).unwrap();
        let expected: f64 = (0..5).filter_map(|i| tr.get(i)).sum::<f64>() / 5.0;
        assert_relative_eq!(atr.get(4).unwrap(), expected, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let prices = sample_prices(10);
        let config = IndicatorConfig {
            macd_fast: 26,
            macd_slow: 12,
            ..IndicatorConfig::default()
        };
        assert!(matches!(
            IndicatorEngine::with_config(&prices, config),
            Err(FrameError::InvalidConfig(_))
        ));
    }

    #[test]
    fn test_compute_many_matches_single_runs() {
        let all: Vec<PriceSeries> = (0..4)
            .map(|seed| PriceSeries::new(generate_test_data(80, 50.0, 0.03, seed)).unwrap())
            .collect();
        let config = IndicatorConfig::default();

        let batch = compute_many(&all, &config).unwrap();

        assert_eq!(batch.len(), all.len());
        for (prices, set) in all.iter().zip(&batch) {
            assert_eq!(set, &compute_indicators(prices));
        }
    }

    #[test]
    fn test_failing_kind_does_not_block_others() {
        let prices = sample_prices(60);
        // Bypasses validation so the envelope assembly itself fails.
        let engine = IndicatorEngine {
            prices: &prices,
            config: IndicatorConfig {
                envelope_offset: 2.0,
                ..IndicatorConfig::default()
            },
            cache: PrimitiveCache::new(),
            frozen: BTreeMap::new(),
        };

        let set = engine.finish();

        assert!(!set.is_complete());
        assert_eq!(
            set.failures().keys().copied().collect::<Vec<_>>(),
            vec![IndicatorKind::Envelope]
        );
        assert!(set.series(OutputKey::EnvelopeUpper).is_none());
        assert!(set.series(OutputKey::EnvelopeLower).is_none());

        let expected: Vec<OutputKey> = OutputKey::all()
            .filter(|k| k.kind() != IndicatorKind::Envelope)
            .collect();
        assert_eq!(expected.len(), 20);
        for key in expected {
            let series = set.series(key).unwrap();
            assert_eq!(series.len(), prices.len(), "{key} misaligned");
        }
        assert_eq!(set, {
            let full = compute_indicators(&prices);
            IndicatorSet::new(
                full.index().to_vec(),
                full.iter()
                    .filter(|s| s.key().kind() != IndicatorKind::Envelope)
                    .map(|s| (s.key(), s.clone()))
                    .collect(),
                set.failures().clone(),
            )
        });
    }

    #[test]
    fn test_compute_many_handles_more_series_than_workers() {
        let workers = std::thread::available_parallelism().map_or(1, |n| n.get());
        let all: Vec<PriceSeries> = (0..(workers * 2 + 1) as u64)
            .map(|seed| PriceSeries::new(generate_test_data(20, 30.0, 0.02, seed)).unwrap())
            .collect();

        let batch = compute_many(&all, &IndicatorConfig::default()).unwrap();

        assert_eq!(batch.len(), all.len());
        assert_eq!(batch.last(), Some(&compute_indicators(all.last().unwrap())));
    }
}

//! Scalable Bloom filter
//!
//! A chain of fixed-capacity partitioned filters. When the newest filter
//! reaches its fill ratio, a new one is appended with a target false
//! positive rate tightened by `r`, so the targets form the geometric series
//! fp, fp*r, fp*r^2, ... and their sum stays below fp / (1 - r) no matter
//! how many filters get appended.
//!
//! INVARIANTS:
//! - The series always holds at least one filter
//! - Filter i was built with target rate fp * r^i, clamped to
//!   f64::MIN_POSITIVE once that underflows
//! - Only the last filter is ever written to
//! - No false negatives: after `add(e)`, `test(e)` is true until `reset`
//!
//! Not internally synchronized. Concurrent writers must hold one exclusive
//! lock across the whole of `add`.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use super::config::{ScalableConfig, DEFAULT_SIZE_HINT, DEFAULT_TIGHTENING_RATIO};
use super::parameters::{compounded_bound, tightened_rate};
use super::partitioned::PartitionedBloomFilter;
use crate::error::FilterResult;
use crate::metrics::{MetricsRecorder, NoOpMetrics};
use crate::ports::PartitionedFilter;

/// Growable approximate-membership set with a bounded false positive rate
///
/// Clones share the metrics recorder; the cloned filters are reported to it
/// as appended, so the recorder's bit count covers both copies.
pub struct ScalableBloomFilter<F = PartitionedBloomFilter> {
    /// Filters with geometrically decreasing target rates, oldest first
    filters: Vec<F>,
    /// Validated growth parameters
    config: ScalableConfig,
    /// Number of add calls since construction or reset
    inserted: usize,
    metrics: Arc<dyn MetricsRecorder>,
}

impl ScalableBloomFilter<PartitionedBloomFilter> {
    /// Create a series backed by [`PartitionedBloomFilter`]
    ///
    /// # Arguments
    /// * `size_hint` - Element capacity of every filter (> 0)
    /// * `target_fpr` - Target false positive rate, 0 < fpr < 1
    /// * `tightening_ratio` - Shrink factor between filters, 0 < r < 1
    ///
    /// # Errors
    /// Returns a [`FilterError`](crate::FilterError) if any parameter is out
    /// of range.
    pub fn new(size_hint: usize, target_fpr: f64, tightening_ratio: f64) -> FilterResult<Self> {
        Self::with_config(ScalableConfig::new(size_hint, target_fpr, tightening_ratio)?)
    }

    /// Create a series with a size hint of 10000 and a tightening ratio of 0.8
    pub fn with_default_parameters(target_fpr: f64) -> FilterResult<Self> {
        Self::new(DEFAULT_SIZE_HINT, target_fpr, DEFAULT_TIGHTENING_RATIO)
    }

    /// Create a series from a configuration
    pub fn from_config(config: ScalableConfig) -> FilterResult<Self> {
        Self::with_config(config)
    }
}

impl<F: PartitionedFilter> ScalableBloomFilter<F> {
    /// Create a series of any [`PartitionedFilter`] implementation
    ///
    /// The configuration is validated again here, so a hand-built
    /// `ScalableConfig` cannot produce a malformed series.
    pub fn with_config(config: ScalableConfig) -> FilterResult<Self> {
        config.validate()?;

        let mut series = Self {
            filters: Vec::with_capacity(1),
            config,
            inserted: 0,
            metrics: Arc::new(NoOpMetrics),
        };
        series.append_filter();
        Ok(series)
    }

    /// Attach a metrics recorder
    ///
    /// Filters that already exist are reported to the recorder as appended.
    pub fn with_metrics(mut self, metrics: Arc<dyn MetricsRecorder>) -> Self {
        self.report_filters(metrics.as_ref());
        self.metrics = metrics;
        self
    }

    /// Sum of the element capacities of every filter
    pub fn capacity(&self) -> usize {
        self.filters.iter().map(PartitionedFilter::capacity).sum()
    }

    /// Number of hash functions of the first filter
    ///
    /// Filters derive their hash count from their own target rate, so later
    /// filters may use more. See [`filters`](Self::filters) for per-filter
    /// values.
    pub fn hash_count(&self) -> usize {
        self.filters.first().map_or(0, PartitionedFilter::hash_count)
    }

    /// Unweighted mean of every filter's fill ratio
    pub fn fill_ratio(&self) -> f64 {
        if self.filters.is_empty() {
            return 0.0;
        }
        let sum: f64 = self.filters.iter().map(PartitionedFilter::fill_ratio).sum();
        sum / self.filters.len() as f64
    }

    /// Test for membership
    ///
    /// Returns `true` if any filter reports the element. Older filters are
    /// checked first since they are the densest.
    pub fn test(&self, element: &[u8]) -> bool {
        let found = self.filters.iter().any(|filter| filter.test(element));
        self.metrics.record_lookup(found);
        found
    }

    /// Insert an element
    ///
    /// Appends a tighter filter first if the last one has reached the fill
    /// ratio.
    pub fn add(&mut self, element: &[u8]) {
        let full = self
            .filters
            .last()
            .map_or(true, |filter| {
                filter.estimated_fill_ratio() >= self.config.fill_ratio
            });
        if full {
            self.append_filter();
        }

        if let Some(filter) = self.filters.last_mut() {
            filter.add(element);
        }
        self.inserted += 1;
        self.metrics.record_insert();
    }

    /// Test for membership, then insert
    ///
    /// Returns the membership result from before the insert.
    pub fn test_and_add(&mut self, element: &[u8]) -> bool {
        let member = self.test(element);
        self.add(element);
        member
    }

    /// Drop every filter and start over with a single fresh one
    pub fn reset(&mut self) {
        let dropped = self.filters.len();
        let size_bits = self.size_bits();

        self.filters.clear();
        self.inserted = 0;
        self.metrics.record_reset(dropped, size_bits);
        debug!(filters_dropped = dropped, "Reset scalable filter series");

        self.append_filter();
    }

    /// Number of filters in the series
    pub fn filter_count(&self) -> usize {
        self.filters.len()
    }

    /// The filters, oldest first
    pub fn filters(&self) -> &[F] {
        &self.filters
    }

    /// Total bits across every filter
    pub fn size_bits(&self) -> usize {
        self.filters.iter().map(PartitionedFilter::size_bits).sum()
    }

    /// Number of add calls since construction or the last reset
    ///
    /// Repeated inserts of the same element are counted each time.
    pub fn len(&self) -> usize {
        self.inserted
    }

    /// Whether nothing has been added since construction or the last reset
    pub fn is_empty(&self) -> bool {
        self.inserted == 0
    }

    /// Target false positive rate of the first filter
    pub fn target_false_positive_rate(&self) -> f64 {
        self.config.target_fpr
    }

    /// Ratio between consecutive filters' target rates
    pub fn tightening_ratio(&self) -> f64 {
        self.config.tightening_ratio
    }

    /// Estimated fill ratio at which the last filter is considered full
    pub fn fill_threshold(&self) -> f64 {
        self.config.fill_ratio
    }

    /// Element capacity given to each new filter
    pub fn size_hint(&self) -> usize {
        self.config.size_hint
    }

    /// The growth configuration
    pub fn config(&self) -> &ScalableConfig {
        &self.config
    }

    /// Upper bound of the summed per-filter targets: fp / (1 - r)
    pub fn false_positive_bound(&self) -> f64 {
        compounded_bound(self.config.target_fpr, self.config.tightening_ratio)
    }

    /// Estimated false positive rate at the current fill levels
    ///
    /// Formula: 1 - prod(1 - fpr_i) over every filter's current rate
    pub fn estimated_false_positive_rate(&self) -> f64 {
        let miss: f64 = self
            .filters
            .iter()
            .map(|filter| 1.0 - filter.current_false_positive_rate())
            .product();
        1.0 - miss
    }

    /// Report every current filter to `metrics` as appended
    fn report_filters(&self, metrics: &dyn MetricsRecorder) {
        for filter in &self.filters {
            metrics.record_filter_appended(
                filter.size_bits(),
                filter.hash_count(),
                filter.false_positive_rate(),
            );
        }
    }

    /// Append a filter with target rate fp * r^n, n = current filter count
    ///
    /// Once fp * r^n underflows past the smallest normal float, the rate is
    /// clamped to `f64::MIN_POSITIVE`. From that filter on the targets stop
    /// decreasing and every later filter shares the clamped rate.
    fn append_filter(&mut self) {
        let index = self.filters.len();
        let (target_fpr, ratio) = (self.config.target_fpr, self.config.tightening_ratio);
        let mut fp_rate = tightened_rate(target_fpr, ratio, index);
        if !fp_rate.is_normal() {
            // Only the first clamped filter is worth a warning
            if index == 0 || tightened_rate(target_fpr, ratio, index - 1).is_normal() {
                warn!(
                    filter_index = index,
                    "Target false positive rate underflowed, clamping to f64::MIN_POSITIVE"
                );
            }
            fp_rate = f64::MIN_POSITIVE;
        }

        let filter = F::with_rate(self.config.size_hint, fp_rate);
        debug!(
            filter_index = index,
            target_fpr = fp_rate,
            size_bits = filter.size_bits(),
            hash_count = filter.hash_count(),
            "Appending filter to scalable series"
        );
        self.metrics
            .record_filter_appended(filter.size_bits(), filter.hash_count(), fp_rate);
        self.filters.push(filter);
    }
}

impl<F: PartitionedFilter + Clone> Clone for ScalableBloomFilter<F> {
    fn clone(&self) -> Self {
        self.report_filters(self.metrics.as_ref());
        Self {
            filters: self.filters.clone(),
            config: self.config.clone(),
            inserted: self.inserted,
            metrics: Arc::clone(&self.metrics),
        }
    }
}

impl<F: PartitionedFilter> fmt::Debug for ScalableBloomFilter<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScalableBloomFilter")
            .field("filters", &self.filters.len())
            .field("capacity", &self.capacity())
            .field("size_bits", &self.size_bits())
            .field("inserted", &self.inserted)
            .field("config", &self.config)
            .finish()
    }
}

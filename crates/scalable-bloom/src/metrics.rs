//! Metrics hooks for scalable filter operations
//!
//! Counts growth events, inserts and lookups so callers can watch how fast a
//! series grows and how often lookups come back positive.
//!
//! ## Usage
//!
//! ```
//! use std::sync::Arc;
//! use scalable_bloom::{Metrics, ScalableBloomFilter};
//!
//! let metrics = Arc::new(Metrics::new());
//! let mut filter = ScalableBloomFilter::with_default_parameters(0.01)
//!     .unwrap()
//!     .with_metrics(metrics.clone());
//!
//! filter.add(b"element");
//! filter.test(b"element");
//!
//! let snapshot = metrics.snapshot();
//! assert_eq!(snapshot.elements_inserted, 1);
//! assert_eq!(snapshot.lookups_positive, 1);
//! ```

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics collector for scalable filter operations
///
/// Thread-safe counters so one collector can be shared by several series.
#[derive(Debug, Default)]
pub struct Metrics {
    /// Total filters appended, including the initial one
    pub filters_appended: AtomicU64,
    /// Total add calls
    pub elements_inserted: AtomicU64,
    /// Total test calls
    pub lookups_performed: AtomicU64,
    /// Total positive lookups (true or false positives)
    pub lookups_positive: AtomicU64,
    /// Total reset calls
    pub resets: AtomicU64,
    /// Bits currently held by live filters
    pub bits_allocated: AtomicU64,
}

impl Metrics {
    /// Create a new metrics collector
    pub fn new() -> Self {
        Self::default()
    }

    /// Get current metrics snapshot
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            filters_appended: self.filters_appended.load(Ordering::Relaxed),
            elements_inserted: self.elements_inserted.load(Ordering::Relaxed),
            lookups_performed: self.lookups_performed.load(Ordering::Relaxed),
            lookups_positive: self.lookups_positive.load(Ordering::Relaxed),
            resets: self.resets.load(Ordering::Relaxed),
            bits_allocated: self.bits_allocated.load(Ordering::Relaxed),
        }
    }

    /// Ratio of positive lookups to total lookups
    ///
    /// Includes true positives, so this is an upper bound on the observed
    /// false positive rate.
    pub fn observed_positive_rate(&self) -> f64 {
        let total = self.lookups_performed.load(Ordering::Relaxed);
        let positive = self.lookups_positive.load(Ordering::Relaxed);
        if total > 0 {
            positive as f64 / total as f64
        } else {
            0.0
        }
    }

    /// Reset all counters
    pub fn reset(&self) {
        self.filters_appended.store(0, Ordering::Relaxed);
        self.elements_inserted.store(0, Ordering::Relaxed);
        self.lookups_performed.store(0, Ordering::Relaxed);
        self.lookups_positive.store(0, Ordering::Relaxed);
        self.resets.store(0, Ordering::Relaxed);
        self.bits_allocated.store(0, Ordering::Relaxed);
    }
}

/// Point-in-time metrics snapshot
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MetricsSnapshot {
    pub filters_appended: u64,
    pub elements_inserted: u64,
    pub lookups_performed: u64,
    pub lookups_positive: u64,
    pub resets: u64,
    pub bits_allocated: u64,
}

/// Trait for custom metrics recording implementations
///
/// Implement this trait to forward events to an external metrics system.
pub trait MetricsRecorder: Send + Sync {
    /// A filter was appended to a series
    fn record_filter_appended(&self, size_bits: usize, hash_count: usize, target_fpr: f64);

    /// An element was inserted
    fn record_insert(&self);

    /// A membership test completed
    fn record_lookup(&self, found: bool);

    /// A series dropped `size_bits` bits worth of filters on reset
    fn record_reset(&self, filters_dropped: usize, size_bits: usize);
}

/// No-op metrics recorder for when metrics are disabled
#[derive(Debug, Default)]
pub struct NoOpMetrics;

impl MetricsRecorder for NoOpMetrics {
    fn record_filter_appended(&self, _: usize, _: usize, _: f64) {}
    fn record_insert(&self) {}
    fn record_lookup(&self, _: bool) {}
    fn record_reset(&self, _: usize, _: usize) {}
}

impl MetricsRecorder for Metrics {
    fn record_filter_appended(&self, size_bits: usize, _hash_count: usize, _target_fpr: f64) {
        self.filters_appended.fetch_add(1, Ordering::Relaxed);
        self.bits_allocated
            .fetch_add(size_bits as u64, Ordering::Relaxed);
    }

    fn record_insert(&self) {
        self.elements_inserted.fetch_add(1, Ordering::Relaxed);
    }

    fn record_lookup(&self, found: bool) {
        self.lookups_performed.fetch_add(1, Ordering::Relaxed);
        if found {
            self.lookups_positive.fetch_add(1, Ordering::Relaxed);
        }
    }

    fn record_reset(&self, _filters_dropped: usize, size_bits: usize) {
        self.resets.fetch_add(1, Ordering::Relaxed);
        let _ = self
            .bits_allocated
            .fetch_update(Ordering::Relaxed, Ordering::Relaxed, |bits| {
                Some(bits.saturating_sub(size_bits as u64))
            });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_initialization() {
        let metrics = Metrics::new();
        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_record_filter_appended() {
        let metrics = Metrics::new();

        metrics.record_filter_appended(959, 7, 0.01);
        metrics.record_filter_appended(1008, 7, 0.008);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.filters_appended, 2);
        assert_eq!(snapshot.bits_allocated, 1967);
    }

    #[test]
    fn test_record_lookups() {
        let metrics = Metrics::new();

        metrics.record_lookup(true);
        metrics.record_lookup(false);
        metrics.record_lookup(true);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.lookups_performed, 3);
        assert_eq!(snapshot.lookups_positive, 2);
    }

    #[test]
    fn test_observed_positive_rate() {
        let metrics = Metrics::new();
        assert_eq!(metrics.observed_positive_rate(), 0.0);

        for _ in 0..90 {
            metrics.record_lookup(false);
        }
        for _ in 0..10 {
            metrics.record_lookup(true);
        }

        assert!((metrics.observed_positive_rate() - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_record_reset_releases_bits() {
        let metrics = Metrics::new();
        metrics.record_filter_appended(1000, 7, 0.01);
        metrics.record_filter_appended(1000, 7, 0.008);

        metrics.record_reset(2, 2000);

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.resets, 1);
        assert_eq!(snapshot.bits_allocated, 0);
    }

    #[test]
    fn test_reset() {
        let metrics = Metrics::new();

        metrics.record_filter_appended(1000, 7, 0.01);
        metrics.record_lookup(true);
        metrics.record_insert();

        metrics.reset();

        assert_eq!(metrics.snapshot(), MetricsSnapshot::default());
    }

    #[test]
    fn test_noop_metrics() {
        let metrics = NoOpMetrics;
        metrics.record_filter_appended(1000, 7, 0.01);
        metrics.record_insert();
        metrics.record_lookup(true);
        metrics.record_reset(1, 1000);
    }
}

//! Partitioned Bloom filter
//!
//! The bit array is split into k equal partitions, one per hash function.
//! Every element sets exactly one bit in every partition, so partitions fill
//! at the same rate and the occupancy of one predicts all of them.
//!
//! INVARIANTS:
//! - No false negatives: if inserted, `test()` MUST return true
//! - size_bits == hash_count * partition_bits

use bitvec::prelude::*;

use super::hash_functions::compute_partition_indices;
use super::parameters::{calculate_optimal_parameters, estimated_fill_ratio};
use crate::ports::PartitionedFilter;

/// Fixed-capacity Bloom filter with one bit partition per hash function
#[derive(Clone, Debug)]
pub struct PartitionedBloomFilter {
    /// Partitions laid out back to back: partition i owns [i*s, (i+1)*s)
    bits: BitVec<u8, Lsb0>,
    /// Number of hash functions / partitions (k)
    k: usize,
    /// Bits per partition (s)
    s: usize,
    /// Number of add calls since construction or reset
    count: usize,
    /// Designed element capacity (n)
    capacity: usize,
    /// Construction-time false positive rate
    fp_rate: f64,
}

impl PartitionedBloomFilter {
    /// Create a filter sized for `capacity` elements at `fp_rate`
    ///
    /// Rates below `f64::MIN_POSITIVE` (zero, negative, subnormal or NaN)
    /// are raised to it, which keeps the bit array finite.
    pub fn new(capacity: usize, fp_rate: f64) -> Self {
        let fp_rate = fp_rate.max(f64::MIN_POSITIVE);
        let params = calculate_optimal_parameters(capacity, fp_rate);
        Self {
            bits: bitvec![u8, Lsb0; 0; params.size_bits],
            k: params.hash_count,
            s: params.partition_bits,
            count: 0,
            capacity,
            fp_rate,
        }
    }

    /// Bits per partition
    pub fn partition_bits(&self) -> usize {
        self.s
    }

    /// Number of add calls since construction or the last reset
    pub fn elements_inserted(&self) -> usize {
        self.count
    }

    /// Number of bits set across all partitions
    pub fn bits_set(&self) -> usize {
        self.bits.count_ones()
    }

    /// Insert an element, returning whether it was already (possibly) present
    pub fn test_and_add(&mut self, element: &[u8]) -> bool {
        let indices = compute_partition_indices(element, self.k, self.s);
        let mut member = true;
        for (partition, idx) in indices.into_iter().enumerate() {
            let pos = partition * self.s + idx;
            if !self.bits[pos] {
                member = false;
                self.bits.set(pos, true);
            }
        }
        self.count += 1;
        member
    }
}

impl PartitionedFilter for PartitionedBloomFilter {
    fn with_rate(size_hint: usize, fp_rate: f64) -> Self {
        Self::new(size_hint, fp_rate)
    }

    fn capacity(&self) -> usize {
        self.capacity
    }

    fn hash_count(&self) -> usize {
        self.k
    }

    fn size_bits(&self) -> usize {
        self.bits.len()
    }

    fn false_positive_rate(&self) -> f64 {
        self.fp_rate
    }

    fn fill_ratio(&self) -> f64 {
        if self.bits.is_empty() {
            return 0.0;
        }
        self.bits.count_ones() as f64 / self.bits.len() as f64
    }

    fn estimated_fill_ratio(&self) -> f64 {
        estimated_fill_ratio(self.count, self.s)
    }

    fn test(&self, element: &[u8]) -> bool {
        compute_partition_indices(element, self.k, self.s)
            .into_iter()
            .enumerate()
            .all(|(partition, idx)| self.bits[partition * self.s + idx])
    }

    fn add(&mut self, element: &[u8]) {
        let indices = compute_partition_indices(element, self.k, self.s);
        for (partition, idx) in indices.into_iter().enumerate() {
            self.bits.set(partition * self.s + idx, true);
        }
        self.count += 1;
    }

    fn reset(&mut self) {
        self.bits.fill(false);
        self.count = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_creates_empty_filter() {
        let filter = PartitionedBloomFilter::new(100, 0.01);

        assert_eq!(filter.capacity(), 100);
        assert_eq!(filter.hash_count(), 7);
        assert_eq!(filter.size_bits(), 959);
        assert_eq!(filter.bits_set(), 0, "All bits should be zero initially");
        assert_eq!(filter.fill_ratio(), 0.0);
        assert_eq!(filter.estimated_fill_ratio(), 0.0);
        assert!((filter.false_positive_rate() - 0.01).abs() < 1e-15);
    }

    #[test]
    fn test_add_sets_one_bit_per_partition() {
        let mut filter = PartitionedBloomFilter::new(100, 0.01);

        filter.add(b"first");

        assert_eq!(filter.bits_set(), filter.hash_count());
        for partition in 0..filter.hash_count() {
            let start = partition * filter.partition_bits();
            let end = start + filter.partition_bits();
            assert_eq!(
                filter.bits[start..end].count_ones(),
                1,
                "Partition {} should hold exactly one bit",
                partition
            );
        }
    }

    #[test]
    fn test_contains_after_add() {
        let mut filter = PartitionedBloomFilter::new(100, 0.01);
        filter.add(b"0xABCD");

        assert!(filter.test(b"0xABCD"), "Inserted element must be found");
    }

    #[test]
    fn test_no_false_negatives_bulk() {
        let mut filter = PartitionedBloomFilter::new(1000, 0.01);
        let elements: Vec<String> = (0..1000).map(|i| format!("key_{:04x}", i)).collect();

        for elem in &elements {
            filter.add(elem.as_bytes());
        }

        for elem in &elements {
            assert!(filter.test(elem.as_bytes()), "False negative for {}", elem);
        }
    }

    #[test]
    fn test_false_positive_rate_bounded_at_capacity() {
        let target_fpr = 0.01;
        let n = 1000;
        let mut filter = PartitionedBloomFilter::new(n, target_fpr);

        for i in 0..n {
            filter.add(format!("inserted_{}", i).as_bytes());
        }

        let mut false_positives = 0;
        for i in 0..100_000 {
            if filter.test(format!("not_inserted_{}", i).as_bytes()) {
                false_positives += 1;
            }
        }

        let actual_fpr = false_positives as f64 / 100_000.0;
        assert!(
            actual_fpr <= target_fpr * 1.5,
            "Actual FPR {} exceeds 1.5 * target {}",
            actual_fpr,
            target_fpr
        );
    }

    #[test]
    fn test_estimated_fill_tracks_actual_fill() {
        let mut filter = PartitionedBloomFilter::new(1000, 0.01);
        for i in 0..700 {
            filter.add(format!("e{}", i).as_bytes());
        }

        let diff = (filter.estimated_fill_ratio() - filter.fill_ratio()).abs();
        assert!(diff < 0.05, "Estimate off by {}", diff);
    }

    #[test]
    fn test_test_and_add() {
        let mut filter = PartitionedBloomFilter::new(100, 0.01);

        assert!(!filter.test_and_add(b"a"));
        assert!(filter.test_and_add(b"a"));
        assert_eq!(filter.elements_inserted(), 2);
    }

    #[test]
    fn test_reset_clears_state() {
        let mut filter = PartitionedBloomFilter::new(100, 0.01);
        filter.add(b"a");
        filter.add(b"b");

        filter.reset();

        assert_eq!(filter.bits_set(), 0);
        assert_eq!(filter.elements_inserted(), 0);
        assert!(!filter.test(b"a"));
        assert_eq!(filter.size_bits(), 959, "Reset keeps the shape");
    }

    #[test]
    fn test_non_positive_rate_clamped() {
        for fp_rate in [0.0, -1.0, f64::NAN, 1e-320] {
            let mut filter = PartitionedBloomFilter::new(10, fp_rate);

            assert_eq!(filter.false_positive_rate(), f64::MIN_POSITIVE);
            assert_eq!(filter.hash_count(), 1022);
            assert!(filter.size_bits() < 20_000, "Bit array must stay bounded");

            filter.add(b"key");
            assert!(filter.test(b"key"));
        }
    }
}

//! Partitioned Bloom filter parameter calculation
//!
//! Formulas:
//! - m = n * |ln(fpr)| / (ln(2)^2)   -- optimal bits
//! - k = ceil(log2(1 / fpr))         -- hash functions, one partition each
//! - s = ceil(m / k)                 -- bits per partition
//!
//! The growth policy of the scalable series lives here too, since it is
//! pure arithmetic over the same quantities.

use std::f64::consts::LN_2;

/// Parameters of a single partitioned filter
#[derive(Clone, Debug, PartialEq)]
pub struct PartitionParams {
    /// Total number of bits across all partitions (k * s)
    pub size_bits: usize,
    /// Number of hash functions, which is also the number of partitions
    pub hash_count: usize,
    /// Bits per partition
    pub partition_bits: usize,
    /// Expected false positive rate once `num_elements` have been inserted
    pub expected_fpr: f64,
}

/// Calculate partitioned filter parameters for given constraints
///
/// # Arguments
/// * `num_elements` - Expected number of elements to insert (n)
/// * `target_fpr` - Target false positive rate
pub fn calculate_optimal_parameters(num_elements: usize, target_fpr: f64) -> PartitionParams {
    let n = num_elements.max(1);
    let m = optimal_bits(n, target_fpr);
    let k = optimal_hash_count(target_fpr);
    let s = m.div_ceil(k).max(1);

    PartitionParams {
        size_bits: s * k,
        hash_count: k,
        partition_bits: s,
        expected_fpr: calculate_fpr(s * k, n, k),
    }
}

/// Optimal number of bits for `n` elements at `target_fpr`
pub fn optimal_bits(n: usize, target_fpr: f64) -> usize {
    let ln2_squared = LN_2 * LN_2;
    let bits = (n as f64 * target_fpr.ln().abs() / ln2_squared).ceil();
    (bits as usize).max(1)
}

/// Number of hash functions (and partitions) for `target_fpr`
///
/// Depends on the rate alone, so filters built with nearby rates share
/// the same count.
pub fn optimal_hash_count(target_fpr: f64) -> usize {
    let k = (1.0 / target_fpr).log2().ceil();
    (k as usize).max(1)
}

/// Calculate the false positive rate for given parameters
///
/// Formula: FPR = (1 - e^(-kn/m))^k
pub fn calculate_fpr(m: usize, n: usize, k: usize) -> f64 {
    if m == 0 {
        return 1.0;
    }
    let exponent = -(k as f64) * (n as f64) / (m as f64);
    (1.0 - exponent.exp()).powi(k as i32)
}

/// Estimated fraction of occupied slots in a partition of `partition_bits`
/// bits after `count` insertions
///
/// Formula: 1 - e^(-count / s)
pub fn estimated_fill_ratio(count: usize, partition_bits: usize) -> f64 {
    if partition_bits == 0 {
        return 1.0;
    }
    1.0 - (-(count as f64) / partition_bits as f64).exp()
}

/// Target false positive rate of the `index`-th filter in a series
///
/// Formula: fp * r^index
pub fn tightened_rate(target_fpr: f64, tightening_ratio: f64, index: usize) -> f64 {
    let exponent = i32::try_from(index).unwrap_or(i32::MAX);
    target_fpr * tightening_ratio.powi(exponent)
}

/// Limit of the summed per-filter targets over an unbounded series
///
/// Formula: fp / (1 - r)
pub fn compounded_bound(target_fpr: f64, tightening_ratio: f64) -> f64 {
    target_fpr / (1.0 - tightening_ratio)
}

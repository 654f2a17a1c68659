//! Hash functions for the partitioned filter
//!
//! Uses MurmurHash3 (x64, 128-bit) once per element and splits the digest
//! into two 64-bit halves for double hashing.

use std::io::Cursor;

/// Seed shared by every filter so all filters in a series hash identically
pub const HASH_SEED: u32 = 0;

/// Hash an element into its `(lower, upper)` 64-bit kernel
pub fn hash_kernel(element: &[u8]) -> (u64, u64) {
    let mut cursor = Cursor::new(element);

    // Reading from an in-memory cursor cannot fail
    let hash = murmur3::murmur3_x64_128(&mut cursor, HASH_SEED).unwrap_or(0);
    (hash as u64, (hash >> 64) as u64)
}

/// Compute the bit index inside each of `k` partitions of `s` bits
///
/// Uses double hashing: h(i) = lower + i * upper (mod s). Entry `i` of the
/// result belongs to partition `i`.
pub fn compute_partition_indices(element: &[u8], k: usize, s: usize) -> Vec<usize> {
    let (lower, upper) = hash_kernel(element);
    partition_indices(lower, upper, k, s)
}

/// Same as [`compute_partition_indices`] from a precomputed kernel
pub fn partition_indices(lower: u64, upper: u64, k: usize, s: usize) -> Vec<usize> {
    let s = s.max(1) as u64;
    (0..k)
        .map(|i| {
            let hash = lower.wrapping_add((i as u64).wrapping_mul(upper));
            (hash % s) as usize
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_kernel_deterministic() {
        let element = b"session:7f3a";

        assert_eq!(
            hash_kernel(element),
            hash_kernel(element),
            "Same input must produce same kernel"
        );
    }

    #[test]
    fn test_hash_kernel_halves_differ() {
        let (lower, upper) = hash_kernel(b"session:7f3a");
        assert_ne!(lower, upper, "Kernel halves should be independent");
    }

    #[test]
    fn test_different_elements_different_kernels() {
        assert_ne!(hash_kernel(b"alpha"), hash_kernel(b"beta"));
    }

    #[test]
    fn test_indices_one_per_partition_within_bounds() {
        let k = 7;
        let s = 137;

        let indices = compute_partition_indices(b"user:42", k, s);

        assert_eq!(indices.len(), k, "Should produce one index per partition");
        for idx in &indices {
            assert!(*idx < s, "Index {} should be < s={}", idx, s);
        }
    }

    #[test]
    fn test_empty_element_hashes() {
        let indices = compute_partition_indices(b"", 4, 100);
        assert_eq!(indices.len(), 4);
    }

    #[test]
    fn test_index_uniformity() {
        // Indices of partition 0 should spread roughly evenly over 10 buckets
        let s = 1000;
        let mut counts = vec![0usize; 10];

        for i in 0..5000 {
            let element = format!("element_{}", i);
            let indices = compute_partition_indices(element.as_bytes(), 1, s);
            counts[indices[0] / 100] += 1;
        }

        let expected = 500;
        for (i, count) in counts.iter().enumerate() {
            assert!(
                *count >= expected / 2 && *count <= expected * 3 / 2,
                "Bucket {} has {} entries, expected ~{}",
                i,
                count,
                expected
            );
        }
    }
}

//! Fixed-capacity filter contract
//!
//! The scalable series never looks inside the filters it owns. Everything it
//! needs, including the growth signal, goes through this trait.

/// A fixed-capacity approximate-membership filter
///
/// Implementations must never report a false negative: after `add(e)`,
/// `test(e)` returns `true` until `reset` is called.
pub trait PartitionedFilter {
    /// Build a filter sized for roughly `size_hint` elements at `fp_rate`
    fn with_rate(size_hint: usize, fp_rate: f64) -> Self
    where
        Self: Sized;

    /// Designed element capacity
    fn capacity(&self) -> usize;

    /// Number of hash functions used per insert/test
    fn hash_count(&self) -> usize;

    /// Size of the underlying bit array
    fn size_bits(&self) -> usize;

    /// False positive rate the filter was constructed for
    fn false_positive_rate(&self) -> f64;

    /// Fraction of bits currently set (0.0 to 1.0)
    fn fill_ratio(&self) -> f64;

    /// Analytic estimate of occupied slots, used to decide when to grow
    fn estimated_fill_ratio(&self) -> f64;

    /// False positive rate at the current fill level
    ///
    /// Each hash position hits a set bit with probability equal to the
    /// estimated fill ratio, and a false positive needs all of them to.
    fn current_false_positive_rate(&self) -> f64 {
        self.estimated_fill_ratio()
            .powi(i32::try_from(self.hash_count()).unwrap_or(i32::MAX))
    }

    /// Test for membership (false positives possible, false negatives not)
    fn test(&self, element: &[u8]) -> bool;

    /// Insert an element
    fn add(&mut self, element: &[u8]);

    /// Clear every bit and the insert count
    fn reset(&mut self);
}

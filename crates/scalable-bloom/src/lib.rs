//! # Scalable Bloom Filter
//!
//! Approximate set membership for streams whose size is not known up front.
//!
//! Based on Almeida, Baquero, Preguiça and Hutchison, "Scalable Bloom
//! Filters" (2007).
//!
//! ## Architecture
//!
//! - **Domain Layer** (`domain/`): Pure filter logic, no I/O
//!   - `ScalableBloomFilter`: Growing chain of partitioned filters
//!   - `PartitionedBloomFilter`: Fixed-capacity filter, one bit partition
//!     per hash function
//!   - `ScalableConfig`: Growth parameters with validation
//!   - `ScalableConfigBuilder`: Fluent builder for configuration
//!
//! - **Ports Layer** (`ports/`): Trait definitions
//!   - `PartitionedFilter`: Contract every chained filter satisfies
//!
//! - **Metrics** (`metrics`): Growth, insert and lookup counters
//!
//! ## Growth Policy
//!
//! The series starts with one filter. Before each insert, if the last
//! filter's estimated fill ratio has reached the threshold (0.5 by default),
//! a new filter is appended whose target false positive rate is the
//! previous one multiplied by the tightening ratio `r`. Filter `i` thus
//! targets `fp * r^i` and the compounded rate stays below `fp / (1 - r)`.
//!
//! ## Invariants
//!
//! - **No false negatives**: if added, `test()` MUST return true until reset
//! - **Monotonic capacity**: `capacity()` only grows between resets
//!
//! ## Usage Example
//!
//! ```
//! use scalable_bloom::ScalableBloomFilter;
//!
//! let mut filter = ScalableBloomFilter::new(1_000, 0.01, 0.8)?;
//!
//! filter.add(b"alice");
//! assert!(filter.test(b"alice"));
//!
//! // test_and_add reports membership from before the insert
//! assert!(!filter.test_and_add(b"bob"));
//! assert!(filter.test_and_add(b"bob"));
//! # Ok::<(), scalable_bloom::FilterError>(())
//! ```
//!
//! Not thread-safe: wrap the filter in a `Mutex` to share it.

pub mod domain;
pub mod error;
pub mod metrics;
pub mod ports;

// Re-exports for convenience
pub use domain::{
    PartitionedBloomFilter, ScalableBloomFilter, ScalableConfig, ScalableConfigBuilder,
};
pub use error::{FilterError, FilterResult};
pub use metrics::{Metrics, MetricsRecorder, MetricsSnapshot, NoOpMetrics};
pub use ports::PartitionedFilter;

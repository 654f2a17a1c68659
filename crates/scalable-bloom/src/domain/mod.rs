//! Domain Layer - Pure filter logic
//!
//! This layer contains:
//! - Scalable filter series (growth policy)
//! - Partitioned Bloom filter
//! - Hash functions
//! - Parameter calculations
//! - Configuration
//!
//! RULES:
//! - No I/O operations
//! - No async code
//! - Pure functions where possible

pub mod config;
pub mod hash_functions;
pub mod parameters;
pub mod partitioned;
pub mod scalable;

pub use config::{ScalableConfig, ScalableConfigBuilder};
pub use parameters::{calculate_optimal_parameters, PartitionParams};
pub use partitioned::PartitionedBloomFilter;
pub use scalable::ScalableBloomFilter;

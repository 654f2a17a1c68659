//! Ports Layer
//!
//! Defines the contract a fixed-capacity filter must satisfy to be chained
//! into a [`ScalableBloomFilter`](crate::domain::ScalableBloomFilter).

pub mod filter;

pub use filter::PartitionedFilter;

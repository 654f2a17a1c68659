//! Error types for the scalable Bloom filter

use thiserror::Error;

/// Result alias used by every fallible constructor in this crate
pub type FilterResult<T> = Result<T, FilterError>;

/// Errors raised while configuring a filter series
///
/// All of them surface at construction time. Once a series exists,
/// `test`/`add`/`reset` cannot fail.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FilterError {
    #[error("Invalid size hint: {hint} (must be greater than 0)")]
    InvalidSizeHint { hint: usize },

    #[error("Invalid false positive rate: {fpr} (must be in the open interval (0, 1))")]
    InvalidFalsePositiveRate { fpr: f64 },

    #[error("Invalid tightening ratio: {ratio} (must be in the open interval (0, 1))")]
    InvalidTighteningRatio { ratio: f64 },

    #[error("Invalid fill ratio: {ratio} (must be in the interval (0, 1])")]
    InvalidFillRatio { ratio: f64 },
}

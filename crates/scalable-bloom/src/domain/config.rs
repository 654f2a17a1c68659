//! Scalable filter configuration and validation
//!
//! # Example
//!
//! ```
//! use scalable_bloom::domain::ScalableConfigBuilder;
//!
//! let config = ScalableConfigBuilder::new()
//!     .target_fpr(0.001)
//!     .size_hint(50_000)
//!     .tightening_ratio(0.9)
//!     .build()
//!     .expect("Valid config");
//! assert_eq!(config.size_hint, 50_000);
//! ```

use crate::error::{FilterError, FilterResult};
use serde::{Deserialize, Serialize};

/// Default base capacity of every filter in the series
pub const DEFAULT_SIZE_HINT: usize = 10_000;

/// Default shrink factor between consecutive filters' target rates
pub const DEFAULT_TIGHTENING_RATIO: f64 = 0.8;

/// Default estimated fill ratio at which a filter is considered full
pub const DEFAULT_FILL_RATIO: f64 = 0.5;

/// Default overall false positive target
pub const DEFAULT_TARGET_FPR: f64 = 0.01;

/// Growth parameters of a scalable filter series
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalableConfig {
    /// Element capacity of every filter in the series
    pub size_hint: usize,
    /// Target false positive rate of the first filter (0 < fpr < 1)
    pub target_fpr: f64,
    /// Ratio between consecutive filters' target rates (0 < r < 1)
    pub tightening_ratio: f64,
    /// Estimated fill ratio that triggers growth (0 < p <= 1)
    pub fill_ratio: f64,
}

impl Default for ScalableConfig {
    fn default() -> Self {
        Self {
            size_hint: DEFAULT_SIZE_HINT,
            target_fpr: DEFAULT_TARGET_FPR,
            tightening_ratio: DEFAULT_TIGHTENING_RATIO,
            fill_ratio: DEFAULT_FILL_RATIO,
        }
    }
}

impl ScalableConfig {
    /// Create a new configuration with validation
    pub fn new(size_hint: usize, target_fpr: f64, tightening_ratio: f64) -> FilterResult<Self> {
        let config = Self {
            size_hint,
            target_fpr,
            tightening_ratio,
            fill_ratio: DEFAULT_FILL_RATIO,
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate every parameter
    ///
    /// The open-interval checks are written as negated comparisons so NaN
    /// is rejected too.
    pub fn validate(&self) -> FilterResult<()> {
        if self.size_hint == 0 {
            return Err(FilterError::InvalidSizeHint {
                hint: self.size_hint,
            });
        }

        if !(self.target_fpr > 0.0 && self.target_fpr < 1.0) {
            return Err(FilterError::InvalidFalsePositiveRate {
                fpr: self.target_fpr,
            });
        }

        if !(self.tightening_ratio > 0.0 && self.tightening_ratio < 1.0) {
            return Err(FilterError::InvalidTighteningRatio {
                ratio: self.tightening_ratio,
            });
        }

        if !(self.fill_ratio > 0.0 && self.fill_ratio <= 1.0) {
            return Err(FilterError::InvalidFillRatio {
                ratio: self.fill_ratio,
            });
        }

        Ok(())
    }

    /// Builder-style method to set the fill ratio
    pub fn with_fill_ratio(mut self, ratio: f64) -> Self {
        self.fill_ratio = ratio;
        self
    }
}

/// Builder for ScalableConfig with validation
///
/// Unset fields fall back to [`ScalableConfig::default`].
#[derive(Default)]
pub struct ScalableConfigBuilder {
    size_hint: Option<usize>,
    target_fpr: Option<f64>,
    tightening_ratio: Option<f64>,
    fill_ratio: Option<f64>,
}

impl ScalableConfigBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the element capacity of each filter
    pub fn size_hint(mut self, hint: usize) -> Self {
        self.size_hint = Some(hint);
        self
    }

    /// Set the overall target false positive rate
    pub fn target_fpr(mut self, fpr: f64) -> Self {
        self.target_fpr = Some(fpr);
        self
    }

    /// Set the tightening ratio
    pub fn tightening_ratio(mut self, ratio: f64) -> Self {
        self.tightening_ratio = Some(ratio);
        self
    }

    /// Set the growth fill ratio
    pub fn fill_ratio(mut self, ratio: f64) -> Self {
        self.fill_ratio = Some(ratio);
        self
    }

    /// Build the ScalableConfig, validating all parameters
    pub fn build(self) -> FilterResult<ScalableConfig> {
        let defaults = ScalableConfig::default();

        let config = ScalableConfig {
            size_hint: self.size_hint.unwrap_or(defaults.size_hint),
            target_fpr: self.target_fpr.unwrap_or(defaults.target_fpr),
            tightening_ratio: self.tightening_ratio.unwrap_or(defaults.tightening_ratio),
            fill_ratio: self.fill_ratio.unwrap_or(defaults.fill_ratio),
        };

        config.validate()?;
        Ok(config)
    }
}

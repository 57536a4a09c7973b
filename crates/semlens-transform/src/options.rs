//! Configuration options for view transforms.

use serde::{Deserialize, Serialize};

/// Default number of most frequent values kept per column profile.
pub const DEFAULT_TOP_VALUES: usize = 10;

/// Default share of non-null values one type needs before a column is
/// inferred as that type instead of `mixed`.
pub const DEFAULT_TYPE_DOMINANCE: f64 = 0.8;

/// Options controlling transform behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TransformOptions {
    /// Maximum number of entries in `ColumnProfile::top_values`.
    pub top_values_limit: usize,
    /// Dominance threshold for column type inference (0.0 to 1.0).
    pub type_dominance_threshold: f64,
}

impl Default for TransformOptions {
    fn default() -> Self {
        Self {
            top_values_limit: DEFAULT_TOP_VALUES,
            type_dominance_threshold: DEFAULT_TYPE_DOMINANCE,
        }
    }
}

impl TransformOptions {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_top_values_limit(mut self, limit: usize) -> Self {
        self.top_values_limit = limit;
        self
    }

    /// Set the dominance threshold; values are clamped to `0.0..=1.0`.
    #[must_use]
    pub fn with_type_dominance_threshold(mut self, threshold: f64) -> Self {
        self.type_dominance_threshold = if threshold.is_nan() {
            DEFAULT_TYPE_DOMINANCE
        } else {
            threshold.clamp(0.0, 1.0)
        };
        self
    }
}

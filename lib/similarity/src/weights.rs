//! Per-field weights
//!
//! An explicit mapping from field name to weight. Every field not listed
//! weighs [`DEFAULT_WEIGHT`]. Comparisons currently run with the uniform
//! mapping; the mapping is the seam for a future per-field weighting scheme.

use entcmp_core::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Weight of any field without an explicit entry
pub const DEFAULT_WEIGHT: f64 = 1.0;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FieldWeights {
    #[serde(default)]
    weights: HashMap<String, f64>,
}

impl FieldWeights {
    /// Every field weighs 1.0
    pub fn uniform() -> Self {
        Self::default()
    }

    /// Build from explicit entries, rejecting negative or non-finite weights
    pub fn new(weights: HashMap<String, f64>) -> Result<Self> {
        for (name, weight) in &weights {
            if !weight.is_finite() || *weight < 0.0 {
                return Err(Error::NegativeWeight(name.clone()));
            }
        }
        Ok(Self { weights })
    }

    /// Weight for a field
    pub fn weight(&self, field: &str) -> f64 {
        self.weights.get(field).copied().unwrap_or(DEFAULT_WEIGHT)
    }

    pub fn is_uniform(&self) -> bool {
        self.weights.values().all(|w| *w == DEFAULT_WEIGHT)
    }
}

/// Weighted mean of `(score, weight)` pairs; 0.0 when total weight is zero
pub fn weighted_mean(pairs: impl IntoIterator<Item = (f64, f64)>) -> f64 {
    let (sum, total) = pairs
        .into_iter()
        .fold((0.0, 0.0), |(sum, total), (score, weight)| {
            (sum + score * weight, total + weight)
        });

    if total <= 0.0 {
        0.0
    } else {
        (sum / total).clamp(0.0, 1.0)
    }
}

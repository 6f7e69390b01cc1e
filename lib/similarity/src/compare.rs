//! Entity syntactic comparator
//!
//! Aligns two entities by shared field name, scores every shared field and
//! aggregates the per-field scores into overall scores.

use crate::distance::score_pair;
use crate::weights::{weighted_mean, FieldWeights};
use entcmp_core::{normalize_value, normalized_items, Entity, Error, Result};
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

/// Match threshold applied to the overall bigram score when none is given
pub const DEFAULT_THRESHOLD: f64 = 0.8;

/// Check that a threshold is a finite number in [0, 1]
pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if threshold.is_finite() && (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(Error::InvalidThreshold(threshold))
    }
}

/// Syntactic comparison of one shared field
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldComparison {
    pub field: String,
    pub value1: Value,
    pub value2: Value,
    pub normalized1: String,
    pub normalized2: String,
    pub bigram_score: f64,
    pub edit_score: f64,
    /// Weight this field carried in the overall means
    pub weight: f64,
    /// Raw JSON values are identical
    pub exact_match: bool,
    /// Sorted normalized items are identical (scalars count as one item)
    pub normalized_match: bool,
}

/// Result of the syntactic phase
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyntacticSummary {
    pub overall_bigram_score: f64,
    pub overall_edit_score: f64,
    /// One entry per shared field, in the first entity's field order
    pub field_comparisons: Vec<FieldComparison>,
    pub only_in_entity1: Vec<String>,
    pub only_in_entity2: Vec<String>,
}

impl SyntacticSummary {
    /// Only the bigram score takes part in the match decision.
    pub fn is_match(&self, threshold: f64) -> bool {
        self.overall_bigram_score >= threshold
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.field_comparisons.iter().map(|c| c.field.as_str())
    }

    pub fn has_shared_fields(&self) -> bool {
        !self.field_comparisons.is_empty()
    }
}

/// Comparator that computes field-wise syntactic similarity
#[derive(Debug, Clone, Default)]
pub struct EntityComparator {
    weights: FieldWeights,
}

impl EntityComparator {
    /// Create a comparator with the given field weights
    pub fn new(weights: FieldWeights) -> Self {
        Self { weights }
    }

    /// Comparator where every field weighs 1.0
    pub fn uniform() -> Self {
        Self::new(FieldWeights::uniform())
    }

    pub fn weights(&self) -> &FieldWeights {
        &self.weights
    }

    /// Compare two entities field by field
    ///
    /// Entities sharing no field names yield zero overall scores and an
    /// empty comparison list; that is a result, not an error.
    pub fn compare(&self, entity1: &Entity, entity2: &Entity) -> SyntacticSummary {
        let field_comparisons: Vec<FieldComparison> = entity1
            .shared_field_names(entity2)
            .into_iter()
            .filter_map(|name| {
                let value1 = entity1.get(name)?;
                let value2 = entity2.get(name)?;
                Some(self.compare_field(name, value1, value2))
            })
            .collect();

        let overall_bigram_score = weighted_mean(
            field_comparisons.iter().map(|c| (c.bigram_score, c.weight)),
        );
        let overall_edit_score = weighted_mean(
            field_comparisons.iter().map(|c| (c.edit_score, c.weight)),
        );

        debug!(
            "Compared {} shared fields: bigram={:.4} edit={:.4}",
            field_comparisons.len(),
            overall_bigram_score,
            overall_edit_score
        );

        SyntacticSummary {
            overall_bigram_score,
            overall_edit_score,
            field_comparisons,
            only_in_entity1: entity1.missing_from(entity2).into_iter().cloned().collect(),
            only_in_entity2: entity2.missing_from(entity1).into_iter().cloned().collect(),
        }
    }

    /// Compare a single field's two raw values
    pub fn compare_field(&self, field: &str, value1: &Value, value2: &Value) -> FieldComparison {
        let normalized1 = normalize_value(value1);
        let normalized2 = normalize_value(value2);
        let scores = score_pair(&normalized1, &normalized2);

        FieldComparison {
            field: field.to_string(),
            exact_match: value1 == value2,
            normalized_match: normalized_items(value1) == normalized_items(value2),
            value1: value1.clone(),
            value2: value2.clone(),
            normalized1,
            normalized2,
            bigram_score: scores.bigram,
            edit_score: scores.edit,
            weight: self.weights.weight(field),
        }
    }
}

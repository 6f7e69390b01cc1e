//! Comparison verdict assembly
//!
//! Merges the syntactic summary with the semantic annotations into the
//! response document. No scoring happens here.

use crate::compare::{FieldComparison, SyntacticSummary};
use entcmp_core::{SemanticAnnotations, SemanticVerdict};
use serde::Serialize;
use serde_json::Value;

/// Reason used if a field somehow has no semantic annotation
pub const MISSING_ANNOTATION: &str = "no semantic annotation recorded";

/// One field of the final verdict
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldReport {
    pub field: String,
    pub value1: Value,
    pub value2: Value,
    pub normalized1: String,
    pub normalized2: String,
    pub bigram_score: f64,
    pub edit_score: f64,
    pub exact_match: bool,
    pub normalized_match: bool,
    /// `true`, `false`, `"unparsed:<text>"` or `null`
    pub semantic_verdict: SemanticVerdict,
    /// Why `semantic_verdict` is null
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_note: Option<String>,
}

impl FieldReport {
    fn merge(comparison: FieldComparison, verdict: SemanticVerdict) -> Self {
        Self {
            semantic_note: verdict.reason().map(str::to_string),
            semantic_verdict: verdict,
            field: comparison.field,
            value1: comparison.value1,
            value2: comparison.value2,
            normalized1: comparison.normalized1,
            normalized2: comparison.normalized2,
            bigram_score: comparison.bigram_score,
            edit_score: comparison.edit_score,
            exact_match: comparison.exact_match,
            normalized_match: comparison.normalized_match,
        }
    }
}

/// Fields present in only one of the two entities
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct UnmatchedFields {
    pub only_in_entity1: Vec<String>,
    pub only_in_entity2: Vec<String>,
}

/// Response document of one entity comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ComparisonVerdict {
    /// `overall_bigram_score >= threshold`
    pub is_match: bool,
    pub threshold: f64,
    pub overall_bigram_score: f64,
    pub overall_edit_score: f64,
    pub explanation: String,
    /// Same fields, same order as the syntactic summary
    pub field_comparisons: Vec<FieldReport>,
    pub unmatched_fields: UnmatchedFields,
    pub holistic_semantic_analysis: Option<String>,
    pub semantic_processing_error: Option<String>,
}

impl ComparisonVerdict {
    /// Merge a syntactic summary with its semantic annotations
    pub fn assemble(
        summary: SyntacticSummary,
        threshold: f64,
        mut annotations: SemanticAnnotations,
    ) -> Self {
        let is_match = summary.is_match(threshold);
        let explanation = explain(&summary, threshold, is_match);

        let field_comparisons = summary
            .field_comparisons
            .into_iter()
            .map(|comparison| {
                let verdict = annotations
                    .per_field
                    .remove(&comparison.field)
                    .unwrap_or_else(|| SemanticVerdict::Unavailable(MISSING_ANNOTATION.to_string()));
                FieldReport::merge(comparison, verdict)
            })
            .collect();

        Self {
            is_match,
            threshold,
            overall_bigram_score: summary.overall_bigram_score,
            overall_edit_score: summary.overall_edit_score,
            explanation,
            field_comparisons,
            unmatched_fields: UnmatchedFields {
                only_in_entity1: summary.only_in_entity1,
                only_in_entity2: summary.only_in_entity2,
            },
            holistic_semantic_analysis: Some(annotations.holistic),
            semantic_processing_error: annotations.processing_error,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldReport> {
        self.field_comparisons.iter().find(|f| f.field == name)
    }
}

/// Human-readable explanation of the match decision
pub fn explain(summary: &SyntacticSummary, threshold: f64, is_match: bool) -> String {
    if !summary.has_shared_fields() {
        return format!(
            "The entities share no field names, so the overall scores are 0; \
             the entities are considered {} (threshold {:.2}).",
            if is_match { "a match" } else { "not a match" },
            threshold
        );
    }

    format!(
        "Compared {} shared field(s). Overall bigram similarity {:.4} is {} the threshold {:.2}, \
         so the entities are considered {}. Overall edit similarity is {:.4} (informational only).",
        summary.field_comparisons.len(),
        summary.overall_bigram_score,
        if is_match { "at or above" } else { "below" },
        threshold,
        if is_match { "a match" } else { "not a match" },
        summary.overall_edit_score,
    )
}

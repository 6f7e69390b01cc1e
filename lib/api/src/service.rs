//! Comparison service: syntactic phase, semantic phase, verdict assembly.

use crate::tools::CompareEntitiesParams;
use entcmp_core::Entity;
use entcmp_semantic::{annotate_comparison, select_judge, ModelConfig, SemanticJudge, SemanticResult};
use entcmp_similarity::{ComparisonVerdict, EntityComparator};
use std::sync::Arc;
use tracing::info;

/// Builds the judge for one call from the caller's credential
pub type JudgeSelector =
    Arc<dyn Fn(Option<&str>) -> SemanticResult<Arc<dyn SemanticJudge>> + Send + Sync>;

/// Wrap a closure as a [`JudgeSelector`]
pub fn judge_selector<F>(select: F) -> JudgeSelector
where
    F: Fn(Option<&str>) -> SemanticResult<Arc<dyn SemanticJudge>> + Send + Sync + 'static,
{
    Arc::new(select)
}

/// Stateless between calls; safe to share across transports
#[derive(Clone)]
pub struct ComparisonService {
    comparator: EntityComparator,
    select: JudgeSelector,
}

impl ComparisonService {
    /// Service backed by the Gemini judge configured by `config`
    pub fn new(comparator: EntityComparator, config: ModelConfig) -> Self {
        let select = judge_selector(move |credential| select_judge(credential, &config));
        Self { comparator, select }
    }

    /// Service with a custom judge selector
    pub fn with_judge_selector(comparator: EntityComparator, select: JudgeSelector) -> Self {
        Self { comparator, select }
    }

    pub fn comparator(&self) -> &EntityComparator {
        &self.comparator
    }

    pub async fn compare(
        &self,
        entity1: &Entity,
        entity2: &Entity,
        threshold: f64,
        credential: Option<&str>,
    ) -> ComparisonVerdict {
        let semantic = credential.is_some_and(|c| !c.trim().is_empty());
        let summary = self.comparator.compare(entity1, entity2);
        let judge = (self.select)(credential);
        let annotations = annotate_comparison(judge, &summary, threshold).await;
        let verdict = ComparisonVerdict::assemble(summary, threshold, annotations);

        info!(
            "Compared entities: {} shared field(s), bigram {:.3}, edit {:.3}, match={}, semantic={}",
            verdict.field_comparisons.len(),
            verdict.overall_bigram_score,
            verdict.overall_edit_score,
            verdict.is_match,
            semantic
        );
        verdict
    }

    pub async fn compare_params(&self, params: &CompareEntitiesParams) -> ComparisonVerdict {
        self.compare(
            &params.entity1,
            &params.entity2,
            params.threshold,
            params.api_key.as_deref(),
        )
        .await
    }
}

impl Default for ComparisonService {
    fn default() -> Self {
        Self::new(EntityComparator::uniform(), ModelConfig::default())
    }
}

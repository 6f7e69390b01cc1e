//! Semantic annotator
//!
//! Fans out one judge request per shared field, waits for all of them to
//! settle, then asks once more for a holistic verdict. Every failure is
//! recorded in the annotations instead of being returned.

use crate::error::SemanticResult;
use crate::gemini::{GeminiJudge, ModelConfig};
use crate::judge::{HolisticEvidence, NoCredentialJudge, SemanticJudge};
use entcmp_core::{value_to_text, SemanticAnnotations, SemanticVerdict};
use entcmp_similarity::SyntacticSummary;
use futures_util::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Pick the judge for one comparison.
///
/// No credential (or a blank one) selects [`NoCredentialJudge`]; otherwise a
/// [`GeminiJudge`] is built, which may fail on a malformed credential.
pub fn select_judge(
    credential: Option<&str>,
    config: &ModelConfig,
) -> SemanticResult<Arc<dyn SemanticJudge>> {
    match credential.filter(|c| !c.trim().is_empty()) {
        None => Ok(Arc::new(NoCredentialJudge)),
        Some(key) => Ok(Arc::new(GeminiJudge::new(key, config.clone())?)),
    }
}

/// Runs the semantic phase of a comparison against one judge
#[derive(Clone)]
pub struct SemanticAnnotator {
    judge: Arc<dyn SemanticJudge>,
}

impl SemanticAnnotator {
    pub fn new(judge: Arc<dyn SemanticJudge>) -> Self {
        Self { judge }
    }

    pub fn judge_name(&self) -> &str {
        self.judge.name()
    }

    /// Annotate every shared field, then produce the holistic analysis
    pub async fn annotate(&self, summary: &SyntacticSummary, threshold: f64) -> SemanticAnnotations {
        let per_field = self.annotate_fields(summary).await;

        let evidence = HolisticEvidence::new(summary, threshold, &per_field);
        let holistic = match self.judge.judge_overall(&evidence).await {
            Ok(text) => text,
            Err(e) => {
                warn!("Holistic semantic request failed ({}): {}", self.judge.name(), e);
                format!("Holistic semantic analysis failed: {}", e)
            }
        };

        SemanticAnnotations {
            per_field,
            holistic,
            processing_error: None,
        }
    }

    /// Per-field fan-out; each task owns exactly one key of the result map
    async fn annotate_fields(&self, summary: &SyntacticSummary) -> HashMap<String, SemanticVerdict> {
        let requests = summary.field_comparisons.iter().map(|comparison| {
            let judge = Arc::clone(&self.judge);
            let field = comparison.field.clone();
            let value1 = value_to_text(&comparison.value1);
            let value2 = value_to_text(&comparison.value2);
            async move {
                let verdict = match judge.judge_field(&field, &value1, &value2).await {
                    Ok(verdict) => verdict,
                    Err(e) => {
                        warn!("Semantic request for field '{}' failed: {}", field, e);
                        SemanticVerdict::failed(e)
                    }
                };
                (field, verdict)
            }
        });

        let per_field: HashMap<String, SemanticVerdict> = join_all(requests).await.into_iter().collect();
        debug!("Settled {} semantic field requests", per_field.len());
        per_field
    }
}

/// Full semantic phase for one comparison, given the outcome of judge selection.
///
/// A judge that could not be built marks every field with the shared
/// initialization error; this never fails.
pub async fn annotate_comparison(
    judge: SemanticResult<Arc<dyn SemanticJudge>>,
    summary: &SyntacticSummary,
    threshold: f64,
) -> SemanticAnnotations {
    match judge {
        Ok(judge) => SemanticAnnotator::new(judge).annotate(summary, threshold).await,
        Err(e) => {
            warn!("Semantic client initialization failed: {}", e);
            SemanticAnnotations::initialization_failed(summary.field_names(), &e.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SemanticError;
    use async_trait::async_trait;
    use entcmp_core::{Entity, HOLISTIC_SKIPPED_DUE_TO_ERROR, HOLISTIC_SKIPPED_NO_CREDENTIAL};
    use entcmp_similarity::EntityComparator;
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// Answers "true" for equal texts, fails for one chosen field
    struct ScriptedJudge {
        failing_field: Option<String>,
        fail_overall: bool,
        field_calls: AtomicUsize,
        seen_evidence: std::sync::Mutex<Option<HolisticEvidence>>,
    }

    impl ScriptedJudge {
        fn new(failing_field: Option<&str>, fail_overall: bool) -> Self {
            Self {
                failing_field: failing_field.map(str::to_string),
                fail_overall,
                field_calls: AtomicUsize::new(0),
                seen_evidence: std::sync::Mutex::new(None),
            }
        }
    }

    #[async_trait]
    impl SemanticJudge for ScriptedJudge {
        async fn judge_field(&self, field: &str, value1: &str, value2: &str) -> SemanticResult<SemanticVerdict> {
            self.field_calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(5)).await;
            if self.failing_field.as_deref() == Some(field) {
                return Err(SemanticError::InvalidResponse("simulated outage".to_string()));
            }
            if field == "note" {
                return Ok(crate::judge::parse_verdict("Possibly"));
            }
            Ok(SemanticVerdict::Equivalent(value1 == value2))
        }

        async fn judge_overall(&self, evidence: &HolisticEvidence) -> SemanticResult<String> {
            *self.seen_evidence.lock().unwrap() = Some(evidence.clone());
            if self.fail_overall {
                return Err(SemanticError::Api { status: 503, body: "unavailable".to_string() });
            }
            Ok("Leaning: likely same entity".to_string())
        }

        fn name(&self) -> &str {
            "scripted"
        }
    }

    /// Records how many field requests are in flight at once
    #[derive(Default)]
    struct OverlapJudge {
        in_flight: AtomicUsize,
        peak: AtomicUsize,
    }

    #[async_trait]
    impl SemanticJudge for OverlapJudge {
        async fn judge_field(&self, _: &str, _: &str, _: &str) -> SemanticResult<SemanticVerdict> {
            let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
            self.peak.fetch_max(now, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.in_flight.fetch_sub(1, Ordering::SeqCst);
            Ok(SemanticVerdict::Equivalent(true))
        }

        async fn judge_overall(&self, _: &HolisticEvidence) -> SemanticResult<String> {
            // Every field request has settled by now
            assert_eq!(self.in_flight.load(Ordering::SeqCst), 0);
            Ok("done".to_string())
        }

        fn name(&self) -> &str {
            "overlap"
        }
    }

    fn summary() -> SyntacticSummary {
        let e1 = Entity::from_value("entity1", json!({"name": "Ada", "city": "London", "note": "x"})).unwrap();
        let e2 = Entity::from_value("entity2", json!({"name": "Ada", "city": "Londres", "note": "y"})).unwrap();
        EntityComparator::uniform().compare(&e1, &e2)
    }

    #[tokio::test]
    async fn test_all_fields_annotated() {
        let judge = Arc::new(ScriptedJudge::new(None, false));
        let annotator = SemanticAnnotator::new(judge.clone());
        let annotations = annotator.annotate(&summary(), 0.8).await;

        assert_eq!(judge.field_calls.load(Ordering::SeqCst), 3);
        assert_eq!(annotations.verdict("name"), Some(&SemanticVerdict::Equivalent(true)));
        assert_eq!(annotations.verdict("city"), Some(&SemanticVerdict::Equivalent(false)));
        assert_eq!(annotations.verdict("note"), Some(&SemanticVerdict::Unparsed("Possibly".to_string())));
        assert_eq!(annotations.holistic, "Leaning: likely same entity");
        assert!(annotations.processing_error.is_none());
    }

    #[tokio::test]
    async fn test_field_requests_run_concurrently() {
        let judge = Arc::new(OverlapJudge::default());
        let annotations = SemanticAnnotator::new(judge.clone()).annotate(&summary(), 0.8).await;

        assert_eq!(annotations.per_field.len(), 3);
        assert_eq!(judge.peak.load(Ordering::SeqCst), 3);
        assert_eq!(annotations.holistic, "done");
    }

    #[tokio::test]
    async fn test_one_field_failure_does_not_stop_others() {
        let judge = Arc::new(ScriptedJudge::new(Some("city"), false));
        let annotations = SemanticAnnotator::new(judge.clone()).annotate(&summary(), 0.8).await;

        assert_eq!(annotations.per_field.len(), 3);
        assert_eq!(annotations.verdict("name"), Some(&SemanticVerdict::Equivalent(true)));
        let city = annotations.verdict("city").unwrap();
        assert_eq!(city.to_json(), serde_json::Value::Null);
        assert!(city.reason().unwrap().contains("simulated outage"));
        assert_eq!(annotations.holistic, "Leaning: likely same entity");

        // The holistic request saw the recorded failure
        let evidence = judge.seen_evidence.lock().unwrap().clone().unwrap();
        let city_evidence = evidence.fields.iter().find(|f| f.field == "city").unwrap();
        assert!(city_evidence.semantic_note.as_deref().unwrap().contains("simulated outage"));
    }

    #[tokio::test]
    async fn test_holistic_failure_is_recorded() {
        let judge = Arc::new(ScriptedJudge::new(None, true));
        let annotations = SemanticAnnotator::new(judge).annotate(&summary(), 0.8).await;

        assert!(annotations.holistic.starts_with("Holistic semantic analysis failed"));
        assert!(annotations.holistic.contains("503"));
        assert_eq!(annotations.verdict("name"), Some(&SemanticVerdict::Equivalent(true)));
    }

    #[tokio::test]
    async fn test_no_credential_skips() {
        let summary = summary();
        for credential in [None, Some(""), Some("   ")] {
            let judge = select_judge(credential, &ModelConfig::default());
            let annotations = annotate_comparison(judge, &summary, 0.8).await;
            assert_eq!(annotations.holistic, HOLISTIC_SKIPPED_NO_CREDENTIAL);
            assert_eq!(annotations.per_field.len(), 3);
            assert!(annotations
                .per_field
                .values()
                .all(|v| *v == SemanticVerdict::skipped_no_credential()));
        }
    }

    #[tokio::test]
    async fn test_invalid_credential_marks_every_field() {
        let summary = summary();
        let judge = select_judge(Some("not a valid key"), &ModelConfig::default());
        let annotations = annotate_comparison(judge, &summary, 0.8).await;

        assert_eq!(annotations.holistic, HOLISTIC_SKIPPED_DUE_TO_ERROR);
        let error = annotations.processing_error.clone().unwrap();
        assert!(error.contains("Invalid credential"));
        for verdict in annotations.per_field.values() {
            assert!(verdict.reason().unwrap().contains(&error));
        }
    }

    #[test]
    fn test_select_judge() {
        let config = ModelConfig::default();
        assert_eq!(select_judge(None, &config).ok().unwrap().name(), "no-credential");
        assert_eq!(select_judge(Some("abc123"), &config).ok().unwrap().name(), "gemini");
        assert!(select_judge(Some("a b"), &config).is_err());
    }
}

//! Semantic judge capability
//!
//! The comparator talks to the external model only through [`SemanticJudge`]:
//! "are these two values equivalent?" and "given this evidence, what do you
//! think?". [`NoCredentialJudge`] answers both with skip markers.

use crate::error::SemanticResult;
use async_trait::async_trait;
use entcmp_core::{SemanticVerdict, HOLISTIC_SKIPPED_NO_CREDENTIAL};
use entcmp_similarity::SyntacticSummary;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;

#[async_trait]
pub trait SemanticJudge: Send + Sync {
    /// Judge whether two raw field values mean the same thing
    async fn judge_field(
        &self,
        field: &str,
        value1: &str,
        value2: &str,
    ) -> SemanticResult<SemanticVerdict>;

    /// Produce a free-text verdict over the whole evidence bundle
    async fn judge_overall(&self, evidence: &HolisticEvidence) -> SemanticResult<String>;

    /// Short name for logs
    fn name(&self) -> &str;
}

/// Judge used when the caller supplied no credential
#[derive(Debug, Clone, Copy, Default)]
pub struct NoCredentialJudge;

#[async_trait]
impl SemanticJudge for NoCredentialJudge {
    async fn judge_field(&self, _field: &str, _value1: &str, _value2: &str) -> SemanticResult<SemanticVerdict> {
        Ok(SemanticVerdict::skipped_no_credential())
    }

    async fn judge_overall(&self, _evidence: &HolisticEvidence) -> SemanticResult<String> {
        Ok(HOLISTIC_SKIPPED_NO_CREDENTIAL.to_string())
    }

    fn name(&self) -> &str {
        "no-credential"
    }
}

/// Map a model's free-text answer to a verdict
///
/// The answer is trimmed and case-folded; anything other than `true` or
/// `false` is kept verbatim as an unparsed answer.
pub fn parse_verdict(answer: &str) -> SemanticVerdict {
    match answer.trim().to_lowercase().as_str() {
        "true" => SemanticVerdict::Equivalent(true),
        "false" => SemanticVerdict::Equivalent(false),
        _ => SemanticVerdict::Unparsed(answer.to_string()),
    }
}

/// Syntactic and per-field semantic evidence presented for the holistic judgment
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HolisticEvidence {
    pub overall_bigram_score: f64,
    pub overall_edit_score: f64,
    pub threshold: f64,
    pub syntactic_match: bool,
    pub fields: Vec<FieldEvidence>,
    pub only_in_entity1: Vec<String>,
    pub only_in_entity2: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FieldEvidence {
    pub field: String,
    pub value1: Value,
    pub value2: Value,
    pub bigram_score: f64,
    pub edit_score: f64,
    pub semantic_verdict: SemanticVerdict,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub semantic_note: Option<String>,
}

impl HolisticEvidence {
    pub fn new(
        summary: &SyntacticSummary,
        threshold: f64,
        verdicts: &HashMap<String, SemanticVerdict>,
    ) -> Self {
        let fields = summary
            .field_comparisons
            .iter()
            .map(|c| {
                let verdict = verdicts
                    .get(&c.field)
                    .cloned()
                    .unwrap_or_else(|| SemanticVerdict::Unavailable("not judged".to_string()));
                FieldEvidence {
                    field: c.field.clone(),
                    value1: c.value1.clone(),
                    value2: c.value2.clone(),
                    bigram_score: c.bigram_score,
                    edit_score: c.edit_score,
                    semantic_note: verdict.reason().map(str::to_string),
                    semantic_verdict: verdict,
                }
            })
            .collect();

        Self {
            overall_bigram_score: summary.overall_bigram_score,
            overall_edit_score: summary.overall_edit_score,
            threshold,
            syntactic_match: summary.is_match(threshold),
            fields,
            only_in_entity1: summary.only_in_entity1.clone(),
            only_in_entity2: summary.only_in_entity2.clone(),
        }
    }

    /// Pretty JSON used inside prompts
    pub fn to_pretty_json(&self) -> SemanticResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use entcmp_core::Entity;
    use entcmp_similarity::EntityComparator;
    use serde_json::json;

    #[test]
    fn test_parse_verdict_booleans() {
        assert_eq!(parse_verdict("true"), SemanticVerdict::Equivalent(true));
        assert_eq!(parse_verdict("  TRUE\n"), SemanticVerdict::Equivalent(true));
        assert_eq!(parse_verdict("False"), SemanticVerdict::Equivalent(false));
    }

    #[test]
    fn test_parse_verdict_keeps_other_text() {
        assert_eq!(
            parse_verdict("Yes, they match."),
            SemanticVerdict::Unparsed("Yes, they match.".to_string())
        );
        assert_eq!(parse_verdict("true."), SemanticVerdict::Unparsed("true.".to_string()));
        assert_eq!(parse_verdict(""), SemanticVerdict::Unparsed(String::new()));
    }

    #[tokio::test]
    async fn test_no_credential_judge() {
        let judge = NoCredentialJudge;
        let verdict = judge.judge_field("name", "a", "b").await.unwrap();
        assert_eq!(verdict, SemanticVerdict::skipped_no_credential());

        let summary = EntityComparator::uniform().compare(&Entity::default(), &Entity::default());
        let evidence = HolisticEvidence::new(&summary, 0.8, &HashMap::new());
        assert_eq!(judge.judge_overall(&evidence).await.unwrap(), HOLISTIC_SKIPPED_NO_CREDENTIAL);
    }

    #[test]
    fn test_evidence_bundle() {
        let e1 = Entity::from_value("entity1", json!({"name": "John Smith", "age": 30})).unwrap();
        let e2 = Entity::from_value("entity2", json!({"name": "Jon Smith", "age": 30})).unwrap();
        let summary = EntityComparator::uniform().compare(&e1, &e2);
        let verdicts = HashMap::from([("name".to_string(), SemanticVerdict::Equivalent(true))]);

        let evidence = HolisticEvidence::new(&summary, 0.8, &verdicts);
        assert_eq!(evidence.fields.len(), 2);
        assert!(evidence.syntactic_match);
        assert_eq!(evidence.fields[0].semantic_verdict, SemanticVerdict::Equivalent(true));
        assert!(evidence.fields[1].semantic_note.is_some());

        let text = evidence.to_pretty_json().unwrap();
        assert!(text.contains("\"overall_bigram_score\""));
        assert!(text.contains("John Smith"));
    }
}

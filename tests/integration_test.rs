// Integration tests for entcmp
use async_trait::async_trait;
use entcmp::prelude::*;
use entcmp::{compare_entities, normalize_text, score_pair, Dispatcher};
use entcmp_api::{error_codes, judge_selector, JsonRpcId, JsonRpcRequest};
use entcmp_core::{HOLISTIC_SKIPPED_NO_CREDENTIAL, SKIPPED_NO_CREDENTIAL};
use entcmp_semantic::{HolisticEvidence, SemanticError, SemanticResult};
use serde_json::{json, Value};
use std::sync::Arc;

fn entity(name: &str, value: Value) -> Entity {
    Entity::from_value(name, value).unwrap()
}

/// Fails for one field, agrees on equal normalized text otherwise
struct FlakyJudge {
    failing_field: &'static str,
}

#[async_trait]
impl SemanticJudge for FlakyJudge {
    async fn judge_field(&self, field: &str, value1: &str, value2: &str) -> SemanticResult<SemanticVerdict> {
        if field == self.failing_field {
            return Err(SemanticError::Api {
                status: 500,
                body: "internal".to_string(),
            });
        }
        Ok(SemanticVerdict::Equivalent(normalize_text(value1) == normalize_text(value2)))
    }

    async fn judge_overall(&self, evidence: &HolisticEvidence) -> SemanticResult<String> {
        Ok(format!(
            "{} fields reviewed. Leaning: likely same entity",
            evidence.fields.len()
        ))
    }

    fn name(&self) -> &str {
        "flaky"
    }
}

fn flaky_service(failing_field: &'static str) -> ComparisonService {
    ComparisonService::with_judge_selector(
        EntityComparator::uniform(),
        judge_selector(move |_| Ok(Arc::new(FlakyJudge { failing_field }) as Arc<dyn SemanticJudge>)),
    )
}

fn tools_call(id: i64, arguments: Value) -> JsonRpcRequest {
    JsonRpcRequest {
        jsonrpc: "2.0".to_string(),
        id: Some(Some(JsonRpcId::Number(id))),
        method: "tools/call".to_string(),
        params: Some(json!({"name": "compare_entities", "arguments": arguments})),
    }
}

#[test]
fn test_normalizer_idempotent() {
    for s in ["  Hello,   World! ", "Straße №5", "東京タワー (Tokyo)", "a_b-c", "", "!!!"] {
        let once = normalize_text(s);
        assert_eq!(normalize_text(&once), once);
    }
    assert_eq!(normalize_text("  O'Brien,   JR. "), "obrien jr");
}

#[test]
fn test_scores_in_range() {
    let pairs = [("abc", "abd"), ("", "x"), ("same", "same"), ("a", "b"), ("", "")];
    for (a, b) in pairs {
        let scores = score_pair(a, b);
        assert!((0.0..=1.0).contains(&scores.bigram));
        assert!((0.0..=1.0).contains(&scores.edit));
        if a == b {
            assert_eq!(scores.bigram, 1.0);
            assert_eq!(scores.edit, 1.0);
        }
    }
}

#[tokio::test]
async fn test_no_shared_fields() {
    let e1 = entity("entity1", json!({"name": "Ada"}));
    let e2 = entity("entity2", json!({"title": "Ada"}));
    let verdict = compare_entities(&e1, &e2, 0.1, None).await.unwrap();

    assert_eq!(verdict.overall_bigram_score, 0.0);
    assert_eq!(verdict.overall_edit_score, 0.0);
    assert!(verdict.field_comparisons.is_empty());
    assert!(!verdict.is_match);
    assert_eq!(verdict.unmatched_fields.only_in_entity1, vec!["name".to_string()]);
    assert_eq!(verdict.unmatched_fields.only_in_entity2, vec!["title".to_string()]);
}

#[tokio::test]
async fn test_john_smith() {
    let e1 = entity("entity1", json!({"name": "John Smith", "age": "30"}));
    let e2 = entity("entity2", json!({"name": "Jon Smith", "age": "30"}));
    let verdict = compare_entities(&e1, &e2, DEFAULT_THRESHOLD, None).await.unwrap();

    let age = verdict.field("age").unwrap();
    assert_eq!(age.bigram_score, 1.0);
    assert_eq!(age.edit_score, 1.0);

    let name = verdict.field("name").unwrap();
    assert!(name.bigram_score > 0.0 && name.bigram_score < 1.0);
    assert!(name.edit_score > 0.0 && name.edit_score < 1.0);

    let mean_bigram = (age.bigram_score + name.bigram_score) / 2.0;
    let mean_edit = (age.edit_score + name.edit_score) / 2.0;
    assert!((verdict.overall_bigram_score - mean_bigram).abs() < 1e-12);
    assert!((verdict.overall_edit_score - mean_edit).abs() < 1e-12);

    // field order follows entity1
    let order: Vec<&str> = verdict.field_comparisons.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(order, vec!["name", "age"]);
}

#[tokio::test]
async fn test_identical_city_matches() {
    let e1 = entity("entity1", json!({"city": "New York"}));
    let e2 = entity("entity2", json!({"city": "New York"}));
    let verdict = compare_entities(&e1, &e2, 0.8, None).await.unwrap();

    assert!(verdict.is_match);
    assert_eq!(verdict.overall_bigram_score, 1.0);
    assert!(verdict.explanation.contains("at or above"));
}

#[tokio::test]
async fn test_no_credential_placeholders() {
    let e1 = entity("entity1", json!({"name": "Ada", "city": "London", "tags": ["x", "y"]}));
    let e2 = entity("entity2", json!({"name": "Ada", "city": "Paris", "tags": ["y", "x"]}));
    let verdict = compare_entities(&e1, &e2, 0.8, None).await.unwrap();

    assert_eq!(verdict.field_comparisons.len(), 3);
    for field in &verdict.field_comparisons {
        assert_eq!(field.semantic_verdict, SemanticVerdict::skipped_no_credential());
        assert_eq!(field.semantic_note.as_deref(), Some(SKIPPED_NO_CREDENTIAL));
    }
    assert_eq!(
        verdict.holistic_semantic_analysis.as_deref(),
        Some(HOLISTIC_SKIPPED_NO_CREDENTIAL)
    );
    assert!(verdict.semantic_processing_error.is_none());
}

#[tokio::test]
async fn test_one_field_failure_is_isolated() {
    let e1 = entity("entity1", json!({"name": "Ada Lovelace", "city": "London", "born": 1815}));
    let e2 = entity("entity2", json!({"name": "ada lovelace", "city": "Londres", "born": 1815}));
    let verdict = flaky_service("city").compare(&e1, &e2, 0.8, Some("key")).await;

    let city = verdict.field("city").unwrap();
    assert!(city.semantic_verdict.to_json().is_null());
    assert!(city.semantic_note.as_deref().unwrap().contains("500"));

    assert_eq!(
        verdict.field("name").unwrap().semantic_verdict,
        SemanticVerdict::Equivalent(true)
    );
    assert_eq!(
        verdict.field("born").unwrap().semantic_verdict,
        SemanticVerdict::Equivalent(true)
    );
    assert_eq!(
        verdict.holistic_semantic_analysis.as_deref(),
        Some("3 fields reviewed. Leaning: likely same entity")
    );
    assert!(verdict.semantic_processing_error.is_none());
}

#[tokio::test]
async fn test_semantic_verdicts_do_not_move_match() {
    let e1 = entity("entity1", json!({"name": "Bob", "city": "NYC"}));
    let e2 = entity("entity2", json!({"name": "Robert", "city": "New York"}));
    let without = compare_entities(&e1, &e2, 0.8, None).await.unwrap();
    let with = flaky_service("none").compare(&e1, &e2, 0.8, Some("key")).await;

    assert_eq!(without.is_match, with.is_match);
    assert_eq!(without.overall_bigram_score, with.overall_bigram_score);
    assert_eq!(without.overall_edit_score, with.overall_edit_score);
}

#[tokio::test]
async fn test_invalid_threshold() {
    let e1 = entity("entity1", json!({"a": "x"}));
    let result = compare_entities(&e1, &e1, 1.2, None).await;
    assert!(matches!(result, Err(Error::InvalidThreshold(_))));
}

#[tokio::test]
async fn test_dispatcher_missing_entity1() {
    let dispatcher = Dispatcher::default();
    let response = dispatcher
        .handle(tools_call(1, json!({"entity2": {"name": "Ada"}})))
        .await
        .unwrap();

    assert!(response.result.is_none());
    let error = response.error.unwrap();
    assert_eq!(error.code, error_codes::INVALID_PARAMS);
}

#[tokio::test]
async fn test_dispatcher_full_call_with_scripted_judge() {
    let dispatcher = Dispatcher::new(flaky_service("age"));
    let response = dispatcher
        .handle(tools_call(
            2,
            json!({
                "entity1": {"name": "John Smith", "age": "30"},
                "entity2": {"name": "Jon Smith", "age": "30"},
                "threshold": 0.8,
                "api_key": "test-key"
            }),
        ))
        .await
        .unwrap();

    let result = response.result.unwrap();
    assert_eq!(result["isError"], false);
    let verdict = &result["structuredContent"];
    assert_eq!(verdict["is_match"], true);
    assert_eq!(verdict["threshold"], 0.8);

    let fields = verdict["field_comparisons"].as_array().unwrap();
    assert_eq!(fields[0]["field"], "name");
    assert_eq!(fields[0]["semantic_verdict"], false);
    assert_eq!(fields[1]["field"], "age");
    assert_eq!(fields[1]["semantic_verdict"], Value::Null);
    assert!(verdict["holistic_semantic_analysis"]
        .as_str()
        .unwrap()
        .ends_with("likely same entity"));
}

#[tokio::test]
async fn test_dispatcher_lists_one_tool() {
    let dispatcher = Dispatcher::default();
    let response = dispatcher
        .handle_line(r#"{"jsonrpc":"2.0","id":"t","method":"tools/list"}"#)
        .await
        .unwrap();
    let tools = response.result.unwrap()["tools"].as_array().unwrap().clone();
    assert_eq!(tools.len(), 1);
    assert_eq!(tools[0]["name"], "compare_entities");
    assert_eq!(tools[0]["inputSchema"]["properties"]["threshold"]["maximum"], 1.0);
}

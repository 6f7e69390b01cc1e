//! Google Gemini backed semantic judge
//!
//! Calls the `generateContent` REST endpoint once per field and once for the
//! holistic verdict. The API key travels in the `x-goog-api-key` header and
//! never appears in URLs or logs.

use crate::error::{SemanticError, SemanticResult};
use crate::judge::{parse_verdict, HolisticEvidence, SemanticJudge};
use async_trait::async_trait;
use entcmp_core::SemanticVerdict;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error};

pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
pub const DEFAULT_FIELD_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_HOLISTIC_MODEL: &str = "gemini-2.0-flash";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
/// Output cap for the one-word per-field answer
pub const DEFAULT_FIELD_MAX_OUTPUT_TOKENS: u32 = 8;

const HARM_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Model settings shared by every comparison a server runs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelConfig {
    pub base_url: String,
    /// Model used for the per-field true/false questions
    pub field_model: String,
    /// Model used for the holistic verdict
    pub holistic_model: String,
    /// Transport timeout for one model request
    pub timeout_secs: u64,
    pub temperature: f32,
    /// `None` leaves the cap to the model; thinking models need room beyond the answer
    pub field_max_output_tokens: Option<u32>,
    pub holistic_max_output_tokens: Option<u32>,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            field_model: DEFAULT_FIELD_MODEL.to_string(),
            holistic_model: DEFAULT_HOLISTIC_MODEL.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            temperature: 0.0,
            field_max_output_tokens: Some(DEFAULT_FIELD_MAX_OUTPUT_TOKENS),
            holistic_max_output_tokens: Some(1024),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest {
    contents: Vec<Content>,
    generation_config: GenerationConfig,
    safety_settings: Vec<SafetySetting>,
}

#[derive(Debug, Serialize)]
struct Content {
    role: &'static str,
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
struct RequestPart {
    text: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_output_tokens: Option<u32>,
}

#[derive(Debug, Serialize)]
struct SafetySetting {
    category: &'static str,
    threshold: &'static str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

/// Semantic judge backed by the Gemini API
#[derive(Clone)]
pub struct GeminiJudge {
    config: ModelConfig,
    api_key: String,
    client: Client,
}

impl std::fmt::Debug for GeminiJudge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiJudge")
            .field("config", &self.config)
            .field("api_key", &"***")
            .finish()
    }
}

impl GeminiJudge {
    /// Build a judge for one credential
    ///
    /// Fails without any network traffic when the key is malformed or the
    /// HTTP client cannot be built.
    pub fn new(api_key: &str, config: ModelConfig) -> SemanticResult<Self> {
        validate_api_key(api_key)?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;

        Ok(Self {
            config,
            api_key: api_key.to_string(),
            client,
        })
    }

    pub fn config(&self) -> &ModelConfig {
        &self.config
    }

    fn endpoint(&self, model: &str) -> String {
        format!(
            "{}/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn build_request(&self, prompt: String, max_output_tokens: Option<u32>) -> GenerateRequest {
        GenerateRequest {
            contents: vec![Content {
                role: "user",
                parts: vec![RequestPart { text: prompt }],
            }],
            generation_config: GenerationConfig {
                temperature: self.config.temperature,
                max_output_tokens,
            },
            safety_settings: HARM_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: "BLOCK_NONE",
                })
                .collect(),
        }
    }

    fn field_request(&self, field: &str, value1: &str, value2: &str) -> GenerateRequest {
        self.build_request(
            field_prompt(field, value1, value2),
            self.config.field_max_output_tokens,
        )
    }

    fn holistic_request(&self, evidence: &HolisticEvidence) -> SemanticResult<GenerateRequest> {
        Ok(self.build_request(
            holistic_prompt(&evidence.to_pretty_json()?),
            self.config.holistic_max_output_tokens,
        ))
    }

    /// Send one request and return the text of the first candidate
    async fn generate(&self, model: &str, body: &GenerateRequest) -> SemanticResult<String> {
        let url = self.endpoint(model);

        debug!("Sending request to Gemini model {} at {}", model, url);

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", &self.api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        let response_text = response.text().await?;

        debug!("Gemini API response status: {}", status);

        if !status.is_success() {
            error!("Gemini API error: {} - {}", status, response_text);
            return Err(SemanticError::Api {
                status: status.as_u16(),
                body: response_text,
            });
        }

        extract_text(&response_text)
    }
}

#[async_trait]
impl SemanticJudge for GeminiJudge {
    async fn judge_field(&self, field: &str, value1: &str, value2: &str) -> SemanticResult<SemanticVerdict> {
        let body = self.field_request(field, value1, value2);
        let answer = self.generate(&self.config.field_model, &body).await?;
        Ok(parse_verdict(&answer))
    }

    async fn judge_overall(&self, evidence: &HolisticEvidence) -> SemanticResult<String> {
        let body = self.holistic_request(evidence)?;
        self.generate(&self.config.holistic_model, &body).await
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Reject keys that could never be valid before any request is made
fn validate_api_key(api_key: &str) -> SemanticResult<()> {
    if api_key.trim().is_empty() {
        return Err(SemanticError::InvalidCredential("API key is empty".to_string()));
    }
    if !api_key.chars().all(|c| c.is_ascii_graphic()) {
        return Err(SemanticError::InvalidCredential(
            "API key must contain only printable ASCII characters without whitespace".to_string(),
        ));
    }
    Ok(())
}

fn field_prompt(field: &str, value1: &str, value2: &str) -> String {
    format!(
        "Decide whether the following two values of the field \"{}\" refer to the same thing \
         at the semantic level (ignore differences in spelling, formatting, language or \
         abbreviation when the meaning is the same).\n\
         Answer with exactly one word: true or false.\n\n\
         Value 1: {}\n\
         Value 2: {}",
        field, value1, value2
    )
}

fn holistic_prompt(evidence_json: &str) -> String {
    format!(
        "Two records were compared field by field. Below are the syntactic similarity scores \
         and a per-field semantic judgment for each shared field.\n\n{}\n\n\
         Considering all of this evidence, do the two records describe the same real-world \
         entity? Explain your reasoning briefly, then finish with one line that reads either \
         \"Leaning: likely same entity\" or \"Leaning: likely different entities\".",
        evidence_json
    )
}

/// Pull the answer text out of a `generateContent` response body
fn extract_text(response_text: &str) -> SemanticResult<String> {
    let response: GenerateResponse = serde_json::from_str(response_text).map_err(|e| {
        error!("Failed to parse Gemini response: {}", e);
        SemanticError::Json(e)
    })?;

    let candidate = match response.candidates.first() {
        Some(candidate) => candidate,
        None => {
            let detail = response
                .prompt_feedback
                .map(|f| format!(" (prompt feedback: {})", f))
                .unwrap_or_default();
            return Err(SemanticError::InvalidResponse(format!(
                "No candidates in response{}",
                detail
            )));
        }
    };

    let text: String = candidate
        .content
        .as_ref()
        .map(|content| {
            content
                .parts
                .iter()
                .filter_map(|p| p.text.as_deref())
                .collect()
        })
        .unwrap_or_default();

    if text.is_empty() {
        return Err(SemanticError::InvalidResponse(format!(
            "Candidate has no text (finish reason: {})",
            candidate.finish_reason.as_deref().unwrap_or("unknown")
        )));
    }

    Ok(text)
}

//! Semantic verdict data model
//!
//! A semantic verdict is advisory: produced by an external model, it may be
//! a clean boolean, free text the model returned instead, or absent with a
//! reason attached.

use serde::{Serialize, Serializer};
use serde_json::Value;
use std::collections::HashMap;

/// Prefix used when the model answered something other than true/false.
pub const UNPARSED_PREFIX: &str = "unparsed:";

/// Reason recorded on every field when no credential was supplied.
pub const SKIPPED_NO_CREDENTIAL: &str = "skipped (no credential)";

/// Holistic analysis text when no credential was supplied.
pub const HOLISTIC_SKIPPED_NO_CREDENTIAL: &str =
    "Semantic analysis skipped: no model credential was supplied.";

/// Holistic analysis text when the model client could not be constructed.
pub const HOLISTIC_SKIPPED_DUE_TO_ERROR: &str =
    "Semantic analysis skipped due to error.";

/// Per-field semantic judgment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SemanticVerdict {
    /// The model answered a clean `true` or `false`.
    Equivalent(bool),
    /// The model answered something else; kept verbatim for auditing.
    Unparsed(String),
    /// No verdict; the reason says why (skipped, request failed, ...).
    Unavailable(String),
}

impl SemanticVerdict {
    pub fn skipped_no_credential() -> Self {
        SemanticVerdict::Unavailable(SKIPPED_NO_CREDENTIAL.to_string())
    }

    pub fn failed(reason: impl std::fmt::Display) -> Self {
        SemanticVerdict::Unavailable(format!("semantic request failed: {}", reason))
    }

    /// JSON shape of the verdict: `true`, `false`, `"unparsed:<text>"` or `null`.
    pub fn to_json(&self) -> Value {
        match self {
            SemanticVerdict::Equivalent(b) => Value::Bool(*b),
            SemanticVerdict::Unparsed(text) => Value::String(format!("{}{}", UNPARSED_PREFIX, text)),
            SemanticVerdict::Unavailable(_) => Value::Null,
        }
    }

    /// Reason accompanying a `null` verdict.
    pub fn reason(&self) -> Option<&str> {
        match self {
            SemanticVerdict::Unavailable(reason) => Some(reason),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            SemanticVerdict::Equivalent(b) => Some(*b),
            _ => None,
        }
    }
}

impl Serialize for SemanticVerdict {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_json().serialize(serializer)
    }
}

/// Everything the semantic phase produced for one comparison.
#[derive(Debug, Clone, PartialEq)]
pub struct SemanticAnnotations {
    /// Verdicts keyed by field name. Each field is written exactly once.
    pub per_field: HashMap<String, SemanticVerdict>,
    /// Free-text holistic judgment, a skip notice, or an error description.
    pub holistic: String,
    /// Set when the semantic phase failed before any request was attempted.
    pub processing_error: Option<String>,
}

impl SemanticAnnotations {
    /// Annotations for a comparison made without a credential.
    pub fn skipped<'a>(fields: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            per_field: fields
                .into_iter()
                .map(|f| (f.to_string(), SemanticVerdict::skipped_no_credential()))
                .collect(),
            holistic: HOLISTIC_SKIPPED_NO_CREDENTIAL.to_string(),
            processing_error: None,
        }
    }

    /// Annotations when the model client could not be built at all.
    pub fn initialization_failed<'a>(
        fields: impl IntoIterator<Item = &'a str>,
        error: &str,
    ) -> Self {
        let reason = format!("semantic client initialization failed: {}", error);
        Self {
            per_field: fields
                .into_iter()
                .map(|f| (f.to_string(), SemanticVerdict::Unavailable(reason.clone())))
                .collect(),
            holistic: HOLISTIC_SKIPPED_DUE_TO_ERROR.to_string(),
            processing_error: Some(error.to_string()),
        }
    }

    pub fn verdict(&self, field: &str) -> Option<&SemanticVerdict> {
        self.per_field.get(field)
    }
}

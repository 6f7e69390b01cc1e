//! Text normalization for field values
//!
//! Canonicalizes a raw field value into a comparable string: lower-case,
//! letters (any script) / digits / whitespace only, single spaces, trimmed.

use crate::entity::value_to_text;
use serde_json::Value;

/// Normalize free text.
///
/// Idempotent: `normalize_text(&normalize_text(s)) == normalize_text(s)`.
pub fn normalize_text(text: &str) -> String {
    let lowered = text.to_lowercase();
    let mut out = String::with_capacity(lowered.len());
    let mut pending_space = false;

    for c in lowered.chars() {
        if c.is_whitespace() {
            pending_space = true;
        } else if c.is_alphanumeric() {
            if pending_space && !out.is_empty() {
                out.push(' ');
            }
            pending_space = false;
            out.push(c);
        }
        // Anything else (punctuation, symbols, marks) is dropped without
        // acting as a separator.
    }

    out
}

/// Normalize any JSON field value after coercing it to text.
pub fn normalize_value(value: &Value) -> String {
    normalize_text(&value_to_text(value))
}

/// Normalized items of a value, sorted.
///
/// A non-array value is treated as a one-element list, so `"A"` and `["a"]`
/// produce the same items.
pub fn normalized_items(value: &Value) -> Vec<String> {
    let mut items: Vec<String> = match value {
        Value::Array(values) => values.iter().map(normalize_value).collect(),
        other => vec![normalize_value(other)],
    };
    items.sort();
    items
}

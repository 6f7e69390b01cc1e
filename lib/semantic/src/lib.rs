//! # entcmp Semantic
//!
//! Advisory semantic judgments on top of the syntactic comparison.
//!
//! The external model is reached only through the [`SemanticJudge`] trait.
//! Two implementations ship with the crate:
//!
//! - [`GeminiJudge`] - Google Gemini `generateContent`, used when the caller supplies a key
//! - [`NoCredentialJudge`] - answers immediately with skip markers
//!
//! [`SemanticAnnotator`] runs all per-field requests concurrently, waits for
//! every one of them, then issues the single holistic request. Model output
//! may be wrong, malformed or missing; all of that is recorded, never raised.

pub mod annotate;
pub mod error;
pub mod gemini;
pub mod judge;

pub use annotate::{annotate_comparison, select_judge, SemanticAnnotator};
pub use error::{SemanticError, SemanticResult};
pub use gemini::{
    GeminiJudge, ModelConfig, DEFAULT_BASE_URL, DEFAULT_FIELD_MODEL, DEFAULT_HOLISTIC_MODEL,
    DEFAULT_FIELD_MAX_OUTPUT_TOKENS, DEFAULT_TIMEOUT_SECS,
};
pub use judge::{parse_verdict, FieldEvidence, HolisticEvidence, NoCredentialJudge, SemanticJudge};

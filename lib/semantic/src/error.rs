use thiserror::Error;

pub type SemanticResult<T> = std::result::Result<T, SemanticError>;

/// Failures of the semantic subsystem.
///
/// None of these ever fail a comparison; they are recorded in the verdict.
#[derive(Error, Debug)]
pub enum SemanticError {
    #[error("Invalid credential: {0}")]
    InvalidCredential(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Model API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("Invalid model response: {0}")]
    InvalidResponse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

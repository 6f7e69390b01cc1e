use crate::protocol::error_codes;
use thiserror::Error;

/// Failures that reject a tool call outright.
///
/// Only invalid input ends up here; semantic faults are part of a
/// successful result.
#[derive(Error, Debug)]
pub enum ToolError {
    #[error("Unknown tool: {0}")]
    UnknownTool(String),

    #[error("Invalid params: {0}")]
    InvalidParams(String),
}

impl ToolError {
    pub fn code(&self) -> i32 {
        match self {
            ToolError::UnknownTool(_) | ToolError::InvalidParams(_) => error_codes::INVALID_PARAMS,
        }
    }
}

impl From<entcmp_core::Error> for ToolError {
    fn from(e: entcmp_core::Error) -> Self {
        ToolError::InvalidParams(e.to_string())
    }
}

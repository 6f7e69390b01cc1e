//! # entcmp API
//!
//! MCP tool server exposing `compare_entities` over JSON-RPC 2.0.
//!
//! - [`StdioServer`] - newline-delimited messages on stdin/stdout
//! - [`RestApi`] - `POST /jsonrpc` and `GET /health` over HTTP

pub mod error;
pub mod handler;
pub mod protocol;
pub mod rest;
pub mod service;
pub mod stdio;
pub mod tools;

pub use error::ToolError;
pub use handler::{Dispatcher, SERVER_NAME};
pub use protocol::{error_codes, methods, JsonRpcError, JsonRpcId, JsonRpcRequest, JsonRpcResponse};
pub use rest::RestApi;
pub use service::{judge_selector, ComparisonService, JudgeSelector};
pub use stdio::StdioServer;
pub use tools::{get_tool_definitions, tool_names, CompareEntitiesParams, ToolDefinition};

use std::fmt;
use std::str::FromStr;

/// How the server talks to its client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Transport {
    #[default]
    Stdio,
    Http,
}

impl FromStr for Transport {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "stdio" => Ok(Transport::Stdio),
            "http" => Ok(Transport::Http),
            other => Err(format!("unknown transport '{}' (expected stdio or http)", other)),
        }
    }
}

impl fmt::Display for Transport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Transport::Stdio => write!(f, "stdio"),
            Transport::Http => write!(f, "http"),
        }
    }
}

/// Transport settings for the server binary
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    pub transport: Transport,
    pub http_host: String,
    pub http_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            transport: Transport::Stdio,
            http_host: "0.0.0.0".to_string(),
            http_port: 8000,
        }
    }
}

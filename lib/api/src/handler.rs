//! JSON-RPC dispatch for the MCP methods.

use crate::error::ToolError;
use crate::protocol::{
    error_codes, methods, JsonRpcId, JsonRpcRequest, JsonRpcResponse, PROTOCOL_VERSION,
};
use crate::service::ComparisonService;
use crate::tools::{get_tool_definitions, tool_names, CompareEntitiesParams};
use serde_json::{json, Value};
use tracing::{debug, error, info, warn};

/// Server name reported by `initialize`
pub const SERVER_NAME: &str = "entcmp";

/// Routes JSON-RPC requests to the comparison service
#[derive(Clone, Default)]
pub struct Dispatcher {
    service: ComparisonService,
}

impl Dispatcher {
    pub fn new(service: ComparisonService) -> Self {
        Self { service }
    }

    pub fn service(&self) -> &ComparisonService {
        &self.service
    }

    /// Handle one raw message. `None` means nothing is written back.
    pub async fn handle_line(&self, line: &str) -> Option<JsonRpcResponse> {
        self.handle_bytes(line.as_bytes()).await
    }

    /// Handle one raw message body; invalid UTF-8 is a parse error
    pub async fn handle_bytes(&self, body: &[u8]) -> Option<JsonRpcResponse> {
        let value: Value = match serde_json::from_slice(body) {
            Ok(value) => value,
            Err(e) => {
                warn!("Unparseable JSON-RPC message: {}", e);
                return Some(JsonRpcResponse::error(
                    None,
                    error_codes::PARSE_ERROR,
                    format!("Parse error: {}", e),
                ));
            }
        };
        self.handle_value(value).await
    }

    /// Handle an already-parsed JSON message
    pub async fn handle_value(&self, value: Value) -> Option<JsonRpcResponse> {
        let id = value
            .get("id")
            .and_then(|id| serde_json::from_value::<JsonRpcId>(id.clone()).ok());

        let request: JsonRpcRequest = match serde_json::from_value(value) {
            Ok(request) => request,
            Err(e) => {
                return Some(JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_REQUEST,
                    format!("Invalid request: {}", e),
                ));
            }
        };

        if request.jsonrpc != "2.0" {
            return Some(JsonRpcResponse::error(
                request.response_id(),
                error_codes::INVALID_REQUEST,
                "Invalid request: jsonrpc must be \"2.0\"",
            ));
        }

        self.handle(request).await
    }

    /// Dispatch a request. Notifications never produce a response.
    pub async fn handle(&self, request: JsonRpcRequest) -> Option<JsonRpcResponse> {
        debug!("Dispatching method: {}", request.method);

        if request.is_notification() {
            match request.method.as_str() {
                methods::INITIALIZED => info!("Client initialized notification received"),
                other => debug!("Ignoring notification: {}", other),
            }
            return None;
        }

        let id = request.response_id();
        let response = match request.method.as_str() {
            methods::INITIALIZE => self.handle_initialize(id),
            methods::PING => JsonRpcResponse::success(id, json!({})),
            methods::SHUTDOWN => {
                info!("Handling shutdown request");
                JsonRpcResponse::success(id, Value::Null)
            }
            methods::TOOLS_LIST => self.handle_tools_list(id),
            methods::TOOLS_CALL => self.handle_tools_call(id, request.params).await,
            other => JsonRpcResponse::error(
                id,
                error_codes::METHOD_NOT_FOUND,
                format!("Method not found: {}", other),
            ),
        };
        Some(response)
    }

    fn handle_initialize(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        info!("Handling initialize request");
        JsonRpcResponse::success(
            id,
            json!({
                "protocolVersion": PROTOCOL_VERSION,
                "capabilities": {
                    "tools": { "listChanged": false }
                },
                "serverInfo": {
                    "name": SERVER_NAME,
                    "version": env!("CARGO_PKG_VERSION")
                }
            }),
        )
    }

    fn handle_tools_list(&self, id: Option<JsonRpcId>) -> JsonRpcResponse {
        JsonRpcResponse::success(id, json!({ "tools": get_tool_definitions() }))
    }

    async fn handle_tools_call(&self, id: Option<JsonRpcId>, params: Option<Value>) -> JsonRpcResponse {
        let params = match params {
            Some(p) => p,
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing params for tools/call",
                );
            }
        };

        let tool_name = match params.get("name").and_then(|v| v.as_str()) {
            Some(name) => name,
            None => {
                return JsonRpcResponse::error(
                    id,
                    error_codes::INVALID_PARAMS,
                    "Missing 'name' parameter in tools/call",
                );
            }
        };
        let arguments = params.get("arguments").cloned().unwrap_or_else(|| json!({}));

        let outcome = match tool_name {
            tool_names::COMPARE_ENTITIES => self.call_compare_entities(&arguments).await,
            other => Err(ToolError::UnknownTool(other.to_string())),
        };

        match outcome {
            Ok(result) => JsonRpcResponse::success(id, result),
            Err(e) => {
                warn!("Rejected tools/call '{}': {}", tool_name, e);
                JsonRpcResponse::error(id, e.code(), e.to_string())
            }
        }
    }

    async fn call_compare_entities(&self, arguments: &Value) -> Result<Value, ToolError> {
        let params = CompareEntitiesParams::from_arguments(arguments)?;
        let verdict = self.service.compare_params(&params).await;

        let structured = match serde_json::to_value(&verdict) {
            Ok(value) => value,
            Err(e) => {
                error!("Failed to serialize comparison verdict: {}", e);
                return Ok(tool_error(&format!("Failed to serialize comparison result: {}", e)));
            }
        };
        Ok(tool_result(structured))
    }
}

/// MCP tool result: text content plus the same document as structured content
fn tool_result(data: Value) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": serde_json::to_string_pretty(&data).unwrap_or_else(|_| "{}".to_string())
        }],
        "structuredContent": data,
        "isError": false
    })
}

fn tool_error(message: &str) -> Value {
    json!({
        "content": [{
            "type": "text",
            "text": message
        }],
        "isError": true
    })
}

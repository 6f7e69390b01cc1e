//! Tool definitions and argument parsing for the MCP surface.

use crate::error::ToolError;
use entcmp_core::Entity;
use entcmp_similarity::{validate_threshold, DEFAULT_THRESHOLD};
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Tool names exposed by the server.
pub mod tool_names {
    pub const COMPARE_ENTITIES: &str = "compare_entities";
}

/// MCP tool definition: name, description and JSON Schema for the input.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    #[serde(rename = "inputSchema")]
    pub input_schema: Value,
}

impl ToolDefinition {
    pub fn new(name: impl Into<String>, description: impl Into<String>, input_schema: Value) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            input_schema,
        }
    }
}

/// Every tool this server answers to.
pub fn get_tool_definitions() -> Vec<ToolDefinition> {
    vec![ToolDefinition::new(
        tool_names::COMPARE_ENTITIES,
        "Compare two JSON entities field by field. Scores shared fields with bigram \
         (Dice) and edit-distance similarity, decides a match from the weighted bigram \
         score, and adds advisory semantic judgments when a model credential is supplied.",
        json!({
            "type": "object",
            "properties": {
                "entity1": {
                    "type": "object",
                    "description": "First entity as a JSON object of named fields"
                },
                "entity2": {
                    "type": "object",
                    "description": "Second entity as a JSON object of named fields"
                },
                "threshold": {
                    "type": "number",
                    "minimum": 0.0,
                    "maximum": 1.0,
                    "default": DEFAULT_THRESHOLD,
                    "description": "Overall bigram score at or above which the entities match"
                },
                "api_key": {
                    "type": "string",
                    "description": "Model credential; semantic analysis is skipped without it"
                }
            },
            "required": ["entity1", "entity2"]
        }),
    )]
}

/// Validated arguments of `compare_entities`.
#[derive(Debug, Clone)]
pub struct CompareEntitiesParams {
    pub entity1: Entity,
    pub entity2: Entity,
    pub threshold: f64,
    pub api_key: Option<String>,
}

impl CompareEntitiesParams {
    /// Parse and validate tool arguments.
    ///
    /// `json1`/`json2` and `credential` are accepted as aliases.
    pub fn from_arguments(arguments: &Value) -> Result<Self, ToolError> {
        let args = arguments
            .as_object()
            .ok_or_else(|| ToolError::InvalidParams("arguments must be a JSON object".to_string()))?;

        let entity1 = required_entity(args, "entity1", "json1")?;
        let entity2 = required_entity(args, "entity2", "json2")?;

        let threshold = match args.get("threshold") {
            None | Some(Value::Null) => DEFAULT_THRESHOLD,
            Some(value) => {
                let threshold = value.as_f64().ok_or_else(|| {
                    ToolError::InvalidParams(format!("threshold must be a number, got {}", value))
                })?;
                validate_threshold(threshold)?
            }
        };

        let api_key = match lookup(args, "api_key", "credential") {
            None | Some(Value::Null) => None,
            Some(Value::String(key)) => Some(key.clone()),
            Some(_) => {
                return Err(ToolError::InvalidParams("api_key must be a string".to_string()));
            }
        };

        Ok(Self {
            entity1,
            entity2,
            threshold,
            api_key,
        })
    }
}

fn lookup<'a>(args: &'a Map<String, Value>, name: &str, alias: &str) -> Option<&'a Value> {
    args.get(name).or_else(|| args.get(alias))
}

fn required_entity(args: &Map<String, Value>, name: &str, alias: &str) -> Result<Entity, ToolError> {
    let value = lookup(args, name, alias)
        .ok_or_else(|| ToolError::InvalidParams(format!("missing required argument '{}'", name)))?;
    Ok(Entity::from_value(name, value.clone())?)
}

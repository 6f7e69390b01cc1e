use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// An unordered key/value record to be compared against another record.
///
/// Field iteration follows insertion order (the order the fields appeared
/// in the incoming JSON object), which fixes the order of per-field results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Entity {
    fields: Map<String, Value>,
}

impl Entity {
    #[inline]
    #[must_use]
    pub fn new(fields: Map<String, Value>) -> Self {
        Self { fields }
    }

    /// Build an entity from an arbitrary JSON value.
    ///
    /// `name` only feeds the error message (`entity1`, `entity2`, ...).
    pub fn from_value(name: &str, value: Value) -> Result<Self> {
        match value {
            Value::Object(fields) => Ok(Self { fields }),
            Value::Null => Err(Error::invalid_entity(name, "value is null")),
            other => Err(Error::invalid_entity(
                name,
                format!("expected a JSON object, got {}", json_type_name(&other)),
            )),
        }
    }

    #[inline]
    #[must_use]
    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &String> {
        self.fields.keys()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names of `self` also present in `other`, in `self`'s order.
    pub fn shared_field_names<'a>(&'a self, other: &Entity) -> Vec<&'a String> {
        self.fields.keys().filter(|name| other.contains(name)).collect()
    }

    /// Field names of `self` absent from `other`, in `self`'s order.
    pub fn missing_from<'a>(&'a self, other: &Entity) -> Vec<&'a String> {
        self.fields.keys().filter(|name| !other.contains(name)).collect()
    }
}

impl From<Map<String, Value>> for Entity {
    fn from(fields: Map<String, Value>) -> Self {
        Entity::new(fields)
    }
}

/// Coerce a JSON field value to the text that gets compared.
///
/// Strings are taken verbatim (no surrounding quotes), `null` becomes the
/// empty string, and everything else uses its compact JSON rendering.
pub fn value_to_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

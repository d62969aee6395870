//! Decoded filter values
//!
//! [`FilterValue`] is the native form of a filter argument after decoding,
//! whether it arrived as a GraphQL literal or as a JSON variable.

use std::collections::BTreeMap;

use serde_json::Value;

/// Native value produced by decoding a filter literal
///
/// Numbers keep their source text; no coercion between integer and float
/// happens at this layer.
#[derive(Debug, Clone, PartialEq)]
pub enum FilterValue {
    Map(BTreeMap<String, FilterValue>),
    List(Vec<FilterValue>),
    String(String),
    Bool(bool),
    Int(String),
    Float(String),
    /// Absent value (null or an unrecognized literal kind)
    Null,
}

impl FilterValue {
    /// Short name of the value kind, used in error messages
    pub fn kind_name(&self) -> &'static str {
        match self {
            Self::Map(_) => "map",
            Self::List(_) => "list",
            Self::String(_) => "string",
            Self::Bool(_) => "boolean",
            Self::Int(_) => "int",
            Self::Float(_) => "float",
            Self::Null => "null",
        }
    }

    pub fn as_map(&self) -> Option<&BTreeMap<String, FilterValue>> {
        match self {
            Self::Map(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[FilterValue]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Convert a JSON variable value (the non-literal input path)
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::Map(
                map.iter()
                    .map(|(k, v)| (k.clone(), Self::from_json(v)))
                    .collect(),
            ),
            Value::Array(items) => Self::List(items.iter().map(Self::from_json).collect()),
            Value::String(s) => Self::String(s.clone()),
            Value::Bool(b) => Self::Bool(*b),
            Value::Number(n) if n.is_i64() || n.is_u64() => Self::Int(n.to_string()),
            Value::Number(n) => Self::Float(n.to_string()),
            Value::Null => Self::Null,
        }
    }

    /// Convert back to JSON for output
    ///
    /// Numbers whose text JSON cannot represent are emitted as strings.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Map(map) => Value::Object(
                map.iter()
                    .map(|(k, v)| (k.clone(), v.to_json()))
                    .collect(),
            ),
            Self::List(items) => Value::Array(items.iter().map(Self::to_json).collect()),
            Self::String(s) => Value::String(s.clone()),
            Self::Bool(b) => Value::Bool(*b),
            Self::Int(text) | Self::Float(text) => serde_json::from_str::<serde_json::Number>(text)
                .map(Value::Number)
                .unwrap_or_else(|_| Value::String(text.clone())),
            Self::Null => Value::Null,
        }
    }
}

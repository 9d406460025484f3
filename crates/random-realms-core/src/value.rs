use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::PropertyType;

/// Handle to an object that already exists in a realm.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectRef {
    pub object_type: String,
    /// Per-type creation index assigned by the store.
    pub key: u64,
}

/// Generated value for a property.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum GeneratedValue {
    Null,
    Bool(bool),
    Int(i64),
    Float(f32),
    Double(f64),
    String(String),
    Data(Vec<u8>),
    Date(DateTime<Utc>),
    List(Vec<GeneratedValue>),
    Object(ObjectRef),
}

impl GeneratedValue {
    pub fn is_null(&self) -> bool {
        matches!(self, GeneratedValue::Null)
    }

    /// Whether a non-null value inhabits `ty`. Null never conforms; callers
    /// decide separately whether a property accepts it.
    pub fn conforms_to(&self, ty: &PropertyType) -> bool {
        match (self, ty) {
            (GeneratedValue::Bool(_), PropertyType::Bool)
            | (GeneratedValue::Int(_), PropertyType::Int)
            | (GeneratedValue::Float(_), PropertyType::Float)
            | (GeneratedValue::Double(_), PropertyType::Double)
            | (GeneratedValue::String(_), PropertyType::String)
            | (GeneratedValue::Data(_), PropertyType::Data)
            | (GeneratedValue::Date(_), PropertyType::Date) => true,
            (GeneratedValue::List(items), PropertyType::List(element)) => {
                items.iter().all(|item| item.conforms_to(element))
            }
            (GeneratedValue::Object(object), PropertyType::Object(name)) => {
                object.object_type == *name
            }
            _ => false,
        }
    }

    /// Object links held by this value, including list elements.
    pub fn links(&self) -> Vec<&ObjectRef> {
        match self {
            GeneratedValue::Object(object) => vec![object],
            GeneratedValue::List(items) => items.iter().flat_map(|item| item.links()).collect(),
            _ => Vec::new(),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            GeneratedValue::Null => "null",
            GeneratedValue::Bool(_) => "bool",
            GeneratedValue::Int(_) => "int",
            GeneratedValue::Float(_) => "float",
            GeneratedValue::Double(_) => "double",
            GeneratedValue::String(_) => "string",
            GeneratedValue::Data(_) => "data",
            GeneratedValue::Date(_) => "date",
            GeneratedValue::List(_) => "list",
            GeneratedValue::Object(_) => "object",
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            GeneratedValue::Int(value) => Some(*value),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            GeneratedValue::String(value) => Some(value.as_str()),
            _ => None,
        }
    }
}

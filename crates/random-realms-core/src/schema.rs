use std::collections::BTreeMap;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::types::PropertyType;
use crate::value::GeneratedValue;

/// Declaration of a single property on an object schema.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct PropertyDescriptor {
    #[serde(rename = "type")]
    pub property_type: PropertyType,
    pub indexed: bool,
    pub optional: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<GeneratedValue>,
}

impl PropertyDescriptor {
    pub fn new(property_type: PropertyType) -> Self {
        Self {
            property_type,
            indexed: false,
            optional: false,
            default: None,
        }
    }

    /// Whether a null value may be stored in this property.
    pub fn accepts_null(&self) -> bool {
        self.optional || matches!(self.property_type, PropertyType::Object(_))
    }
}

/// A named record type with a fixed set of typed properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct ObjectSchema {
    pub name: String,
    /// Properties keyed by name for deterministic ordering.
    pub properties: BTreeMap<String, PropertyDescriptor>,
    pub primary_key: Option<String>,
}

impl ObjectSchema {
    pub fn property(&self, name: &str) -> Option<&PropertyDescriptor> {
        self.properties.get(name)
    }

    pub fn primary_key_property(&self) -> Option<(&str, &PropertyDescriptor)> {
        let name = self.primary_key.as_deref()?;
        self.properties
            .get_key_value(name)
            .map(|(name, property)| (name.as_str(), property))
    }
}

/// Ordered set of object schemas making up a realm.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(transparent)]
pub struct RealmSchema {
    pub object_schemas: Vec<ObjectSchema>,
}

impl RealmSchema {
    pub fn new(object_schemas: Vec<ObjectSchema>) -> Self {
        Self { object_schemas }
    }

    pub fn find(&self, name: &str) -> Option<&ObjectSchema> {
        self.object_schemas.iter().find(|schema| schema.name == name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.object_schemas.iter().map(|schema| schema.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.object_schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.object_schemas.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ObjectSchema> {
        self.object_schemas.iter()
    }
}

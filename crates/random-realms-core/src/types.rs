use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Type of a property declared on an object schema.
///
/// The closed set mirrors what the underlying engine stores: seven primitive
/// types, lists of a primitive or object type, and links to another object
/// schema identified by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum PropertyType {
    Bool,
    Int,
    Float,
    Double,
    String,
    Data,
    Date,
    /// Ordered collection; the element type is never itself a list.
    List(Box<PropertyType>),
    /// Link to an object of the named schema.
    Object(String),
}

/// Primitive property types in declaration order.
pub fn primitive_types() -> [PropertyType; 7] {
    [
        PropertyType::Bool,
        PropertyType::Int,
        PropertyType::Float,
        PropertyType::Double,
        PropertyType::String,
        PropertyType::Data,
        PropertyType::Date,
    ]
}

impl PropertyType {
    pub fn is_primitive(&self) -> bool {
        !matches!(self, PropertyType::List(_) | PropertyType::Object(_))
    }

    /// Types the engine can build a secondary index for.
    pub fn is_indexable(&self) -> bool {
        matches!(
            self,
            PropertyType::String | PropertyType::Int | PropertyType::Bool
        )
    }

    /// Types allowed as a primary key.
    pub fn is_keyable(&self) -> bool {
        matches!(self, PropertyType::String | PropertyType::Int)
    }

    pub fn is_list(&self) -> bool {
        matches!(self, PropertyType::List(_))
    }

    pub fn element_type(&self) -> Option<&PropertyType> {
        match self {
            PropertyType::List(element) => Some(element),
            _ => None,
        }
    }

    /// Schema name this type links to, directly or through a list.
    pub fn link_target(&self) -> Option<&str> {
        match self {
            PropertyType::Object(name) => Some(name),
            PropertyType::List(element) => element.link_target(),
            _ => None,
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyType::Bool => write!(f, "bool"),
            PropertyType::Int => write!(f, "int"),
            PropertyType::Float => write!(f, "float"),
            PropertyType::Double => write!(f, "double"),
            PropertyType::String => write!(f, "string"),
            PropertyType::Data => write!(f, "data"),
            PropertyType::Date => write!(f, "date"),
            PropertyType::List(element) => write!(f, "list<{element}>"),
            PropertyType::Object(name) => write!(f, "object<{name}>"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_string_int_and_bool_are_indexable() {
        let indexable: Vec<PropertyType> = primitive_types()
            .into_iter()
            .filter(|ty| ty.is_indexable())
            .collect();
        assert_eq!(
            indexable,
            vec![PropertyType::Bool, PropertyType::Int, PropertyType::String]
        );
        assert!(!PropertyType::Object("Dog".to_string()).is_indexable());
    }

    #[test]
    fn lists_are_never_keyable() {
        let list = PropertyType::List(Box::new(PropertyType::String));
        assert!(!list.is_keyable());
        assert!(!list.is_primitive());
        assert_eq!(list.element_type(), Some(&PropertyType::String));
    }

    #[test]
    fn link_target_sees_through_lists() {
        let list = PropertyType::List(Box::new(PropertyType::Object("Dog".to_string())));
        assert_eq!(list.link_target(), Some("Dog"));
        assert_eq!(PropertyType::Int.link_target(), None);
    }
}

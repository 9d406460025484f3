use std::collections::BTreeSet;

use crate::error::{Error, Result};
use crate::schema::{ObjectSchema, RealmSchema};
use crate::types::PropertyType;

/// Validate internal consistency of a realm schema.
///
/// This checks:
/// - duplicate object schema names
/// - every link targets a schema in the set
/// - the per-object rules of [`validate_object_schema`]
pub fn validate_realm_schema(schema: &RealmSchema) -> Result<()> {
    let mut names = BTreeSet::new();
    for object_schema in schema.iter() {
        if !names.insert(object_schema.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate object schema name: {:?}",
                object_schema.name
            )));
        }
    }

    for object_schema in schema.iter() {
        validate_object_schema(object_schema)?;
        for (property_name, property) in &object_schema.properties {
            if let Some(target) = property.property_type.link_target() {
                if !names.contains(target) {
                    return Err(Error::InvalidSchema(format!(
                        "property {:?}.{:?} links to unknown object schema {:?}",
                        object_schema.name, property_name, target
                    )));
                }
            }
        }
    }

    Ok(())
}

/// Validate a single object schema in isolation.
///
/// This checks:
/// - the primary key exists, is string or int typed and is not a list
/// - only string, int and bool properties are indexed
/// - lists are one level deep and lists of links are not optional
/// - defaults are non-null values of the declared type, never links
pub fn validate_object_schema(schema: &ObjectSchema) -> Result<()> {
    if let Some(primary_key) = &schema.primary_key {
        let property = schema.properties.get(primary_key).ok_or_else(|| {
            Error::InvalidSchema(format!(
                "primary key {:?} not found on {:?}",
                primary_key, schema.name
            ))
        })?;
        if !property.property_type.is_keyable() {
            return Err(Error::InvalidSchema(format!(
                "primary key {:?}.{:?} has non-keyable type {}",
                schema.name, primary_key, property.property_type
            )));
        }
    }

    for (name, property) in &schema.properties {
        let ty = &property.property_type;

        if property.indexed && !ty.is_indexable() {
            return Err(Error::InvalidSchema(format!(
                "property {:?}.{:?} of type {} cannot be indexed",
                schema.name, name, ty
            )));
        }

        if let PropertyType::List(element) = ty {
            if element.is_list() {
                return Err(Error::InvalidSchema(format!(
                    "property {:?}.{:?} is a nested list",
                    schema.name, name
                )));
            }
            if !element.is_primitive() && property.optional {
                return Err(Error::InvalidSchema(format!(
                    "list of links {:?}.{:?} must not be optional",
                    schema.name, name
                )));
            }
        }

        if let Some(default) = &property.default {
            if ty.link_target().is_some() {
                return Err(Error::InvalidSchema(format!(
                    "property {:?}.{:?} links to objects and cannot have a default",
                    schema.name, name
                )));
            }
            if !default.conforms_to(ty) {
                return Err(Error::InvalidSchema(format!(
                    "default of {:?}.{:?} is a {} value, expected {}",
                    schema.name,
                    name,
                    default.kind(),
                    ty
                )));
            }
        }
    }

    Ok(())
}

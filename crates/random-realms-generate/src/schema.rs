use std::collections::BTreeMap;

use rand::Rng;
use random_realms_core::{
    ObjectSchema, PropertyDescriptor, PropertyType, RealmSchema, primitive_types,
};
use tracing::debug;

use crate::errors::GenerationError;
use crate::model::GenerateOptions;
use crate::names::NameGenerator;
use crate::values::ValueGenerator;

/// Produces random, self-consistent realm schemas.
#[derive(Debug, Clone)]
pub struct SchemaSynthesizer {
    names: NameGenerator,
    values: ValueGenerator,
    max_object_schemas: usize,
    min_properties: usize,
    max_properties: usize,
}

impl SchemaSynthesizer {
    pub fn new(options: &GenerateOptions) -> Self {
        Self {
            names: NameGenerator::new(options.name_ridiculousness, options.max_unicode_string),
            values: ValueGenerator::new(options.max_data_size, options.max_list_elements),
            max_object_schemas: options.max_object_schemas,
            min_properties: options.min_properties,
            max_properties: options.max_properties,
        }
    }

    /// Draw `0..=max_object_schemas` object schemas. All names are drawn up
    /// front so any schema may link to any other, itself included.
    pub fn make_realm_schema<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<RealmSchema, GenerationError> {
        let count = rng.random_range(0..=self.max_object_schemas);
        let names = self.names.object_schema_names(rng, count)?;
        let object_schemas = names
            .iter()
            .map(|name| self.make_object_schema(name, &names, rng))
            .collect::<Result<Vec<_>, _>>()?;
        debug!(object_schemas = object_schemas.len(), "synthesized realm schema");
        Ok(RealmSchema::new(object_schemas))
    }

    pub fn make_object_schema<R: Rng + ?Sized>(
        &self,
        name: &str,
        targets: &[String],
        rng: &mut R,
    ) -> Result<ObjectSchema, GenerationError> {
        let count = rng.random_range(self.min_properties..=self.max_properties);
        let property_names = self.names.property_names(rng, count)?;

        let mut properties = BTreeMap::new();
        for property_name in property_names {
            let property = self.make_property(targets, rng)?;
            properties.insert(property_name, property);
        }

        let keyable: Vec<&String> = properties
            .iter()
            .filter(|(_, property)| property.property_type.is_keyable())
            .map(|(name, _)| name)
            .collect();
        // One extra slot stands for "no primary key".
        let choice = rng.random_range(0..=keyable.len());
        let primary_key = keyable.get(choice).map(|name| (*name).clone());

        debug!(
            object_schema = %name,
            properties = properties.len(),
            primary_key = ?primary_key,
            "synthesized object schema"
        );
        Ok(ObjectSchema {
            name: name.to_string(),
            properties,
            primary_key,
        })
    }

    pub fn make_property<R: Rng + ?Sized>(
        &self,
        targets: &[String],
        rng: &mut R,
    ) -> Result<PropertyDescriptor, GenerationError> {
        let primitives = primitive_types();

        // Slot 0 is "list", then the primitives, then the link targets.
        let slot = rng.random_range(0..1 + primitives.len() + targets.len());
        let is_list = slot == 0;
        let picked = (!is_list).then(|| pick_type(&primitives, targets, slot - 1));

        let indexed = rng.random_bool(0.5)
            && picked.as_ref().is_some_and(PropertyType::is_indexable);
        let optional = rng.random_bool(0.5);

        let property_type = match picked {
            Some(ty) => ty,
            None => {
                let slot = rng.random_range(0..primitives.len() + targets.len());
                PropertyType::List(Box::new(pick_type(&primitives, targets, slot)))
            }
        };

        let mut property = PropertyDescriptor {
            property_type,
            indexed,
            optional,
            default: None,
        };
        property.default = self.values.make_property_default(&property, rng)?;

        if let PropertyType::List(element) = &property.property_type {
            if !element.is_primitive() {
                property.optional = false;
            }
        }
        Ok(property)
    }
}

fn pick_type(primitives: &[PropertyType], targets: &[String], slot: usize) -> PropertyType {
    match primitives.get(slot) {
        Some(primitive) => primitive.clone(),
        None => PropertyType::Object(targets[slot - primitives.len()].clone()),
    }
}

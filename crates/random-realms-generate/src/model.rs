use std::collections::BTreeMap;
use std::path::PathBuf;

use random_realms_core::RealmSchema;
use serde::{Deserialize, Serialize};

use crate::errors::GenerationError;
use crate::names::Ridiculousness;

/// Limits for a single generation run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// How unusual schema and property names get.
    pub name_ridiculousness: Ridiculousness,
    /// Upper bound on object schemas; the actual count is drawn from `0..=max`.
    pub max_object_schemas: usize,
    pub min_properties: usize,
    pub max_properties: usize,
    /// Upper bound on non-empty list lengths.
    pub max_list_elements: usize,
    /// Upper bound on non-empty data lengths, in bytes.
    pub max_data_size: usize,
    /// Upper bound on high-ridiculousness name lengths, in sampled bytes.
    pub max_unicode_string: usize,
    /// Upper bound on created objects; the actual count is drawn from `0..=max`.
    pub max_object_count: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            name_ridiculousness: Ridiculousness::Low,
            max_object_schemas: 20,
            min_properties: 1,
            max_properties: 10,
            max_list_elements: 100,
            max_data_size: 1000,
            max_unicode_string: 20,
            max_object_count: 10_000,
        }
    }
}

impl GenerateOptions {
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.min_properties > self.max_properties {
            return Err(GenerationError::InvalidOptions(format!(
                "min_properties ({}) exceeds max_properties ({})",
                self.min_properties, self.max_properties
            )));
        }
        if self.max_unicode_string == 0 {
            return Err(GenerationError::InvalidOptions(
                "max_unicode_string must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Outcome of one successful generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationResult {
    pub path: PathBuf,
    pub seed: String,
    pub schema: RealmSchema,
    /// Created objects per participating object schema.
    pub objects_by_type: BTreeMap<String, u64>,
    /// Committed write transactions.
    pub transactions: u64,
}

impl GenerationResult {
    pub fn total_objects(&self) -> u64 {
        self.objects_by_type.values().sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        GenerateOptions::default().validate().expect("valid defaults");
    }

    #[test]
    fn rejects_inverted_property_bounds() {
        let options = GenerateOptions {
            min_properties: 4,
            max_properties: 2,
            ..GenerateOptions::default()
        };
        assert!(matches!(
            options.validate(),
            Err(GenerationError::InvalidOptions(_))
        ));
    }

    #[test]
    fn partial_options_fill_in_defaults() {
        let options: GenerateOptions =
            serde_json::from_str(r#"{"max_object_schemas": 3, "name_ridiculousness": "high"}"#)
                .expect("options");
        assert_eq!(options.max_object_schemas, 3);
        assert_eq!(options.name_ridiculousness, Ridiculousness::High);
        assert_eq!(options.max_object_count, 10_000);
    }
}

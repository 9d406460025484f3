use chrono::SecondsFormat;
use random_realms_core::GeneratedValue;
use serde_json::{Map, Number, Value, json};

use crate::file::FileRealm;
use crate::realm::Realm;

/// Reserved key holding per-type primary key declarations.
pub const PK_TABLE_KEY: &str = "pk";
/// Reserved key holding file-level metadata.
pub const METADATA_KEY: &str = "metadata";
/// Per-record internal identifier.
pub const OBJECT_KEY_FIELD: &str = "_key";

impl FileRealm {
    /// Dump every object as JSON, one array of flat records per object type.
    ///
    /// Links are written as the target's `_key`, binary data as lowercase hex
    /// and dates as RFC 3339 strings with millisecond precision.
    pub fn dump(&self) -> Value {
        let mut dump = Map::new();

        let pk_table: Vec<Value> = self
            .schema()
            .iter()
            .filter_map(|object_schema| {
                object_schema.primary_key.as_ref().map(|primary_key| {
                    json!({
                        "pk_table": object_schema.name,
                        "pk_property": primary_key,
                    })
                })
            })
            .collect();

        dump.insert(
            METADATA_KEY.to_string(),
            json!({
                "object_schemas": self.schema().len(),
                "objects": self.total_objects(),
            }),
        );
        dump.insert(PK_TABLE_KEY.to_string(), Value::Array(pk_table));

        for object_schema in self.schema().iter() {
            let records = self
                .objects(&object_schema.name)
                .unwrap_or_default()
                .iter()
                .map(|object| {
                    let mut record = Map::new();
                    record.insert(OBJECT_KEY_FIELD.to_string(), Value::from(object.key));
                    for (name, value) in &object.values {
                        record.insert(name.clone(), value_to_json(value));
                    }
                    Value::Object(record)
                })
                .collect();
            dump.insert(object_schema.name.clone(), Value::Array(records));
        }

        Value::Object(dump)
    }
}

/// Render a single value the way the dump tool prints it.
pub fn value_to_json(value: &GeneratedValue) -> Value {
    match value {
        GeneratedValue::Null => Value::Null,
        GeneratedValue::Bool(value) => Value::Bool(*value),
        GeneratedValue::Int(value) => Value::from(*value),
        GeneratedValue::Float(value) => float_to_json(f64::from(*value)),
        GeneratedValue::Double(value) => float_to_json(*value),
        GeneratedValue::String(value) => Value::String(value.clone()),
        GeneratedValue::Data(bytes) => Value::String(hex::encode(bytes)),
        GeneratedValue::Date(value) => {
            Value::String(value.to_rfc3339_opts(SecondsFormat::Millis, true))
        }
        GeneratedValue::List(items) => Value::Array(items.iter().map(value_to_json).collect()),
        GeneratedValue::Object(object) => Value::from(object.key),
    }
}

fn float_to_json(value: f64) -> Value {
    Number::from_f64(value)
        .map(Value::Number)
        .unwrap_or(Value::Null)
}

use serde_json::Value;

/// Top-level primary key table written by older engines.
pub const PK_TABLE_KEY: &str = "pk";
/// Top-level metadata block; its content changes between engines.
pub const METADATA_KEY: &str = "metadata";
/// Internal per-object identifier written by newer engines.
pub const OBJECT_KEY_FIELD: &str = "_key";

/// Strip the fields that legitimately differ between engine versions.
///
/// Removes the top-level `pk` and `metadata` entries and the `_key` field of
/// every record in every top-level array. Everything else is left untouched.
pub fn normalize_dump(mut dump: Value) -> Value {
    if let Value::Object(collections) = &mut dump {
        collections.remove(PK_TABLE_KEY);
        collections.remove(METADATA_KEY);
        for objects in collections.values_mut() {
            if let Value::Array(objects) = objects {
                for object in objects {
                    if let Value::Object(fields) = object {
                        fields.remove(OBJECT_KEY_FIELD);
                    }
                }
            }
        }
    }
    dump
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn strips_volatile_fields_only() {
        let dump = json!({
            "pk": [{"pk_table": "Dog", "pk_property": "name"}],
            "metadata": {"version": 9},
            "Dog": [{"_key": 0, "name": "Rex", "owner": {"_key": 3}}],
            "settings": {"_key": 1},
        });
        assert_eq!(
            normalize_dump(dump),
            json!({
                "Dog": [{"name": "Rex", "owner": {"_key": 3}}],
                "settings": {"_key": 1},
            })
        );
    }

    #[test]
    fn leaves_non_object_dumps_alone() {
        assert_eq!(normalize_dump(json!([1, 2])), json!([1, 2]));
    }
}

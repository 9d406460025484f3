use std::collections::BTreeMap;

use random_realms_core::{
    GeneratedValue, ObjectSchema, PropertyDescriptor, PropertyType, RealmSchema,
};

fn dog_schema() -> RealmSchema {
    let mut properties = BTreeMap::new();
    properties.insert(
        "name".to_string(),
        PropertyDescriptor {
            property_type: PropertyType::String,
            indexed: true,
            optional: false,
            default: Some(GeneratedValue::String("Rex".to_string())),
        },
    );
    properties.insert(
        "owners".to_string(),
        PropertyDescriptor::new(PropertyType::List(Box::new(PropertyType::Object(
            "Person".to_string(),
        )))),
    );
    RealmSchema::new(vec![ObjectSchema {
        name: "Dog".to_string(),
        properties,
        primary_key: Some("name".to_string()),
    }])
}

#[test]
fn serializes_schema_deterministically() {
    let json = serde_json::to_string_pretty(&dog_schema()).expect("serialize schema");
    let expected = r#"[
  {
    "name": "Dog",
    "properties": {
      "name": {
        "type": "string",
        "indexed": true,
        "optional": false,
        "default": {
          "kind": "string",
          "value": "Rex"
        }
      },
      "owners": {
        "type": {
          "list": {
            "object": "Person"
          }
        },
        "indexed": false,
        "optional": false
      }
    },
    "primaryKey": "name"
  }
]"#;
    assert_eq!(json, expected);
}

#[test]
fn schema_survives_json_round_trip() {
    let schema = dog_schema();
    let json = serde_json::to_string(&schema).expect("serialize schema");
    let parsed: RealmSchema = serde_json::from_str(&json).expect("parse schema");
    assert_eq!(parsed, schema);
}

use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use random_realms_core::{
    GeneratedValue, ObjectRef, ObjectSchema, PropertyDescriptor, PropertyType, RealmSchema,
};
use random_realms_store::{FileRealm, Realm, StoreError};

fn temp_realm_path(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("random_realms_store_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir.join("test.realm")
}

fn schema() -> RealmSchema {
    let mut person = BTreeMap::new();
    person.insert(
        "name".to_string(),
        PropertyDescriptor::new(PropertyType::String),
    );
    person.insert(
        "age".to_string(),
        PropertyDescriptor {
            property_type: PropertyType::Int,
            indexed: false,
            optional: false,
            default: Some(GeneratedValue::Int(42)),
        },
    );

    let mut dog = BTreeMap::new();
    dog.insert(
        "owner".to_string(),
        PropertyDescriptor::new(PropertyType::Object("Person".to_string())),
    );
    dog.insert(
        "tags".to_string(),
        PropertyDescriptor::new(PropertyType::List(Box::new(PropertyType::String))),
    );

    RealmSchema::new(vec![
        ObjectSchema {
            name: "Person".to_string(),
            properties: person,
            primary_key: Some("name".to_string()),
        },
        ObjectSchema {
            name: "Dog".to_string(),
            properties: dog,
            primary_key: None,
        },
    ])
}

fn person(name: &str) -> BTreeMap<String, GeneratedValue> {
    let mut values = BTreeMap::new();
    values.insert("name".to_string(), GeneratedValue::String(name.to_string()));
    values
}

#[test]
fn create_requires_a_transaction() {
    let mut realm = FileRealm::create(temp_realm_path("no_tx"), schema()).expect("create realm");
    let result = realm.create("Person", person("Alice"));
    assert!(matches!(result, Err(StoreError::NotInTransaction)));
}

#[test]
fn applies_defaults_and_empty_lists() {
    let path = temp_realm_path("defaults");
    let mut realm = FileRealm::create(&path, schema()).expect("create realm");
    realm.begin_transaction().expect("begin");
    realm.create("Person", person("Alice")).expect("create person");
    realm.create("Dog", BTreeMap::new()).expect("create dog");
    realm.commit_transaction().expect("commit");

    let people = realm.objects("Person").expect("people");
    assert_eq!(people[0].values["age"], GeneratedValue::Int(42));
    let dogs = realm.objects("Dog").expect("dogs");
    assert_eq!(dogs[0].values["tags"], GeneratedValue::List(Vec::new()));
    assert_eq!(dogs[0].values["owner"], GeneratedValue::Null);
}

#[test]
fn rejects_duplicate_primary_keys() {
    let mut realm = FileRealm::create(temp_realm_path("dup_pk"), schema()).expect("create realm");
    realm.begin_transaction().expect("begin");
    realm.create("Person", person("Alice")).expect("create person");
    let result = realm.create("Person", person("Alice"));
    assert!(matches!(result, Err(StoreError::DuplicatePrimaryKey { .. })));
}

#[test]
fn rejects_dangling_links_and_type_mismatches() {
    let mut realm = FileRealm::create(temp_realm_path("links"), schema()).expect("create realm");
    realm.begin_transaction().expect("begin");

    let mut dog = BTreeMap::new();
    dog.insert(
        "owner".to_string(),
        GeneratedValue::Object(ObjectRef {
            object_type: "Person".to_string(),
            key: 0,
        }),
    );
    let result = realm.create("Dog", dog);
    assert!(matches!(result, Err(StoreError::DanglingReference { .. })));

    let mut values = person("Bob");
    values.insert("age".to_string(), GeneratedValue::Double(1.5));
    let result = realm.create("Person", values);
    assert!(matches!(result, Err(StoreError::TypeMismatch { .. })));
}

#[test]
fn uncommitted_objects_are_not_persisted() {
    let path = temp_realm_path("cancel");
    let mut realm = FileRealm::create(&path, schema()).expect("create realm");
    realm.begin_transaction().expect("begin");
    realm.create("Person", person("Alice")).expect("create person");
    realm.commit_transaction().expect("commit");

    realm.begin_transaction().expect("begin");
    realm.create("Person", person("Bob")).expect("create person");
    realm.cancel_transaction().expect("cancel");
    assert_eq!(realm.object_count("Person").expect("count"), 1);

    realm.begin_transaction().expect("begin");
    let result = realm.close();
    assert!(matches!(result, Err(StoreError::TransactionOpen)));

    let reopened = FileRealm::open(&path).expect("reopen realm");
    assert_eq!(reopened.object_count("Person").expect("count"), 1);
    let found = reopened
        .find_by_primary_key("Person", &GeneratedValue::String("Alice".to_string()))
        .expect("lookup");
    assert_eq!(
        found,
        Some(ObjectRef {
            object_type: "Person".to_string(),
            key: 0
        })
    );
}

#[test]
fn dump_exposes_collections_with_internal_keys() {
    let mut realm = FileRealm::create(temp_realm_path("dump"), schema()).expect("create realm");
    realm.begin_transaction().expect("begin");
    let alice = realm.create("Person", person("Alice")).expect("create person");
    let mut dog = BTreeMap::new();
    dog.insert("owner".to_string(), GeneratedValue::Object(alice));
    realm.create("Dog", dog).expect("create dog");
    realm.commit_transaction().expect("commit");

    let dump = realm.dump();
    assert_eq!(dump["Person"][0]["_key"], 0);
    assert_eq!(dump["Person"][0]["name"], "Alice");
    assert_eq!(dump["Dog"][0]["owner"], 0);
    assert_eq!(dump["pk"][0]["pk_table"], "Person");
    assert_eq!(dump["metadata"]["objects"], 2);
}

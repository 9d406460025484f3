use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;

use random_realms_core::GeneratedValue;
use random_realms_store::labels::{PATH_PROPERTY, REALM_FILE_TYPE, SYNC_LABEL_PROPERTY};
use random_realms_store::{
    FileRealm, Realm, StoreError, admin_realm_schema, load_label_mapping, migrate_sync_labels,
};

fn temp_dir(label: &str) -> PathBuf {
    let mut dir = std::env::temp_dir();
    dir.push(format!("random_realms_labels_{label}_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn admin_realm(dir: &PathBuf, paths: &[&str]) -> FileRealm {
    let mut realm =
        FileRealm::create(dir.join("admin.realm"), admin_realm_schema()).expect("create realm");
    realm
        .write(|realm| {
            for path in paths {
                let mut values = BTreeMap::new();
                values.insert(
                    PATH_PROPERTY.to_string(),
                    GeneratedValue::String(path.to_string()),
                );
                realm.create(REALM_FILE_TYPE, values)?;
            }
            Ok(())
        })
        .expect("seed admin realm");
    realm
}

fn label_of(realm: &FileRealm, index: usize) -> GeneratedValue {
    realm.objects(REALM_FILE_TYPE).expect("realm files")[index].values[SYNC_LABEL_PROPERTY]
        .clone()
}

#[test]
fn migrates_listed_paths_only() {
    let dir = temp_dir("ok");
    let mut realm = admin_realm(&dir, &["/a", "/b", "/c"]);

    let mut labels = BTreeMap::new();
    labels.insert("/a".to_string(), "blue".to_string());
    labels.insert("/c".to_string(), "green".to_string());

    let migrated = migrate_sync_labels(&mut realm, &labels).expect("migrate");
    assert_eq!(migrated, 2);

    let reopened = FileRealm::open(dir.join("admin.realm")).expect("reopen");
    assert_eq!(label_of(&reopened, 0), GeneratedValue::String("blue".to_string()));
    assert_eq!(label_of(&reopened, 1), GeneratedValue::Null);
    assert_eq!(label_of(&reopened, 2), GeneratedValue::String("green".to_string()));
}

#[test]
fn missing_path_aborts_without_commit() {
    let dir = temp_dir("missing");
    let mut realm = admin_realm(&dir, &["/a"]);

    let mut labels = BTreeMap::new();
    labels.insert("/a".to_string(), "blue".to_string());
    labels.insert("/zzz".to_string(), "green".to_string());

    let result = migrate_sync_labels(&mut realm, &labels);
    assert!(matches!(result, Err(StoreError::PathNotFound(path)) if path == "/zzz"));
    assert!(!realm.is_in_transaction());

    let reopened = FileRealm::open(dir.join("admin.realm")).expect("reopen");
    assert_eq!(label_of(&reopened, 0), GeneratedValue::Null);
}

#[test]
fn label_mapping_must_be_an_object_of_strings() {
    let dir = temp_dir("mapping");
    let good = dir.join("labels.json");
    fs::write(&good, r#"{"/a": "blue"}"#).expect("write labels");
    let labels = load_label_mapping(&good).expect("load labels");
    assert_eq!(labels.get("/a").map(String::as_str), Some("blue"));

    let bad = dir.join("bad.json");
    fs::write(&bad, r#"{"/a": 3}"#).expect("write labels");
    assert!(matches!(
        load_label_mapping(&bad),
        Err(StoreError::InvalidLabels(_))
    ));
}

use std::collections::BTreeMap;
use std::path::Path;

use random_realms_core::{GeneratedValue, ObjectSchema, PropertyDescriptor, PropertyType, RealmSchema};
use tracing::info;

use crate::error::{StoreError, StoreResult};
use crate::realm::Realm;

/// Object type describing one synced realm in the admin realm.
pub const REALM_FILE_TYPE: &str = "RealmFile";
/// Primary key of [`REALM_FILE_TYPE`].
pub const PATH_PROPERTY: &str = "path";
/// Attribute rewritten by the label migration.
pub const SYNC_LABEL_PROPERTY: &str = "syncLabel";

/// Schema of the administrative realm the label migration runs against.
pub fn admin_realm_schema() -> RealmSchema {
    let mut properties = BTreeMap::new();
    properties.insert(
        PATH_PROPERTY.to_string(),
        PropertyDescriptor {
            property_type: PropertyType::String,
            indexed: true,
            optional: false,
            default: None,
        },
    );
    properties.insert(
        SYNC_LABEL_PROPERTY.to_string(),
        PropertyDescriptor {
            property_type: PropertyType::String,
            indexed: false,
            optional: true,
            default: None,
        },
    );
    RealmSchema::new(vec![ObjectSchema {
        name: REALM_FILE_TYPE.to_string(),
        properties,
        primary_key: Some(PATH_PROPERTY.to_string()),
    }])
}

/// Load a JSON object mapping realm paths to sync labels.
pub fn load_label_mapping(path: &Path) -> StoreResult<BTreeMap<String, String>> {
    let contents = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&contents)?;
    let object = value.as_object().ok_or_else(|| {
        StoreError::InvalidLabels(format!("{} must contain a JSON object", path.display()))
    })?;

    let mut labels = BTreeMap::new();
    for (realm_path, label) in object {
        let label = label.as_str().ok_or_else(|| {
            StoreError::InvalidLabels(format!("label for {realm_path:?} must be a string"))
        })?;
        labels.insert(realm_path.clone(), label.to_string());
    }
    Ok(labels)
}

/// Rewrite the sync label of every listed realm path in one transaction.
///
/// A path missing from the admin realm aborts the migration and nothing is
/// committed. Returns the number of migrated records.
pub fn migrate_sync_labels<R: Realm>(
    realm: &mut R,
    labels: &BTreeMap<String, String>,
) -> StoreResult<usize> {
    info!(
        realm_files = realm.object_count(REALM_FILE_TYPE)?,
        labels = labels.len(),
        "starting sync label migration"
    );

    let migrated = realm.write(|realm| {
        for (path, sync_label) in labels {
            let realm_file = realm
                .find_by_primary_key(REALM_FILE_TYPE, &GeneratedValue::String(path.clone()))?
                .ok_or_else(|| StoreError::PathNotFound(path.clone()))?;
            info!(path = %path, sync_label = %sync_label, "migrating realm file");
            realm.set_property(
                &realm_file,
                SYNC_LABEL_PROPERTY,
                GeneratedValue::String(sync_label.clone()),
            )?;
        }
        Ok(labels.len())
    })?;

    info!(migrated, "sync label migration committed");
    Ok(migrated)
}

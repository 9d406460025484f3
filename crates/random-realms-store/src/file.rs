use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use random_realms_core::{
    GeneratedValue, ObjectRef, ObjectSchema, PropertyDescriptor, RealmSchema,
    validate_realm_schema,
};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::atomic::write_bytes_atomic;
use crate::error::{StoreError, StoreResult};
use crate::realm::Realm;

const FORMAT_VERSION: u32 = 1;

/// A persisted object and its property values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredObject {
    pub key: u64,
    pub values: BTreeMap<String, GeneratedValue>,
}

#[derive(Serialize)]
struct RealmFileRef<'a> {
    format_version: u32,
    schema: &'a RealmSchema,
    objects: &'a BTreeMap<String, Vec<StoredObject>>,
}

#[derive(Deserialize)]
struct RealmFileOwned {
    format_version: u32,
    schema: RealmSchema,
    objects: BTreeMap<String, Vec<StoredObject>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum PrimaryKeyValue {
    Null,
    Int(i64),
    String(String),
}

impl PrimaryKeyValue {
    fn from_value(value: &GeneratedValue) -> Option<Self> {
        match value {
            GeneratedValue::Null => Some(PrimaryKeyValue::Null),
            GeneratedValue::Int(value) => Some(PrimaryKeyValue::Int(*value)),
            GeneratedValue::String(value) => Some(PrimaryKeyValue::String(value.clone())),
            _ => None,
        }
    }

    fn describe(&self) -> String {
        match self {
            PrimaryKeyValue::Null => "null".to_string(),
            PrimaryKeyValue::Int(value) => value.to_string(),
            PrimaryKeyValue::String(value) => format!("{value:?}"),
        }
    }
}

/// Realm persisted as a single JSON document.
///
/// Objects live in memory; each commit rewrites the whole file atomically, so
/// the file always reflects the last committed transaction.
#[derive(Debug)]
pub struct FileRealm {
    path: PathBuf,
    schema: RealmSchema,
    objects: BTreeMap<String, Vec<StoredObject>>,
    primary_keys: HashMap<String, HashMap<PrimaryKeyValue, u64>>,
    in_transaction: bool,
    commits: u64,
}

impl FileRealm {
    /// Create a fresh realm at `path`, replacing any existing file.
    pub fn create(path: impl AsRef<Path>, schema: RealmSchema) -> StoreResult<Self> {
        validate_realm_schema(&schema)?;
        let objects = schema
            .names()
            .map(|name| (name.to_string(), Vec::new()))
            .collect();
        let realm = Self {
            path: path.as_ref().to_path_buf(),
            schema,
            objects,
            primary_keys: HashMap::new(),
            in_transaction: false,
            commits: 0,
        };
        realm.persist()?;
        info!(
            path = %realm.path.display(),
            object_schemas = realm.schema.len(),
            "realm created"
        );
        Ok(realm)
    }

    /// Open an existing realm file with the schema stored inside it.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = std::fs::read(&path)?;
        let file: RealmFileOwned = serde_json::from_slice(&contents)?;
        if file.format_version != FORMAT_VERSION {
            return Err(StoreError::UnsupportedFormat(file.format_version));
        }
        validate_realm_schema(&file.schema)?;

        let mut objects = file.objects;
        for name in file.schema.names() {
            objects.entry(name.to_string()).or_default();
        }
        if let Some(unknown) = objects.keys().find(|name| file.schema.find(name).is_none()) {
            return Err(StoreError::UnknownObjectType(unknown.clone()));
        }

        let primary_keys = index_primary_keys(&file.schema, &objects)?;
        debug!(path = %path.display(), "realm opened");
        Ok(Self {
            path,
            schema: file.schema,
            objects,
            primary_keys,
            in_transaction: false,
            commits: 0,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of transactions committed through this handle.
    pub fn commit_count(&self) -> u64 {
        self.commits
    }

    /// Objects of `object_type` in creation order.
    pub fn objects(&self, object_type: &str) -> StoreResult<&[StoredObject]> {
        self.objects
            .get(object_type)
            .map(Vec::as_slice)
            .ok_or_else(|| StoreError::UnknownObjectType(object_type.to_string()))
    }

    /// Total number of objects across every type.
    pub fn total_objects(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    fn persist(&self) -> StoreResult<()> {
        let file = RealmFileRef {
            format_version: FORMAT_VERSION,
            schema: &self.schema,
            objects: &self.objects,
        };
        let data = serde_json::to_vec(&file)?;
        write_bytes_atomic(&self.path, &data)
    }

    fn object_schema(&self, object_type: &str) -> StoreResult<&ObjectSchema> {
        self.schema
            .find(object_type)
            .ok_or_else(|| StoreError::UnknownObjectType(object_type.to_string()))
    }

    fn require_transaction(&self) -> StoreResult<()> {
        if self.in_transaction {
            Ok(())
        } else {
            Err(StoreError::NotInTransaction)
        }
    }

    fn object_exists(&self, object: &ObjectRef) -> bool {
        self.objects
            .get(&object.object_type)
            .map(|objects| (object.key as usize) < objects.len())
            .unwrap_or(false)
    }

    fn check_value(
        &self,
        object_type: &str,
        name: &str,
        property: &PropertyDescriptor,
        value: &GeneratedValue,
    ) -> StoreResult<()> {
        if value.is_null() {
            return if property.accepts_null() {
                Ok(())
            } else {
                Err(StoreError::MissingValue {
                    object_type: object_type.to_string(),
                    property: name.to_string(),
                })
            };
        }

        if !value.conforms_to(&property.property_type) {
            return Err(StoreError::TypeMismatch {
                object_type: object_type.to_string(),
                property: name.to_string(),
                expected: property.property_type.to_string(),
                found: value.kind(),
            });
        }

        for link in value.links() {
            if !self.object_exists(link) {
                return Err(StoreError::DanglingReference {
                    target_type: link.object_type.clone(),
                    key: link.key,
                });
            }
        }

        Ok(())
    }

    fn resolve_values(
        &self,
        object_type: &str,
        mut values: BTreeMap<String, GeneratedValue>,
    ) -> StoreResult<(BTreeMap<String, GeneratedValue>, Option<PrimaryKeyValue>)> {
        let object_schema = self.object_schema(object_type)?;

        if let Some(unknown) = values
            .keys()
            .find(|name| !object_schema.properties.contains_key(*name))
        {
            return Err(StoreError::UnknownProperty {
                object_type: object_type.to_string(),
                property: unknown.clone(),
            });
        }

        let mut resolved = BTreeMap::new();
        for (name, property) in &object_schema.properties {
            let value = match values.remove(name) {
                Some(value) => value,
                None => match &property.default {
                    Some(default) => default.clone(),
                    None if property.property_type.is_list() => GeneratedValue::List(Vec::new()),
                    None => GeneratedValue::Null,
                },
            };
            self.check_value(object_type, name, property, &value)?;
            resolved.insert(name.clone(), value);
        }

        let primary_key = match &object_schema.primary_key {
            Some(name) => {
                let null = GeneratedValue::Null;
                let value = resolved.get(name).unwrap_or(&null);
                let key = PrimaryKeyValue::from_value(value).ok_or_else(|| {
                    StoreError::TypeMismatch {
                        object_type: object_type.to_string(),
                        property: name.clone(),
                        expected: "string or int".to_string(),
                        found: value.kind(),
                    }
                })?;
                let taken = self
                    .primary_keys
                    .get(object_type)
                    .map(|index| index.contains_key(&key))
                    .unwrap_or(false);
                if taken {
                    return Err(StoreError::DuplicatePrimaryKey {
                        object_type: object_type.to_string(),
                        value: key.describe(),
                    });
                }
                Some(key)
            }
            None => None,
        };

        Ok((resolved, primary_key))
    }
}

impl Realm for FileRealm {
    fn schema(&self) -> &RealmSchema {
        &self.schema
    }

    fn is_in_transaction(&self) -> bool {
        self.in_transaction
    }

    fn begin_transaction(&mut self) -> StoreResult<()> {
        if self.in_transaction {
            return Err(StoreError::AlreadyInTransaction);
        }
        self.in_transaction = true;
        Ok(())
    }

    fn commit_transaction(&mut self) -> StoreResult<()> {
        self.require_transaction()?;
        self.persist()?;
        self.in_transaction = false;
        self.commits += 1;
        debug!(
            path = %self.path.display(),
            commits = self.commits,
            objects = self.total_objects(),
            "transaction committed"
        );
        Ok(())
    }

    fn cancel_transaction(&mut self) -> StoreResult<()> {
        self.require_transaction()?;
        let committed = Self::open(&self.path)?;
        self.objects = committed.objects;
        self.primary_keys = committed.primary_keys;
        self.in_transaction = false;
        debug!(path = %self.path.display(), "transaction cancelled");
        Ok(())
    }

    fn create(
        &mut self,
        object_type: &str,
        values: BTreeMap<String, GeneratedValue>,
    ) -> StoreResult<ObjectRef> {
        self.require_transaction()?;
        let (values, primary_key) = self.resolve_values(object_type, values)?;

        let objects = self.objects.entry(object_type.to_string()).or_default();
        let key = objects.len() as u64;
        objects.push(StoredObject { key, values });
        if let Some(primary_key) = primary_key {
            self.primary_keys
                .entry(object_type.to_string())
                .or_default()
                .insert(primary_key, key);
        }

        Ok(ObjectRef {
            object_type: object_type.to_string(),
            key,
        })
    }

    fn close(self) -> StoreResult<()> {
        if self.in_transaction {
            return Err(StoreError::TransactionOpen);
        }
        debug!(path = %self.path.display(), "realm closed");
        Ok(())
    }

    fn object_count(&self, object_type: &str) -> StoreResult<usize> {
        self.objects(object_type).map(<[StoredObject]>::len)
    }

    fn find_by_primary_key(
        &self,
        object_type: &str,
        key: &GeneratedValue,
    ) -> StoreResult<Option<ObjectRef>> {
        let object_schema = self.object_schema(object_type)?;
        let Some((name, property)) = object_schema.primary_key_property() else {
            return Err(StoreError::NoPrimaryKey {
                object_type: object_type.to_string(),
            });
        };
        if !key.is_null() && !key.conforms_to(&property.property_type) {
            return Err(StoreError::TypeMismatch {
                object_type: object_type.to_string(),
                property: name.to_string(),
                expected: property.property_type.to_string(),
                found: key.kind(),
            });
        }

        let found = PrimaryKeyValue::from_value(key).and_then(|key| {
            self.primary_keys
                .get(object_type)
                .and_then(|index| index.get(&key))
                .copied()
        });
        Ok(found.map(|key| ObjectRef {
            object_type: object_type.to_string(),
            key,
        }))
    }

    fn set_property(
        &mut self,
        object: &ObjectRef,
        property: &str,
        value: GeneratedValue,
    ) -> StoreResult<()> {
        self.require_transaction()?;
        let object_schema = self.object_schema(&object.object_type)?;
        if object_schema.primary_key.as_deref() == Some(property) {
            return Err(StoreError::PrimaryKeyChange {
                object_type: object.object_type.clone(),
                property: property.to_string(),
            });
        }
        let descriptor =
            object_schema
                .property(property)
                .ok_or_else(|| StoreError::UnknownProperty {
                    object_type: object.object_type.clone(),
                    property: property.to_string(),
                })?;
        self.check_value(&object.object_type, property, descriptor, &value)?;

        let stored = self
            .objects
            .get_mut(&object.object_type)
            .and_then(|objects| objects.get_mut(object.key as usize))
            .ok_or_else(|| StoreError::DanglingReference {
                target_type: object.object_type.clone(),
                key: object.key,
            })?;
        stored.values.insert(property.to_string(), value);
        Ok(())
    }
}

fn index_primary_keys(
    schema: &RealmSchema,
    objects: &BTreeMap<String, Vec<StoredObject>>,
) -> StoreResult<HashMap<String, HashMap<PrimaryKeyValue, u64>>> {
    let mut index = HashMap::new();
    for object_schema in schema.iter() {
        let Some(primary_key) = &object_schema.primary_key else {
            continue;
        };
        let null = GeneratedValue::Null;
        let mut keys = HashMap::new();
        for object in objects.get(&object_schema.name).into_iter().flatten() {
            let value = object.values.get(primary_key).unwrap_or(&null);
            let key = PrimaryKeyValue::from_value(value).ok_or_else(|| {
                StoreError::TypeMismatch {
                    object_type: object_schema.name.clone(),
                    property: primary_key.clone(),
                    expected: "string or int".to_string(),
                    found: value.kind(),
                }
            })?;
            if keys.insert(key.clone(), object.key).is_some() {
                return Err(StoreError::DuplicatePrimaryKey {
                    object_type: object_schema.name.clone(),
                    value: key.describe(),
                });
            }
        }
        index.insert(object_schema.name.clone(), keys);
    }
    Ok(index)
}

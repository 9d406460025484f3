use std::collections::BTreeMap;

use random_realms_core::{ObjectRef, RealmSchema};

/// Objects created so far, per object schema, in creation order.
///
/// Relational values may only point at objects already in the pool, so a
/// reference never targets an object created after its holder.
#[derive(Debug, Clone, Default)]
pub struct ObjectPool {
    objects: BTreeMap<String, Vec<ObjectRef>>,
}

impl ObjectPool {
    /// An empty pool that knows every object schema of `schema`.
    pub fn for_schema(schema: &RealmSchema) -> Self {
        Self {
            objects: schema
                .iter()
                .map(|object_schema| (object_schema.name.clone(), Vec::new()))
                .collect(),
        }
    }

    /// Objects of `object_type`, or `None` when the type is unknown.
    pub fn objects(&self, object_type: &str) -> Option<&[ObjectRef]> {
        self.objects.get(object_type).map(Vec::as_slice)
    }

    pub fn insert(&mut self, object: ObjectRef) {
        self.objects
            .entry(object.object_type.clone())
            .or_default()
            .push(object);
    }

    pub fn len(&self) -> usize {
        self.objects.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use random_realms_core::{ObjectSchema, RealmSchema};

    use super::*;

    #[test]
    fn knows_schema_types_before_any_insert() {
        let schema = RealmSchema::new(vec![ObjectSchema {
            name: "Dog".to_string(),
            properties: Default::default(),
            primary_key: None,
        }]);
        let mut pool = ObjectPool::for_schema(&schema);
        assert_eq!(pool.objects("Dog").map(<[_]>::len), Some(0));
        assert!(pool.objects("Cat").is_none());

        pool.insert(ObjectRef {
            object_type: "Dog".to_string(),
            key: 0,
        });
        assert_eq!(pool.len(), 1);
    }
}

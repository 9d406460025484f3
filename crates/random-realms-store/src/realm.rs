use std::collections::BTreeMap;

use random_realms_core::{GeneratedValue, ObjectRef, RealmSchema};
use tracing::warn;

use crate::error::StoreResult;

/// Operations the generator needs from an open realm.
///
/// Mutations are only valid between `begin_transaction` and
/// `commit_transaction`/`cancel_transaction`.
pub trait Realm {
    /// Schema the realm was opened with.
    fn schema(&self) -> &RealmSchema;

    fn is_in_transaction(&self) -> bool;

    fn begin_transaction(&mut self) -> StoreResult<()>;

    /// Make every change since `begin_transaction` durable.
    fn commit_transaction(&mut self) -> StoreResult<()>;

    /// Discard every change since `begin_transaction`.
    fn cancel_transaction(&mut self) -> StoreResult<()>;

    /// Create an object. Missing properties take their default, an empty
    /// list, or null when the property accepts it.
    fn create(
        &mut self,
        object_type: &str,
        values: BTreeMap<String, GeneratedValue>,
    ) -> StoreResult<ObjectRef>;

    /// Number of objects of `object_type`, including uncommitted ones.
    fn object_count(&self, object_type: &str) -> StoreResult<usize>;

    fn find_by_primary_key(
        &self,
        object_type: &str,
        key: &GeneratedValue,
    ) -> StoreResult<Option<ObjectRef>>;

    fn set_property(
        &mut self,
        object: &ObjectRef,
        property: &str,
        value: GeneratedValue,
    ) -> StoreResult<()>;

    /// Release the realm. Fails while a write transaction is open.
    fn close(self) -> StoreResult<()>
    where
        Self: Sized;

    /// Run `f` inside a write transaction, committing on success and
    /// cancelling on error.
    fn write<T, F>(&mut self, f: F) -> StoreResult<T>
    where
        Self: Sized,
        F: FnOnce(&mut Self) -> StoreResult<T>,
    {
        self.begin_transaction()?;
        match f(self) {
            Ok(value) => {
                self.commit_transaction()?;
                Ok(value)
            }
            Err(err) => {
                if let Err(cancel_err) = self.cancel_transaction() {
                    warn!(error = %cancel_err, "failed to cancel write transaction");
                }
                Err(err)
            }
        }
    }
}

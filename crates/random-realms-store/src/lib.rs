//! Storage boundary for generated realms.
//!
//! The generator only talks to the [`Realm`] trait. [`FileRealm`] is the
//! bundled implementation: a single JSON document committed atomically, with
//! the same transaction, primary-key and link rules the engine enforces.

mod atomic;
pub mod dump;
pub mod error;
pub mod file;
pub mod labels;
pub mod realm;

pub use error::{StoreError, StoreResult};
pub use file::{FileRealm, StoredObject};
pub use labels::{admin_realm_schema, load_label_mapping, migrate_sync_labels};
pub use realm::Realm;

//! Core contracts for random-realms.
//!
//! This crate defines the schema model shared by the generator, the store and
//! the CLI: property types, object and realm schemas, generated values, and the
//! invariant checks every synthesized schema must pass.

pub mod error;
pub mod schema;
pub mod types;
pub mod validation;
pub mod value;

pub use error::{Error, Result};
pub use schema::{ObjectSchema, PropertyDescriptor, RealmSchema};
pub use types::{PropertyType, primitive_types};
pub use validation::{validate_object_schema, validate_realm_schema};
pub use value::{GeneratedValue, ObjectRef};

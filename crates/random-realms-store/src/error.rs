use thiserror::Error;

/// Errors raised by realm implementations.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Schema(#[from] random_realms_core::Error),
    #[error("unsupported realm file format version {0}")]
    UnsupportedFormat(u32),
    #[error("unknown object type {0:?}")]
    UnknownObjectType(String),
    #[error("unknown property {property:?} on {object_type:?}")]
    UnknownProperty {
        object_type: String,
        property: String,
    },
    #[error("missing value for required property {object_type:?}.{property:?}")]
    MissingValue {
        object_type: String,
        property: String,
    },
    #[error("{object_type:?}.{property:?} expects {expected}, got a {found} value")]
    TypeMismatch {
        object_type: String,
        property: String,
        expected: String,
        found: &'static str,
    },
    #[error("attempting to create an object of type {object_type:?} with an existing primary key value {value}")]
    DuplicatePrimaryKey { object_type: String, value: String },
    #[error("{object_type:?} has no primary key")]
    NoPrimaryKey { object_type: String },
    #[error("primary key {object_type:?}.{property:?} cannot be changed")]
    PrimaryKeyChange {
        object_type: String,
        property: String,
    },
    #[error("link to missing object {target_type:?} #{key}")]
    DanglingReference { target_type: String, key: u64 },
    #[error("cannot modify a realm outside of a write transaction")]
    NotInTransaction,
    #[error("a write transaction is already in progress")]
    AlreadyInTransaction,
    #[error("cannot close a realm with an open write transaction")]
    TransactionOpen,
    #[error("cannot migrate {0:?}, since it does not exist in the admin realm")]
    PathNotFound(String),
    #[error("invalid label mapping: {0}")]
    InvalidLabels(String),
}

/// Result type for store operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

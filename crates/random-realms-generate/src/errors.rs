use thiserror::Error;

use random_realms_store::StoreError;

/// Errors emitted while generating a realm.
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("invalid options: {0}")]
    InvalidOptions(String),
    #[error("cannot make value of {0}")]
    UnsupportedDescriptor(String),
    #[error("could not produce {requested} unique names within {attempts} attempts")]
    UniqueNamesExhausted { requested: usize, attempts: usize },
    #[error("generation panicked: {0}")]
    Panicked(String),
    #[error(transparent)]
    Core(#[from] random_realms_core::Error),
    #[error(transparent)]
    Store(#[from] StoreError),
}

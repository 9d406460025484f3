use thiserror::Error;

/// Core error type shared across random-realms crates.
#[derive(Debug, Error)]
pub enum Error {
    /// The schema violates internal invariants.
    #[error("invalid schema: {0}")]
    InvalidSchema(String),
    /// A requested setting or descriptor is not supported.
    #[error("unsupported: {0}")]
    Unsupported(String),
}

/// Convenience alias for results returned by random-realms crates.
pub type Result<T> = std::result::Result<T, Error>;

mod logging;
mod run;

pub use logging::init_logging;
pub use run::{RunContext, RunOutcome, write_run_record};

use thiserror::Error;

/// Errors writing run artifacts or installing logging.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("json serialization error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("logging error: {0}")]
    Logging(String),
}

pub type RegistryResult<T> = std::result::Result<T, RegistryError>;

use thiserror::Error;

/// Errors that keep the upgrade check from reaching a verdict.
///
/// A dump mismatch is not an error; it is a failed [`DiffReport`](crate::DiffReport).
#[derive(Debug, Error)]
pub enum DiffError {
    #[error("upgrade check needs at least two versions, got {0}")]
    NotEnoughVersions(usize),
    #[error("failed to run {tool}: {source}")]
    Spawn {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("error running {tool} ({status}): {stderr}")]
    ToolFailed {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("{tool} printed invalid JSON ({source}): {stderr}")]
    InvalidOutput {
        tool: String,
        #[source]
        source: serde_json::Error,
        stderr: String,
    },
}

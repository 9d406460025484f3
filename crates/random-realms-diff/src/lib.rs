//! Upgrade check for generated realm files.
//!
//! Each configured `realm2json-<version>` tool dumps the same realm file to
//! JSON. Version-volatile fields are stripped and every dump is compared
//! against the first one; any structural difference fails the check.

pub mod compare;
pub mod engine;
pub mod errors;
pub mod model;
pub mod normalize;
pub mod report;

pub use compare::compare_dumps;
pub use engine::{UpgradeDiffer, check_dumps};
pub use errors::DiffError;
pub use model::{
    DEFAULT_VERSIONS, DiffOutcome, DiffReport, DiffStage, Difference, DumpTools,
    VersionComparison,
};
pub use normalize::normalize_dump;
pub use report::render_report;

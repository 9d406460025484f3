use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Engine versions compared by default, oldest first.
pub const DEFAULT_VERSIONS: [&str; 2] = ["5.23.6", "6.0.0"];

/// Where the per-version dump tools live.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DumpTools {
    pub bin_dir: PathBuf,
    /// Versions to dump with; the first is the baseline.
    pub versions: Vec<String>,
}

impl Default for DumpTools {
    fn default() -> Self {
        Self {
            bin_dir: PathBuf::from("bin"),
            versions: DEFAULT_VERSIONS.iter().map(|v| v.to_string()).collect(),
        }
    }
}

impl DumpTools {
    pub fn tool_path(&self, version: &str) -> PathBuf {
        self.bin_dir.join(format!("realm2json-{version}"))
    }
}

/// Steps of one upgrade check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "stage", content = "version", rename_all = "snake_case")]
pub enum DiffStage {
    Start,
    Dump(String),
    Normalize,
    Compare,
    Pass,
    Fail,
}

impl fmt::Display for DiffStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DiffStage::Start => f.write_str("start"),
            DiffStage::Dump(version) => write!(f, "dump-{version}"),
            DiffStage::Normalize => f.write_str("normalize"),
            DiffStage::Compare => f.write_str("compare"),
            DiffStage::Pass => f.write_str("pass"),
            DiffStage::Fail => f.write_str("fail"),
        }
    }
}

/// One structural difference between two dumps.
///
/// `path` is a JSON pointer; a missing side is `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Difference {
    pub path: String,
    pub expected: Option<Value>,
    pub actual: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VersionComparison {
    pub version: String,
    pub differences: Vec<Difference>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiffOutcome {
    Pass,
    Fail,
}

/// Verdict of an upgrade check.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiffReport {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub realm_path: Option<PathBuf>,
    pub baseline: String,
    pub comparisons: Vec<VersionComparison>,
    pub stages: Vec<DiffStage>,
}

impl DiffReport {
    pub fn outcome(&self) -> DiffOutcome {
        if self
            .comparisons
            .iter()
            .all(|comparison| comparison.differences.is_empty())
        {
            DiffOutcome::Pass
        } else {
            DiffOutcome::Fail
        }
    }

    pub fn passed(&self) -> bool {
        self.outcome() == DiffOutcome::Pass
    }

    pub fn difference_count(&self) -> usize {
        self.comparisons
            .iter()
            .map(|comparison| comparison.differences.len())
            .sum()
    }
}

use std::path::Path;
use std::process::Command;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::compare::compare_dumps;
use crate::errors::DiffError;
use crate::model::{DiffReport, DiffStage, DumpTools, VersionComparison};
use crate::normalize::normalize_dump;

/// Runs the per-version dump tools against a realm file and compares them.
#[derive(Debug, Clone, Default)]
pub struct UpgradeDiffer {
    tools: DumpTools,
}

impl UpgradeDiffer {
    pub fn new(tools: DumpTools) -> Self {
        Self { tools }
    }

    pub fn tools(&self) -> &DumpTools {
        &self.tools
    }

    /// Dump `realm_path` with every configured version and compare the
    /// normalized dumps against the first version's.
    ///
    /// Tool failures are errors; dump mismatches come back as a failed report.
    pub fn check(&self, realm_path: &Path) -> Result<DiffReport, DiffError> {
        if self.tools.versions.len() < 2 {
            return Err(DiffError::NotEnoughVersions(self.tools.versions.len()));
        }
        let mut stages = vec![DiffStage::Start];
        info!(
            realm = %realm_path.display(),
            versions = ?self.tools.versions,
            "upgrade check started"
        );

        let mut dumps = Vec::with_capacity(self.tools.versions.len());
        for version in &self.tools.versions {
            stages.push(DiffStage::Dump(version.clone()));
            debug!(stage = "dump", version = %version, "running dump tool");
            dumps.push((version.clone(), self.dump(version, realm_path)?));
        }

        let mut report = check_dumps(dumps)?;
        stages.extend(report.stages.drain(1..));
        report.stages = stages;
        report.realm_path = Some(realm_path.to_path_buf());
        Ok(report)
    }

    /// Run `realm2json-<version>` on `realm_path` and parse what it prints.
    pub fn dump(&self, version: &str, realm_path: &Path) -> Result<Value, DiffError> {
        let tool = self.tools.tool_path(version);
        let tool_name = tool.display().to_string();
        let output = Command::new(&tool)
            .arg(realm_path)
            .output()
            .map_err(|source| DiffError::Spawn {
                tool: tool_name.clone(),
                source,
            })?;
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();

        if !output.status.success() {
            warn!(tool = %tool_name, status = %output.status, "dump tool failed");
            return Err(DiffError::ToolFailed {
                tool: tool_name,
                status: output.status.to_string(),
                stderr,
            });
        }

        serde_json::from_slice(&output.stdout).map_err(|source| DiffError::InvalidOutput {
            tool: tool_name,
            source,
            stderr,
        })
    }
}

/// Normalize and compare already-parsed dumps, keyed by version. The first
/// entry is the baseline.
pub fn check_dumps(dumps: Vec<(String, Value)>) -> Result<DiffReport, DiffError> {
    if dumps.len() < 2 {
        return Err(DiffError::NotEnoughVersions(dumps.len()));
    }
    let mut stages = vec![DiffStage::Start, DiffStage::Normalize];
    let mut normalized = dumps
        .into_iter()
        .map(|(version, dump)| (version, normalize_dump(dump)));
    let (baseline, baseline_dump) = normalized
        .next()
        .ok_or(DiffError::NotEnoughVersions(0))?;

    stages.push(DiffStage::Compare);
    let comparisons: Vec<VersionComparison> = normalized
        .map(|(version, dump)| {
            let differences = compare_dumps(&baseline_dump, &dump);
            debug!(
                baseline = %baseline,
                version = %version,
                differences = differences.len(),
                "compared dumps"
            );
            VersionComparison {
                version,
                differences,
            }
        })
        .collect();

    let mut report = DiffReport {
        realm_path: None,
        baseline,
        comparisons,
        stages,
    };
    if report.passed() {
        report.stages.push(DiffStage::Pass);
        info!(baseline = %report.baseline, "upgrade check passed");
    } else {
        report.stages.push(DiffStage::Fail);
        warn!(
            baseline = %report.baseline,
            differences = report.difference_count(),
            "upgrade check found differences"
        );
    }
    Ok(report)
}

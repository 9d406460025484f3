use std::fs::OpenOptions;
use std::path::{Path, PathBuf};
use std::process::Command;

use chrono::{DateTime, Utc};
use random_realms_diff::DiffOutcome;
use random_realms_generate::GenerateOptions;
use serde::Serialize;

use super::{RegistryError, RegistryResult};

/// Written next to the generated realm file.
pub const RUN_RECORD_FILE: &str = "run.json";

/// Metadata captured when a generate run starts.
#[derive(Debug, Clone)]
pub struct RunContext {
    pub run_id: String,
    pub seed: String,
    pub started_at: DateTime<Utc>,
    pub options: GenerateOptions,
    pub realm_path: PathBuf,
}

impl RunContext {
    pub fn new(seed: &str, options: &GenerateOptions, realm_path: &Path) -> Self {
        Self {
            run_id: uuid::Uuid::new_v4().to_string(),
            seed: seed.to_string(),
            started_at: Utc::now(),
            options: options.clone(),
            realm_path: realm_path.to_path_buf(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum RunOutcome {
    Succeeded {
        object_schemas: usize,
        objects: u64,
        transactions: u64,
        #[serde(skip_serializing_if = "Option::is_none")]
        upgrade_check: Option<DiffOutcome>,
    },
    Failed {
        error: String,
    },
}

#[derive(Debug, Serialize)]
struct RunRecord<'a> {
    run_id: &'a str,
    seed: &'a str,
    started_at: String,
    finished_at: String,
    realm_path: &'a Path,
    options: &'a GenerateOptions,
    outcome: &'a RunOutcome,
    git: GitInfo,
}

/// Git metadata for reproducibility.
#[derive(Debug, Serialize)]
struct GitInfo {
    commit: Option<String>,
    dirty: Option<bool>,
}

/// Write `run.json` next to the realm file and return its path.
pub fn write_run_record(ctx: &RunContext, outcome: &RunOutcome) -> RegistryResult<PathBuf> {
    let dir = ctx
        .realm_path
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default();
    let path = dir.join(RUN_RECORD_FILE);
    let record = RunRecord {
        run_id: &ctx.run_id,
        seed: &ctx.seed,
        started_at: ctx.started_at.to_rfc3339(),
        finished_at: Utc::now().to_rfc3339(),
        realm_path: &ctx.realm_path,
        options: &ctx.options,
        outcome,
        git: collect_git_info(),
    };
    write_json(&path, &record)?;
    Ok(path)
}

fn collect_git_info() -> GitInfo {
    let commit = Command::new("git")
        .args(["rev-parse", "HEAD"])
        .output()
        .ok()
        .and_then(|output| {
            if output.status.success() {
                Some(String::from_utf8_lossy(&output.stdout).trim().to_string())
            } else {
                None
            }
        })
        .filter(|value| !value.is_empty());

    let dirty = Command::new("git")
        .args(["status", "--porcelain"])
        .output()
        .ok()
        .filter(|output| output.status.success())
        .map(|output| !output.stdout.is_empty());

    GitInfo { commit, dirty }
}

fn write_json<T: Serialize>(path: &Path, value: &T) -> RegistryResult<()> {
    let file = OpenOptions::new()
        .create(true)
        .truncate(true)
        .write(true)
        .open(path)?;
    serde_json::to_writer_pretty(file, value).map_err(RegistryError::from)
}

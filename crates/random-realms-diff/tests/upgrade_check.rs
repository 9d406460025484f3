#![cfg(unix)]

use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use random_realms_diff::{DiffError, DiffOutcome, DiffStage, DumpTools, UpgradeDiffer};

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("random_realms_diff_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn write_tool(bin_dir: &Path, version: &str, body: &str) {
    let path = bin_dir.join(format!("realm2json-{version}"));
    std::fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("write tool");
    std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).expect("chmod tool");
}

fn differ(bin_dir: &Path) -> UpgradeDiffer {
    UpgradeDiffer::new(DumpTools {
        bin_dir: bin_dir.to_path_buf(),
        versions: vec!["old".to_string(), "new".to_string()],
    })
}

// Tool scenarios share one test so no other test thread forks while a
// freshly written script is still open.
#[test]
fn dump_tool_scenarios() {
    matching_dumps_pass();
    differing_dumps_fail();
    failing_tool_reports_stderr();
    invalid_json_is_an_error();
    missing_tool_is_a_spawn_error();
}

fn matching_dumps_pass() {
    let bin_dir = temp_dir();
    write_tool(
        &bin_dir,
        "old",
        r#"echo '{"pk": [], "metadata": {"v": 5}, "Dog": [{"name": "Rex"}]}'"#,
    );
    write_tool(
        &bin_dir,
        "new",
        r#"echo '{"metadata": {"v": 6}, "Dog": [{"_key": 0, "name": "Rex"}]}'"#,
    );

    let realm = bin_dir.join("generated.realm");
    let report = differ(&bin_dir).check(&realm).expect("report");
    assert_eq!(report.outcome(), DiffOutcome::Pass);
    assert_eq!(report.realm_path.as_deref(), Some(realm.as_path()));
    assert_eq!(
        report.stages,
        vec![
            DiffStage::Start,
            DiffStage::Dump("old".to_string()),
            DiffStage::Dump("new".to_string()),
            DiffStage::Normalize,
            DiffStage::Compare,
            DiffStage::Pass,
        ]
    );
}

fn differing_dumps_fail() {
    let bin_dir = temp_dir();
    write_tool(&bin_dir, "old", r#"echo '{"Dog": [{"name": "Rex"}]}'"#);
    write_tool(&bin_dir, "new", r#"echo '{"Dog": [{"name": "Max"}]}'"#);

    let report = differ(&bin_dir)
        .check(&bin_dir.join("generated.realm"))
        .expect("report");
    assert_eq!(report.outcome(), DiffOutcome::Fail);
    assert_eq!(report.difference_count(), 1);
}

fn failing_tool_reports_stderr() {
    let bin_dir = temp_dir();
    write_tool(&bin_dir, "old", "echo 'cannot open realm' >&2\nexit 3");
    write_tool(&bin_dir, "new", "echo '{}'");

    let err = differ(&bin_dir)
        .check(&bin_dir.join("generated.realm"))
        .expect_err("tool failure");
    match err {
        DiffError::ToolFailed { tool, stderr, .. } => {
            assert!(tool.ends_with("realm2json-old"), "{tool}");
            assert_eq!(stderr, "cannot open realm");
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn invalid_json_is_an_error() {
    let bin_dir = temp_dir();
    write_tool(&bin_dir, "old", "echo '{}'");
    write_tool(&bin_dir, "new", "echo 'not json'\necho 'partial dump' >&2");

    let err = differ(&bin_dir)
        .check(&bin_dir.join("generated.realm"))
        .expect_err("invalid output");
    match err {
        DiffError::InvalidOutput { tool, stderr, .. } => {
            assert!(tool.ends_with("realm2json-new"), "{tool}");
            assert_eq!(stderr, "partial dump");
        }
        other => panic!("unexpected error: {other}"),
    }
}

fn missing_tool_is_a_spawn_error() {
    let bin_dir = temp_dir();
    let err = differ(&bin_dir)
        .check(&bin_dir.join("generated.realm"))
        .expect_err("missing tool");
    assert!(matches!(err, DiffError::Spawn { .. }));
}

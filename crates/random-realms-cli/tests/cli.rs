use std::path::{Path, PathBuf};
use std::process::{Command, Output};

fn temp_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("random_realms_cli_{}", uuid::Uuid::new_v4()));
    std::fs::create_dir_all(&dir).expect("create temp dir");
    dir
}

fn random_realms(cwd: &Path, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_random-realms"))
        .current_dir(cwd)
        .args(args)
        .env_remove("RANDOM_REALMS_LOG")
        .output()
        .expect("run random-realms")
}

#[test]
fn generates_and_dumps_a_realm() {
    let cwd = temp_dir();
    let output = random_realms(&cwd, &["out", "--seed", "abc123", "--max-object-count", "20"]);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));

    let stdout = String::from_utf8_lossy(&output.stdout);
    let out_dir = std::path::absolute(cwd.join("out")).expect("absolute");
    assert!(
        stdout.contains(&format!("Generating Realm in \"{}\" (seed = abc123)", out_dir.display())),
        "{stdout}"
    );
    assert!(stdout.contains("Generated: "), "{stdout}");

    let realm_path = out_dir.join("generated.realm");
    let record: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(out_dir.join("run.json")).expect("run.json"))
            .expect("run record");
    assert_eq!(record["seed"], "abc123");
    assert_eq!(record["outcome"]["status"], "succeeded");

    let dump = random_realms(&cwd, &["dump", realm_path.to_str().expect("utf-8 path")]);
    assert!(dump.status.success(), "{}", String::from_utf8_lossy(&dump.stderr));
    let dump: serde_json::Value = serde_json::from_slice(&dump.stdout).expect("dump json");
    assert!(dump["metadata"].is_object());
    assert!(dump["pk"].is_array());
}

#[test]
fn same_seed_same_summary() {
    let cwd = temp_dir();
    let first = random_realms(&cwd, &["a", "--seed", "repeat", "--max-object-count", "30"]);
    let second = random_realms(&cwd, &["b", "--seed", "repeat", "--max-object-count", "30"]);
    let summary = |output: &Output| {
        String::from_utf8_lossy(&output.stdout)
            .lines()
            .find(|line| line.starts_with("Generated: "))
            .map(str::to_string)
    };
    assert!(summary(&first).is_some());
    assert_eq!(summary(&first), summary(&second));
}

#[test]
fn failed_generation_records_the_seed() {
    let cwd = temp_dir();
    // A directory where the realm file should go makes the run fail.
    std::fs::create_dir_all(cwd.join("out").join("generated.realm")).expect("blocker");

    let output = random_realms(&cwd, &["out", "--seed", "doomed"]);
    assert_eq!(output.status.code(), Some(1));

    let log = std::fs::read_to_string(cwd.join("failed-seeds.log")).expect("failed seeds log");
    assert!(log.starts_with("[doomed] "), "{log}");
    assert_eq!(log.lines().count(), 1);
}

#[test]
fn invalid_limits_fail_before_generating() {
    let cwd = temp_dir();
    let output = random_realms(&cwd, &["out", "--seed", "x", "--max-properties", "0"]);
    assert!(!output.status.success());
    assert!(!cwd.join("failed-seeds.log").exists());
    assert!(!cwd.join("out").exists());
}

#[test]
fn migrates_labels_in_an_admin_realm() {
    let cwd = temp_dir();
    let admin = cwd.join("admin.realm");
    let labels = cwd.join("labels.json");
    std::fs::write(
        &admin,
        serde_json::json!({
            "format_version": 1,
            "schema": [{
                "name": "RealmFile",
                "properties": {
                    "path": {"type": "string", "indexed": true, "optional": false},
                    "syncLabel": {"type": "string", "indexed": false, "optional": true}
                },
                "primaryKey": "path"
            }],
            "objects": {
                "RealmFile": [
                    {"key": 0, "values": {
                        "path": {"kind": "string", "value": "/a"},
                        "syncLabel": {"kind": "null"}
                    }}
                ]
            }
        })
        .to_string(),
    )
    .expect("admin realm");
    std::fs::write(&labels, r#"{"/a": "gold"}"#).expect("labels");

    let output = random_realms(
        &cwd,
        &[
            "migrate-labels",
            "--admin-realm",
            admin.to_str().expect("utf-8 path"),
            "--labels-path",
            labels.to_str().expect("utf-8 path"),
        ],
    );
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert!(String::from_utf8_lossy(&output.stdout).contains("Found 1 Realm files"));

    let dump = random_realms(&cwd, &["dump", admin.to_str().expect("utf-8 path")]);
    let dump: serde_json::Value = serde_json::from_slice(&dump.stdout).expect("dump json");
    assert_eq!(dump["RealmFile"][0]["syncLabel"], "gold");
}

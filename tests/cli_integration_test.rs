//! Command-line behaviour of the `sigmap` binary.

use assert_cmd::Command;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

const RECORDS: &str = r#"[
    {"name": "Child", "parent_name": "Base", "methods": [
        {"name": "save", "parameters": [{"name": "entity"}]}
    ]},
    {"name": "Base", "methods": [
        {"name": "save", "parameters": [
            {"name": "entity", "type": {"qualified": ["App", "Entity"]}}
        ]}
    ]}
]"#;

fn records_file(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("classes.json");
    fs::write(&path, RECORDS).unwrap();
    path
}

fn sigmap(dir: &TempDir) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_sigmap"));
    cmd.current_dir(dir.path()).env("SIGMAP_QUIET", "1");
    cmd
}

#[test]
fn test_json_report_from_class_records() {
    let dir = TempDir::new().unwrap();
    let records = records_file(&dir);

    let output = sigmap(&dir)
        .args(["scan", "--input-json", "--format", "json"])
        .arg(&records)
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["summary"]["classes"], 2);
    assert_eq!(json["reports"][0]["ancestor_class"], "Base");
    assert_eq!(json["reports"][0]["kind"], "parameter_nullability_mismatch");
}

#[test]
fn test_strict_mode_exits_with_failure() {
    let dir = TempDir::new().unwrap();
    let records = records_file(&dir);

    sigmap(&dir)
        .args(["scan", "--input-json", "--strict", "--color", "never"])
        .arg(&records)
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_ignored_kind_in_config_clears_strict_failure() {
    let dir = TempDir::new().unwrap();
    let records = records_file(&dir);
    fs::write(
        dir.path().join(".sigmap.toml"),
        "[analysis]\nignore_kinds = [\"parameter_nullability_mismatch\"]\n",
    )
    .unwrap();

    sigmap(&dir)
        .args(["scan", "--input-json", "--strict", "--format", "markdown"])
        .arg(&records)
        .assert()
        .success();
}

#[test]
fn test_init_refuses_to_overwrite() {
    let dir = TempDir::new().unwrap();

    sigmap(&dir).arg("init").assert().success();
    assert!(dir.path().join(".sigmap.toml").exists());

    sigmap(&dir).arg("init").assert().failure();
    sigmap(&dir).args(["init", "--force"]).assert().success();
}

//! Integration tests for the dialect-opgen CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const OPS_YAML: &str = r#"
- name: add
  inputs:
    - {name: x, typename: Tensor}
    - {name: y, typename: Tensor}
  outputs:
    - {name: out, typename: Tensor}
  attrs: []
"#;

fn fixture_dir() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("ops.yaml"), OPS_YAML).unwrap();
    fs::write(dir.path().join("op_compat.yaml"), "- op : add\n").unwrap();
    dir
}

#[test]
fn test_help() {
    let mut cmd = Command::cargo_bin("dialect-opgen").unwrap();
    cmd.arg("--help");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("--op-yaml-files"))
        .stdout(predicate::str::contains("--op-def-h-file"));
}

#[test]
fn test_version() {
    let mut cmd = Command::cargo_bin("dialect-opgen").unwrap();
    cmd.arg("--version");

    cmd.assert()
        .success()
        .stdout(predicate::str::contains("dialect-opgen"));
}

#[test]
fn test_generates_both_artifacts() {
    let dir = fixture_dir();
    let h = dir.path().join("pd_op.h");
    let cc = dir.path().join("pd_op.cc");

    let mut cmd = Command::cargo_bin("dialect-opgen").unwrap();
    cmd.arg("--op-yaml-files")
        .arg(dir.path().join("ops.yaml"))
        .arg("--op-compat-yaml-file")
        .arg(dir.path().join("op_compat.yaml"))
        .arg("--namespaces")
        .arg("paddle,dialect")
        .arg("--op-def-h-file")
        .arg(&h)
        .arg("--op-def-cc-file")
        .arg(&cc)
        .arg("--quiet");

    cmd.assert().success();

    let header = fs::read_to_string(&h).unwrap();
    assert!(header.contains("class AddOp"));
    let source = fs::read_to_string(&cc).unwrap();
    assert!(source.contains("AddOp::Verify"));
}

#[test]
fn test_missing_schema_file_fails() {
    let dir = fixture_dir();

    let mut cmd = Command::cargo_bin("dialect-opgen").unwrap();
    cmd.arg("--op-yaml-files")
        .arg("/nonexistent/ops.yaml")
        .arg("--op-compat-yaml-file")
        .arg(dir.path().join("op_compat.yaml"))
        .arg("--op-def-h-file")
        .arg(dir.path().join("pd_op.h"))
        .arg("--op-def-cc-file")
        .arg(dir.path().join("pd_op.cc"))
        .arg("--quiet");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Failed to parse schema document"));
}

#[test]
fn test_unsupported_type_names_the_operator() {
    let dir = fixture_dir();
    fs::write(
        dir.path().join("bad_ops.yaml"),
        "- name: lookup\n  inputs:\n    - {name: table, typename: SelectedRows}\n  outputs: []\n  attrs: []\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("dialect-opgen").unwrap();
    cmd.arg("--op-yaml-files")
        .arg(dir.path().join("bad_ops.yaml"))
        .arg("--op-compat-yaml-file")
        .arg(dir.path().join("op_compat.yaml"))
        .arg("--op-def-h-file")
        .arg(dir.path().join("pd_op.h"))
        .arg("--op-def-cc-file")
        .arg(dir.path().join("pd_op.cc"))
        .arg("--quiet");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("lookup"))
        .stderr(predicate::str::contains("SelectedRows"));
}

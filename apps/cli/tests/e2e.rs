//! End-to-end tests for the leetlog CLI.
//!
//! Tests invoke the `leetlog` binary as a subprocess inside a scratch
//! directory. None of them reach the real metadata service: the config points
//! the endpoint at a closed local port.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const CATALOG: &str = include_str!("../../../fixtures/catalog.md");

const OFFLINE_CONFIG: &str = "\
[api]
endpoint = \"http://127.0.0.1:9/graphql\"
timeout_secs = 2
";

fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("leetlog-e2e-{}", uuid::Uuid::now_v7()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn leetlog_in(dir: &Path) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_leetlog"));
    cmd.current_dir(dir).env_remove("LEETLOG_CONFIG").env_remove("RUST_LOG");
    cmd
}

fn offline_workspace() -> PathBuf {
    let dir = scratch_dir();
    std::fs::write(dir.join("leetlog.toml"), OFFLINE_CONFIG).unwrap();
    std::fs::write(dir.join("README.md"), CATALOG).unwrap();
    dir
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).into_owned()
}

#[test]
fn update_fails_without_document() {
    let dir = scratch_dir();
    let output = leetlog_in(&dir)
        .args(["update", "--readme", "MISSING.md", "a.cpp"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    assert!(stderr(&output).contains("not found"), "stderr: {}", stderr(&output));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn coverage_fails_without_document() {
    let dir = scratch_dir();
    let output = leetlog_in(&dir)
        .args(["coverage", "--readme", "MISSING.md"])
        .output()
        .unwrap();
    assert!(!output.status.success());
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn config_init_refuses_to_overwrite() {
    let dir = scratch_dir();

    let first = leetlog_in(&dir).args(["config", "init"]).output().unwrap();
    assert!(first.status.success(), "stderr: {}", stderr(&first));
    assert!(dir.join("leetlog.toml").exists());

    let second = leetlog_in(&dir).args(["config", "init"]).output().unwrap();
    assert!(!second.status.success());

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn config_show_applies_readme_override() {
    let dir = offline_workspace();
    let output = leetlog_in(&dir)
        .args(["config", "show", "--readme", "docs/CATALOG.md"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let shown = stdout(&output);
    assert!(shown.contains("docs/CATALOG.md"));
    assert!(shown.contains("127.0.0.1:9"));
    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn update_skips_unknown_extension_without_writing() {
    let dir = offline_workspace();
    std::fs::create_dir_all(dir.join("algorithms/notes")).unwrap();
    std::fs::write(dir.join("algorithms/notes/readme.txt"), "notes\n").unwrap();

    let output = leetlog_in(&dir)
        .args(["update", "algorithms/notes/readme.txt"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Skipped:   1"));
    assert_eq!(std::fs::read_to_string(dir.join("README.md")).unwrap(), CATALOG);

    std::fs::remove_dir_all(&dir).ok();
}

#[test]
fn coverage_degrades_when_service_unreachable() {
    let dir = offline_workspace();

    let output = leetlog_in(&dir).arg("coverage").output().unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("unavailable"));

    let updated = std::fs::read_to_string(dir.join("README.md")).unwrap();
    assert!(updated.contains("<!-- coverage:start -->"));
    assert!(updated.contains("| **Total** | **4** | **N/A** | **N/A** |"));

    let again = leetlog_in(&dir).arg("coverage").output().unwrap();
    assert!(again.status.success());
    assert_eq!(std::fs::read_to_string(dir.join("README.md")).unwrap(), updated);

    std::fs::remove_dir_all(&dir).ok();
}

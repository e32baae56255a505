//! Integration tests for `mcphub init`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::PathBuf;

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

/// A temp home plus a project directory named `weather-server` inside it.
fn project() -> (TempDir, PathBuf) {
    let home = TempDir::new().expect("temp dir");
    let dir = home.path().join("weather-server");
    std::fs::create_dir(&dir).expect("project dir");
    (home, dir)
}

fn mcphub(home: &TempDir, cwd: &PathBuf) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mcphub"));
    cmd.env("NO_COLOR", "1")
        .env("HOME", home.path())
        .env("MCPHUB_CONFIG", home.path().join("config.yaml"))
        .current_dir(cwd);
    cmd
}

fn read_manifest(dir: &std::path::Path) -> serde_json::Value {
    let text = std::fs::read_to_string(dir.join("mcp.json")).expect("mcp.json");
    serde_json::from_str(&text).expect("valid JSON")
}

#[test]
fn test_init_yes_writes_default_manifest() {
    let (home, dir) = project();
    mcphub(&home, &dir)
        .args(["init", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created"));

    let manifest = read_manifest(&dir);
    assert_eq!(manifest["name"], "weather-server");
    assert_eq!(manifest["version"], "1.0.0");
    assert_eq!(manifest["license"], "MIT");
    assert_eq!(manifest["repository"]["type"], "git");
    assert_eq!(manifest["run"]["command"], "node");
    assert_eq!(manifest["run"]["args"], serde_json::json!(["index.js"]));
    assert_eq!(manifest["run"]["port"], 5050);
}

#[test]
fn test_init_uses_two_space_indentation() {
    let (home, dir) = project();
    mcphub(&home, &dir).args(["init", "--yes"]).assert().success();

    let text = std::fs::read_to_string(dir.join("mcp.json")).unwrap();
    assert!(text.contains("\n  \"name\": \"weather-server\""), "{text}");
    assert!(text.ends_with('\n'));
}

#[test]
fn test_init_refuses_to_overwrite_without_force() {
    let (home, dir) = project();
    std::fs::write(dir.join("mcp.json"), "{\"name\": \"keep-me\"}").unwrap();

    mcphub(&home, &dir)
        .args(["init", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--force"));

    let text = std::fs::read_to_string(dir.join("mcp.json")).unwrap();
    assert!(text.contains("keep-me"));
}

#[test]
fn test_init_force_overwrites_existing_file() {
    let (home, dir) = project();
    std::fs::write(dir.join("mcp.json"), "{\"name\": \"old\"}").unwrap();

    mcphub(&home, &dir)
        .args(["init", "--yes", "--force"])
        .assert()
        .success();

    assert_eq!(read_manifest(&dir)["name"], "weather-server");
}

#[test]
fn test_init_json_reports_manifest() {
    let (home, dir) = project();
    let output = mcphub(&home, &dir)
        .args(["--json", "--yes", "init"])
        .output()
        .expect("run mcphub");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["manifest"]["name"], "weather-server");
    assert!(value["path"].as_str().unwrap().ends_with("mcp.json"));
}

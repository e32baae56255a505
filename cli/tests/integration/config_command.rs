//! Integration tests for `mcphub config` command.
//!
//! All filesystem-touching tests set `MCPHUB_CONFIG` and `HOME` to a temp
//! directory so they never read or write `~/.mcphub/config.yaml`.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

fn mcphub(home: &TempDir) -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("mcphub"));
    cmd.env("NO_COLOR", "1").env("HOME", home.path());
    cmd
}

/// Returns a `TempDir` and the path string for a config file inside it.
fn temp_config_path() -> (TempDir, String) {
    let dir = TempDir::new().expect("temp dir");
    let path = dir
        .path()
        .join("config.yaml")
        .to_string_lossy()
        .into_owned();
    (dir, path)
}

// ---------------------------------------------------------------------------
// Subcommand registration
// ---------------------------------------------------------------------------

#[test]
fn test_config_help_shows_show_and_set_subcommands() {
    let (dir, _) = temp_config_path();
    mcphub(&dir)
        .args(["config", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("set"));
}

// ---------------------------------------------------------------------------
// `mcphub config show`
// ---------------------------------------------------------------------------

#[test]
fn test_config_show_without_file_uses_defaults() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "show"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("storage.backend"))
        .stdout(predicate::str::contains("docker"))
        .stdout(predicate::str::contains("mcp-servers"));
}

#[test]
fn test_config_show_displays_env_var_labels() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "show"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("MCPHUB_CONFIG"))
        .stdout(predicate::str::contains("MCPHUB_LOG"));
}

#[test]
fn test_config_show_does_not_create_file() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "show"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .success();
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_show_json_resolves_paths_under_home() {
    let (dir, path) = temp_config_path();
    let output = mcphub(&dir)
        .args(["config", "show", "--json"])
        .env("MCPHUB_CONFIG", &path)
        .output()
        .expect("run mcphub");
    assert!(output.status.success());

    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["config"]["storage"]["backend"], "fs");
    assert_eq!(value["config"]["limits"]["max_archive_mb"], 100);
    let work_root = value["resolved"]["work_root"].as_str().unwrap();
    assert!(work_root.ends_with("work"), "{work_root}");
    assert!(work_root.contains(".mcphub"), "{work_root}");
}

// ---------------------------------------------------------------------------
// `mcphub config set`
// ---------------------------------------------------------------------------

#[test]
fn test_config_set_writes_value() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "set", "storage.backend", "s3"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("Set storage.backend = s3"));

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("backend: s3"), "{content}");
}

#[test]
fn test_config_set_then_show_reflects_change() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "set", "engine.program", "podman"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .success();

    mcphub(&dir)
        .args(["config", "show"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .success()
        .stdout(predicate::str::contains("podman"));
}

#[test]
fn test_config_set_preserves_other_values() {
    let (dir, path) = temp_config_path();
    for (key, value) in [("limits.max_archive_mb", "250"), ("storage.bucket", "team")] {
        mcphub(&dir)
            .args(["config", "set", key, value])
            .env("MCPHUB_CONFIG", &path)
            .assert()
            .success();
    }

    let content = std::fs::read_to_string(&path).unwrap();
    assert!(content.contains("max_archive_mb: 250"), "{content}");
    assert!(content.contains("bucket: team"), "{content}");
}

#[test]
fn test_config_set_unknown_key_fails() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "set", "security.level", "strict"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Unknown setting"));
    assert!(!std::path::Path::new(&path).exists());
}

#[test]
fn test_config_set_invalid_backend_fails() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "set", "storage.backend", "ftp"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid value"));
}

#[test]
fn test_config_set_zero_archive_limit_fails() {
    let (dir, path) = temp_config_path();
    mcphub(&dir)
        .args(["config", "set", "limits.max_archive_mb", "0"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .failure();
}

#[test]
fn test_config_set_json_reports_key_and_value() {
    let (dir, path) = temp_config_path();
    let output = mcphub(&dir)
        .args(["--json", "config", "set", "storage.bucket", "shared"])
        .env("MCPHUB_CONFIG", &path)
        .output()
        .expect("run mcphub");
    assert!(output.status.success());
    let value: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(value["key"], "storage.bucket");
    assert_eq!(value["value"], "shared");
}

#[test]
fn test_config_unparseable_file_reports_error() {
    let (dir, path) = temp_config_path();
    std::fs::write(&path, "storage: [not, a, map").unwrap();
    mcphub(&dir)
        .args(["config", "show"])
        .env("MCPHUB_CONFIG", &path)
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot parse"));
}

//! Integration tests for the repo-sync CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

/// Test CLI binary exists and responds to --help
#[test]
fn test_cli_help() {
    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Synchronize a local directory tree"));
}

/// Test CLI responds to --version
#[test]
fn test_cli_version() {
    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("repo-sync"));
}

/// Test invalid subcommand shows error
#[test]
fn test_invalid_subcommand() {
    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.arg("invalid-command")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error"));
}

/// A sync without a token fails before touching the network
#[test]
fn test_sync_requires_token() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("manifest.txt");
    fs::write(&manifest, "*.proto\n").unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("GITHUB_TOKEN")
        .args(["sync", "--owner", "acme", "--repository", "widgets"])
        .args(["--from-dir", "."])
        .args(["--to-dir", "src"])
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("access token missing"));
}

/// A missing manifest is a fatal configuration error
#[test]
fn test_sync_rejects_missing_manifest() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["sync", "--owner", "acme", "--repository", "widgets"])
        .args(["--token", "dummy-token"])
        .args(["--from-dir", "."])
        .args(["--to-dir", "src"])
        .args(["--manifest", "no-such-manifest.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("manifest"));
}

/// A missing source directory is a fatal configuration error
#[test]
fn test_sync_rejects_missing_source_dir() {
    let temp_dir = TempDir::new().unwrap();
    let manifest = temp_dir.path().join("manifest.txt");
    fs::write(&manifest, "*.proto\n").unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["sync", "--owner", "acme", "--repository", "widgets"])
        .args(["--token", "dummy-token"])
        .args(["--from-dir", "missing-dir"])
        .args(["--to-dir", "src"])
        .arg("--manifest")
        .arg(&manifest)
        .assert()
        .failure()
        .stderr(predicate::str::contains("does not exist"));
}

/// Owner and repository can come from a config file instead of flags
#[test]
fn test_sync_reads_owner_from_config_file() {
    let temp_dir = TempDir::new().unwrap();
    // Only the owner is configured, so resolution proceeds past it and
    // fails on the missing repository.
    fs::write(temp_dir.path().join("repo-sync.toml"), "owner = \"acme\"\n").unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .env_remove("GITHUB_TOKEN")
        .args(["sync", "--from-dir", ".", "--to-dir", "src"])
        .args(["--manifest", "manifest.txt"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("repository name missing"));
}

/// Test config init writes the template
#[test]
fn test_config_init_writes_template() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .success();

    let config_path = temp_dir.path().join("repo-sync.toml");
    assert!(config_path.exists());

    let content = fs::read_to_string(&config_path).unwrap();
    assert!(content.contains("base_branch"));
    assert!(content.contains("[bot]"));

    // A second init refuses to overwrite
    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "init"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

/// Test config show renders the merged settings
#[test]
fn test_config_show() {
    let temp_dir = TempDir::new().unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_branch = \"main\""));

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "show", "--format", "json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"base_branch\": \"main\""));
}

/// Test config file overrides surface in config show
#[test]
fn test_config_show_merges_file() {
    let temp_dir = TempDir::new().unwrap();
    fs::write(
        temp_dir.path().join("repo-sync.toml"),
        "base_branch = \"develop\"\n",
    )
    .unwrap();

    let mut cmd = Command::cargo_bin("repo-sync").unwrap();
    cmd.current_dir(temp_dir.path())
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("base_branch = \"develop\""));
}

//! End-to-end tests for the obsidian-mcp binary

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::tempdir;

fn obsidian_mcp(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("obsidian-mcp").unwrap();
    cmd.current_dir(dir)
        .env_remove("OBSIDIAN_API_KEY")
        .env_remove("OBSIDIAN_ENV_FILE")
        .env_remove("OBSIDIAN_PORT")
        .env_remove("OBSIDIAN_PROTOCOL");
    cmd
}

const SESSION: &str = concat!(
    r#"{"jsonrpc":"2.0","id":1,"method":"initialize","params":{}}"#,
    "\n",
    r#"{"jsonrpc":"2.0","method":"notifications/initialized"}"#,
    "\n",
    r#"{"jsonrpc":"2.0","id":2,"method":"tools/list"}"#,
    "\n",
);

#[test]
fn test_missing_api_key_fails() {
    let dir = tempdir().unwrap();

    obsidian_mcp(dir.path())
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OBSIDIAN_API_KEY"));
}

#[test]
fn test_invalid_port_fails() {
    let dir = tempdir().unwrap();

    obsidian_mcp(dir.path())
        .env("OBSIDIAN_API_KEY", "secret")
        .env("OBSIDIAN_PORT", "not-a-port")
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("OBSIDIAN_PORT"));
}

#[test]
fn test_lists_tools_over_stdio() {
    let dir = tempdir().unwrap();

    obsidian_mcp(dir.path())
        .env("OBSIDIAN_API_KEY", "secret")
        .write_stdin(SESSION)
        .assert()
        .success()
        .stdout(predicate::str::contains("\"protocolVersion\":\"2024-11-05\""))
        .stdout(predicate::str::contains("obsidian_read_note"))
        .stdout(predicate::str::contains("obsidian_open_note"));
}

#[test]
fn test_reads_api_key_from_env_file() {
    let dir = tempdir().unwrap();
    let env_file = dir.path().join("vault.env");
    fs::write(&env_file, "OBSIDIAN_API_KEY=from-file\n").unwrap();

    obsidian_mcp(dir.path())
        .arg("--env-file")
        .arg(&env_file)
        .write_stdin(SESSION)
        .assert()
        .success()
        .stdout(predicate::str::contains("obsidian_search"));
}

#[test]
fn test_missing_env_file_fails() {
    let dir = tempdir().unwrap();

    obsidian_mcp(dir.path())
        .env("OBSIDIAN_API_KEY", "secret")
        .args(["--env-file", "does-not-exist.env"])
        .write_stdin("")
        .assert()
        .failure()
        .stderr(predicate::str::contains("does-not-exist.env"));
}

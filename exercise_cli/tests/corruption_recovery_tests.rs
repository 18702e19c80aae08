//! Corruption handling tests for extrack.
//!
//! These tests verify the system handles:
//! - Corrupted user documents (refuses to overwrite them)
//! - Empty documents
//! - Missing data directories

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("extrack"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

#[test]
fn test_corrupted_store_is_reported_and_preserved() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let users_path = data_dir.join("users.json");
    fs::write(&users_path, "{ invalid json }}}}").expect("Failed to write corrupted store");

    cli()
        .arg("users")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure()
        .stderr(predicate::str::contains("JSON error"));

    cli()
        .arg("new-user")
        .arg("alice")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .failure();

    // The corrupted document is left for manual recovery
    let content = fs::read_to_string(&users_path).unwrap();
    assert_eq!(content, "{ invalid json }}}}");
}

#[test]
fn test_empty_store_file_is_empty_store() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    fs::write(data_dir.join("users.json"), "").unwrap();

    cli()
        .arg("users")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));

    cli()
        .arg("new-user")
        .arg("alice")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success();
}

#[test]
fn test_missing_data_dir_lists_nothing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().join("does/not/exist");

    cli()
        .arg("users")
        .arg("--data-dir")
        .arg(&data_dir)
        .assert()
        .success()
        .stdout(predicate::str::contains("[]"));

    // Reading does not create the directory
    assert!(!data_dir.exists());
}

//! Concurrency tests for extrack.
//!
//! These tests verify that multiple processes can safely:
//! - Create users against the same store simultaneously (file locking)
//! - Append to different users without clobbering each other
//! - Read while others write

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn cli() -> Command {
    Command::new(assert_cmd::cargo::cargo_bin!("extrack"))
}

fn setup_test_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp dir")
}

fn run_json(data_dir: &Path, args: &[&str]) -> Value {
    let output = cli()
        .args(args)
        .arg("--data-dir")
        .arg(data_dir)
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();
    serde_json::from_slice(&output).expect("stdout should be JSON")
}

#[test]
fn test_concurrent_user_creation() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let handles: Vec<_> = (0..5)
        .map(|i| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                run_json(&data_dir, &["new-user", &format!("user{}", i)]);
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    let users = run_json(&data_dir, &["users"]);
    assert_eq!(
        users.as_array().unwrap().len(),
        5,
        "Expected 5 users, got {}",
        users
    );
}

#[test]
fn test_concurrent_appends_to_different_users() {
    let temp_dir = setup_test_dir();
    let data_dir: PathBuf = temp_dir.path().to_path_buf();

    let ids: Vec<String> = (0..3)
        .map(|i| {
            run_json(&data_dir, &["new-user", &format!("user{}", i)])["id"]
                .as_str()
                .unwrap()
                .to_string()
        })
        .collect();

    let handles: Vec<_> = ids
        .iter()
        .cloned()
        .map(|id| {
            let data_dir = data_dir.clone();
            thread::spawn(move || {
                for day in 1..=3 {
                    let date = format!("2023-01-0{}", day);
                    run_json(
                        &data_dir,
                        &[
                            "add",
                            "--user-id",
                            &id,
                            "--description",
                            "run",
                            "--duration",
                            "10",
                            "--date",
                            &date,
                        ],
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().expect("thread panicked");
    }

    for id in &ids {
        let log = run_json(&data_dir, &["log", "--user-id", id]);
        assert_eq!(log["count"], 3, "user {} lost entries", id);
    }
}

#[test]
fn test_reads_while_writing() {
    let temp_dir = setup_test_dir();
    let data_dir = temp_dir.path().to_path_buf();

    let id = run_json(&data_dir, &["new-user", "alice"])["id"]
        .as_str()
        .unwrap()
        .to_string();

    let writer_dir = data_dir.clone();
    let writer_id = id.clone();
    let writer = thread::spawn(move || {
        for i in 0..5u64 {
            thread::sleep(Duration::from_millis(i * 5));
            run_json(
                &writer_dir,
                &[
                    "add",
                    "--user-id",
                    &writer_id,
                    "--description",
                    "swim",
                    "--duration",
                    "15",
                ],
            );
        }
    });

    // Readers always see a complete document
    for _ in 0..5 {
        let log = run_json(&data_dir, &["log", "--user-id", &id]);
        let count = log["count"].as_u64().unwrap();
        assert_eq!(count as usize, log["log"].as_array().unwrap().len());
    }

    writer.join().expect("writer panicked");

    let log = run_json(&data_dir, &["log", "--user-id", &id]);
    assert_eq!(log["count"], 5);
}

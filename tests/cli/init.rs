//! Tests for `warren init`.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_init_creates_config_and_store() {
    let t = Test::new();

    let output = t.init_cmd();
    assert_success(&output);
    assert_stdout_contains(&output, "initialized");

    assert!(t.config_path().is_file());
    assert!(t.store_path().is_dir());

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(config.contains("[warren]"));
    assert!(config.contains("[root]"));
}

#[test]
fn test_init_twice_fails() {
    let t = Test::init();

    t.cmd()
        .arg("init")
        .assert()
        .failure()
        .stderr(predicate::str::contains("already initialized"));
}

#[test]
fn test_commands_before_init_hint_at_init() {
    let t = Test::new();

    t.cmd()
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("not initialized"))
        .stdout(predicate::str::contains("warren init"));
}

#[test]
fn test_explicit_config_flag_wins() {
    let t = Test::new();
    let other = t.path("elsewhere/config.toml");

    t.cmd()
        .arg("--config")
        .arg(&other)
        .args(["init", "--store"])
        .arg(t.path("other-store"))
        .assert()
        .success();

    assert!(other.is_file());
    assert!(!t.config_path().exists());
}

#[test]
fn test_completions() {
    let t = Test::new();

    t.cmd()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("warren"));
}

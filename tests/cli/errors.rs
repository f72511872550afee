//! Error reporting and exit codes.

use crate::support::*;
use predicates::prelude::*;

#[test]
fn test_errors_exit_with_code_one() {
    let t = Test::init();

    t.cmd().args(["show", "missing"]).assert().code(1);
}

#[test]
fn test_invalid_paths_rejected() {
    let t = Test::init();

    for bad in ["a//b", "a/../b", "//"] {
        t.cmd()
            .args(["insert", bad, "v"])
            .assert()
            .failure()
            .stderr(predicate::str::contains("invalid path"));
    }
}

#[test]
fn test_insert_trailing_slash_rejected() {
    let t = Test::init();

    t.cmd()
        .args(["insert", "dir/", "v"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("cannot end with '/'"));
}

#[test]
fn test_malformed_config_reported() {
    let t = Test::new();
    std::fs::write(t.config_path(), "this is = = not toml").unwrap();

    t.cmd()
        .arg("ls")
        .assert()
        .failure()
        .stderr(predicate::str::contains("failed to parse config"));
}

#[test]
fn test_verbose_logs_to_stderr() {
    let t = Test::with_secrets(&[("a", "1")]);

    t.cmd()
        .args(["--verbose", "ls"])
        .assert()
        .success()
        .stderr(predicate::str::contains("namespace tree built"));
}

#[test]
fn test_log_env_overrides_verbose() {
    let t = Test::with_secrets(&[("a", "1")]);

    t.cmd()
        .env("WARREN_LOG", "off")
        .args(["--verbose", "ls"])
        .assert()
        .success()
        .stderr(predicate::str::is_empty());
}

//! Tests for `warren mounts` and cross-mount operations.

use crate::support::*;
use predicates::prelude::*;

fn with_work_mount(secrets: &[(&str, &str)]) -> Test {
    let t = Test::with_secrets(secrets);
    let work = t.path("work");
    let output = t
        .cmd()
        .args(["mounts", "add", "work"])
        .arg(&work)
        .output()
        .expect("failed to run warren mounts add");
    assert_success(&output);
    t
}

#[test]
fn test_mounts_add_and_list() {
    let t = with_work_mount(&[]);

    let output = t.run(&["mounts", "list"]);
    assert_success(&output);
    assert_stdout_contains(&output, "work");
    assert_stdout_contains(&output, &t.path("work").display().to_string());

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(config.contains("[mounts.work]"));
}

#[test]
fn test_mounts_list_json() {
    let t = with_work_mount(&[]);

    let output = t.run(&["mounts", "list", "--json"]);
    assert_success(&output);
    let rows: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    let prefixes: Vec<&str> = rows
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["prefix"].as_str().unwrap())
        .collect();
    assert_eq!(prefixes, vec!["", "work"]);
}

#[test]
fn test_mounts_add_twice_fails() {
    let t = with_work_mount(&[]);

    t.cmd()
        .args(["mounts", "add", "work"])
        .arg(t.path("other"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("already mounted"));
}

#[test]
fn test_mount_over_secret_fails() {
    let t = Test::with_secrets(&[("work", "a secret")]);

    t.cmd()
        .args(["mounts", "add", "work"])
        .arg(t.path("work"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("work is a secret"));

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(!config.contains("[mounts.work]"));
}

#[test]
fn test_mount_below_secret_fails() {
    let t = Test::with_secrets(&[("work", "a secret")]);

    t.cmd()
        .args(["mounts", "add", "work/team"])
        .arg(t.path("team"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("work is a secret, not a directory"));

    let config = std::fs::read_to_string(t.config_path()).unwrap();
    assert!(!config.contains("work/team"));
    assert_eq!(t.keys(), vec!["work"]);
}

#[test]
fn test_insert_routes_to_mount() {
    let t = with_work_mount(&[]);

    assert_success(&t.insert("work/db/password", "s3cret"));
    assert!(t.path("work").join("db").join("password.secret").is_file());
    assert!(!t.store_path().join("work").exists());
}

#[test]
fn test_mv_across_mounts() {
    let t = with_work_mount(&[("home/wifi", "hunter2")]);

    assert_success(&t.run(&["mv", "home/wifi", "work/"]));

    assert_eq!(t.keys(), vec!["work/wifi"]);
    assert!(t.path("work").join("wifi.secret").is_file());
    assert!(!t.store_path().join("home").exists());
    assert_stdout_contains(&t.show("work/wifi"), "hunter2");
}

#[test]
fn test_mounts_rm_keeps_files() {
    let t = with_work_mount(&[]);
    assert_success(&t.insert("work/token", "t"));

    let output = t.run(&["mounts", "rm", "work"]);
    assert_success(&output);
    assert_stdout_contains(&output, "unmounted");

    assert!(t.keys().is_empty());
    assert!(t.path("work").join("token.secret").is_file());
}

#[test]
fn test_mounts_rm_unknown_fails() {
    let t = Test::init();

    t.cmd()
        .args(["mounts", "rm", "nope"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("no store mounted at nope"));
}

#[test]
fn test_sealed_mount_encrypts_at_rest() {
    let t = Test::with_secrets(&[("plain/token", "visible-value")]);

    t.cmd()
        .args(["mounts", "add", "vault", "--seal"])
        .arg(t.path("vault"))
        .assert()
        .success()
        .stdout(predicate::str::contains("generated identity"));

    assert_success(&t.run(&["mv", "plain/token", "vault/token"]));

    let on_disk = std::fs::read_to_string(t.path("vault").join("token.age")).unwrap();
    assert!(on_disk.contains("BEGIN AGE ENCRYPTED FILE"));
    assert!(!on_disk.contains("visible-value"));

    assert_eq!(stdout(&t.show("vault/token")), "visible-value\n");
    assert_eq!(t.keys(), vec!["vault/token"]);
}

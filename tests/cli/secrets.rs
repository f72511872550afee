//! Tests for `warren ls/show/insert/rm/mv/cp`.

use crate::support::*;
use predicates::prelude::*;

// Basic secret operations

#[test]
fn test_insert_and_show_roundtrip() {
    let t = Test::init();

    let output = t.insert("db/password", "hunter2");
    assert_success(&output);
    assert_stdout_contains(&output, "db/password");

    let output = t.show("db/password");
    assert_success(&output);
    assert_eq!(stdout(&output), "hunter2\n");

    assert!(t.store_path().join("db").join("password.secret").is_file());
}

#[test]
fn test_insert_from_stdin() {
    let t = Test::init();

    t.cmd()
        .args(["insert", "api/token"])
        .write_stdin("from-a-pipe\n")
        .assert()
        .success();

    t.cmd()
        .args(["show", "api/token"])
        .assert()
        .success()
        .stdout("from-a-pipe\n");
}

#[test]
fn test_insert_overwrite_requires_yes() {
    let t = Test::with_secrets(&[("k", "old")]);

    let output = t.insert("k", "new");
    assert_failure(&output);
    assert_stderr_contains(&output, "already exists");

    assert_success(&t.run(&["--yes", "insert", "k", "new"]));
    assert_stdout_contains(&t.show("k"), "new");
}

#[test]
fn test_insert_under_secret_fails() {
    let t = Test::with_secrets(&[("k", "v")]);

    let output = t.insert("k/child", "v");
    assert_failure(&output);
    assert_stderr_contains(&output, "k is a secret, not a directory");
}

#[test]
fn test_show_directory_fails() {
    let t = Test::with_secrets(&[("db/password", "x")]);

    let output = t.show("db");
    assert_failure(&output);
    assert_stderr_contains(&output, "db is a directory");
}

#[test]
fn test_show_missing_suggests() {
    let t = Test::with_secrets(&[("db/password", "x")]);

    let output = t.show("prod/password");
    assert_failure(&output);
    assert_stderr_contains(&output, "did you mean: db/password");
}

// Listing

#[test]
fn test_ls_lists_everything_in_order() {
    let t = Test::with_secrets(&[("b/y", "1"), ("a", "2"), ("b/x", "3")]);

    let output = t.run(&["ls"]);
    assert_success(&output);
    assert_stdout_contains(&output, "3 secrets:");
    assert_eq!(t.keys(), vec!["a", "b/x", "b/y"]);
}

#[test]
fn test_ls_prefix_and_depth() {
    let t = Test::with_secrets(&[("a/b/c", "1"), ("a/d", "2"), ("e", "3")]);

    let output = t.run(&["ls", "a", "--depth", "1"]);
    assert_success(&output);
    assert_stdout_contains(&output, "a/d");
    assert_stdout_excludes(&output, "a/b/c");
}

#[test]
fn test_ls_folders() {
    let t = Test::with_secrets(&[("a/b/c", "1"), ("d", "2")]);

    t.cmd()
        .args(["ls", "--folders", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a/b\"").and(predicate::str::contains("\"count\": 2")));
}

#[test]
fn test_ls_folders_under_prefix() {
    let t = Test::with_secrets(&[("a/b/c", "1"), ("d/e", "2")]);

    t.cmd()
        .args(["ls", "a", "--folders", "--json"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"a/b\"").and(predicate::str::contains("\"d\"").not()));

    t.cmd()
        .args(["ls", "a//b", "--folders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("invalid path"));

    t.cmd()
        .args(["ls", "missing", "--folders"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("not found: missing"));
}

#[test]
fn test_ls_hides_dot_entries_unless_asked() {
    let t = Test::with_secrets(&[(".meta/id", "1"), ("visible", "2")]);

    let output = t.run(&["ls"]);
    assert_stdout_excludes(&output, ".meta/id");

    let output = t.run(&["--hidden", "ls"]);
    assert_stdout_contains(&output, ".meta/id");
}

#[test]
fn test_ls_empty() {
    let t = Test::init();

    t.cmd()
        .arg("ls")
        .assert()
        .success()
        .stdout(predicate::str::contains("no secrets stored"));
}

// Move and copy

#[test]
fn test_mv_directory_into_existing_directory() {
    let t = Test::with_secrets(&[("foo/bar", "1"), ("foo/baz", "2"), ("misc/zab", "3")]);

    let output = t.run(&["mv", "foo", "misc"]);
    assert_success(&output);
    assert_stdout_contains(&output, "moved 2 secrets");

    assert_eq!(t.keys(), vec!["misc/foo/bar", "misc/foo/baz", "misc/zab"]);
    assert!(!t.store_path().join("foo").exists());
}

#[test]
fn test_mv_contents_to_root() {
    let t = Test::with_secrets(&[("boz/bar", "1"), ("boz/baz", "2")]);

    assert_success(&t.run(&["mv", "boz/", "/"]));
    assert_eq!(t.keys(), vec!["bar", "baz"]);
    assert!(!t.store_path().join("boz").exists());
}

#[test]
fn test_mv_directory_onto_secret_fails() {
    let t = Test::with_secrets(&[("foo/bar", "1"), ("misc/zab", "3")]);

    let output = t.run(&["mv", "foo", "misc/zab"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "misc/zab is a secret, not a directory");
    assert_eq!(t.keys(), vec!["foo/bar", "misc/zab"]);
}

#[test]
fn test_cp_keeps_source() {
    let t = Test::with_secrets(&[("foo/bar", "1")]);

    let output = t.run(&["cp", "foo/", "copy/"]);
    assert_success(&output);
    assert_stdout_contains(&output, "copied 1 secret");

    assert_eq!(t.keys(), vec!["copy/bar", "foo/bar"]);
    assert_stdout_contains(&t.show("copy/bar"), "1");
}

#[test]
fn test_mv_noop_reports_nothing_to_do() {
    let t = Test::with_secrets(&[("misc/foo/bar", "1")]);

    t.cmd()
        .args(["mv", "misc/foo", "misc/"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to move"));
}

// Delete

#[test]
fn test_rm_secret() {
    let t = Test::with_secrets(&[("a/b", "1"), ("c", "2")]);

    assert_success(&t.run(&["rm", "a/b"]));
    assert_eq!(t.keys(), vec!["c"]);
    assert!(!t.store_path().join("a").exists());
}

#[test]
fn test_rm_directory_needs_recursive() {
    let t = Test::with_secrets(&[("a/b", "1")]);

    let output = t.run(&["rm", "a"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "a is a directory");
    assert_stdout_contains(&output, "rm -r");
}

#[test]
fn test_rm_recursive_without_terminal_needs_yes() {
    let t = Test::with_secrets(&[("a/b", "1"), ("a/c", "2")]);

    let output = t.run(&["rm", "-r", "a"]);
    assert_failure(&output);
    assert_stderr_contains(&output, "--yes");
    assert_eq!(t.keys(), vec!["a/b", "a/c"]);

    let output = t.run(&["-y", "rm", "-r", "a"]);
    assert_success(&output);
    assert_stdout_contains(&output, "deleted 2 secrets");
    assert!(t.keys().is_empty());
}

#[test]
fn test_rm_missing_is_noop() {
    let t = Test::with_secrets(&[("a", "1")]);

    t.cmd()
        .args(["rm", "nothing"])
        .assert()
        .success()
        .stdout(predicate::str::contains("nothing to delete"));
}

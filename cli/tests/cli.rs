// Copyright 2024 The mintvcs Authors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
// https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Subprocess-level tests of the external command contract: these drive the
//! compiled `mintvcs` binary the same way a user's shell would, rather than
//! calling into `mintvcs-lib` directly.

use assert_cmd::Command;
use predicates::prelude::*;

fn mintvcs(dir: &std::path::Path) -> Command {
    let mut cmd = Command::cargo_bin("mintvcs").unwrap();
    cmd.current_dir(dir);
    cmd.env("MINTVCS_AUTHOR_NAME", "Test User");
    cmd.env("MINTVCS_AUTHOR_EMAIL", "test@example.com");
    cmd
}

#[test]
fn init_reports_repository_path() {
    let dir = tempfile::tempdir().unwrap();
    mintvcs(dir.path())
        .arg("init")
        .assert()
        .success()
        .stdout(predicate::str::contains("Initialized empty mintvcs repository"));
}

#[test]
fn commands_outside_a_repository_fail_with_exit_code_one() {
    let dir = tempfile::tempdir().unwrap();
    mintvcs(dir.path())
        .arg("status")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("not a mintvcs repository"));
}

#[test]
fn add_commit_and_log_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    mintvcs(dir.path()).arg("init").assert().success();
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

    mintvcs(dir.path())
        .args(["add", "a.txt"])
        .assert()
        .success()
        .stdout(predicate::str::contains("staged 1 path"));

    mintvcs(dir.path())
        .args(["commit", "-m", "first commit"])
        .assert()
        .success()
        .stdout(predicate::str::contains("created commit"));

    mintvcs(dir.path())
        .arg("log")
        .assert()
        .success()
        .stdout(predicate::str::contains("first commit"));
}

#[test]
fn status_reports_untracked_and_staged_files() {
    let dir = tempfile::tempdir().unwrap();
    mintvcs(dir.path()).arg("init").assert().success();
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();

    mintvcs(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Untracked"))
        .stdout(predicate::str::contains("a.txt"));

    mintvcs(dir.path()).args(["add", "a.txt"]).assert().success();
    mintvcs(dir.path())
        .arg("status")
        .assert()
        .success()
        .stdout(predicate::str::contains("Staged"));
}

#[test]
fn hash_object_without_write_works_outside_a_repository() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    mintvcs(dir.path())
        .args(["hash-object", "a.txt"])
        .assert()
        .success();
}

#[test]
fn branch_create_list_and_checkout() {
    let dir = tempfile::tempdir().unwrap();
    mintvcs(dir.path()).arg("init").assert().success();
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    mintvcs(dir.path()).args(["add", "a.txt"]).assert().success();
    mintvcs(dir.path())
        .args(["commit", "-m", "root"])
        .assert()
        .success();

    mintvcs(dir.path())
        .args(["branch", "create", "feature"])
        .assert()
        .success();

    mintvcs(dir.path())
        .args(["branch", "list"])
        .assert()
        .success()
        .stdout(predicate::str::contains("* main"))
        .stdout(predicate::str::contains("  feature"));

    mintvcs(dir.path())
        .args(["checkout", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("checked out"));
}

#[test]
fn merge_reports_already_up_to_date() {
    let dir = tempfile::tempdir().unwrap();
    mintvcs(dir.path()).arg("init").assert().success();
    std::fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    mintvcs(dir.path()).args(["add", "a.txt"]).assert().success();
    mintvcs(dir.path())
        .args(["commit", "-m", "root"])
        .assert()
        .success();
    mintvcs(dir.path())
        .args(["branch", "create", "feature"])
        .assert()
        .success();

    mintvcs(dir.path())
        .args(["merge", "feature"])
        .assert()
        .success()
        .stdout(predicate::str::contains("already up to date"));
}

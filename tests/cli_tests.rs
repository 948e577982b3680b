//! Integration tests for CLI

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const FIXTURE: &str = "<directory_structure>\nsrc/\n  main.rs\n  lib.rs\nREADME.md\n</directory_structure>\n<files>\n<file path=\"src/main.rs\">fn main() {}\n</file>\n<file path=\"src/lib.rs\">pub fn lib() {}\n</file>\n<file path=\"README.md\"># Demo\n</file>\n</files>\n";

fn write_fixture(dir: &TempDir) -> std::path::PathBuf {
    let path = dir.path().join("demo-digest.txt");
    fs::write(&path, FIXTURE).expect("write fixture");
    path
}

#[test]
fn test_cli_version() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("--version");
    cmd.assert().success().stdout(predicate::str::contains("repolens"));
}

#[test]
fn test_cli_help_lists_subcommands() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("--help");
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Browse repository digests"))
        .stdout(predicate::str::contains("list"))
        .stdout(predicate::str::contains("generate"))
        .stdout(predicate::str::contains("inspect"))
        .stdout(predicate::str::contains("show"))
        .stdout(predicate::str::contains("ask"));
}

#[test]
fn test_inspect_requires_name_or_file() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("inspect");
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Either a digest name or --file must be specified"));
}

#[test]
fn test_inspect_rejects_both_name_and_file() {
    let tmp = TempDir::new().expect("tmp");
    let fixture = write_fixture(&tmp);
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.args(["inspect", "stored.txt", "--file"]).arg(&fixture);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("Cannot specify both a digest name and --file"));
}

#[test]
fn test_inspect_local_digest_prints_tree() {
    let tmp = TempDir::new().expect("tmp");
    let fixture = write_fixture(&tmp);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("inspect").arg("--file").arg(&fixture);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("Files listed: 3"))
        .stdout(predicate::str::contains("src/"))
        .stdout(predicate::str::contains("main.rs"))
        .stdout(predicate::str::contains("README.md"));
}

#[test]
fn test_inspect_json_reports_counts_and_paths() {
    let tmp = TempDir::new().expect("tmp");
    let fixture = write_fixture(&tmp);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("inspect").arg("--json").arg("--file").arg(&fixture);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("\"files_listed\": 3"))
        .stdout(predicate::str::contains("src/main.rs"));
}

#[test]
fn test_inspect_unstructured_text_is_soft() {
    let tmp = TempDir::new().expect("tmp");
    let path = tmp.path().join("notes.txt");
    fs::write(&path, "these are not the tags you are looking for").expect("write");

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("inspect").arg("--file").arg(&path);
    cmd.assert()
        .success()
        .stderr(predicate::str::contains("not recognized as a structured digest"));
}

#[test]
fn test_show_prints_one_file_verbatim() {
    let tmp = TempDir::new().expect("tmp");
    let fixture = write_fixture(&tmp);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.args(["show", "--path", "src/main.rs", "--file"]).arg(&fixture);
    cmd.assert().success().stdout(predicate::str::contains("fn main() {}"));
}

#[test]
fn test_show_unknown_path_is_a_user_error() {
    let tmp = TempDir::new().expect("tmp");
    let fixture = write_fixture(&tmp);

    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.args(["show", "--path", "ghost.rs", "--file"]).arg(&fixture);
    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No file named ghost.rs"));
}

#[test]
fn test_ask_with_nothing_to_send_is_a_validation_error() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.arg("ask");
    cmd.assert().failure().stderr(predicate::str::contains("nothing to send"));
}

#[test]
fn test_ask_models_lists_the_catalog_offline() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.args(["ask", "--models"]);
    cmd.assert()
        .success()
        .stdout(predicate::str::contains("claude-sonnet-4-20250514"))
        .stdout(predicate::str::contains("/M in"));
}

#[test]
fn test_completions_emit_a_script() {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("repolens"));
    cmd.args(["completions", "bash"]);
    cmd.assert().success().stdout(predicate::str::contains("repolens"));
}

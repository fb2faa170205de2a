//! Integration tests for the jutge CLI

use assert_cmd::cargo;
use predicates::prelude::*;
use tempfile::TempDir;

use serde_json::Value;

use crate::common::fixtures;
use crate::common::server::{spawn_fake_jutge, spawn_jutge_with};

fn jutge() -> assert_cmd::Command {
    let mut cmd = assert_cmd::Command::new(cargo::cargo_bin!("jutge"));
    cmd.env_remove("JUTGE_API_URL");
    cmd
}

#[test]
fn test_version() {
    jutge()
        .arg("--version")
        .assert()
        .success()
        .stdout(predicate::str::contains("jutge"));
}

#[test]
fn test_version_json() {
    jutge()
        .args(["--json", "version"])
        .assert()
        .success()
        .stdout(predicate::str::contains("\"version\""));
}

#[test]
fn test_help() {
    jutge()
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("Jutge.org API"));
}

#[test]
fn test_no_args_shows_info() {
    jutge()
        .assert()
        .success()
        .stdout(predicate::str::contains("jutge --help"));
}

#[test]
fn test_json_and_yaml_conflict() {
    jutge().args(["--json", "--yaml", "version"]).assert().failure();
}

#[test]
fn test_convert_json_file_to_yaml() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("problem.json");
    std::fs::write(&path, r#"{"tags":["io","easy"],"title":"Suma"}"#).unwrap();

    jutge()
        .arg("convert")
        .arg("json-to-yaml")
        .arg(&path)
        .assert()
        .success()
        .stdout("tags:\n    - io\n    - easy\ntitle: Suma\n");
}

#[test]
fn test_convert_yaml_stdin_to_json() {
    jutge()
        .args(["convert", "yaml-to-json"])
        .write_stdin("a:\n    - 1\n    - two\n")
        .assert()
        .success()
        .stdout("{\"a\":[1,\"two\"]}\n");
}

#[test]
fn test_convert_rejects_invalid_json() {
    jutge()
        .args(["convert", "json-to-yaml"])
        .write_stdin("{oops")
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_call_rejects_invalid_input() {
    jutge()
        .args(["call", "misc.get_time", "--input", "{oops"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("--input is not valid JSON"));
}

#[test]
fn test_email_requires_password() {
    jutge()
        .args(["call", "student.profile.get", "--email", "alice@example.com"])
        .assert()
        .failure();
}

#[test]
fn test_fortune_against_local_server() {
    let url = spawn_fake_jutge();
    jutge()
        .env("JUTGE_API_URL", url)
        .arg("fortune")
        .assert()
        .success()
        .stdout(predicate::str::contains("You will write many tests."));
}

#[test]
fn test_call_writes_attachments() {
    let url = spawn_fake_jutge();
    let temp = TempDir::new().unwrap();

    jutge()
        .env("JUTGE_API_URL", url)
        .args(["--json", "call", "playground.report", "--dir"])
        .arg(temp.path())
        .assert()
        .success()
        .stdout(predicate::str::contains("\"verdict\": \"AC\""));

    let report = std::fs::read(temp.path().join("report.txt")).unwrap();
    assert_eq!(report, fixtures::REPORT_BYTES);
}

#[test]
fn test_call_with_login_uses_session() {
    let url = spawn_fake_jutge();
    jutge()
        .env("JUTGE_API_URL", url)
        .args([
            "call",
            "student.profile.get",
            "--email",
            "alice@example.com",
            "--password",
            "correct horse",
        ])
        .assert()
        .success()
        .stdout(predicate::str::contains("name: Alice"));
}

#[test]
fn test_call_surfaces_server_errors() {
    let url = spawn_fake_jutge();
    jutge()
        .env("JUTGE_API_URL", url)
        .args(["call", "playground.not_found"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Problem not found"));
}

#[test]
fn test_logo_stays_in_working_directory() {
    let url = spawn_jutge_with(|_, _| {
        fixtures::with_file(
            fixtures::answer(Value::Null),
            "../escaped.png",
            "image/png",
            fixtures::logo_bytes(),
        )
    });
    let temp = TempDir::new().unwrap();
    let work = temp.path().join("work");
    std::fs::create_dir(&work).unwrap();

    jutge()
        .env("JUTGE_API_URL", url)
        .arg("logo")
        .current_dir(&work)
        .assert()
        .success();

    assert_eq!(std::fs::read(work.join("escaped.png")).unwrap(), fixtures::logo_bytes());
    assert!(!temp.path().join("escaped.png").exists());
}

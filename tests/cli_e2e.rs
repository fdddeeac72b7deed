//! End-to-end tests for the `partifact` binary.
//!
//! None of these reach AWS: they stop at configuration resolution or use
//! the `show` command.

#![cfg(feature = "aws")]

use assert_cmd::Command;
use assert_fs::prelude::*;
use predicates::prelude::*;

fn partifact_cmd() -> Command {
    let mut cmd = Command::cargo_bin("partifact").unwrap();
    cmd.env_remove("PARTIFACT_CONFIG").env_remove("RUST_LOG");
    cmd
}

const TABLE_CONFIG: &str = r#"
[tool.partifact.repository.test_repo]
code_artifact_domain = "test_domain"
aws_account = "123456789"
aws_region = "eu-west-1"
code_artifact_repository = "test_ca_repo"
aws_profile = "stored_profile"
"#;

#[test]
fn test_login_help() {
    partifact_cmd()
        .arg("login")
        .arg("--help")
        .assert()
        .success()
        .stdout(predicate::str::contains("--configure-pip"))
        .stdout(predicate::str::contains("--profile"))
        .stdout(predicate::str::contains("--role"));
}

#[test]
fn test_login_missing_config() {
    let temp = assert_fs::TempDir::new().unwrap();

    partifact_cmd()
        .current_dir(temp.path())
        .arg("login")
        .arg("test_repo")
        .assert()
        .code(2)
        .stderr(predicate::str::contains("error [ConfigNotFound]"))
        .stderr(predicate::str::contains("configuration not found"));
}

#[test]
fn test_show_table_record() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("pyproject.toml").write_str(TABLE_CONFIG).unwrap();

    partifact_cmd()
        .current_dir(temp.path())
        .arg("show")
        .arg("test_repo")
        .assert()
        .success()
        .stdout(predicate::str::contains("domain:     test_domain"))
        .stdout(predicate::str::contains("profile:    stored_profile"))
        .stdout(predicate::str::contains("role:       -"));
}

#[test]
fn test_show_with_overrides_and_config_flag() {
    let temp = assert_fs::TempDir::new().unwrap();
    let config = temp.child("custom.toml");
    config.write_str(TABLE_CONFIG).unwrap();

    partifact_cmd()
        .arg("--config")
        .arg(config.path())
        .arg("show")
        .arg("test_repo")
        .arg("--profile")
        .arg("cli_profile")
        .arg("--role")
        .arg("cli_role")
        .assert()
        .success()
        .stdout(predicate::str::contains("profile:    cli_profile"))
        .stdout(predicate::str::contains("role:       cli_role"));
}

#[test]
fn test_show_poetry_source_json() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("pyproject.toml")
        .write_str(
            r#"
[[tool.poetry.source]]
name = "private"
url = "https://test-domain-123456789.d.codeartifact.eu-west-1.amazonaws.com/pypi/test_ca_repo/simple/"
"#,
        )
        .unwrap();

    let output = partifact_cmd()
        .current_dir(temp.path())
        .args(["show", "private", "--json"])
        .output()
        .unwrap();

    assert!(output.status.success());
    let json: serde_json::Value = serde_json::from_slice(&output.stdout).unwrap();
    assert_eq!(json["artifact_domain"], "test-domain");
    assert_eq!(json["account_id"], "123456789");
    assert_eq!(json["region"], "eu-west-1");
    assert_eq!(json["repository_name"], "test_ca_repo");
    assert!(json.get("profile").is_none());
}

#[test]
fn test_incomplete_config_exit_code() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("pyproject.toml")
        .write_str(
            r#"
[tool.partifact.repository.test_repo]
code_artifact_domain = "test_domain"
"#,
        )
        .unwrap();

    partifact_cmd()
        .current_dir(temp.path())
        .args(["login", "test_repo"])
        .assert()
        .code(3)
        .stderr(predicate::str::starts_with("error [IncompleteConfig]: "))
        .stderr(predicate::str::contains("aws_account"))
        .stderr(predicate::str::contains("aws_region"))
        .stderr(predicate::str::contains("code_artifact_repository"));
}

#[test]
fn test_invalid_url_exit_code() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("pyproject.toml")
        .write_str(
            r#"
[[tool.poetry.source]]
name = "private"
url = "https://pypi.org/simple/"
"#,
        )
        .unwrap();

    partifact_cmd()
        .current_dir(temp.path())
        .args(["show", "private"])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("error [InvalidFormat]"))
        .stderr(predicate::str::contains("d.codeartifact"));
}

#[test]
fn test_poetry_source_without_url_exit_code() {
    let temp = assert_fs::TempDir::new().unwrap();
    temp.child("pyproject.toml")
        .write_str(
            r#"
[[tool.poetry.source]]
name = "private"
priority = "explicit"
"#,
        )
        .unwrap();

    partifact_cmd()
        .current_dir(temp.path())
        .args(["show", "private"])
        .assert()
        .code(3)
        .stderr(predicate::str::contains("error [IncompleteConfig]"))
        .stderr(predicate::str::contains("url"));
}

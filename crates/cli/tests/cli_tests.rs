// crates/cli/tests/cli_tests.rs

pub mod common;

use common::{get_command, get_command_with_test_env};
use predicates::prelude::*;
use test_common::TestEnv;

#[test]
fn test_cli_help() {
    let mut cmd = get_command();
    cmd.arg("--help");
    cmd.assert().success().stdout(predicate::str::contains(
        "Overlay - inspect and change the state of overlay packages",
    ));
}

#[test]
fn test_cli_version() {
    let mut cmd = get_command();
    cmd.arg("--version");
    cmd.assert().success();
}

#[test]
fn test_cli_invalid_command() {
    let mut cmd = get_command();
    cmd.arg("invalid-command");
    cmd.assert().code(1);
}

#[test]
fn test_cli_missing_required_arg() {
    let mut cmd = get_command();
    cmd.arg("enable"); // Missing package_name
    cmd.assert().code(1);
}

#[test]
fn test_cli_bad_user_number() {
    let mut cmd = get_command();
    cmd.args(["list", "--user", "everyone"]);
    cmd.assert()
        .code(1)
        .stderr(predicate::str::contains("Bad user number: everyone"));
}

#[test]
fn test_cli_commit_requires_operations() {
    let mut cmd = get_command();
    cmd.arg("commit");
    cmd.assert().code(1);
}

#[test]
fn test_missing_config_file_error() {
    // Create a temp directory without any config file
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = get_command();
    cmd.env("OVERLAY_CONFIG_DIR", temp_dir.path());
    cmd.arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("No configuration file found"));
}

#[test]
fn test_state_file_flag_works_without_config_file() {
    let env = TestEnv::new();
    let temp_dir = tempfile::tempdir().unwrap();

    let mut cmd = get_command();
    cmd.env("OVERLAY_CONFIG_DIR", temp_dir.path());
    cmd.args(["--state-file"])
        .arg(env.state_file())
        .args(["list", test_common::TARGET_OTHER]);

    cmd.assert()
        .success()
        .stdout("com.example.other\n[ ] com.example.other.overlay\n");
}

#[test]
fn test_config_without_state_file_is_rejected() {
    let env = TestEnv::new();
    std::fs::write(env.config_dir().join("config.yaml"), "default_user: 0\n").unwrap();

    let mut cmd = get_command_with_test_env(&env);
    cmd.arg("list");

    cmd.assert()
        .failure()
        .stderr(predicate::str::contains("state_file"));
}

#[test]
fn test_corrupt_state_file_is_remote_exception() {
    let env = TestEnv::with_state("users: [broken");

    let mut cmd = get_command_with_test_env(&env);
    cmd.arg("list");

    cmd.assert()
        .code(255)
        .stderr(predicate::str::contains("Remote exception"));
}

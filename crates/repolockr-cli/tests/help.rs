use assert_cmd::Command;
use predicates::prelude::*;

/// Helper to get a Command for the repolockr binary.
#[allow(deprecated)]
fn repolockr_cmd() -> Command {
    Command::cargo_bin("repolockr").unwrap()
}

#[test]
fn help_works() {
    repolockr_cmd().arg("--help").assert().success();
}

#[test]
fn serve_help_lists_env_fallbacks() {
    repolockr_cmd()
        .args(["serve", "--help"])
        .assert()
        .success()
        .stdout(predicate::str::contains("APP_ID"))
        .stdout(predicate::str::contains("WEBHOOK_SECRET"))
        .stdout(predicate::str::contains("single-event"));
}

#[test]
fn serve_requires_app_id() {
    repolockr_cmd()
        .arg("serve")
        .env_remove("APP_ID")
        .assert()
        .failure()
        .stderr(predicate::str::contains("--app-id"));
}

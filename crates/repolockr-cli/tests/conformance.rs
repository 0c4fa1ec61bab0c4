//! Schema conformance tests for repolockr.
//!
//! These tests validate:
//! 1. `check --format json` output against the verdict report schema
//! 2. Example configs against the config schema

use assert_cmd::Command;
use repolockr_settings::RepolockrConfigV1;
use repolockr_types::VerdictReportV1;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

#[allow(deprecated)]
fn repolockr_cmd() -> Command {
    Command::cargo_bin("repolockr").unwrap()
}

fn report_validator() -> jsonschema::Validator {
    let schema = serde_json::to_value(schemars::schema_for!(VerdictReportV1)).expect("schema json");
    jsonschema::validator_for(&schema).expect("compile report schema")
}

fn run_json_check(config: &str, branch: &str, changed: &[&str]) -> Value {
    let repo = TempDir::new().expect("create temp dir");
    fs::create_dir_all(repo.path().join(".github")).expect("create .github");
    fs::write(repo.path().join(".github").join("repolockr.yml"), config).expect("write config");

    let mut cmd = repolockr_cmd();
    cmd.arg("check")
        .arg("--repo-root")
        .arg(repo.path())
        .args(["--branch", branch, "--format", "json"]);
    for path in changed {
        cmd.args(["--changed-file", path]);
    }

    let output = cmd.output().expect("run repolockr");
    serde_json::from_slice(&output.stdout).expect("json report")
}

#[test]
fn reports_validate_against_schema() {
    let validator = report_validator();
    let reports = [
        run_json_check("lock: [secrets.yml]\n", "feature/x", &["secrets.yml", "a.md"]),
        run_json_check("lock: [secrets.yml]\n", "feature/x", &["a.md"]),
        run_json_check(
            "lock: [secrets.yml]\nbranches:\n  allow: [release]\n",
            "release",
            &["secrets.yml"],
        ),
        run_json_check("", "main", &[]),
    ];

    for report in &reports {
        let errors: Vec<String> = validator.iter_errors(report).map(|e| e.to_string()).collect();
        assert!(errors.is_empty(), "report {report} failed validation: {errors:?}");
    }
}

#[test]
fn skipped_reports_omit_the_verdict() {
    let report = run_json_check("", "main", &["secrets.yml"]);
    assert_eq!(report["skip_reason"], "no_lock_list");
    assert!(report.get("verdict").is_none());
}

#[test]
fn config_examples_validate_against_schema() {
    let schema =
        serde_json::to_value(schemars::schema_for!(RepolockrConfigV1)).expect("schema json");
    let validator = jsonschema::validator_for(&schema).expect("compile config schema");

    let examples = [
        "lock:\n  - secrets.yml\n  - config/prod.env\nbranches:\n  allow:\n    - release\n",
        "lock: []\n",
        "branches:\n  allow: [main]\n",
    ];
    for example in examples {
        let parsed = repolockr_settings::parse_config_yaml(example).expect("parse example");
        let instance = serde_json::to_value(&parsed).expect("config json");
        assert!(
            validator.is_valid(&instance),
            "config example failed validation: {example}"
        );
    }

    assert!(!validator.is_valid(&serde_json::json!({ "lock": "secrets.yml" })));
}

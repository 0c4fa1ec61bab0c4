//! The offline `check` use case: evaluate a local config against a branch and a changed-file list.

use anyhow::Context;
use repolockr_domain::{evaluate, should_run, RunDecision};
use repolockr_render::{RenderableReport, RenderableStatus};
use repolockr_types::{Outcome, PullRequestRef, Verdict, VerdictReportV1, SCHEMA_VERDICT_V1};

/// Input for the offline check.
#[derive(Clone, Debug)]
pub struct LocalCheckInput<'a> {
    /// Contents of `.github/repolockr.yml` (empty string if not found).
    pub config_text: &'a str,
    /// Head branch of the change under test.
    pub branch: &'a str,
    pub changed_files: Vec<String>,
}

#[derive(Clone, Debug)]
pub struct LocalCheckOutput {
    pub decision: RunDecision,
    /// `None` when the decision was to skip.
    pub verdict: Option<Verdict>,
}

/// Parse the config, decide whether to run, and evaluate.
///
/// Unlike the webhook path, an unparseable config is an error here: the caller is looking at
/// the file and should hear about it.
pub fn run_local_check(input: LocalCheckInput<'_>) -> anyhow::Result<LocalCheckOutput> {
    let cfg = repolockr_settings::parse_config_yaml(input.config_text).context("parse config")?;
    let policy = repolockr_settings::resolve_config(cfg);

    let pr = PullRequestRef {
        number: 0,
        head_sha: String::new(),
        base_sha: String::new(),
        head_branch: input.branch.to_string(),
    };

    let decision = should_run(&policy, &pr);
    let verdict = match decision {
        RunDecision::Run => Some(evaluate(&policy, &input.changed_files)),
        RunDecision::Skip(_) => None,
    };

    Ok(LocalCheckOutput {
        decision,
        verdict,
    })
}

/// An indeterminate verdict renders as a skip carrying its summary; it is never a pass.
pub fn to_renderable(output: &LocalCheckOutput) -> RenderableReport {
    let Some(verdict) = &output.verdict else {
        return skipped(
            output
                .decision
                .skip_reason()
                .map(|r| r.describe().to_string()),
        );
    };

    let status = match verdict.outcome {
        Outcome::Pass => RenderableStatus::Pass,
        Outcome::Fail => RenderableStatus::Fail,
        Outcome::Indeterminate => return skipped(Some(verdict.summary.clone())),
    };

    RenderableReport {
        status,
        reason: None,
        summary: verdict.summary.clone(),
        violating_files: verdict.violating_files.clone(),
    }
}

fn skipped(reason: Option<String>) -> RenderableReport {
    RenderableReport {
        status: RenderableStatus::Skip,
        reason,
        summary: "Check skipped".to_string(),
        violating_files: Vec::new(),
    }
}

/// Build the serialized report for `--format json`.
pub fn to_report(output: &LocalCheckOutput, branch: &str) -> VerdictReportV1 {
    VerdictReportV1 {
        schema: SCHEMA_VERDICT_V1.to_string(),
        branch: branch.to_string(),
        skip_reason: output.decision.skip_reason().map(|r| r.code().to_string()),
        verdict: output.verdict.clone(),
    }
}

/// Map the outcome to an exit code: 0 = pass/skip, 2 = fail.
pub fn verdict_exit_code(output: &LocalCheckOutput) -> i32 {
    match output.verdict.as_ref().map(|v| v.outcome) {
        Some(Outcome::Fail) => 2,
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use repolockr_domain::SkipReason;

    fn files(paths: &[&str]) -> Vec<String> {
        paths.iter().map(|p| p.to_string()).collect()
    }

    #[test]
    fn failing_change_exits_two() {
        let output = run_local_check(LocalCheckInput {
            config_text: "lock: [secrets.yml]\n",
            branch: "feature/x",
            changed_files: files(&["readme.md", "secrets.yml"]),
        })
        .expect("run_local_check");

        assert_eq!(output.decision, RunDecision::Run);
        assert_eq!(verdict_exit_code(&output), 2);

        let report = to_renderable(&output);
        assert_eq!(report.status, RenderableStatus::Fail);
        assert_eq!(report.violating_files, files(&["secrets.yml"]));
        assert_eq!(report.summary, "There was 1 locked file that was modified");
    }

    #[test]
    fn allowed_branch_is_a_skip() {
        let output = run_local_check(LocalCheckInput {
            config_text: "lock: [secrets.yml]\nbranches:\n  allow: [release]\n",
            branch: "release",
            changed_files: files(&["secrets.yml"]),
        })
        .expect("run_local_check");

        assert_eq!(output.decision, RunDecision::Skip(SkipReason::BranchAllowed));
        assert_eq!(output.verdict, None);
        assert_eq!(verdict_exit_code(&output), 0);

        let report = to_renderable(&output);
        assert_eq!(report.status, RenderableStatus::Skip);
        assert_eq!(
            report.reason.as_deref(),
            Some("pull request branch is explicitly allowed")
        );

        let json = to_report(&output, "release");
        assert_eq!(json.schema, "repolockr.verdict.v1");
        assert_eq!(json.skip_reason.as_deref(), Some("branch_allowed"));
        assert_eq!(json.verdict, None);
    }

    #[test]
    fn empty_config_skips_with_no_lock_list() {
        let output = run_local_check(LocalCheckInput {
            config_text: "",
            branch: "main",
            changed_files: files(&["anything"]),
        })
        .expect("run_local_check");
        assert_eq!(output.decision, RunDecision::Skip(SkipReason::NoLockList));
    }

    #[test]
    fn indeterminate_verdict_is_never_rendered_as_a_pass() {
        let output = LocalCheckOutput {
            decision: RunDecision::Run,
            verdict: Some(repolockr_domain::report::indeterminate()),
        };

        let report = to_renderable(&output);
        assert_eq!(report.status, RenderableStatus::Skip);
        assert_eq!(
            report.reason.as_deref(),
            Some("The configured list of locked files could not be determined")
        );
        assert_eq!(verdict_exit_code(&output), 0);
    }

    #[test]
    fn bad_config_is_an_error() {
        let err = run_local_check(LocalCheckInput {
            config_text: "lock: secrets.yml\n",
            branch: "main",
            changed_files: Vec::new(),
        })
        .expect_err("invalid shape");
        assert!(err.to_string().contains("parse config"));
    }
}

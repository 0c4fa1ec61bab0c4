use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Stable schema identifier for serialized verdicts (`repolockr check --format json`).
pub const SCHEMA_VERDICT_V1: &str = "repolockr.verdict.v1";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Pass,
    Fail,
    /// The lock list could not be determined; never reported as a pass.
    Indeterminate,
}

/// Result of one evaluation cycle. Built once, never mutated.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Verdict {
    pub outcome: Outcome,
    /// Locked files touched by the pull request, in the order the platform listed them.
    /// Empty iff `outcome` is `pass` or `indeterminate`.
    pub violating_files: Vec<String>,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl Verdict {
    pub fn is_pass(&self) -> bool {
        self.outcome == Outcome::Pass
    }
}

/// Report emitted by `repolockr check --format json`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct VerdictReportV1 {
    /// Always [`SCHEMA_VERDICT_V1`].
    pub schema: String,
    /// Head branch the check was evaluated for.
    pub branch: String,
    /// Set when the check was skipped (`branch_allowed` or `no_lock_list`).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub skip_reason: Option<String>,
    /// Absent when the check was skipped.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub verdict: Option<Verdict>,
}

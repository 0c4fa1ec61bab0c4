//! Check-run request and acknowledgement shapes, serialized exactly as the REST API expects.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;
use time::OffsetDateTime;

/// Platform-assigned identifier of a check run.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, JsonSchema,
)]
#[serde(transparent)]
pub struct CheckRunId(pub u64);

impl fmt::Display for CheckRunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunStatus {
    Queued,
    InProgress,
    Completed,
}

impl CheckRunStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckRunStatus::Queued => "queued",
            CheckRunStatus::InProgress => "in_progress",
            CheckRunStatus::Completed => "completed",
        }
    }
}

impl fmt::Display for CheckRunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Conclusions repolockr writes are `success`, `failure` and `neutral`; the rest only appear
/// in acknowledgements when another actor changed the run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum CheckRunConclusion {
    Success,
    Failure,
    Neutral,
    Cancelled,
    Skipped,
    TimedOut,
    ActionRequired,
    Stale,
}

impl CheckRunConclusion {
    pub fn as_str(self) -> &'static str {
        match self {
            CheckRunConclusion::Success => "success",
            CheckRunConclusion::Failure => "failure",
            CheckRunConclusion::Neutral => "neutral",
            CheckRunConclusion::Cancelled => "cancelled",
            CheckRunConclusion::Skipped => "skipped",
            CheckRunConclusion::TimedOut => "timed_out",
            CheckRunConclusion::ActionRequired => "action_required",
            CheckRunConclusion::Stale => "stale",
        }
    }
}

impl fmt::Display for CheckRunConclusion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct CheckRunOutput {
    pub title: String,
    pub summary: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

/// `POST /repos/{owner}/{repo}/check-runs`
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateCheckRun {
    pub name: String,
    pub head_sha: String,
    pub status: CheckRunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub external_id: Option<String>,
}

/// `PATCH /repos/{owner}/{repo}/check-runs/{id}`
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct UpdateCheckRun {
    pub status: CheckRunStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub started_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    #[serde(with = "time::serde::rfc3339::option")]
    pub completed_at: Option<OffsetDateTime>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conclusion: Option<CheckRunConclusion>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<CheckRunOutput>,
}

/// The fields of a check-run response the lifecycle reads back.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckRunAck {
    pub id: CheckRunId,
    pub status: CheckRunStatus,
    #[serde(default)]
    pub conclusion: Option<CheckRunConclusion>,
}

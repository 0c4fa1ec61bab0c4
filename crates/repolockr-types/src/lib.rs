//! Stable DTOs and IDs used across the repolockr workspace.
//!
//! This crate is intentionally boring:
//! - fixed names and report texts
//! - repository and pull-request references
//! - the versioned correlation token carried on check runs
//! - the verdict and check-run request/acknowledgement shapes

#![forbid(unsafe_code)]

pub mod check_run;
pub mod correlation;
pub mod ids;
pub mod pull_request;
pub mod verdict;

pub use check_run::{
    CheckRunAck, CheckRunConclusion, CheckRunId, CheckRunOutput, CheckRunStatus, CreateCheckRun,
    UpdateCheckRun,
};
pub use correlation::{CorrelationError, CorrelationToken, CORRELATION_VERSION};
pub use pull_request::{PullRequestRef, RepoRef};
pub use verdict::{Outcome, Verdict, VerdictReportV1, SCHEMA_VERDICT_V1};

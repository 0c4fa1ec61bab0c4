//! Use case orchestration for repolockr.
//!
//! This crate is the application layer. It turns webhook deliveries into typed events, drives
//! the check-run lifecycle through the [`repolockr_github::GitHubApi`] port, and hosts the
//! offline `check` use case. Policy decisions are delegated to `repolockr-domain`.
//!
//! The CLI crate depends on this; it only handles argument parsing, HTTP, and I/O.

#![forbid(unsafe_code)]

mod check;
mod config;
mod events;
mod identity;
mod lifecycle;
mod router;

pub use check::{
    run_local_check, to_renderable, to_report, verdict_exit_code, LocalCheckInput,
    LocalCheckOutput,
};
pub use config::{load_lock_policy, ConfigRef};
pub use events::{
    parse_webhook, CheckRunAction, CheckRunEvent, EventError, PullRequestAction, PullRequestEvent,
    WebhookEvent,
};
pub use identity::{decode_correlation, pull_request_for_check_run, resolve_pull_request, IdentityError};
pub use lifecycle::{
    CheckRunHandle, CheckRunLifecycle, CompletedCheckRun, InProgressCheckRun, QueuedCheckRun,
};
pub use router::{CycleError, Disposition, EventRouter, IgnoreReason, RouterSettings, Topology};

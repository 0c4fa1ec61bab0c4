//! Typed webhook events.
//!
//! Deliveries are parsed once, at the boundary, into a closed set of variants. Only the events
//! repolockr reacts to are modelled; everything else parses to `None`.

use repolockr_types::{CheckRunId, PullRequestRef, RepoRef};
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EventError {
    #[error("malformed {event} payload: {source}")]
    Malformed {
        event: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WebhookEvent {
    PullRequest(PullRequestEvent),
    CheckRun(CheckRunEvent),
}

impl WebhookEvent {
    /// `<event>.<action>`, as used in logs.
    pub fn name(&self) -> String {
        match self {
            WebhookEvent::PullRequest(event) => format!("pull_request.{}", event.action),
            WebhookEvent::CheckRun(event) => format!("check_run.{}", event.action),
        }
    }

    pub fn repo(&self) -> &RepoRef {
        match self {
            WebhookEvent::PullRequest(event) => &event.repo,
            WebhookEvent::CheckRun(event) => &event.repo,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PullRequestAction {
    Opened,
    Synchronize,
}

impl fmt::Display for PullRequestAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            PullRequestAction::Opened => "opened",
            PullRequestAction::Synchronize => "synchronize",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PullRequestEvent {
    pub action: PullRequestAction,
    pub repo: RepoRef,
    pub default_branch: String,
    pub pull_request: PullRequestRef,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CheckRunAction {
    Created,
    Rerequested,
}

impl fmt::Display for CheckRunAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CheckRunAction::Created => "created",
            CheckRunAction::Rerequested => "rerequested",
        })
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckRunEvent {
    pub action: CheckRunAction,
    pub repo: RepoRef,
    pub default_branch: String,
    pub check_run_id: CheckRunId,
    pub head_sha: String,
    /// Id of the GitHub App that owns the check run.
    pub app_id: u64,
    pub external_id: Option<String>,
    /// Pull requests the platform associates with the check run, in payload order.
    pub pull_requests: Vec<PullRequestRef>,
}

/// Parse a delivery by its `X-GitHub-Event` name.
///
/// Returns `Ok(None)` for events and actions repolockr does not handle.
pub fn parse_webhook(event_name: &str, body: &[u8]) -> Result<Option<WebhookEvent>, EventError> {
    match event_name {
        "pull_request" => parse_pull_request(body),
        "check_run" => parse_check_run(body),
        _ => Ok(None),
    }
}

fn parse_pull_request(body: &[u8]) -> Result<Option<WebhookEvent>, EventError> {
    let action = match peek_action(body, "pull_request")?.as_deref() {
        Some("opened") => PullRequestAction::Opened,
        Some("synchronize") => PullRequestAction::Synchronize,
        _ => return Ok(None),
    };

    let payload: RawPullRequestPayload =
        serde_json::from_slice(body).map_err(|source| EventError::Malformed {
            event: "pull_request",
            source,
        })?;

    Ok(Some(WebhookEvent::PullRequest(PullRequestEvent {
        action,
        default_branch: payload.repository.default_branch.clone(),
        repo: payload.repository.into_repo(),
        pull_request: payload.pull_request.into_ref(),
    })))
}

fn parse_check_run(body: &[u8]) -> Result<Option<WebhookEvent>, EventError> {
    let action = match peek_action(body, "check_run")?.as_deref() {
        Some("created") => CheckRunAction::Created,
        Some("rerequested") => CheckRunAction::Rerequested,
        _ => return Ok(None),
    };

    let payload: RawCheckRunPayload =
        serde_json::from_slice(body).map_err(|source| EventError::Malformed {
            event: "check_run",
            source,
        })?;
    let check_run = payload.check_run;

    Ok(Some(WebhookEvent::CheckRun(CheckRunEvent {
        action,
        default_branch: payload.repository.default_branch.clone(),
        repo: payload.repository.into_repo(),
        check_run_id: CheckRunId(check_run.id),
        head_sha: check_run.head_sha,
        app_id: check_run.app.id,
        external_id: check_run.external_id.filter(|id| !id.is_empty()),
        pull_requests: check_run
            .pull_requests
            .into_iter()
            .map(RawPullRequest::into_ref)
            .collect(),
    })))
}

fn peek_action(body: &[u8], event: &'static str) -> Result<Option<String>, EventError> {
    let envelope: RawEnvelope =
        serde_json::from_slice(body).map_err(|source| EventError::Malformed { event, source })?;
    Ok(envelope.action)
}

#[derive(Deserialize)]
struct RawEnvelope {
    #[serde(default)]
    action: Option<String>,
}

#[derive(Deserialize)]
struct RawPullRequestPayload {
    repository: RawRepository,
    pull_request: RawPullRequest,
}

#[derive(Deserialize)]
struct RawCheckRunPayload {
    repository: RawRepository,
    check_run: RawCheckRun,
}

#[derive(Deserialize)]
struct RawRepository {
    name: String,
    owner: RawOwner,
    #[serde(default = "default_branch_fallback")]
    default_branch: String,
}

impl RawRepository {
    fn into_repo(self) -> RepoRef {
        RepoRef::new(self.owner.login, self.name)
    }
}

fn default_branch_fallback() -> String {
    "master".to_string()
}

#[derive(Deserialize)]
struct RawOwner {
    login: String,
}

#[derive(Deserialize)]
struct RawCheckRun {
    id: u64,
    head_sha: String,
    #[serde(default)]
    external_id: Option<String>,
    app: RawApp,
    #[serde(default)]
    pull_requests: Vec<RawPullRequest>,
}

#[derive(Deserialize)]
struct RawApp {
    id: u64,
}

#[derive(Deserialize)]
struct RawPullRequest {
    number: u64,
    head: RawBranch,
    base: RawBranch,
}

impl RawPullRequest {
    fn into_ref(self) -> PullRequestRef {
        PullRequestRef {
            number: self.number,
            head_sha: self.head.sha,
            base_sha: self.base.sha,
            head_branch: self.head.branch,
        }
    }
}

#[derive(Deserialize)]
struct RawBranch {
    #[serde(rename = "ref")]
    branch: String,
    sha: String,
}

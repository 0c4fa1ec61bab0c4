//! Event routing: which lifecycle transitions fire for which delivery.

use crate::config::{load_lock_policy, ConfigRef};
use crate::events::{CheckRunAction, CheckRunEvent, PullRequestEvent, WebhookEvent};
use crate::identity::{decode_correlation, pull_request_for_check_run, IdentityError};
use crate::lifecycle::{CheckRunLifecycle, CompletedCheckRun, InProgressCheckRun, QueuedCheckRun};
use repolockr_domain::policy::LockPolicy;
use repolockr_domain::{evaluate, report, should_run, RunDecision, SkipReason};
use repolockr_github::{GitHubApi, GitHubError};
use repolockr_types::{CheckRunConclusion, CheckRunId, CheckRunStatus, PullRequestRef, RepoRef};
use std::fmt;
use thiserror::Error;
use tracing::{debug, error, info};

/// How the two event kinds share the lifecycle.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Topology {
    /// `pull_request` queues the run; the resulting `check_run.created` completes it.
    #[default]
    TwoEvent,
    /// `pull_request` runs the whole cycle; only `check_run.rerequested` re-enters it.
    SingleEvent,
}

#[derive(Clone, Debug)]
pub struct RouterSettings {
    /// Id of the GitHub App this service acts as.
    pub app_id: u64,
    pub topology: Topology,
    pub config_ref: ConfigRef,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The check run belongs to another integration.
    ForeignApp { app_id: u64 },
    /// The pull-request event already completed this run.
    CompletedByPullRequestEvent,
}

impl fmt::Display for IgnoreReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IgnoreReason::ForeignApp { app_id } => write!(f, "check run belongs to app {app_id}"),
            IgnoreReason::CompletedByPullRequestEvent => {
                f.write_str("check run was completed by the pull request event")
            }
        }
    }
}

/// What handling one event amounted to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Disposition {
    Skipped(SkipReason),
    Ignored(IgnoreReason),
    Queued(CheckRunId),
    Completed {
        id: CheckRunId,
        status: CheckRunStatus,
        conclusion: Option<CheckRunConclusion>,
    },
}

impl From<CompletedCheckRun> for Disposition {
    fn from(run: CompletedCheckRun) -> Self {
        Disposition::Completed {
            id: run.id,
            status: run.status,
            conclusion: run.conclusion,
        }
    }
}

/// Why a cycle was aborted. Nothing is retried.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error(transparent)]
    Identity(#[from] IdentityError),

    #[error("GitHub call failed: {0}")]
    GitHub(#[from] GitHubError),
}

pub struct EventRouter<G> {
    github: G,
    settings: RouterSettings,
}

impl<G: GitHubApi> EventRouter<G> {
    pub fn new(github: G, settings: RouterSettings) -> Self {
        Self { github, settings }
    }

    /// Run the cycle one event calls for.
    pub async fn handle(&self, event: WebhookEvent) -> Result<Disposition, CycleError> {
        info!(repo = %event.repo(), "Responding to {}", event.name());

        let result = match event {
            WebhookEvent::PullRequest(event) => self.on_pull_request(event).await,
            WebhookEvent::CheckRun(event) => self.on_check_run(event).await,
        };

        match &result {
            Ok(Disposition::Completed {
                id,
                status,
                conclusion,
            }) => {
                let conclusion = conclusion.map_or("none", |c| c.as_str());
                info!(
                    check_run_id = %id,
                    %status,
                    conclusion,
                    "Updated check run {id}: status={status}, conclusion={conclusion}"
                );
            }
            Ok(_) | Err(CycleError::Identity(_)) => {}
            Err(CycleError::GitHub(err)) => {
                error!(error = %err, "cycle aborted after a failed GitHub call");
            }
        }

        result
    }

    fn lifecycle<'a>(&'a self, repo: &'a RepoRef) -> CheckRunLifecycle<'a, G> {
        CheckRunLifecycle::new(&self.github, repo, self.settings.app_id)
    }

    async fn on_pull_request(&self, event: PullRequestEvent) -> Result<Disposition, CycleError> {
        let pr = &event.pull_request;
        let git_ref = self.settings.config_ref.select(pr, &event.default_branch);
        let policy = load_lock_policy(&self.github, &event.repo, git_ref).await;

        if let RunDecision::Skip(reason) = should_run(&policy, pr) {
            info!(
                repo = %event.repo,
                pull_number = pr.number,
                reason = reason.code(),
                "Exiting - should not run check ({reason})"
            );
            return Ok(Disposition::Skipped(reason));
        }

        let lifecycle = self.lifecycle(&event.repo);
        let queued = lifecycle.create(pr).await?;

        match self.settings.topology {
            Topology::TwoEvent => Ok(Disposition::Queued(queued.handle().id)),
            Topology::SingleEvent => {
                let running = lifecycle.start(queued).await?;
                let completed =
                    Self::finish(&self.github, &lifecycle, &event.repo, running, pr, &policy)
                        .await?;
                Ok(completed.into())
            }
        }
    }

    async fn on_check_run(&self, event: CheckRunEvent) -> Result<Disposition, CycleError> {
        let lifecycle = self.lifecycle(&event.repo);

        if !lifecycle.is_own_app(event.app_id) {
            debug!(
                check_run_id = %event.check_run_id,
                app_id = event.app_id,
                "Ignoring check run from different app"
            );
            return Ok(Disposition::Ignored(IgnoreReason::ForeignApp {
                app_id: event.app_id,
            }));
        }

        if self.settings.topology == Topology::SingleEvent
            && event.action == CheckRunAction::Created
        {
            debug!(check_run_id = %event.check_run_id, "check run already completed");
            return Ok(Disposition::Ignored(
                IgnoreReason::CompletedByPullRequestEvent,
            ));
        }

        let correlation = decode_correlation(event.external_id.as_deref());
        let queued = QueuedCheckRun::attach(event.check_run_id, correlation);
        let running = lifecycle.start(queued).await?;

        let pr = match pull_request_for_check_run(
            &event.pull_requests,
            running.handle().correlation.as_ref(),
        ) {
            Ok(pr) => pr,
            Err(err) => {
                error!(
                    check_run_id = %event.check_run_id,
                    error = %err,
                    event = ?event,
                    "Missing pull requests"
                );
                return Err(err.into());
            }
        };

        let git_ref = self.settings.config_ref.select(&pr, &event.default_branch);
        let policy = load_lock_policy(&self.github, &event.repo, git_ref).await;

        let completed =
            Self::finish(&self.github, &lifecycle, &event.repo, running, &pr, &policy).await?;
        Ok(completed.into())
    }

    /// Evaluate and complete. A policy without a lock list completes as indeterminate.
    async fn finish(
        github: &G,
        lifecycle: &CheckRunLifecycle<'_, G>,
        repo: &RepoRef,
        running: InProgressCheckRun,
        pr: &PullRequestRef,
        policy: &LockPolicy,
    ) -> Result<CompletedCheckRun, GitHubError> {
        let verdict = if policy.has_lock_list() {
            let changed = github.list_changed_files(repo, pr.number).await?;
            debug!(
                pull_number = pr.number,
                changed_files = changed.len(),
                "evaluating changed files"
            );
            evaluate(policy, &changed)
        } else {
            report::indeterminate()
        };

        lifecycle.complete(running, &verdict).await
    }
}

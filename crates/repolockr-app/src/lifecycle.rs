//! The three-phase check-run lifecycle: queued, in progress, completed.
//!
//! Each phase is its own type and every transition consumes the previous one, so a run cannot be
//! started twice or completed out of order within one cycle. A completed run has no transitions.

use repolockr_github::{GitHubApi, GitHubError};
use repolockr_render::{conclusion_for, render_check_run_output};
use repolockr_types::{
    ids, CheckRunConclusion, CheckRunId, CheckRunStatus, CorrelationToken, CreateCheckRun,
    PullRequestRef, RepoRef, UpdateCheckRun, Verdict,
};
use time::OffsetDateTime;
use tracing::{debug, info};

/// Platform identity of a check run plus the pull request it was queued for, if known.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CheckRunHandle {
    pub id: CheckRunId,
    pub correlation: Option<CorrelationToken>,
}

#[derive(Debug)]
#[must_use = "a queued check run stays pending until it is started"]
pub struct QueuedCheckRun {
    handle: CheckRunHandle,
}

impl QueuedCheckRun {
    /// Adopt a check run created elsewhere, e.g. the one a `check_run` event refers to.
    pub fn attach(id: CheckRunId, correlation: Option<CorrelationToken>) -> Self {
        Self {
            handle: CheckRunHandle { id, correlation },
        }
    }

    pub fn handle(&self) -> &CheckRunHandle {
        &self.handle
    }
}

#[derive(Debug)]
#[must_use = "an in-progress check run stays pending until it is completed"]
pub struct InProgressCheckRun {
    handle: CheckRunHandle,
}

impl InProgressCheckRun {
    pub fn handle(&self) -> &CheckRunHandle {
        &self.handle
    }
}

/// What the platform acknowledged when the run was completed.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompletedCheckRun {
    pub id: CheckRunId,
    pub status: CheckRunStatus,
    pub conclusion: Option<CheckRunConclusion>,
}

/// Drives check runs for one repository on behalf of one GitHub App.
pub struct CheckRunLifecycle<'a, G: ?Sized> {
    github: &'a G,
    repo: &'a RepoRef,
    app_id: u64,
}

impl<'a, G: GitHubApi + ?Sized> CheckRunLifecycle<'a, G> {
    pub fn new(github: &'a G, repo: &'a RepoRef, app_id: u64) -> Self {
        Self {
            github,
            repo,
            app_id,
        }
    }

    /// Whether a check run owned by `app_id` belongs to this service.
    pub fn is_own_app(&self, app_id: u64) -> bool {
        app_id == self.app_id
    }

    /// Create a queued check run on the pull request's head commit.
    pub async fn create(&self, pr: &PullRequestRef) -> Result<QueuedCheckRun, GitHubError> {
        let correlation = CorrelationToken::for_pull_request(pr);
        let request = CreateCheckRun {
            name: ids::CHECK_RUN_NAME.to_string(),
            head_sha: pr.head_sha.clone(),
            status: CheckRunStatus::Queued,
            external_id: Some(correlation.encode()),
        };

        let ack = self.github.create_check_run(self.repo, &request).await?;
        info!(
            repo = %self.repo,
            pull_number = pr.number,
            check_run_id = %ack.id,
            "Created check run {}",
            ack.id
        );

        Ok(QueuedCheckRun {
            handle: CheckRunHandle {
                id: ack.id,
                correlation: Some(correlation),
            },
        })
    }

    /// Mark the run in progress, stamping the start time.
    pub async fn start(&self, run: QueuedCheckRun) -> Result<InProgressCheckRun, GitHubError> {
        let request = UpdateCheckRun {
            status: CheckRunStatus::InProgress,
            started_at: Some(OffsetDateTime::now_utc()),
            completed_at: None,
            conclusion: None,
            output: None,
        };

        self.github
            .update_check_run(self.repo, run.handle.id, &request)
            .await?;
        debug!(repo = %self.repo, check_run_id = %run.handle.id, "check run in progress");

        Ok(InProgressCheckRun { handle: run.handle })
    }

    /// Complete the run with the conclusion and output derived from `verdict`.
    ///
    /// Returns the status and conclusion the platform acknowledged.
    pub async fn complete(
        &self,
        run: InProgressCheckRun,
        verdict: &Verdict,
    ) -> Result<CompletedCheckRun, GitHubError> {
        let request = UpdateCheckRun {
            status: CheckRunStatus::Completed,
            started_at: None,
            completed_at: Some(OffsetDateTime::now_utc()),
            conclusion: Some(conclusion_for(verdict.outcome)),
            output: Some(render_check_run_output(verdict)),
        };

        let ack = self
            .github
            .update_check_run(self.repo, run.handle.id, &request)
            .await?;

        Ok(CompletedCheckRun {
            id: run.handle.id,
            status: ack.status,
            conclusion: ack.conclusion,
        })
    }
}

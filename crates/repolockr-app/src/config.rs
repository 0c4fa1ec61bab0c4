//! Loading the repository's lock policy. Every failure falls back to an empty policy.

use repolockr_domain::policy::LockPolicy;
use repolockr_github::GitHubApi;
use repolockr_types::{ids, PullRequestRef, RepoRef};
use tracing::{debug, warn};

/// Which commit `.github/repolockr.yml` is read from.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ConfigRef {
    /// The pull request's base commit.
    #[default]
    BaseCommit,
    /// The repository's default branch.
    DefaultBranch,
}

impl ConfigRef {
    pub fn select<'a>(self, pr: &'a PullRequestRef, default_branch: &'a str) -> &'a str {
        match self {
            ConfigRef::BaseCommit => &pr.base_sha,
            ConfigRef::DefaultBranch => default_branch,
        }
    }
}

/// Fetch, parse, and resolve the lock policy at `git_ref`.
///
/// Missing files, transport errors, and unparseable YAML all yield [`LockPolicy::default`],
/// which downstream resolves to a skip or an indeterminate verdict.
pub async fn load_lock_policy<G: GitHubApi + ?Sized>(
    github: &G,
    repo: &RepoRef,
    git_ref: &str,
) -> LockPolicy {
    let text = match github.fetch_file(repo, ids::CONFIG_PATH, git_ref).await {
        Ok(text) => text,
        Err(err) if err.is_not_found() => {
            debug!(repo = %repo, git_ref, "no {} found", ids::CONFIG_PATH);
            return LockPolicy::default();
        }
        Err(err) => {
            warn!(repo = %repo, git_ref, error = %err, "failed to fetch config; using empty policy");
            return LockPolicy::default();
        }
    };

    match repolockr_settings::parse_config_yaml(&text) {
        Ok(cfg) => repolockr_settings::resolve_config(cfg),
        Err(err) => {
            warn!(repo = %repo, git_ref, error = %err, "failed to parse config; using empty policy");
            LockPolicy::default()
        }
    }
}

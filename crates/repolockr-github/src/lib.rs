//! GitHub adapters for repolockr.
//!
//! [`GitHubApi`] is the port the application layer talks to: the four REST calls the lock
//! check needs. [`GitHubClient`] implements it over `reqwest`; tests substitute a recording
//! double. Webhook signature verification lives here too since it shares the wire details.

#![forbid(unsafe_code)]

mod client;
mod contents;
mod error;
pub mod webhook;

use async_trait::async_trait;
use repolockr_types::{CheckRunAck, CheckRunId, CreateCheckRun, RepoRef, UpdateCheckRun};
use std::sync::Arc;

pub use client::{GitHubClient, GitHubClientConfig, DEFAULT_API_BASE_URL};
pub use contents::decode_contents;
pub use error::GitHubError;

/// The REST operations the lock check depends on.
#[async_trait]
pub trait GitHubApi: Send + Sync {
    /// Read a UTF-8 file from `repo` at `git_ref`.
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError>;

    /// Every path the pull request touches, in the order the API lists them.
    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<String>, GitHubError>;

    async fn create_check_run(
        &self,
        repo: &RepoRef,
        request: &CreateCheckRun,
    ) -> Result<CheckRunAck, GitHubError>;

    async fn update_check_run(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        request: &UpdateCheckRun,
    ) -> Result<CheckRunAck, GitHubError>;
}

#[async_trait]
impl<T: GitHubApi + ?Sized> GitHubApi for Arc<T> {
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError> {
        (**self).fetch_file(repo, path, git_ref).await
    }

    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<String>, GitHubError> {
        (**self).list_changed_files(repo, pull_number).await
    }

    async fn create_check_run(
        &self,
        repo: &RepoRef,
        request: &CreateCheckRun,
    ) -> Result<CheckRunAck, GitHubError> {
        (**self).create_check_run(repo, request).await
    }

    async fn update_check_run(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        request: &UpdateCheckRun,
    ) -> Result<CheckRunAck, GitHubError> {
        (**self).update_check_run(repo, id, request).await
    }
}

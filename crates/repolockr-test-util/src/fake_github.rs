use async_trait::async_trait;
use repolockr_github::{GitHubApi, GitHubError};
use repolockr_types::{CheckRunAck, CheckRunId, CreateCheckRun, RepoRef, UpdateCheckRun};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard};

/// One recorded call against [`FakeGitHub`], in call order.
#[derive(Clone, Debug, PartialEq)]
pub enum Call {
    FetchFile {
        repo: RepoRef,
        path: String,
        git_ref: String,
    },
    ListChangedFiles {
        repo: RepoRef,
        pull_number: u64,
    },
    CreateCheckRun {
        repo: RepoRef,
        request: CreateCheckRun,
    },
    UpdateCheckRun {
        repo: RepoRef,
        id: CheckRunId,
        request: UpdateCheckRun,
    },
}

#[derive(Debug, Default)]
struct State {
    /// (path, git_ref) -> contents; a `None` ref matches any ref.
    files: BTreeMap<(String, Option<String>), String>,
    changed_files: BTreeMap<u64, Vec<String>>,
    next_check_run_id: u64,
    fail_fetches: Option<GitHubError>,
    fail_listing: Option<GitHubError>,
    fail_updates: Option<GitHubError>,
    fail_creates: Option<GitHubError>,
    calls: Vec<Call>,
}

/// In-memory [`GitHubApi`] that records every call.
#[derive(Debug)]
pub struct FakeGitHub {
    state: Mutex<State>,
}

impl Default for FakeGitHub {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeGitHub {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State {
                next_check_run_id: 1000,
                ..State::default()
            }),
        }
    }

    fn state(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Serve `contents` for `path`, but only at `git_ref`.
    pub fn with_file_at(self, path: &str, git_ref: &str, contents: &str) -> Self {
        self.state().files.insert(
            (path.to_string(), Some(git_ref.to_string())),
            contents.to_string(),
        );
        self
    }

    /// Serve `contents` for `path` at every ref.
    pub fn with_file(self, path: &str, contents: &str) -> Self {
        self.state()
            .files
            .insert((path.to_string(), None), contents.to_string());
        self
    }

    pub fn with_changed_files(self, pull_number: u64, files: &[&str]) -> Self {
        self.state()
            .changed_files
            .insert(pull_number, files.iter().map(|f| f.to_string()).collect());
        self
    }

    pub fn failing_file_fetches(self, error: GitHubError) -> Self {
        self.state().fail_fetches = Some(error);
        self
    }

    pub fn failing_file_listing(self, error: GitHubError) -> Self {
        self.state().fail_listing = Some(error);
        self
    }

    pub fn failing_updates(self, error: GitHubError) -> Self {
        self.state().fail_updates = Some(error);
        self
    }

    pub fn failing_creates(self, error: GitHubError) -> Self {
        self.state().fail_creates = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state().calls.clone()
    }

    pub fn created_check_runs(&self) -> Vec<CreateCheckRun> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::CreateCheckRun { request, .. } => Some(request),
                _ => None,
            })
            .collect()
    }

    pub fn check_run_updates(&self) -> Vec<(CheckRunId, UpdateCheckRun)> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::UpdateCheckRun { id, request, .. } => Some((id, request)),
                _ => None,
            })
            .collect()
    }

    pub fn listed_pull_numbers(&self) -> Vec<u64> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::ListChangedFiles { pull_number, .. } => Some(pull_number),
                _ => None,
            })
            .collect()
    }

    pub fn fetched_refs(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::FetchFile { git_ref, .. } => Some(git_ref),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl GitHubApi for FakeGitHub {
    async fn fetch_file(
        &self,
        repo: &RepoRef,
        path: &str,
        git_ref: &str,
    ) -> Result<String, GitHubError> {
        let mut state = self.state();
        state.calls.push(Call::FetchFile {
            repo: repo.clone(),
            path: path.to_string(),
            git_ref: git_ref.to_string(),
        });
        if let Some(err) = state.fail_fetches.clone() {
            return Err(err);
        }

        let exact = (path.to_string(), Some(git_ref.to_string()));
        let any = (path.to_string(), None);
        state
            .files
            .get(&exact)
            .or_else(|| state.files.get(&any))
            .cloned()
            .ok_or_else(|| GitHubError::NotFound(format!("{path}@{git_ref}")))
    }

    async fn list_changed_files(
        &self,
        repo: &RepoRef,
        pull_number: u64,
    ) -> Result<Vec<String>, GitHubError> {
        let mut state = self.state();
        state.calls.push(Call::ListChangedFiles {
            repo: repo.clone(),
            pull_number,
        });
        if let Some(err) = state.fail_listing.clone() {
            return Err(err);
        }
        Ok(state
            .changed_files
            .get(&pull_number)
            .cloned()
            .unwrap_or_default())
    }

    async fn create_check_run(
        &self,
        repo: &RepoRef,
        request: &CreateCheckRun,
    ) -> Result<CheckRunAck, GitHubError> {
        let mut state = self.state();
        state.calls.push(Call::CreateCheckRun {
            repo: repo.clone(),
            request: request.clone(),
        });
        if let Some(err) = state.fail_creates.clone() {
            return Err(err);
        }
        state.next_check_run_id += 1;
        Ok(CheckRunAck {
            id: CheckRunId(state.next_check_run_id),
            status: request.status,
            conclusion: None,
        })
    }

    async fn update_check_run(
        &self,
        repo: &RepoRef,
        id: CheckRunId,
        request: &UpdateCheckRun,
    ) -> Result<CheckRunAck, GitHubError> {
        let mut state = self.state();
        state.calls.push(Call::UpdateCheckRun {
            repo: repo.clone(),
            id,
            request: request.clone(),
        });
        if let Some(err) = state.fail_updates.clone() {
            return Err(err);
        }
        Ok(CheckRunAck {
            id,
            status: request.status,
            conclusion: request.conclusion,
        })
    }
}

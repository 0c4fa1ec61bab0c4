use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Repository a webhook delivery belongs to.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema)]
pub struct RepoRef {
    pub owner: String,
    pub name: String,
}

impl RepoRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for RepoRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Snapshot of a pull request taken when its event is received.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PullRequestRef {
    pub number: u64,
    pub head_sha: String,
    pub base_sha: String,
    /// Name of the branch the pull request merges from (`head.ref`).
    pub head_branch: String,
}

use repolockr_types::ids;
use std::fmt;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The pull request's head branch is on the allow-list.
    BranchAllowed,
    /// The policy declares no locked files.
    NoLockList,
}

impl SkipReason {
    pub fn code(self) -> &'static str {
        match self {
            SkipReason::BranchAllowed => ids::REASON_BRANCH_ALLOWED,
            SkipReason::NoLockList => ids::REASON_NO_LOCK_LIST,
        }
    }

    pub fn describe(self) -> &'static str {
        match self {
            SkipReason::BranchAllowed => "pull request branch is explicitly allowed",
            SkipReason::NoLockList => "no lock list set",
        }
    }
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.describe())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunDecision {
    Run,
    Skip(SkipReason),
}

impl RunDecision {
    pub fn should_run(self) -> bool {
        matches!(self, RunDecision::Run)
    }

    pub fn skip_reason(self) -> Option<SkipReason> {
        match self {
            RunDecision::Run => None,
            RunDecision::Skip(reason) => Some(reason),
        }
    }
}

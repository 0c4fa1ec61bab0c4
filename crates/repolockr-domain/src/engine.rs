use crate::decision::{RunDecision, SkipReason};
use crate::policy::LockPolicy;
use crate::report;
use repolockr_types::{PullRequestRef, Verdict};
use std::collections::BTreeSet;

/// Decide whether the lock check runs for a pull request.
///
/// Rules, first match wins:
/// 1. head branch on the allow-list -> skip (`BranchAllowed`)
/// 2. no lock list -> skip (`NoLockList`)
/// 3. otherwise run
pub fn should_run(policy: &LockPolicy, pr: &PullRequestRef) -> RunDecision {
    if policy.is_branch_allowed(&pr.head_branch) {
        return RunDecision::Skip(SkipReason::BranchAllowed);
    }

    if !policy.has_lock_list() {
        return RunDecision::Skip(SkipReason::NoLockList);
    }

    RunDecision::Run
}

/// Compare the pull request's changed files against the lock list.
///
/// Matching is exact and case-sensitive. Violations keep the order of `changed_files`.
/// Callers are expected to have checked [`LockPolicy::has_lock_list`] first; with an empty
/// lock list nothing can match and the result is a pass.
pub fn evaluate(policy: &LockPolicy, changed_files: &[String]) -> Verdict {
    let locked: BTreeSet<&str> = policy.lock.iter().map(String::as_str).collect();

    let violating: Vec<String> = changed_files
        .iter()
        .filter(|path| locked.contains(path.as_str()))
        .cloned()
        .collect();

    if violating.is_empty() {
        report::pass()
    } else {
        report::fail(violating)
    }
}

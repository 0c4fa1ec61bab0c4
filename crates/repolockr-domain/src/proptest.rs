//! Property-based tests for the domain crate.
//!
//! These tests use proptest to verify invariants around:
//! - run/skip precedence (allow-list before lock list)
//! - pass iff no changed file is locked
//! - violation order and the singular/plural summary boundary

use crate::decision::{RunDecision, SkipReason};
use crate::engine::{evaluate, should_run};
use crate::policy::LockPolicy;
use crate::test_support::pr_on;
use proptest::prelude::*;
use repolockr_types::Outcome;
use std::collections::BTreeSet;

// ============================================================================
// Strategies
// ============================================================================

/// Repository-relative paths drawn from a small alphabet so collisions are common.
fn arb_path() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-c]{1,2}(/[a-c]{1,2}){0,2}(\\.yml)?").unwrap()
}

fn arb_paths(max: usize) -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(arb_path(), 0..max)
}

fn arb_branch() -> impl Strategy<Value = String> {
    prop::string::string_regex("[a-z]{1,6}(/[a-z]{1,6})?").unwrap()
}

fn arb_policy() -> impl Strategy<Value = LockPolicy> {
    (arb_paths(6), prop::collection::btree_set(arb_branch(), 0..4)).prop_map(
        |(lock, allowed_branches)| LockPolicy {
            lock,
            allowed_branches,
        },
    )
}

// ============================================================================
// Properties
// ============================================================================

proptest! {
    #[test]
    fn empty_lock_list_never_runs(
        allowed in prop::collection::btree_set(arb_branch(), 0..4),
        branch in arb_branch(),
    ) {
        let policy = LockPolicy { lock: Vec::new(), allowed_branches: allowed };
        prop_assert!(!should_run(&policy, &pr_on(&branch)).should_run());
    }

    #[test]
    fn allowed_branch_always_skips_with_branch_reason(
        mut policy in arb_policy(),
        branch in arb_branch(),
    ) {
        policy.allowed_branches.insert(branch.clone());
        prop_assert_eq!(
            should_run(&policy, &pr_on(&branch)),
            RunDecision::Skip(SkipReason::BranchAllowed)
        );
    }

    #[test]
    fn runs_iff_lock_list_present_and_branch_not_allowed(
        policy in arb_policy(),
        branch in arb_branch(),
    ) {
        let expected = policy.has_lock_list() && !policy.allowed_branches.contains(&branch);
        prop_assert_eq!(should_run(&policy, &pr_on(&branch)).should_run(), expected);
    }

    #[test]
    fn disjoint_changes_pass(policy in arb_policy(), changed in arb_paths(12)) {
        let locked: BTreeSet<&String> = policy.lock.iter().collect();
        let changed: Vec<String> = changed.into_iter().filter(|c| !locked.contains(c)).collect();

        let verdict = evaluate(&policy, &changed);
        prop_assert_eq!(verdict.outcome, Outcome::Pass);
        prop_assert!(verdict.violating_files.is_empty());
        prop_assert_eq!(verdict.summary.as_str(), "OK");
    }

    #[test]
    fn violations_are_the_locked_subsequence_of_changes(
        policy in arb_policy(),
        changed in arb_paths(12),
    ) {
        let expected: Vec<String> = changed
            .iter()
            .filter(|c| policy.lock.contains(*c))
            .cloned()
            .collect();

        let verdict = evaluate(&policy, &changed);
        prop_assert_eq!(&verdict.violating_files, &expected);
        prop_assert_eq!(verdict.outcome == Outcome::Pass, expected.is_empty());
    }

    #[test]
    fn failure_detail_lists_each_violation_once(
        policy in arb_policy(),
        changed in arb_paths(12),
    ) {
        let verdict = evaluate(&policy, &changed);
        if verdict.outcome == Outcome::Fail {
            let n = verdict.violating_files.len();
            let detail = verdict.detail.clone().unwrap_or_default();
            let listed: Vec<&str> = detail.lines().skip(1).collect();
            prop_assert_eq!(listed.len(), n);
            for (line, file) in listed.iter().zip(&verdict.violating_files) {
                prop_assert_eq!(*line, format!("- {file}"));
            }
            if n == 1 {
                prop_assert!(verdict.summary.starts_with("There was 1 locked file"));
            } else {
                let expected = format!("There were {n} locked files");
                prop_assert!(verdict.summary.starts_with(&expected));
            }
        } else {
            prop_assert!(verdict.detail.is_none());
        }
    }
}

//! Pure policy evaluation (no IO).
//!
//! Input: a resolved [`policy::LockPolicy`] plus either a pull-request snapshot or the list of
//! files the pull request changed.
//! Output: a run/skip decision, or a verdict.

#![forbid(unsafe_code)]

pub mod decision;
pub mod policy;
pub mod report;

mod engine;

#[cfg(test)]
mod proptest;
#[cfg(test)]
mod test_support;

pub use decision::{RunDecision, SkipReason};
pub use engine::{evaluate, should_run};

use std::collections::BTreeSet;

/// Resolved lock policy for one evaluation cycle. Immutable once built.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LockPolicy {
    /// Locked paths in declared order. Empty means nothing can be enforced.
    pub lock: Vec<String>,
    /// Head branches exempt from enforcement.
    pub allowed_branches: BTreeSet<String>,
}

impl LockPolicy {
    pub fn has_lock_list(&self) -> bool {
        !self.lock.is_empty()
    }

    pub fn is_branch_allowed(&self, branch: &str) -> bool {
        self.allowed_branches.contains(branch)
    }
}

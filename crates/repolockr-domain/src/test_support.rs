use crate::policy::LockPolicy;
use repolockr_types::PullRequestRef;

pub fn policy(lock: &[&str], allow: &[&str]) -> LockPolicy {
    LockPolicy {
        lock: files(lock),
        allowed_branches: allow.iter().map(|b| b.to_string()).collect(),
    }
}

pub fn files(paths: &[&str]) -> Vec<String> {
    paths.iter().map(|p| p.to_string()).collect()
}

pub fn pr_on(branch: &str) -> PullRequestRef {
    PullRequestRef {
        number: 1,
        head_sha: "1111111".to_string(),
        base_sha: "2222222".to_string(),
        head_branch: branch.to_string(),
    }
}

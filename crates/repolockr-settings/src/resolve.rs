use crate::model::RepolockrConfigV1;
use repolockr_domain::policy::LockPolicy;

/// Resolve the policy used by the engine. Absent sections resolve to empty lists.
pub fn resolve_config(cfg: RepolockrConfigV1) -> LockPolicy {
    let lock = cfg.lock.unwrap_or_default();
    let allowed_branches = cfg
        .branches
        .and_then(|b| b.allow)
        .unwrap_or_default()
        .into_iter()
        .collect();

    LockPolicy {
        lock,
        allowed_branches,
    }
}

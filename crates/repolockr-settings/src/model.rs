use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// `.github/repolockr.yml` schema v1.
///
/// This is a *user-facing* model: every section is optional and unknown keys are ignored, so
/// a partially written file still yields whatever it does declare.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RepolockrConfigV1 {
    /// Repository-relative paths that pull requests must not modify.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lock: Option<Vec<String>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub branches: Option<BranchesConfig>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct BranchesConfig {
    /// Head branch names exempt from enforcement (exact match).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub allow: Option<Vec<String>>,
}

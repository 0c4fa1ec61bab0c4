//! Stable names and fixed report texts.
//!
//! These strings are user-visible on the check run and are matched by tests; change them only
//! together with the feature files under `tests/features/`.

/// Name of the check run created on every enforced pull request.
pub const CHECK_RUN_NAME: &str = "repolockr";

/// Repository path of the policy document.
pub const CONFIG_PATH: &str = ".github/repolockr.yml";

/// Title attached to every completed check run.
pub const REPORT_TITLE: &str = "repolockr report";

// Summaries
pub const SUMMARY_PASS: &str = "OK";
pub const SUMMARY_INDETERMINATE: &str =
    "The configured list of locked files could not be determined";

/// First line of the failure detail; one `- <path>` line follows per violating file.
pub const DETAIL_HEADER: &str = "The following locked files were modified:";

// Skip reasons
pub const REASON_BRANCH_ALLOWED: &str = "branch_allowed";
pub const REASON_NO_LOCK_LIST: &str = "no_lock_list";

// Annotation codes
pub const CODE_LOCKED_FILE_MODIFIED: &str = "locked_file_modified";

//! Policy file parsing and resolution.
//!
//! This crate is intentionally IO-free: it parses `.github/repolockr.yml` provided as a string.
//! Fetching the document and falling back on failure is the caller's job.

#![forbid(unsafe_code)]

mod model;
mod resolve;

pub use model::{BranchesConfig, RepolockrConfigV1};
pub use resolve::resolve_config;

/// Parse `.github/repolockr.yml` into a typed model.
///
/// A blank (or comment-only) document parses to the default (empty) configuration.
pub fn parse_config_yaml(input: &str) -> anyhow::Result<RepolockrConfigV1> {
    if is_blank_document(input) {
        return Ok(RepolockrConfigV1::default());
    }
    let cfg: Option<RepolockrConfigV1> = serde_yaml::from_str(input)?;
    Ok(cfg.unwrap_or_default())
}

fn is_blank_document(input: &str) -> bool {
    input
        .lines()
        .map(str::trim)
        .all(|line| line.is_empty() || line.starts_with('#') || line == "---")
}

//! Correlation token carried in a check run's `external_id`.
//!
//! The token is the only state shared between the pull-request event that queues a check run
//! and the later check-run event that completes it. Every format change goes through this
//! module so the two sides cannot drift apart.
//!
//! Wire forms:
//! - `v1:<head_sha>:<base_sha>:<pull_number>` (written)
//! - `<head_sha>:<base_sha>:<pull_number>` (legacy, read only)

use crate::PullRequestRef;
use thiserror::Error;

/// Version prefix written by [`CorrelationToken::encode`].
pub const CORRELATION_VERSION: &str = "v1";

const SEPARATOR: char = ':';

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct CorrelationToken {
    pub head_sha: String,
    pub base_sha: String,
    pub pull_number: u64,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CorrelationError {
    #[error("correlation token is empty")]
    Empty,

    #[error("unsupported correlation token version: {0}")]
    UnsupportedVersion(String),

    #[error("malformed correlation token: expected {expected} fields, found {found}")]
    FieldCount { expected: usize, found: usize },

    #[error("correlation token has an empty {0}")]
    EmptyField(&'static str),

    #[error("correlation token has an invalid pull number: {0}")]
    InvalidPullNumber(String),
}

impl CorrelationToken {
    pub fn for_pull_request(pr: &PullRequestRef) -> Self {
        Self {
            head_sha: pr.head_sha.clone(),
            base_sha: pr.base_sha.clone(),
            pull_number: pr.number,
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "{CORRELATION_VERSION}{SEPARATOR}{}{SEPARATOR}{}{SEPARATOR}{}",
            self.head_sha, self.base_sha, self.pull_number
        )
    }

    pub fn decode(raw: &str) -> Result<Self, CorrelationError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(CorrelationError::Empty);
        }

        let fields: Vec<&str> = raw.split(SEPARATOR).collect();
        let body = match fields.as_slice() {
            [version, rest @ ..] if *version == CORRELATION_VERSION => {
                if rest.len() != 3 {
                    return Err(CorrelationError::FieldCount {
                        expected: 4,
                        found: fields.len(),
                    });
                }
                rest
            }
            [_, _, _] => fields.as_slice(),
            [version, ..] if fields.len() == 4 => {
                return Err(CorrelationError::UnsupportedVersion(version.to_string()));
            }
            _ => {
                return Err(CorrelationError::FieldCount {
                    expected: 4,
                    found: fields.len(),
                });
            }
        };

        let (head_sha, base_sha, number) = (body[0], body[1], body[2]);
        if head_sha.is_empty() {
            return Err(CorrelationError::EmptyField("head sha"));
        }
        if base_sha.is_empty() {
            return Err(CorrelationError::EmptyField("base sha"));
        }
        let pull_number = number
            .parse::<u64>()
            .map_err(|_| CorrelationError::InvalidPullNumber(number.to_string()))?;

        Ok(Self {
            head_sha: head_sha.to_string(),
            base_sha: base_sha.to_string(),
            pull_number,
        })
    }
}

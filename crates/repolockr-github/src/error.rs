use thiserror::Error;

/// Errors from a GitHub REST call. Any of them aborts the current cycle; none are retried.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum GitHubError {
    /// The resource does not exist (or the installation cannot see it).
    #[error("not found: {0}")]
    NotFound(String),

    /// Non-success response other than 401/404/rate limiting.
    #[error("GitHub API error ({status}): {message}")]
    Api { status: u16, message: String },

    #[error("authentication error: {0}")]
    Authentication(String),

    #[error("rate limit exceeded, retry after {retry_after_secs} seconds")]
    RateLimited { retry_after_secs: u64 },

    /// Transport failure before a response was received.
    #[error("network error: {0}")]
    Network(String),

    /// A response arrived but did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl GitHubError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, GitHubError::NotFound(_))
    }
}

//! Recover which pull request a check-run event is about.

use repolockr_types::{CorrelationToken, PullRequestRef};
use thiserror::Error;
use tracing::warn;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum IdentityError {
    #[error("check run has no associated pull requests")]
    MissingPullRequests,
}

/// Pick the pull request a check run belongs to.
///
/// Zero candidates is an error. With several, the first one wins and a warning is logged.
pub fn resolve_pull_request(
    pull_requests: &[PullRequestRef],
) -> Result<&PullRequestRef, IdentityError> {
    match pull_requests {
        [] => Err(IdentityError::MissingPullRequests),
        [only] => Ok(only),
        [first, ..] => {
            warn!(
                count = pull_requests.len(),
                pull_number = first.number,
                "check run is associated with multiple pull requests; using the first"
            );
            Ok(first)
        }
    }
}

/// Decode a check run's `external_id`. Unreadable tokens are logged and treated as absent.
pub fn decode_correlation(external_id: Option<&str>) -> Option<CorrelationToken> {
    let raw = external_id?;
    match CorrelationToken::decode(raw) {
        Ok(token) => Some(token),
        Err(err) => {
            warn!(external_id = raw, error = %err, "ignoring unreadable correlation token");
            None
        }
    }
}

/// Resolve the pull request for a check-run cycle.
///
/// The association supplies the head branch. When a correlation token is present its number and
/// commits take precedence, since they were captured when the check run was queued.
pub fn pull_request_for_check_run(
    pull_requests: &[PullRequestRef],
    correlation: Option<&CorrelationToken>,
) -> Result<PullRequestRef, IdentityError> {
    let associated = resolve_pull_request(pull_requests)?;
    let Some(token) = correlation else {
        return Ok(associated.clone());
    };

    if token.pull_number != associated.number {
        warn!(
            token_pull_number = token.pull_number,
            associated_pull_number = associated.number,
            "correlation token and association disagree; trusting the token"
        );
    }

    Ok(PullRequestRef {
        number: token.pull_number,
        head_sha: token.head_sha.clone(),
        base_sha: token.base_sha.clone(),
        head_branch: associated.head_branch.clone(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pr(number: u64, branch: &str) -> PullRequestRef {
        PullRequestRef {
            number,
            head_sha: format!("head{number}"),
            base_sha: format!("base{number}"),
            head_branch: branch.to_string(),
        }
    }

    #[test]
    fn zero_associations_is_fatal() {
        assert_eq!(
            resolve_pull_request(&[]),
            Err(IdentityError::MissingPullRequests)
        );
        assert_eq!(
            pull_request_for_check_run(&[], None),
            Err(IdentityError::MissingPullRequests)
        );
    }

    #[test]
    fn multiple_associations_pick_the_first() {
        let prs = [pr(3, "a"), pr(9, "b")];
        assert_eq!(resolve_pull_request(&prs), Ok(&prs[0]));
    }

    #[test]
    fn token_overrides_commits_and_number() {
        let token = CorrelationToken {
            head_sha: "cafe".to_string(),
            base_sha: "f00d".to_string(),
            pull_number: 12,
        };
        let resolved = pull_request_for_check_run(&[pr(12, "feature/x")], Some(&token))
            .expect("resolved");
        assert_eq!(
            resolved,
            PullRequestRef {
                number: 12,
                head_sha: "cafe".to_string(),
                base_sha: "f00d".to_string(),
                head_branch: "feature/x".to_string(),
            }
        );
    }

    #[test]
    fn unreadable_tokens_are_absent() {
        assert_eq!(decode_correlation(None), None);
        assert_eq!(decode_correlation(Some("garbage")), None);
        assert_eq!(
            decode_correlation(Some("aa:bb:5")).map(|t| t.pull_number),
            Some(5)
        );
    }
}

//! Maps Octocrab failures and HTTP statuses onto [`GitHubError`].

use http::StatusCode;

use crate::github::error::GitHubError;
use crate::github::rate_limit::RateLimitInfo;

use super::http_utils::GitHubErrorBody;

/// Checks if an octocrab error represents a network/transport issue.
pub(super) const fn is_network_error(error: &octocrab::Error) -> bool {
    matches!(
        error,
        octocrab::Error::Http { .. }
            | octocrab::Error::Hyper { .. }
            | octocrab::Error::Service { .. }
    )
}

/// Checks whether a refused request was refused because the quota ran out.
///
/// GitHub answers 403 (sometimes 401 or 429) both for permission problems and
/// for an exhausted rate limit; only the headers or the message tell them
/// apart.
pub(super) fn is_rate_limit_error(
    status: StatusCode,
    rate_limit: Option<&RateLimitInfo>,
    body: &GitHubErrorBody,
) -> bool {
    let is_rate_limit_status = matches!(
        status,
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN | StatusCode::TOO_MANY_REQUESTS
    );

    let signals_exhaustion = rate_limit.is_some_and(RateLimitInfo::is_exhausted)
        || body.message.to_lowercase().contains("rate limit")
        || body
            .documentation_url
            .as_deref()
            .is_some_and(|url| url.contains("rate-limit"));

    is_rate_limit_status && signals_exhaustion
}

pub(super) fn map_transport_error(operation: &str, error: &octocrab::Error) -> GitHubError {
    if is_network_error(error) {
        GitHubError::Unreachable {
            message: format!("{operation} failed: {error}"),
        }
    } else {
        GitHubError::InvalidRequest {
            message: format!("{operation} failed: {error}"),
        }
    }
}

pub(super) fn map_http_error(
    status: StatusCode,
    rate_limit: Option<RateLimitInfo>,
    body: GitHubErrorBody,
) -> GitHubError {
    if is_rate_limit_error(status, rate_limit.as_ref(), &body) {
        GitHubError::RateLimited {
            rate_limit,
            message: body.message,
        }
    } else {
        GitHubError::Upstream {
            status: status.as_u16(),
            message: body.message,
        }
    }
}

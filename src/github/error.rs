//! Error types exposed by the GitHub client layer.

use thiserror::Error;

use super::rate_limit::RateLimitInfo;

/// Errors surfaced while talking to the GitHub REST API.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GitHubError {
    /// The API could not be reached (timeout, DNS, refused connection).
    #[error("GitHub API unreachable: {message}")]
    Unreachable {
        /// Transport-level error detail.
        message: String,
    },

    /// GitHub answered with a non-success status.
    #[error("GitHub API returned {status}: {message}")]
    Upstream {
        /// HTTP status code of the response.
        status: u16,
        /// GitHub's `message` field, or a placeholder when absent.
        message: String,
    },

    /// The request was refused because the rate limit is exhausted.
    #[error("GitHub API rate limit exceeded: {message}")]
    RateLimited {
        /// Rate limit headers, when GitHub sent them.
        rate_limit: Option<RateLimitInfo>,
        /// Error message from GitHub.
        message: String,
    },

    /// A success response carried a body that could not be decoded.
    #[error("failed to decode GitHub response: {message}")]
    Decode {
        /// Deserialisation error detail.
        message: String,
    },

    /// The request could not be built (bad repository name or token).
    #[error("invalid GitHub request: {message}")]
    InvalidRequest {
        /// What was wrong with the request.
        message: String,
    },
}

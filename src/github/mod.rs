//! GitHub REST access for repository and pull request snapshots.
//!
//! The gateway wraps Octocrab's raw request API so every response is
//! classified into a [`GitHubError`] variant the dashboard can act on:
//! transport failures, rate limiting, other upstream statuses, and bodies
//! that do not decode.

pub mod error;
pub mod gateway;
pub mod locator;
pub mod models;
pub mod rate_limit;

pub use error::GitHubError;
pub use gateway::{
    DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT, GitHubGateway, GitHubHttpClient, OctocrabGateway,
};
pub use locator::{PersonalAccessToken, RepositoryName, RepositoryOwner, RepositorySlug};
pub use models::{
    AuthenticatedUser, Author, BranchRef, MergeableState, PullRequest, PullRequestState,
    Repository,
};
pub use rate_limit::RateLimitInfo;

#[cfg(test)]
pub use gateway::MockGitHubGateway;

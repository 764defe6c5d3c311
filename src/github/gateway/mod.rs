//! Gateway for the GitHub endpoints the dashboard reads.
//!
//! The trait keeps the dashboard testable with mocks; [`OctocrabGateway`]
//! performs the real HTTP requests through [`GitHubHttpClient`].

mod client;
mod error_mapping;
mod http_utils;
mod rest;

#[cfg(test)]
mod tests;

pub use client::{DEFAULT_API_BASE, DEFAULT_REQUEST_TIMEOUT, GitHubHttpClient};
pub use rest::OctocrabGateway;

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::locator::{PersonalAccessToken, RepositorySlug};
use crate::github::models::{AuthenticatedUser, PullRequest, Repository};

/// Read access to repositories, their open pull requests, and token identity.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait GitHubGateway: Send + Sync {
    /// `GET /repos/{owner}/{repo}`.
    async fn repository(
        &self,
        slug: &RepositorySlug,
        token: Option<PersonalAccessToken>,
    ) -> Result<Repository, GitHubError>;

    /// `GET /repos/{owner}/{repo}/pulls?state=open&per_page={per_page}`.
    async fn open_pull_requests(
        &self,
        slug: &RepositorySlug,
        per_page: u8,
        token: Option<PersonalAccessToken>,
    ) -> Result<Vec<PullRequest>, GitHubError>;

    /// `GET /user`, used to check that a token is accepted.
    async fn authenticated_user(
        &self,
        token: PersonalAccessToken,
    ) -> Result<AuthenticatedUser, GitHubError>;
}

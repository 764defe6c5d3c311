//! [`GitHubGateway`] implementation over [`GitHubHttpClient`].

use std::time::Duration;

use async_trait::async_trait;

use crate::github::error::GitHubError;
use crate::github::locator::{PersonalAccessToken, RepositorySlug};
use crate::github::models::{ApiPullRequest, AuthenticatedUser, PullRequest, Repository};

use super::GitHubGateway;
use super::client::GitHubHttpClient;

/// Octocrab-backed gateway for the dashboard's three endpoints.
#[derive(Clone)]
pub struct OctocrabGateway {
    client: GitHubHttpClient,
}

impl OctocrabGateway {
    /// Wraps an existing client.
    #[must_use]
    pub const fn new(client: GitHubHttpClient) -> Self {
        Self { client }
    }

    /// Builds a gateway talking to `api_base`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidRequest`] when the client cannot be
    /// constructed.
    pub fn for_api_base(api_base: &str, timeout: Duration) -> Result<Self, GitHubError> {
        GitHubHttpClient::new(api_base, timeout).map(Self::new)
    }
}

#[async_trait]
impl GitHubGateway for OctocrabGateway {
    async fn repository(
        &self,
        slug: &RepositorySlug,
        token: Option<PersonalAccessToken>,
    ) -> Result<Repository, GitHubError> {
        self.client
            .get_json(&slug.repository_path(), token.as_ref())
            .await
    }

    async fn open_pull_requests(
        &self,
        slug: &RepositorySlug,
        per_page: u8,
        token: Option<PersonalAccessToken>,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        let pulls: Vec<ApiPullRequest> = self
            .client
            .get_json(&slug.open_pulls_path(per_page), token.as_ref())
            .await?;
        Ok(pulls.into_iter().map(PullRequest::from).collect())
    }

    async fn authenticated_user(
        &self,
        token: PersonalAccessToken,
    ) -> Result<AuthenticatedUser, GitHubError> {
        self.client.get_json("/user", Some(&token)).await
    }
}

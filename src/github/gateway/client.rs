//! Thin GitHub REST client built on Octocrab's raw request API.
//!
//! Requests carry the versioned media type and a plugin user agent. The
//! `Authorization` header is attached per request so one client can serve
//! both anonymous and authenticated calls while the token changes at runtime.
//! Octocrab's retry middleware is disabled; callers decide what a failure
//! means.

use std::time::Duration;

use http::Uri;
use http::header::{ACCEPT, USER_AGENT};
use octocrab::Octocrab;
use octocrab::service::middleware::retry::RetryConfig;
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::github::error::GitHubError;
use crate::github::locator::PersonalAccessToken;
use crate::github::rate_limit::RateLimitInfo;

use super::error_mapping::{map_http_error, map_transport_error};
use super::http_utils::{authorization_headers, extract_github_error};

/// Public GitHub API endpoint.
pub const DEFAULT_API_BASE: &str = "https://api.github.com";

/// Request timeout applied when none is configured.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

const GITHUB_MEDIA_TYPE: &str = "application/vnd.github.v3+json";
const PLUGIN_USER_AGENT: &str = concat!("github-dashboard/", env!("CARGO_PKG_VERSION"));

/// GET-only JSON client for the GitHub REST API.
#[derive(Clone)]
pub struct GitHubHttpClient {
    client: Octocrab,
}

impl GitHubHttpClient {
    /// Builds a client for `api_base` with `timeout` applied to connecting
    /// and to reading each response.
    ///
    /// Must be called from within a Tokio runtime.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidRequest`] when the base URI cannot be
    /// parsed or Octocrab refuses the configuration.
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, GitHubError> {
        let base_uri: Uri =
            api_base
                .parse::<Uri>()
                .map_err(|error| GitHubError::InvalidRequest {
                    message: format!("invalid API base {api_base:?}: {error}"),
                })?;

        let client = Octocrab::builder()
            .base_uri(base_uri)
            .map_err(|error| map_transport_error("configure API base", &error))?
            .add_header(ACCEPT, GITHUB_MEDIA_TYPE.to_owned())
            .add_header(USER_AGENT, PLUGIN_USER_AGENT.to_owned())
            .add_retry_config(RetryConfig::None)
            .set_connect_timeout(Some(timeout))
            .set_read_timeout(Some(timeout))
            .build()
            .map_err(|error| map_transport_error("build client", &error))?;

        Ok(Self { client })
    }

    /// Issues `GET {api_base}{path}` and decodes the JSON body.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::Unreachable`] for transport failures,
    /// [`GitHubError::RateLimited`] when the quota is exhausted,
    /// [`GitHubError::Upstream`] for any other non-2xx status,
    /// [`GitHubError::Decode`] when a success body is not the expected JSON,
    /// and [`GitHubError::InvalidRequest`] when `path` or the token cannot
    /// form a request.
    pub async fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        token: Option<&PersonalAccessToken>,
    ) -> Result<T, GitHubError> {
        let uri: Uri = path
            .parse::<Uri>()
            .map_err(|error| GitHubError::InvalidRequest {
                message: format!("invalid request path {path:?}: {error}"),
            })?;
        let headers = authorization_headers(token)?;

        let response = self
            .client
            ._get_with_headers(uri, headers)
            .await
            .map_err(|error| map_transport_error(path, &error))?;

        let status = response.status();
        let rate_limit = RateLimitInfo::from_headers(response.headers());
        let body = self
            .client
            .body_to_string(response)
            .await
            .map_err(|error| map_transport_error(path, &error))?;

        debug!(path, status = status.as_u16(), authenticated = token.is_some(), "GitHub response");

        if status.is_success() {
            serde_json::from_str(&body).map_err(|error| GitHubError::Decode {
                message: format!("{path}: {error}"),
            })
        } else {
            Err(map_http_error(
                status,
                rate_limit,
                extract_github_error(status, &body),
            ))
        }
    }
}

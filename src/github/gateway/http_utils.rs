//! Shared HTTP utilities for the GitHub client.

use http::StatusCode;
use http::header::{AUTHORIZATION, HeaderMap, HeaderValue};

use crate::github::error::GitHubError;
use crate::github::locator::PersonalAccessToken;

/// The parts of a GitHub error body the client cares about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) struct GitHubErrorBody {
    pub(super) message: String,
    pub(super) documentation_url: Option<String>,
}

/// Builds the per-request headers; `None` for anonymous requests.
pub(super) fn authorization_headers(
    token: Option<&PersonalAccessToken>,
) -> Result<Option<HeaderMap>, GitHubError> {
    let Some(present) = token else {
        return Ok(None);
    };

    let mut value = HeaderValue::from_str(&format!("token {}", present.value())).map_err(|_| {
        GitHubError::InvalidRequest {
            message: "token contains characters not allowed in a header".to_owned(),
        }
    })?;
    value.set_sensitive(true);

    let mut headers = HeaderMap::new();
    headers.insert(AUTHORIZATION, value);
    Ok(Some(headers))
}

/// Pulls `message` and `documentation_url` out of an error body, falling back
/// to the status reason phrase.
pub(super) fn extract_github_error(status: StatusCode, body: &str) -> GitHubErrorBody {
    let parsed = serde_json::from_str::<serde_json::Value>(body).ok();
    let field = |name: &str| {
        parsed
            .as_ref()
            .and_then(|value| value.get(name))
            .and_then(serde_json::Value::as_str)
            .map(ToOwned::to_owned)
    };

    GitHubErrorBody {
        message: field("message").unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_owned()
        }),
        documentation_url: field("documentation_url"),
    }
}

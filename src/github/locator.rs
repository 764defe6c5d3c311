//! Repository identifiers and credential wrappers.

use std::fmt;

use super::error::GitHubError;

/// Repository owner wrapper to avoid stringly typed parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryOwner(String);

impl RepositoryOwner {
    /// Borrow the owner value.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// Repository name wrapper to prevent parameter mix-ups.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryName(String);

impl RepositoryName {
    /// Borrow the repository name.
    #[must_use]
    pub const fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A repository addressed as `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositorySlug {
    owner: RepositoryOwner,
    name: RepositoryName,
}

impl RepositorySlug {
    /// Parses an `owner/name` string.
    ///
    /// Surrounding whitespace is ignored. Each segment may only use ASCII
    /// letters, digits, `.`, `-` and `_`, and may not be `.` or `..`.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidRequest`] when the value is not of the
    /// form `owner/name`.
    ///
    /// # Example
    ///
    /// ```
    /// use github_dashboard::github::RepositorySlug;
    ///
    /// let slug = RepositorySlug::parse("octocat/hello-world").expect("valid slug");
    /// assert_eq!(slug.owner().as_str(), "octocat");
    /// assert_eq!(slug.to_string(), "octocat/hello-world");
    /// ```
    pub fn parse(value: &str) -> Result<Self, GitHubError> {
        let trimmed = value.trim();
        let invalid = || GitHubError::InvalidRequest {
            message: format!("repository must be in owner/name form, got {trimmed:?}"),
        };

        let (owner, name) = trimmed.split_once('/').ok_or_else(invalid)?;
        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(invalid());
        }

        Ok(Self {
            owner: RepositoryOwner(owner.to_owned()),
            name: RepositoryName(name.to_owned()),
        })
    }

    /// Repository owner.
    #[must_use]
    pub const fn owner(&self) -> &RepositoryOwner {
        &self.owner
    }

    /// Repository name.
    #[must_use]
    pub const fn name(&self) -> &RepositoryName {
        &self.name
    }

    /// REST path for the repository resource.
    #[must_use]
    pub fn repository_path(&self) -> String {
        format!("/repos/{}/{}", self.owner.as_str(), self.name.as_str())
    }

    /// REST path listing open pull requests, one page of `per_page` entries.
    #[must_use]
    pub fn open_pulls_path(&self, per_page: u8) -> String {
        format!(
            "{}/pulls?state=open&per_page={per_page}",
            self.repository_path()
        )
    }
}

impl fmt::Display for RepositorySlug {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(formatter, "{}/{}", self.owner.as_str(), self.name.as_str())
    }
}

/// Segments end up verbatim in request paths.
fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment.chars().all(|character| {
            character.is_ascii_alphanumeric() || matches!(character, '.' | '-' | '_')
        })
}

/// Personal access token wrapper enforcing presence.
#[derive(Clone, PartialEq, Eq)]
pub struct PersonalAccessToken(String);

impl PersonalAccessToken {
    /// Trims the token and rejects blank values.
    #[must_use]
    pub fn new(token: impl AsRef<str>) -> Option<Self> {
        let trimmed = token.as_ref().trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// Borrow the token value.
    #[must_use]
    pub const fn value(&self) -> &str {
        self.0.as_str()
    }
}

impl AsRef<str> for PersonalAccessToken {
    fn as_ref(&self) -> &str {
        self.value()
    }
}

impl fmt::Debug for PersonalAccessToken {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter.write_str("PersonalAccessToken(***)")
    }
}

//! Repository and pull request snapshots served to the dashboard.
//!
//! Field names follow the GitHub REST payloads so the panel can consume
//! upstream and cached data alike. [`Repository`] deserialises straight from
//! the API; pull requests go through an internal payload type because the merged
//! state is derived from `merged_at`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[cfg(any(test, feature = "test-support"))]
pub mod test_support;


/// Account summary for a repository owner or pull request author.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Login name.
    pub login: String,
    /// Avatar image URL.
    #[serde(default)]
    pub avatar_url: String,
}

impl Default for Author {
    fn default() -> Self {
        Self {
            login: "ghost".to_owned(),
            avatar_url: String::new(),
        }
    }
}

/// Snapshot of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Repository {
    /// Numeric GitHub identifier.
    pub id: u64,
    /// Repository name without the owner.
    pub name: String,
    /// `owner/name`.
    pub full_name: String,
    /// Free-form description.
    #[serde(default)]
    pub description: Option<String>,
    /// Star count.
    #[serde(default)]
    pub stargazers_count: u64,
    /// Fork count.
    #[serde(default)]
    pub forks_count: u64,
    /// Open issues, pull requests included.
    #[serde(default)]
    pub open_issues_count: u64,
    /// Primary language as detected by GitHub.
    #[serde(default)]
    pub language: Option<String>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Browser URL.
    pub html_url: String,
    /// Whether the repository is private.
    #[serde(default)]
    pub private: bool,
    /// Whether the repository is a fork.
    #[serde(default)]
    pub fork: bool,
    /// Whether the repository is archived.
    #[serde(default)]
    pub archived: bool,
    /// Default branch name.
    #[serde(default)]
    pub default_branch: Option<String>,
    /// Repository topics.
    #[serde(default)]
    pub topics: Vec<String>,
    /// Owning account.
    #[serde(default)]
    pub owner: Option<Author>,
}

/// Lifecycle state of a pull request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PullRequestState {
    /// Open for review.
    Open,
    /// Closed without merging.
    Closed,
    /// Merged into its base branch.
    Merged,
}

/// GitHub's assessment of whether a pull request can be merged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeableState {
    /// Mergeable with passing checks.
    Clean,
    /// Merge conflicts.
    Dirty,
    /// Mergeable with failing or pending checks.
    Unstable,
    /// Blocked by branch protection.
    Blocked,
    /// Head branch is behind the base.
    Behind,
    /// Draft pull request.
    Draft,
    /// Mergeable with passing commit status and pre-receive hooks.
    HasHooks,
    /// Not yet computed, or a value this client does not know.
    #[default]
    #[serde(other)]
    Unknown,
}

/// Branch reference on either side of a pull request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BranchRef {
    /// Branch name.
    #[serde(rename = "ref")]
    pub name: String,
}

/// One open (or recently closed) pull request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PullRequest {
    /// Numeric GitHub identifier.
    pub id: u64,
    /// Pull request number, unique within the repository.
    pub number: u64,
    /// Title.
    pub title: String,
    /// Description body.
    pub body: Option<String>,
    /// Lifecycle state.
    pub state: PullRequestState,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
    /// Last update timestamp.
    pub updated_at: DateTime<Utc>,
    /// Merge timestamp, when merged.
    pub merged_at: Option<DateTime<Utc>>,
    /// Browser URL.
    pub html_url: String,
    /// Author account.
    pub user: Author,
    /// Whether the pull request is a draft.
    pub draft: bool,
    /// Merge readiness reported by GitHub.
    pub mergeable_state: MergeableState,
    /// Source branch.
    pub head: BranchRef,
    /// Target branch.
    pub base: BranchRef,
}

/// Pull request as returned by the list endpoint.
#[derive(Debug, Deserialize)]
pub(crate) struct ApiPullRequest {
    id: u64,
    number: u64,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    body: Option<String>,
    #[serde(default)]
    state: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[serde(default)]
    merged_at: Option<DateTime<Utc>>,
    #[serde(default)]
    html_url: Option<String>,
    #[serde(default)]
    user: Option<Author>,
    #[serde(default)]
    draft: Option<bool>,
    #[serde(default)]
    mergeable_state: Option<MergeableState>,
    #[serde(default)]
    head: Option<BranchRef>,
    #[serde(default)]
    base: Option<BranchRef>,
}

impl From<ApiPullRequest> for PullRequest {
    fn from(api: ApiPullRequest) -> Self {
        let state = if api.merged_at.is_some() {
            PullRequestState::Merged
        } else if api.state.as_deref() == Some("closed") {
            PullRequestState::Closed
        } else {
            PullRequestState::Open
        };

        Self {
            id: api.id,
            number: api.number,
            title: api.title.unwrap_or_default(),
            body: api.body,
            state,
            created_at: api.created_at,
            updated_at: api.updated_at,
            merged_at: api.merged_at,
            html_url: api.html_url.unwrap_or_default(),
            user: api.user.unwrap_or_default(),
            draft: api.draft.unwrap_or(false),
            mergeable_state: api.mergeable_state.unwrap_or_default(),
            head: api.head.unwrap_or_default(),
            base: api.base.unwrap_or_default(),
        }
    }
}

/// The authenticated account behind a token.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AuthenticatedUser {
    /// Login name.
    pub login: String,
}

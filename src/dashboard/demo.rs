//! Fixed stand-in data for an unconfigured or unauthenticated dashboard.
//!
//! Timestamps are relative to `now` so the panel shows plausible ages.

use chrono::{DateTime, TimeDelta, Utc};

use crate::github::{
    Author, BranchRef, MergeableState, PullRequest, PullRequestState, Repository,
};

/// The two demo repositories shown when none are configured.
#[must_use]
pub fn demo_repositories(now: DateTime<Utc>) -> Vec<Repository> {
    vec![
        Repository {
            id: 1,
            name: "delve".to_owned(),
            full_name: "PortableSheep/delve".to_owned(),
            description: Some(
                "Advanced plugin system for Go applications - Configure your GitHub token for real data"
                    .to_owned(),
            ),
            stargazers_count: 1250,
            forks_count: 180,
            open_issues_count: 23,
            language: Some("Go".to_owned()),
            updated_at: now - TimeDelta::hours(2),
            html_url: "https://github.com/PortableSheep/delve".to_owned(),
            private: false,
            fork: false,
            archived: false,
            default_branch: Some("main".to_owned()),
            topics: vec!["go".to_owned(), "plugins".to_owned(), "development".to_owned()],
            owner: None,
        },
        Repository {
            id: 2,
            name: "delve-plugins".to_owned(),
            full_name: "PortableSheep/delve-plugins".to_owned(),
            description: Some(
                "Official plugin collection for Delve - Monitor GitHub repositories and pull requests"
                    .to_owned(),
            ),
            stargazers_count: 89,
            forks_count: 34,
            open_issues_count: 8,
            language: Some("Go".to_owned()),
            updated_at: now - TimeDelta::hours(1),
            html_url: "https://github.com/PortableSheep/delve-plugins".to_owned(),
            private: false,
            fork: false,
            archived: false,
            default_branch: Some("main".to_owned()),
            topics: vec!["plugins".to_owned(), "extensions".to_owned(), "github".to_owned()],
            owner: None,
        },
    ]
}

/// Two demo pull requests for `full_name`; the second is a draft.
#[must_use]
pub fn demo_pull_requests(full_name: &str, now: DateTime<Utc>) -> Vec<PullRequest> {
    vec![
        PullRequest {
            id: 42,
            number: 42,
            title: "Add enhanced GitHub dashboard features".to_owned(),
            body: Some(
                "This PR adds new features to the GitHub dashboard including better UI, caching, and error handling."
                    .to_owned(),
            ),
            state: PullRequestState::Open,
            created_at: now - TimeDelta::hours(24),
            updated_at: now - TimeDelta::hours(1),
            merged_at: None,
            html_url: format!("https://github.com/{full_name}/pull/42"),
            user: Author {
                login: "developer".to_owned(),
                avatar_url: "https://github.com/identicons/developer.png".to_owned(),
            },
            draft: false,
            mergeable_state: MergeableState::Clean,
            head: BranchRef {
                name: "feature/enhanced-dashboard".to_owned(),
            },
            base: BranchRef {
                name: "main".to_owned(),
            },
        },
        PullRequest {
            id: 38,
            number: 38,
            title: "Fix responsive design issues".to_owned(),
            body: Some("Addresses mobile layout problems and improves accessibility.".to_owned()),
            state: PullRequestState::Open,
            created_at: now - TimeDelta::hours(48),
            updated_at: now - TimeDelta::hours(2),
            merged_at: None,
            html_url: format!("https://github.com/{full_name}/pull/38"),
            user: Author {
                login: "designer".to_owned(),
                avatar_url: "https://github.com/identicons/designer.png".to_owned(),
            },
            draft: true,
            mergeable_state: MergeableState::Draft,
            head: BranchRef {
                name: "fix/responsive-design".to_owned(),
            },
            base: BranchRef {
                name: "main".to_owned(),
            },
        },
    ]
}

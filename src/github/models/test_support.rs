//! Builders for repository and pull request fixtures.
//!
//! # Examples
//!
//! ```
//! use github_dashboard::github::models::test_support::{pull_request, repository};
//!
//! let repo = repository("octo/widgets");
//! assert_eq!(repo.name, "widgets");
//!
//! let pr = pull_request("octo/widgets", 3);
//! assert_eq!(pr.html_url, "https://github.com/octo/widgets/pull/3");
//! ```

use chrono::{DateTime, Utc};

use super::{Author, BranchRef, MergeableState, PullRequest, PullRequestState, Repository};

fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::from_timestamp(1_735_689_600, 0).unwrap_or_default()
}

/// A public repository named after `full_name` with small, fixed counts.
#[must_use]
pub fn repository(full_name: &str) -> Repository {
    let name = full_name
        .split_once('/')
        .map_or(full_name, |(_, name)| name)
        .to_owned();

    Repository {
        id: 1,
        name,
        full_name: full_name.to_owned(),
        description: Some(format!("Fixture for {full_name}")),
        stargazers_count: 3,
        forks_count: 1,
        open_issues_count: 0,
        language: Some("Rust".to_owned()),
        updated_at: fixed_timestamp(),
        html_url: format!("https://github.com/{full_name}"),
        private: false,
        fork: false,
        archived: false,
        default_branch: Some("main".to_owned()),
        topics: Vec::new(),
        owner: None,
    }
}

/// An open, non-draft pull request against `main`.
#[must_use]
pub fn pull_request(full_name: &str, number: u64) -> PullRequest {
    PullRequest {
        id: number,
        number,
        title: format!("Fixture change #{number}"),
        body: None,
        state: PullRequestState::Open,
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
        merged_at: None,
        html_url: format!("https://github.com/{full_name}/pull/{number}"),
        user: Author {
            login: "octocat".to_owned(),
            avatar_url: String::new(),
        },
        draft: false,
        mergeable_state: MergeableState::Clean,
        head: BranchRef {
            name: format!("change-{number}"),
        },
        base: BranchRef {
            name: "main".to_owned(),
        },
    }
}

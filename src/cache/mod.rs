//! In-process snapshot cache with read-time freshness.
//!
//! Entries never expire on their own. Freshness is decided when an entry is
//! read: an entry is fresh while `now - fetched_at < ttl`. Stale entries stay
//! in place until they are overwritten, so callers can fall back to them when
//! a refresh fails.
//!
//! The cache is plain data; the dashboard keeps it behind the same mutex as
//! the settings.

use std::collections::HashMap;

use chrono::{DateTime, TimeDelta, Utc};

use crate::github::{PullRequest, Repository};

#[cfg(test)]
mod tests;

/// Key prefix for repository snapshots.
pub const REPOSITORY_PREFIX: &str = "repo:";

/// Key prefix for pull request lists.
pub const PULL_REQUESTS_PREFIX: &str = "prs:";

/// Whether a cached value may be served without asking upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Younger than the cache timeout.
    Fresh,
    /// At or past the cache timeout.
    Stale,
}

impl Freshness {
    /// Returns true for [`Freshness::Fresh`].
    #[must_use]
    pub const fn is_fresh(self) -> bool {
        matches!(self, Self::Fresh)
    }
}

/// A cached value and the instant it was fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CacheEntry<T> {
    /// Cached value.
    pub value: T,
    /// When the value was fetched from upstream.
    pub fetched_at: DateTime<Utc>,
}

impl<T> CacheEntry<T> {
    /// Freshness of the entry at `now` for the given `ttl`.
    #[must_use]
    pub fn freshness(&self, now: DateTime<Utc>, ttl: TimeDelta) -> Freshness {
        if now.signed_duration_since(self.fetched_at) < ttl {
            Freshness::Fresh
        } else {
            Freshness::Stale
        }
    }
}

/// One key space of the cache.
#[derive(Debug, Clone)]
pub struct Namespace<T> {
    prefix: &'static str,
    entries: HashMap<String, CacheEntry<T>>,
}

impl<T: Clone> Namespace<T> {
    fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            entries: HashMap::new(),
        }
    }

    fn key(&self, full_name: &str) -> String {
        format!("{}{full_name}", self.prefix)
    }

    /// Looks up `full_name` and reports its freshness.
    #[must_use]
    pub fn get(&self, full_name: &str, now: DateTime<Utc>, ttl: TimeDelta) -> Option<(T, Freshness)> {
        self.entries
            .get(&self.key(full_name))
            .map(|entry| (entry.value.clone(), entry.freshness(now, ttl)))
    }

    /// Stores `value` for `full_name`, replacing any previous entry.
    pub fn put(&mut self, full_name: &str, value: T, fetched_at: DateTime<Utc>) {
        let key = self.key(full_name);
        self.entries.insert(key, CacheEntry { value, fetched_at });
    }

    /// Number of entries, fresh or stale.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the namespace holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn clear(&mut self) {
        self.entries.clear();
    }
}

/// Repository snapshots and pull request lists.
#[derive(Debug, Clone)]
pub struct CacheStore {
    repositories: Namespace<Repository>,
    pull_requests: Namespace<Vec<PullRequest>>,
}

impl Default for CacheStore {
    fn default() -> Self {
        Self {
            repositories: Namespace::new(REPOSITORY_PREFIX),
            pull_requests: Namespace::new(PULL_REQUESTS_PREFIX),
        }
    }
}

impl CacheStore {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The `repo:` key space.
    #[must_use]
    pub const fn repositories(&self) -> &Namespace<Repository> {
        &self.repositories
    }

    /// Mutable access to the `repo:` key space.
    pub const fn repositories_mut(&mut self) -> &mut Namespace<Repository> {
        &mut self.repositories
    }

    /// The `prs:` key space.
    #[must_use]
    pub const fn pull_requests(&self) -> &Namespace<Vec<PullRequest>> {
        &self.pull_requests
    }

    /// Mutable access to the `prs:` key space.
    pub const fn pull_requests_mut(&mut self) -> &mut Namespace<Vec<PullRequest>> {
        &mut self.pull_requests
    }

    /// Drops every entry in both key spaces.
    pub fn invalidate_all(&mut self) {
        self.repositories.clear();
        self.pull_requests.clear();
    }

    /// Total entries across both key spaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.repositories.len() + self.pull_requests.len()
    }

    /// Returns true when both key spaces are empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.repositories.is_empty() && self.pull_requests.is_empty()
    }
}

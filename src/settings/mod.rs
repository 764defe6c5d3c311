//! Persisted dashboard settings.
//!
//! Settings are stored as one JSON object under [`SETTINGS_KEY`]. Values
//! outside their documented range are clamped rather than rejected, and each
//! correction is logged as a warning.
//!
//! `compact_view`, `show_private_repos` and `max_repos_per_page` are kept for
//! the panel; the backend only stores and returns them.

use std::fmt;
use std::time::Duration;

use chrono::TimeDelta;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

use crate::github::{PersonalAccessToken, RepositorySlug};


/// Storage key for the settings object.
pub const SETTINGS_KEY: &str = "dashboard_settings";

/// Version tag written alongside the settings.
pub const SETTINGS_VERSION: &str = "1.0.0";

/// Placeholder returned instead of the token when redaction is enabled.
pub const REDACTED_TOKEN: &str = "********";

/// Allowed `refresh_interval` range in seconds.
pub const REFRESH_INTERVAL_BOUNDS: (i64, i64) = (30, 3600);
/// Allowed `max_repos_per_page` range.
pub const MAX_REPOS_PER_PAGE_BOUNDS: (i64, i64) = (1, 100);
/// Allowed `max_prs_per_repo` range.
pub const MAX_PRS_PER_REPO_BOUNDS: (i64, i64) = (1, 50);
/// Allowed `cache_timeout` range in seconds.
pub const CACHE_TIMEOUT_BOUNDS: (i64, i64) = (0, 86_400);

/// User-editable dashboard settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardSettings {
    /// Personal access token; empty means unauthenticated.
    pub github_token: String,
    /// Repositories to show, as `owner/name`, in display order.
    pub repositories: Vec<String>,
    /// Seconds between background refreshes.
    pub refresh_interval: i64,
    /// Panel density toggle.
    pub compact_view: bool,
    /// Whether the panel lists private repositories.
    pub show_private_repos: bool,
    /// Panel page size for repositories.
    pub max_repos_per_page: i64,
    /// Open pull requests requested per repository.
    pub max_prs_per_repo: i64,
    /// Seconds a cached snapshot stays fresh.
    pub cache_timeout: i64,
}

impl Default for DashboardSettings {
    fn default() -> Self {
        Self {
            github_token: String::new(),
            repositories: Vec::new(),
            refresh_interval: 300,
            compact_view: false,
            show_private_repos: true,
            max_repos_per_page: 50,
            max_prs_per_repo: 20,
            cache_timeout: 300,
        }
    }
}

/// A correction applied by [`DashboardSettings::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsAdjustment {
    /// A numeric field was outside its range.
    Clamped {
        /// Field name as stored.
        field: &'static str,
        /// Value before clamping.
        from: i64,
        /// Value after clamping.
        to: i64,
    },
    /// A repository entry was blank or not `owner/name`.
    DroppedRepository {
        /// The rejected entry.
        entry: String,
    },
}

impl fmt::Display for SettingsAdjustment {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Clamped { field, from, to } => {
                write!(formatter, "{field} {from} is out of range, using {to}")
            }
            Self::DroppedRepository { entry } => {
                write!(formatter, "ignoring repository {entry:?}: expected owner/name")
            }
        }
    }
}

impl DashboardSettings {
    /// Builds settings from a stored JSON value, keeping defaults for any
    /// field that is missing or has the wrong type.
    #[must_use]
    pub fn from_stored(value: &Value) -> Self {
        let mut settings = Self::default();
        let Some(object) = value.as_object() else {
            warn!("stored settings are not a JSON object; using defaults");
            return settings;
        };

        if let Some(token) = object.get("github_token").and_then(Value::as_str) {
            token.clone_into(&mut settings.github_token);
        }
        if let Some(entries) = object.get("repositories").and_then(Value::as_array) {
            settings.repositories = entries
                .iter()
                .filter_map(Value::as_str)
                .map(ToOwned::to_owned)
                .collect();
        }
        if let Some(flag) = object.get("compact_view").and_then(Value::as_bool) {
            settings.compact_view = flag;
        }
        if let Some(flag) = object.get("show_private_repos").and_then(Value::as_bool) {
            settings.show_private_repos = flag;
        }

        let integer = |name: &str| object.get(name).and_then(Value::as_i64);
        if let Some(seconds) = integer("refresh_interval") {
            settings.refresh_interval = seconds;
        }
        if let Some(count) = integer("max_repos_per_page") {
            settings.max_repos_per_page = count;
        }
        if let Some(count) = integer("max_prs_per_repo") {
            settings.max_prs_per_repo = count;
        }
        if let Some(seconds) = integer("cache_timeout") {
            settings.cache_timeout = seconds;
        }

        settings
    }

    /// Clamps numeric fields, trims and filters repository entries, and
    /// returns what was changed. Every adjustment is logged.
    pub fn validate(&mut self) -> Vec<SettingsAdjustment> {
        let mut adjustments = Vec::new();

        clamp_field(
            "refresh_interval",
            &mut self.refresh_interval,
            REFRESH_INTERVAL_BOUNDS,
            &mut adjustments,
        );
        clamp_field(
            "max_repos_per_page",
            &mut self.max_repos_per_page,
            MAX_REPOS_PER_PAGE_BOUNDS,
            &mut adjustments,
        );
        clamp_field(
            "max_prs_per_repo",
            &mut self.max_prs_per_repo,
            MAX_PRS_PER_REPO_BOUNDS,
            &mut adjustments,
        );
        clamp_field(
            "cache_timeout",
            &mut self.cache_timeout,
            CACHE_TIMEOUT_BOUNDS,
            &mut adjustments,
        );

        let entries = std::mem::take(&mut self.repositories);
        for entry in entries {
            match RepositorySlug::parse(&entry) {
                Ok(slug) => self.repositories.push(slug.to_string()),
                Err(_) => adjustments.push(SettingsAdjustment::DroppedRepository { entry }),
            }
        }

        for adjustment in &adjustments {
            warn!(%adjustment, "adjusted dashboard settings");
        }
        if self.token().is_none() {
            warn!("no GitHub token configured; pull requests will show demo data");
        }

        adjustments
    }

    /// The configured token, if any.
    #[must_use]
    pub fn token(&self) -> Option<PersonalAccessToken> {
        PersonalAccessToken::new(&self.github_token)
    }

    /// Delay between background refreshes.
    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        let (min, max) = REFRESH_INTERVAL_BOUNDS;
        let seconds = self.refresh_interval.clamp(min, max);
        Duration::from_secs(seconds.unsigned_abs())
    }

    /// How long a cached snapshot stays fresh.
    #[must_use]
    pub fn cache_ttl(&self) -> TimeDelta {
        let (min, max) = CACHE_TIMEOUT_BOUNDS;
        TimeDelta::seconds(self.cache_timeout.clamp(min, max))
    }

    /// Page size for the pull request list request.
    #[must_use]
    pub fn pull_request_page_size(&self) -> u8 {
        let (min, max) = MAX_PRS_PER_REPO_BOUNDS;
        u8::try_from(self.max_prs_per_repo.clamp(min, max)).unwrap_or(u8::MAX)
    }

    /// Copy with the token replaced by [`REDACTED_TOKEN`] when one is set.
    #[must_use]
    pub fn redacted(&self) -> Self {
        let mut copy = self.clone();
        if !copy.github_token.is_empty() {
            REDACTED_TOKEN.clone_into(&mut copy.github_token);
        }
        copy
    }

    /// Restores `current`'s token when `self` carries the redaction
    /// placeholder, so a panel that echoes redacted settings back does not
    /// wipe the stored token.
    pub fn restore_redacted_token(&mut self, current: &Self) {
        if self.github_token == REDACTED_TOKEN {
            self.github_token.clone_from(&current.github_token);
        }
    }
}

fn clamp_field(
    field: &'static str,
    value: &mut i64,
    (min, max): (i64, i64),
    adjustments: &mut Vec<SettingsAdjustment>,
) {
    let clamped = (*value).clamp(min, max);
    if clamped != *value {
        adjustments.push(SettingsAdjustment::Clamped {
            field,
            from: *value,
            to: clamped,
        });
        *value = clamped;
    }
}

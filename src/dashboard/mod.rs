//! The dashboard context shared by the dispatcher and the refresh scheduler.
//!
//! [`Dashboard`] owns the settings and the snapshot cache behind a single
//! mutex. The lock is only held for plain data access and never across an
//! upstream request: fetches snapshot what they need, release the lock, call
//! the gateway, then re-lock to store the result.
//!
//! Failure handling follows the panel's needs rather than strict error
//! propagation:
//!
//! - a repository that cannot be fetched falls back to its stale snapshot,
//!   and is otherwise left out of batch results;
//! - pull request lists never fail; they fall back to a stale list, or to an
//!   empty one;
//! - without a token, pull request lists come from the demo dataset.
//!
//! Settings writes are serialised by a separate async gate so the blocking
//! store call can run on the blocking pool without the state mutex held.

mod demo;


pub use demo::{demo_pull_requests, demo_repositories};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use chrono::TimeDelta;
use serde::Serialize;
use tokio::sync::Mutex as WriteGate;
use tokio::task;
use tracing::{debug, info, warn};

use crate::cache::{CacheStore, Freshness};
use crate::clock::Clock;
use crate::github::{GitHubError, GitHubGateway, PersonalAccessToken, PullRequest, Repository, RepositorySlug};
use crate::persistence::{PersistenceError, SettingsStore};
use crate::settings::{DashboardSettings, SETTINGS_KEY, SETTINGS_VERSION, SettingsAdjustment};

/// Result of a health check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    /// False when a configured token was rejected or GitHub was unreachable.
    pub healthy: bool,
    /// Human-readable summary.
    pub message: String,
    /// Number of configured repositories.
    pub repos_configured: usize,
    /// Cached snapshots across both key spaces.
    pub cache_entries: usize,
    /// Whether a token is configured.
    pub has_github_token: bool,
}

struct DashboardState {
    settings: DashboardSettings,
    cache: CacheStore,
}

/// What a fetch needs from the settings, copied out of the lock.
struct FetchContext {
    token: Option<PersonalAccessToken>,
    ttl: TimeDelta,
    page_size: u8,
}

/// Settings, cache, and the collaborators needed to refresh them.
pub struct Dashboard {
    gateway: Arc<dyn GitHubGateway>,
    store: Arc<dyn SettingsStore>,
    clock: Arc<dyn Clock>,
    state: Mutex<DashboardState>,
    writes: WriteGate<()>,
}

impl Dashboard {
    /// Creates a dashboard with the given settings, used as-is.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn GitHubGateway>,
        store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
        settings: DashboardSettings,
    ) -> Self {
        Self {
            gateway,
            store,
            clock,
            state: Mutex::new(DashboardState {
                settings,
                cache: CacheStore::new(),
            }),
            writes: WriteGate::new(()),
        }
    }

    /// Creates a dashboard from the settings stored under
    /// [`SETTINGS_KEY`], validated.
    ///
    /// Missing or unreadable settings are not fatal: the dashboard starts
    /// with defaults and logs why.
    #[must_use]
    pub fn load(
        gateway: Arc<dyn GitHubGateway>,
        store: Arc<dyn SettingsStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let mut settings = match store.load(SETTINGS_KEY) {
            Ok(Some(stored)) => {
                if stored.version != SETTINGS_VERSION {
                    warn!(
                        stored = %stored.version,
                        expected = SETTINGS_VERSION,
                        "stored settings version differs; loading what can be read"
                    );
                }
                DashboardSettings::from_stored(&stored.value)
            }
            Ok(None) => {
                info!("no stored settings; using defaults");
                DashboardSettings::default()
            }
            Err(error) => {
                warn!(%error, "failed to load stored settings; using defaults");
                DashboardSettings::default()
            }
        };
        settings.validate();
        info!(
            repositories = settings.repositories.len(),
            authenticated = settings.token().is_some(),
            "loaded dashboard settings"
        );

        Self::new(gateway, store, clock, settings)
    }

    fn lock(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn fetch_context(&self) -> FetchContext {
        let state = self.lock();
        FetchContext {
            token: state.settings.token(),
            ttl: state.settings.cache_ttl(),
            page_size: state.settings.pull_request_page_size(),
        }
    }

    /// Copy of the current settings.
    #[must_use]
    pub fn settings(&self) -> DashboardSettings {
        self.lock().settings.clone()
    }

    /// Number of configured repositories.
    #[must_use]
    pub fn configured_repository_count(&self) -> usize {
        self.lock().settings.repositories.len()
    }

    /// Delay until the next background refresh.
    #[must_use]
    pub fn refresh_period(&self) -> Duration {
        self.lock().settings.refresh_period()
    }

    /// Cached snapshots across both key spaces.
    #[must_use]
    pub fn cache_entries(&self) -> usize {
        self.lock().cache.len()
    }

    /// Resolves one repository from cache or upstream.
    ///
    /// # Errors
    ///
    /// Returns [`GitHubError::InvalidRequest`] for a malformed name, or the
    /// upstream error when the fetch fails and no stale snapshot exists.
    pub async fn fetch_repository(&self, full_name: &str) -> Result<Repository, GitHubError> {
        let slug = RepositorySlug::parse(full_name)?;
        let key = slug.to_string();
        let context = self.fetch_context();

        let cached = self
            .lock()
            .cache
            .repositories()
            .get(&key, self.clock.now(), context.ttl);
        if let Some((repository, Freshness::Fresh)) = cached {
            debug!(repository = %key, "serving cached repository");
            return Ok(repository);
        }

        match self.gateway.repository(&slug, context.token).await {
            Ok(repository) => {
                let now = self.clock.now();
                self.lock()
                    .cache
                    .repositories_mut()
                    .put(&key, repository.clone(), now);
                Ok(repository)
            }
            Err(error) => {
                let Some((stale, _)) = cached else {
                    return Err(error);
                };
                warn!(repository = %key, %error, "refresh failed; serving stale repository");
                Ok(stale)
            }
        }
    }

    /// Resolves the open pull requests of one repository.
    ///
    /// Never fails: errors are logged and yield a stale list or an empty one.
    pub async fn fetch_pull_requests(&self, full_name: &str) -> Vec<PullRequest> {
        let slug = match RepositorySlug::parse(full_name) {
            Ok(slug) => slug,
            Err(error) => {
                warn!(repository = full_name, %error, "not fetching pull requests");
                return Vec::new();
            }
        };
        let key = slug.to_string();
        let context = self.fetch_context();

        let cached = self
            .lock()
            .cache
            .pull_requests()
            .get(&key, self.clock.now(), context.ttl);
        if let Some((pulls, Freshness::Fresh)) = cached {
            debug!(repository = %key, "serving cached pull requests");
            return pulls;
        }

        let Some(token) = context.token else {
            debug!(repository = %key, "no token configured; serving demo pull requests");
            return demo_pull_requests(&key, self.clock.now());
        };

        match self
            .gateway
            .open_pull_requests(&slug, context.page_size, Some(token))
            .await
        {
            Ok(pulls) => {
                let now = self.clock.now();
                self.lock()
                    .cache
                    .pull_requests_mut()
                    .put(&key, pulls.clone(), now);
                info!(repository = %key, count = pulls.len(), "fetched pull requests");
                pulls
            }
            Err(error) => {
                let Some((stale, _)) = cached else {
                    warn!(repository = %key, %error, "failed to fetch pull requests");
                    return Vec::new();
                };
                warn!(repository = %key, %error, "refresh failed; serving stale pull requests");
                stale
            }
        }
    }

    /// Resolves every configured repository in order, leaving out those
    /// that fail.
    pub async fn fetch_all_configured_repositories(&self) -> Vec<Repository> {
        let configured = self.lock().settings.repositories.clone();
        let mut repositories = Vec::with_capacity(configured.len());

        for full_name in &configured {
            match self.fetch_repository(full_name).await {
                Ok(repository) => repositories.push(repository),
                Err(error) => warn!(repository = full_name, %error, "skipping repository"),
            }
        }

        info!(
            configured = configured.len(),
            fetched = repositories.len(),
            "fetched configured repositories"
        );
        repositories
    }

    /// Repositories for the panel: the demo dataset when none are
    /// configured, the configured ones otherwise.
    pub async fn repositories(&self) -> Vec<Repository> {
        if self.configured_repository_count() == 0 {
            debug!("no repositories configured; serving demo repositories");
            return demo_repositories(self.clock.now());
        }
        self.fetch_all_configured_repositories().await
    }

    /// Drops every cached snapshot.
    pub fn invalidate_all(&self) {
        let mut state = self.lock();
        let dropped = state.cache.len();
        state.cache.invalidate_all();
        info!(dropped, "cache cleared");
    }

    /// Validates and persists new settings, then makes them current.
    ///
    /// `update` receives the current settings and returns the replacement.
    /// Updates run one at a time; readers keep seeing the current settings
    /// until the write has succeeded. When it fails they are left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the settings cannot be stored.
    pub async fn update_settings<F>(
        &self,
        update: F,
    ) -> Result<Vec<SettingsAdjustment>, PersistenceError>
    where
        F: FnOnce(&DashboardSettings) -> DashboardSettings,
    {
        let _writing = self.writes.lock().await;
        let mut next = update(&self.settings());
        let adjustments = next.validate();
        self.write_settings(&next).await?;

        let repositories = next.repositories.len();
        self.lock().settings = next;
        info!(
            repositories,
            adjusted = adjustments.len(),
            "settings updated"
        );
        Ok(adjustments)
    }

    /// Writes the current settings to storage.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the settings cannot be stored.
    pub async fn persist_settings(&self) -> Result<(), PersistenceError> {
        let _writing = self.writes.lock().await;
        let settings = self.settings();
        self.write_settings(&settings).await
    }

    /// Runs the store call on the blocking pool; `SQLite` writes block.
    async fn write_settings(&self, settings: &DashboardSettings) -> Result<(), PersistenceError> {
        let value =
            serde_json::to_value(settings).map_err(|error| PersistenceError::WriteFailed {
                message: error.to_string(),
            })?;
        let store = Arc::clone(&self.store);

        task::spawn_blocking(move || store.store(SETTINGS_KEY, &value, SETTINGS_VERSION))
            .await
            .map_err(|error| PersistenceError::WriteFailed {
                message: format!("settings write task failed: {error}"),
            })?
    }

    /// Checks the configured token against GitHub and reports counts.
    ///
    /// Without a token no request is made and the dashboard is healthy.
    pub async fn health(&self) -> HealthReport {
        let (token, repos_configured) = {
            let state = self.lock();
            (state.settings.token(), state.settings.repositories.len())
        };
        let has_github_token = token.is_some();

        let (healthy, message) = match self.check_token(token).await {
            Ok(()) => (true, "Plugin is healthy".to_owned()),
            Err(error) => (false, format!("GitHub API connectivity failed: {error}")),
        };

        HealthReport {
            healthy,
            message,
            repos_configured,
            cache_entries: self.cache_entries(),
            has_github_token,
        }
    }

    async fn check_token(&self, token: Option<PersonalAccessToken>) -> Result<(), GitHubError> {
        let Some(present) = token else {
            return Ok(());
        };
        let user = self.gateway.authenticated_user(present).await?;
        debug!(login = %user.login, "token accepted");
        Ok(())
    }
}

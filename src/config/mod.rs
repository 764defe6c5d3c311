//! Startup configuration loaded from CLI, environment, and files.
//!
//! These are process options, separate from the dashboard settings the
//! panel edits at runtime.
//!
//! # Precedence
//!
//! Values are merged with the following precedence (lowest to highest):
//!
//! 1. **Defaults** – built-in values
//! 2. **Configuration file** – `.github-dashboard.toml` in the current or home
//!    directory, or `github-dashboard.toml` in the XDG config directory
//! 3. **Environment variables** – `GITHUB_DASHBOARD_*`
//! 4. **Command-line arguments** – `--database-url`, `--api-base`, ...
//!
//! # Configuration File
//!
//! ```toml
//! database_url = "dashboard.sqlite"
//! api_base = "https://github.example.com/api/v3"
//! request_timeout_seconds = 15
//! redact_token = true
//! telemetry = false
//! ```

use std::time::Duration;

use ortho_config::OrthoConfig;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

use crate::github::DEFAULT_API_BASE;
use crate::service::ServiceOptions;

#[cfg(test)]
mod tests;

const DEFAULT_REQUEST_TIMEOUT_SECONDS: u64 = 30;

/// Startup configuration that cannot be used.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// `api_base` is not an absolute HTTP(S) URL.
    #[error("invalid api_base {value:?}: {message}")]
    InvalidApiBase {
        /// The configured value.
        value: String,
        /// Why it was rejected.
        message: String,
    },

    /// `request_timeout_seconds` is zero.
    #[error("request_timeout_seconds must be greater than zero")]
    ZeroRequestTimeout,
}

/// Process options for the dashboard backend.
///
/// # Environment Variables
///
/// - `GITHUB_DASHBOARD_DATABASE_URL` or `--database-url`: `SQLite` path for
///   settings; without it settings are kept in memory
/// - `GITHUB_DASHBOARD_API_BASE` or `--api-base`: GitHub REST API root
/// - `GITHUB_DASHBOARD_REQUEST_TIMEOUT_SECONDS` or
///   `--request-timeout-seconds`: upstream request timeout
///
/// # Example
///
/// ```no_run
/// use github_dashboard::DashboardConfig;
/// use ortho_config::OrthoConfig;
///
/// let config = DashboardConfig::load().expect("failed to load configuration");
/// config.validate().expect("configuration should be usable");
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, OrthoConfig)]
#[serde(default)]
#[ortho_config(
    prefix = "GITHUB_DASHBOARD",
    discovery(
        dotfile_name = ".github-dashboard.toml",
        config_file_name = "github-dashboard.toml",
        app_name = "github-dashboard"
    )
)]
pub struct DashboardConfig {
    /// Local `SQLite` database path used to persist settings.
    ///
    /// Can be provided via:
    /// - CLI: `--database-url <PATH>`
    /// - Environment: `GITHUB_DASHBOARD_DATABASE_URL`
    /// - Config file: `database_url = "..."`
    #[ortho_config()]
    pub database_url: Option<String>,

    /// Root of the GitHub REST API.
    ///
    /// Defaults to `https://api.github.com`; set it for GitHub Enterprise.
    #[ortho_config(cli_short = 'a')]
    pub api_base: String,

    /// Timeout for each upstream request, in seconds. Defaults to 30.
    #[ortho_config()]
    pub request_timeout_seconds: u64,

    /// Replaces the token with a placeholder in get-config responses.
    ///
    /// Can be provided via:
    /// - CLI: `--redact-token`
    /// - Config file: `redact_token = true`
    ///
    /// `ortho_config` does not load boolean values from the environment.
    #[ortho_config()]
    pub redact_token: bool,

    /// Writes telemetry events to stderr as JSON lines.
    ///
    /// Can be provided via:
    /// - CLI: `--telemetry`
    /// - Config file: `telemetry = true`
    #[ortho_config()]
    pub telemetry: bool,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            database_url: None,
            api_base: DEFAULT_API_BASE.to_owned(),
            request_timeout_seconds: DEFAULT_REQUEST_TIMEOUT_SECONDS,
            redact_token: false,
            telemetry: false,
        }
    }
}

impl DashboardConfig {
    /// Checks values that cannot be clamped into something usable.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] for an unusable API base or a zero timeout.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.api_base_url()?;
        if self.request_timeout_seconds == 0 {
            return Err(ConfigError::ZeroRequestTimeout);
        }
        Ok(())
    }

    /// The parsed API base.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidApiBase`] unless the value is an
    /// absolute `http` or `https` URL.
    pub fn api_base_url(&self) -> Result<Url, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidApiBase {
            value: self.api_base.clone(),
            message,
        };
        let url = Url::parse(self.api_base.trim()).map_err(|error| invalid(error.to_string()))?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(invalid(format!("unsupported scheme {other}"))),
        }
    }

    /// Upstream request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    /// The database path, ignoring blank values.
    #[must_use]
    pub fn database_url(&self) -> Option<&str> {
        self.database_url
            .as_deref()
            .map(str::trim)
            .filter(|url| !url.is_empty())
    }

    /// Options passed to the plugin service.
    #[must_use]
    pub const fn service_options(&self) -> ServiceOptions {
        ServiceOptions {
            redact_token: self.redact_token,
        }
    }
}

//! Routes host messages to the dashboard and wraps the results.
//!
//! Every message yields an [`Envelope`]. Only unknown kinds, malformed
//! requests and failed settings writes produce `success: false`; upstream
//! failures are absorbed by the dashboard's fallbacks. The one exception is
//! the health check, whose `success` mirrors the reported health.

mod envelope;
mod error;


pub use envelope::Envelope;
pub use error::DispatchError;

use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, error, info, warn};

use crate::dashboard::Dashboard;
use crate::settings::DashboardSettings;

/// Confirmation returned by force-refresh.
pub const CACHE_CLEARED: &str = "Cache cleared successfully";

/// Confirmation returned by set-config.
pub const CONFIG_UPDATED: &str = "Configuration updated";

/// The request types the host can send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    /// `1`: the configured repositories, or the demo set.
    GetRepositories,
    /// `2`: open pull requests of one repository.
    GetPullRequests,
    /// `3`: drop every cached snapshot.
    ForceRefresh,
    /// `4`: the current settings.
    GetConfig,
    /// `5`: replace the settings.
    SetConfig,
    /// `6`: token check and counters.
    HealthCheck,
}

impl TryFrom<u32> for MessageKind {
    type Error = DispatchError;

    fn try_from(kind: u32) -> Result<Self, Self::Error> {
        match kind {
            1 => Ok(Self::GetRepositories),
            2 => Ok(Self::GetPullRequests),
            3 => Ok(Self::ForceRefresh),
            4 => Ok(Self::GetConfig),
            5 => Ok(Self::SetConfig),
            6 => Ok(Self::HealthCheck),
            _ => Err(DispatchError::UnknownMessageType { kind }),
        }
    }
}

impl From<MessageKind> for u32 {
    fn from(kind: MessageKind) -> Self {
        match kind {
            MessageKind::GetRepositories => 1,
            MessageKind::GetPullRequests => 2,
            MessageKind::ForceRefresh => 3,
            MessageKind::GetConfig => 4,
            MessageKind::SetConfig => 5,
            MessageKind::HealthCheck => 6,
        }
    }
}

/// Handles host messages against a shared [`Dashboard`].
#[derive(Clone)]
pub struct Dispatcher {
    dashboard: Arc<Dashboard>,
    redact_token: bool,
}

impl Dispatcher {
    /// Creates a dispatcher. With `redact_token` set, get-config hides the
    /// token and set-config keeps it when the placeholder comes back.
    #[must_use]
    pub const fn new(dashboard: Arc<Dashboard>, redact_token: bool) -> Self {
        Self {
            dashboard,
            redact_token,
        }
    }

    /// Handles one message of type `kind` with a JSON `payload`.
    pub async fn handle(&self, kind: u32, payload: &[u8]) -> Envelope {
        let message = match MessageKind::try_from(kind) {
            Ok(message) => message,
            Err(rejected) => {
                warn!(kind, "unknown message type");
                return Envelope::failure(&rejected);
            }
        };
        debug!(?message, "dispatching message");

        self.route(message, payload)
            .await
            .unwrap_or_else(|failure| Envelope::failure(&failure))
    }

    async fn route(&self, message: MessageKind, payload: &[u8]) -> Result<Envelope, DispatchError> {
        match message {
            MessageKind::GetRepositories => {
                let repositories = self.dashboard.repositories().await;
                encode(&repositories).map(Envelope::success)
            }
            MessageKind::GetPullRequests => {
                let repository = repository_parameter(payload)?;
                let pulls = self.dashboard.fetch_pull_requests(&repository).await;
                encode(&pulls).map(Envelope::success)
            }
            MessageKind::ForceRefresh => {
                self.dashboard.invalidate_all();
                Ok(Envelope::success(Value::from(CACHE_CLEARED)))
            }
            MessageKind::GetConfig => {
                let settings = self.dashboard.settings();
                let visible = if self.redact_token {
                    settings.redacted()
                } else {
                    settings
                };
                encode(&visible).map(Envelope::success)
            }
            MessageKind::SetConfig => self.set_config(payload).await,
            MessageKind::HealthCheck => {
                let report = self.dashboard.health().await;
                encode(&report).map(|data| Envelope::with_status(report.healthy, data))
            }
        }
    }

    async fn set_config(&self, payload: &[u8]) -> Result<Envelope, DispatchError> {
        let value: Value =
            serde_json::from_slice(payload).map_err(|_| DispatchError::InvalidConfigFormat)?;
        if !value.is_object() {
            return Err(DispatchError::InvalidConfigFormat);
        }
        let mut incoming: DashboardSettings =
            serde_json::from_value(value).map_err(|_| DispatchError::InvalidConfigFormat)?;

        let redact_token = self.redact_token;
        self.dashboard
            .update_settings(move |current| {
                if redact_token {
                    incoming.restore_redacted_token(current);
                }
                incoming
            })
            .await
            .map_err(|failure| {
                error!(error = %failure, "failed to save settings");
                DispatchError::SaveFailed
            })?;

        info!("configuration updated");
        Ok(Envelope::success(Value::from(CONFIG_UPDATED)))
    }
}

fn repository_parameter(payload: &[u8]) -> Result<String, DispatchError> {
    let request: Value =
        serde_json::from_slice(payload).map_err(|_| DispatchError::InvalidRequestFormat)?;
    if let Some(method) = request.get("method").and_then(Value::as_str) {
        debug!(method, "pull request request");
    }

    request
        .get("params")
        .and_then(|params| params.get("repository"))
        .and_then(Value::as_str)
        .map(ToOwned::to_owned)
        .ok_or(DispatchError::MissingRepository)
}

fn encode<T: Serialize>(payload: &T) -> Result<Value, DispatchError> {
    serde_json::to_value(payload).map_err(|failure| {
        error!(error = %failure, "failed to encode response");
        DispatchError::EncodeFailed
    })
}

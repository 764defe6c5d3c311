//! Plugin lifecycle: start, handle messages, stop.

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::dashboard::Dashboard;
use crate::dispatch::{Dispatcher, Envelope};
use crate::scheduler::RefreshScheduler;
use crate::telemetry::TelemetrySink;

/// Options that are fixed for the lifetime of the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ServiceOptions {
    /// Hide the token from get-config responses.
    pub redact_token: bool,
}

/// The running plugin: dispatcher plus background refresh.
pub struct PluginService {
    dashboard: Arc<Dashboard>,
    dispatcher: Dispatcher,
    telemetry: Arc<dyn TelemetrySink>,
    scheduler: Option<RefreshScheduler>,
}

impl PluginService {
    /// Creates a stopped service.
    #[must_use]
    pub fn new(
        dashboard: Arc<Dashboard>,
        telemetry: Arc<dyn TelemetrySink>,
        options: ServiceOptions,
    ) -> Self {
        let dispatcher = Dispatcher::new(Arc::clone(&dashboard), options.redact_token);
        Self {
            dashboard,
            dispatcher,
            telemetry,
            scheduler: None,
        }
    }

    /// Checks connectivity, warms the cache, and starts background refresh.
    ///
    /// Neither the check nor the warm-up can fail the start; problems are
    /// logged. Calling `start` on a running service does nothing.
    pub async fn start(&mut self) {
        if self.scheduler.is_some() {
            return;
        }

        let health = self.dashboard.health().await;
        if health.healthy {
            info!(
                authenticated = health.has_github_token,
                repositories = health.repos_configured,
                "connectivity check passed"
            );
        } else {
            warn!(detail = %health.message, "connectivity check failed");
        }

        let warmed = self.dashboard.fetch_all_configured_repositories().await;
        info!(repositories = warmed.len(), "initial fetch finished");

        self.scheduler = Some(RefreshScheduler::start(
            Arc::clone(&self.dashboard),
            Arc::clone(&self.telemetry),
        ));
        info!(
            interval_seconds = self.dashboard.refresh_period().as_secs(),
            "dashboard plugin started"
        );
    }

    /// Handles one host message.
    pub async fn handle(&self, kind: u32, payload: &[u8]) -> Envelope {
        self.dispatcher.handle(kind, payload).await
    }

    /// Stops background refresh and writes the settings to storage.
    pub async fn stop(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.stop().await;
        }
        if let Err(failure) = self.dashboard.persist_settings().await {
            error!(error = %failure, "failed to save settings on shutdown");
        }
        info!("dashboard plugin stopped");
    }

    /// The shared dashboard context.
    #[must_use]
    pub const fn dashboard(&self) -> &Arc<Dashboard> {
        &self.dashboard
    }
}

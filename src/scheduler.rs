//! Background refresh of the configured repositories.
//!
//! The loop sleeps for the current refresh interval, re-read on every tick,
//! then spawns a refresh of all configured repositories. A tick is skipped
//! when nothing is configured or the previous refresh is still running.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::dashboard::Dashboard;
use crate::telemetry::{TelemetryEvent, TelemetrySink};

/// Handle to a running refresh loop.
pub struct RefreshScheduler {
    shutdown: watch::Sender<bool>,
    handle: JoinHandle<()>,
}

impl RefreshScheduler {
    /// Spawns the refresh loop on the current Tokio runtime.
    #[must_use]
    pub fn start(dashboard: Arc<Dashboard>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        let (shutdown, receiver) = watch::channel(false);
        let handle = tokio::spawn(run(dashboard, telemetry, receiver));
        Self { shutdown, handle }
    }

    /// Stops the loop and waits for it to exit.
    ///
    /// A refresh already in flight is left to finish on its own.
    pub async fn stop(self) {
        // The loop may already be gone; nothing to signal then.
        let _ignored = self.shutdown.send(true);
        if let Err(error) = self.handle.await {
            warn!(%error, "refresh loop ended abnormally");
        }
        debug!("refresh loop stopped");
    }
}

/// Clears the in-flight flag when a refresh task ends, including by panic.
struct InFlight(Arc<AtomicBool>);

impl Drop for InFlight {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

async fn run(
    dashboard: Arc<Dashboard>,
    telemetry: Arc<dyn TelemetrySink>,
    mut shutdown: watch::Receiver<bool>,
) {
    let in_flight = Arc::new(AtomicBool::new(false));

    loop {
        let period = dashboard.refresh_period();
        tokio::select! {
            () = tokio::time::sleep(period) => {}
            changed = shutdown.changed() => {
                if changed.is_err() || *shutdown.borrow() {
                    break;
                }
                continue;
            }
        }

        tick(&dashboard, &telemetry, &in_flight);
    }
}

fn tick(
    dashboard: &Arc<Dashboard>,
    telemetry: &Arc<dyn TelemetrySink>,
    in_flight: &Arc<AtomicBool>,
) {
    let configured = dashboard.configured_repository_count();
    if configured == 0 {
        debug!("no repositories configured; skipping refresh");
        return;
    }
    if in_flight.swap(true, Ordering::AcqRel) {
        warn!("previous refresh still running; skipping this tick");
        return;
    }

    let guard = InFlight(Arc::clone(in_flight));
    let task_dashboard = Arc::clone(dashboard);
    let task_telemetry = Arc::clone(telemetry);
    tokio::spawn(async move {
        let _guard = guard;
        let refreshed = task_dashboard
            .fetch_all_configured_repositories()
            .await
            .len();
        info!(configured, refreshed, "background refresh finished");
        task_telemetry.record(TelemetryEvent::RefreshCompleted {
            configured,
            refreshed,
        });
    });
}

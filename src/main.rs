//! Dashboard plugin entrypoint: serves host messages over stdin/stdout.

use std::io::{self, Write};
use std::process::ExitCode;
use std::sync::Arc;

use github_dashboard::clock::SystemClock;
use github_dashboard::persistence::{
    InMemorySettingsStore, PersistenceError, SettingsStore, SqliteSettingsStore, migrate_database,
};
use github_dashboard::telemetry::{NoopTelemetrySink, StderrJsonlTelemetrySink, TelemetrySink};
use github_dashboard::{
    ConfigError, Dashboard, DashboardConfig, GitHubError, OctocrabGateway, PluginService, host,
};
use ortho_config::OrthoConfig;
use thiserror::Error;
use tokio::io::BufReader;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Failures that prevent the plugin from starting or serving.
#[derive(Debug, Error)]
enum StartupError {
    #[error("failed to load configuration: {message}")]
    LoadConfig { message: String },

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Persistence(#[from] PersistenceError),

    #[error("failed to create GitHub client: {0}")]
    GitHub(#[from] GitHubError),

    #[error("host connection failed: {0}")]
    Io(#[from] io::Error),
}

#[tokio::main]
async fn main() -> ExitCode {
    init_tracing();

    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => {
            if writeln!(io::stderr().lock(), "{error}").is_err() {
                return ExitCode::FAILURE;
            }
            ExitCode::FAILURE
        }
    }
}

/// Logs go to stderr; stdout carries the host protocol.
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .with_writer(io::stderr)
        .init();
}

async fn run() -> Result<(), StartupError> {
    let config = DashboardConfig::load().map_err(|error| StartupError::LoadConfig {
        message: error.to_string(),
    })?;
    config.validate()?;

    let telemetry = telemetry_sink(&config);
    let store = open_settings_store(&config, telemetry.as_ref())?;
    let gateway = OctocrabGateway::for_api_base(&config.api_base, config.request_timeout())?;
    let dashboard = Dashboard::load(Arc::new(gateway), store, Arc::new(SystemClock));

    let mut service = PluginService::new(Arc::new(dashboard), telemetry, config.service_options());
    service.start().await;

    let served = tokio::select! {
        result = host::serve(&service, BufReader::new(tokio::io::stdin()), tokio::io::stdout()) => result,
        _ = tokio::signal::ctrl_c() => {
            info!("interrupted; shutting down");
            Ok(())
        }
    };

    service.stop().await;
    served.map_err(StartupError::from)
}

fn telemetry_sink(config: &DashboardConfig) -> Arc<dyn TelemetrySink> {
    if config.telemetry {
        Arc::new(StderrJsonlTelemetrySink)
    } else {
        Arc::new(NoopTelemetrySink)
    }
}

/// Migrates and opens the configured database, or falls back to keeping
/// settings in memory when none is configured.
fn open_settings_store(
    config: &DashboardConfig,
    telemetry: &dyn TelemetrySink,
) -> Result<Arc<dyn SettingsStore>, StartupError> {
    let Some(database_url) = config.database_url() else {
        warn!("no database_url configured; settings will not survive a restart");
        return Ok(Arc::new(InMemorySettingsStore::new()));
    };

    migrate_database(database_url, telemetry).map(drop)?;
    info!(database_url, "storing settings in SQLite");
    Ok(Arc::new(SqliteSettingsStore::new(database_url)?))
}

//! Diesel-backed migration runner for the settings database.

use diesel::Connection;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

use crate::telemetry::{TelemetryEvent, TelemetrySink};

use super::PersistenceError;

/// Migrations for the `plugin_settings` table, compiled into the binary.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Version of the newest migration under `migrations/`.
pub const CURRENT_SCHEMA_VERSION: &str = "20260105000000";

/// The version of the newest applied migration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaVersion(String);

impl SchemaVersion {
    /// The version string, e.g. `20260105000000`.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Brings the settings database at `database_url` up to date and records the
/// resulting schema version as a telemetry event.
///
/// # Errors
///
/// Returns [`PersistenceError::BlankDatabaseUrl`] for a blank URL and the
/// matching [`PersistenceError`] variant when connecting, migrating, or
/// reading back the applied versions fails.
pub fn migrate_database(
    database_url: &str,
    telemetry: &dyn TelemetrySink,
) -> Result<SchemaVersion, PersistenceError> {
    let url = database_url.trim();
    if url.is_empty() {
        return Err(PersistenceError::BlankDatabaseUrl);
    }

    let mut connection =
        SqliteConnection::establish(url).map_err(|error| PersistenceError::ConnectionFailed {
            message: error.to_string(),
        })?;

    let migrations_run = connection
        .run_pending_migrations(MIGRATIONS)
        .map_err(|error| PersistenceError::MigrationFailed {
            message: error.to_string(),
        })?
        .len();

    let version = newest_applied(&mut connection)?;
    info!(
        migrations_run,
        schema_version = version.as_str(),
        "settings database ready"
    );
    telemetry.record(TelemetryEvent::SchemaVersionRecorded {
        schema_version: version.0.clone(),
    });

    Ok(version)
}

fn newest_applied(connection: &mut SqliteConnection) -> Result<SchemaVersion, PersistenceError> {
    let applied = connection.applied_migrations().map_err(|error| {
        PersistenceError::SchemaVersionQueryFailed {
            message: error.to_string(),
        }
    })?;

    applied
        .iter()
        .map(ToString::to_string)
        .max()
        .map(SchemaVersion)
        .ok_or(PersistenceError::MissingSchemaVersion)
}

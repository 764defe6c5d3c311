//! Key/value storage for plugin settings.
//!
//! Each key holds one JSON document plus the version tag it was written with.
//! [`SqliteSettingsStore`] keeps them in the `plugin_settings` table created
//! by the embedded migrations; [`InMemorySettingsStore`] is used when no
//! database is configured and loses everything on exit.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};

use diesel::Connection;
use diesel::OptionalExtension;
use diesel::QueryableByName;
use diesel::RunQueryDsl;
use diesel::sql_query;
use diesel::sql_types::{BigInt, Text};
use diesel::sqlite::SqliteConnection;
use serde_json::Value;

use super::PersistenceError;


const SETTINGS_TABLE: &str = "plugin_settings";

/// A stored settings document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredSettings {
    /// The JSON document.
    pub value: Value,
    /// Version tag written with the document.
    pub version: String,
}

/// Persistent storage for settings documents.
#[cfg_attr(test, mockall::automock)]
pub trait SettingsStore: Send + Sync {
    /// Reads the document stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the backend cannot be read or the
    /// stored document is not JSON.
    fn load(&self, key: &str) -> Result<Option<StoredSettings>, PersistenceError>;

    /// Writes `value` under `key`, replacing any previous document.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError`] when the write fails.
    fn store(&self, key: &str, value: &Value, version: &str) -> Result<(), PersistenceError>;
}

/// SQLite-backed settings store.
#[derive(Debug, Clone)]
pub struct SqliteSettingsStore {
    database_url: String,
}

impl SqliteSettingsStore {
    /// Create a store targeting `database_url`.
    ///
    /// # Errors
    ///
    /// Returns [`PersistenceError::BlankDatabaseUrl`] when the URL is blank.
    pub fn new(database_url: impl Into<String>) -> Result<Self, PersistenceError> {
        let database_url_string = database_url.into();
        if database_url_string.trim().is_empty() {
            return Err(PersistenceError::BlankDatabaseUrl);
        }
        Ok(Self {
            database_url: database_url_string.trim().to_owned(),
        })
    }

    fn establish_connection(&self) -> Result<SqliteConnection, PersistenceError> {
        SqliteConnection::establish(&self.database_url).map_err(|error| {
            PersistenceError::ConnectionFailed {
                message: error.to_string(),
            }
        })
    }

    fn settings_table_exists(
        connection: &mut SqliteConnection,
    ) -> Result<bool, diesel::result::Error> {
        #[derive(Debug, QueryableByName)]
        struct Row {
            #[diesel(sql_type = BigInt)]
            count: i64,
        }

        let row: Row = sql_query(
            "SELECT COUNT(*) AS count FROM sqlite_master WHERE type = 'table' AND name = ?;",
        )
        .bind::<Text, _>(SETTINGS_TABLE)
        .get_result(connection)?;

        Ok(row.count > 0)
    }

    fn map_error_with_schema_check<F>(
        connection: &mut SqliteConnection,
        error: &diesel::result::Error,
        create_error: F,
    ) -> PersistenceError
    where
        F: Fn(String) -> PersistenceError,
    {
        match Self::settings_table_exists(connection) {
            Ok(false) => PersistenceError::SchemaNotInitialised,
            Ok(true) => create_error(error.to_string()),
            Err(check_error) => create_error(format!(
                "schema presence check failed: {check_error}; original error: {error}"
            )),
        }
    }
}

impl SettingsStore for SqliteSettingsStore {
    fn load(&self, key: &str) -> Result<Option<StoredSettings>, PersistenceError> {
        #[derive(Debug, QueryableByName)]
        struct Row {
            #[diesel(sql_type = Text)]
            value: String,
            #[diesel(sql_type = Text)]
            version: String,
        }

        let mut connection = self.establish_connection()?;

        let result: Option<Row> =
            sql_query("SELECT value, version FROM plugin_settings WHERE key = ? LIMIT 1;")
                .bind::<Text, _>(key)
                .get_result(&mut connection)
                .optional()
                .map_err(|error| {
                    Self::map_error_with_schema_check(&mut connection, &error, |message| {
                        PersistenceError::QueryFailed { message }
                    })
                })?;

        result
            .map(|row| {
                serde_json::from_str(&row.value)
                    .map(|value| StoredSettings {
                        value,
                        version: row.version,
                    })
                    .map_err(|error| PersistenceError::InvalidStoredValue {
                        message: error.to_string(),
                    })
            })
            .transpose()
    }

    fn store(&self, key: &str, value: &Value, version: &str) -> Result<(), PersistenceError> {
        let serialised = value.to_string();
        let mut connection = self.establish_connection()?;

        sql_query(
            "INSERT INTO plugin_settings (key, value, version) VALUES (?, ?, ?) \
             ON CONFLICT(key) DO UPDATE SET \
               value = excluded.value, \
               version = excluded.version, \
               updated_at = CURRENT_TIMESTAMP;",
        )
        .bind::<Text, _>(key)
        .bind::<Text, _>(serialised)
        .bind::<Text, _>(version)
        .execute(&mut connection)
        .map(drop)
        .map_err(|error| {
            Self::map_error_with_schema_check(&mut connection, &error, |message| {
                PersistenceError::WriteFailed { message }
            })
        })
    }
}

/// Process-local settings store.
#[derive(Debug, Default)]
pub struct InMemorySettingsStore {
    entries: Mutex<HashMap<String, StoredSettings>>,
}

impl InMemorySettingsStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl SettingsStore for InMemorySettingsStore {
    fn load(&self, key: &str) -> Result<Option<StoredSettings>, PersistenceError> {
        let entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        Ok(entries.get(key).cloned())
    }

    fn store(&self, key: &str, value: &Value, version: &str) -> Result<(), PersistenceError> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key.to_owned(),
            StoredSettings {
                value: value.clone(),
                version: version.to_owned(),
            },
        );
        Ok(())
    }
}

//! Error types for settings persistence.

use thiserror::Error;

/// Errors returned while migrating or accessing the settings database.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PersistenceError {
    /// The database URL/path was present but blank.
    #[error("database URL must not be blank")]
    BlankDatabaseUrl,

    /// Establishing a `SQLite` connection failed.
    #[error("failed to connect to SQLite database: {message}")]
    ConnectionFailed {
        /// Error detail from Diesel.
        message: String,
    },

    /// Running pending migrations failed.
    #[error("failed to run database migrations: {message}")]
    MigrationFailed {
        /// Error detail from Diesel migrations.
        message: String,
    },

    /// Reading the schema version from the migration table failed.
    #[error("failed to read schema version after migrations: {message}")]
    SchemaVersionQueryFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// The migrations completed but no schema version could be found.
    #[error("no schema version recorded after migrations ran")]
    MissingSchemaVersion,

    /// The settings table does not exist; migrations have not been run.
    #[error("settings schema is missing; run migrations first")]
    SchemaNotInitialised,

    /// Reading a settings row failed.
    #[error("failed to read settings: {message}")]
    QueryFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// Writing a settings row failed.
    #[error("failed to write settings: {message}")]
    WriteFailed {
        /// Error detail from Diesel query execution.
        message: String,
    },

    /// A stored value is not valid JSON.
    #[error("stored settings are not valid JSON: {message}")]
    InvalidStoredValue {
        /// Error detail from `serde_json`.
        message: String,
    },
}

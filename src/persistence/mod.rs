//! Settings persistence and database migrations.
//!
//! Settings live in a local `SQLite` database when one is configured. The
//! schema is managed with Diesel migrations embedded in the binary.

mod error;
mod migrator;
mod settings_store;

pub use error::PersistenceError;
pub use migrator::{CURRENT_SCHEMA_VERSION, MIGRATIONS, SchemaVersion, migrate_database};
pub use settings_store::{
    InMemorySettingsStore, SettingsStore, SqliteSettingsStore, StoredSettings,
};

#[cfg(test)]
pub use settings_store::MockSettingsStore;

//! Backend for a GitHub repository and pull request dashboard panel.
//!
//! The crate answers typed host messages from a short-lived cache of GitHub
//! snapshots, refreshes the configured repositories in the background, and
//! persists the panel's settings. Without a token or any configured
//! repositories it serves fixed demo data so the panel always has something
//! to show.

pub mod cache;
pub mod clock;
pub mod config;
pub mod dashboard;
pub mod dispatch;
pub mod github;
pub mod host;
pub mod persistence;
pub mod scheduler;
pub mod service;
pub mod settings;
pub mod telemetry;

pub use config::{ConfigError, DashboardConfig};
pub use dashboard::{Dashboard, HealthReport};
pub use dispatch::{DispatchError, Dispatcher, Envelope, MessageKind};
pub use github::{GitHubError, GitHubGateway, OctocrabGateway, PersonalAccessToken};
pub use service::{PluginService, ServiceOptions};
pub use settings::DashboardSettings;

//! Shared test utilities.

use serde_json::{Value, json};
use tempfile::TempDir;

/// Creates a temporary directory for database tests.
///
/// # Panics
///
/// Panics if the temporary directory cannot be created.
pub fn create_temp_dir() -> TempDir {
    TempDir::new().unwrap_or_else(|error| panic!("failed to create temporary directory: {error}"))
}

/// Path of the settings database inside `temp_dir`.
pub fn database_path(temp_dir: &TempDir) -> String {
    temp_dir
        .path()
        .join("dashboard.sqlite")
        .to_string_lossy()
        .to_string()
}

/// A `GET /repos/{owner}/{repo}` response body for `full_name`.
pub fn repository_body(full_name: &str) -> Value {
    let name = full_name
        .split_once('/')
        .map_or(full_name, |(_, repo)| repo);
    json!({
        "id": 7,
        "name": name,
        "full_name": full_name,
        "description": "Mocked repository",
        "stargazers_count": 12,
        "forks_count": 3,
        "open_issues_count": 1,
        "language": "Rust",
        "updated_at": "2025-06-01T12:00:00Z",
        "html_url": format!("https://github.com/{full_name}"),
        "private": false,
        "topics": []
    })
}

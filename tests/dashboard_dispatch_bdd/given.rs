//! Given steps for dashboard dispatch behavioural tests.

use github_dashboard::DashboardSettings;
use rstest_bdd_macros::given;
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use crate::dashboard_dispatch_bdd_state::{DispatchState, install_dashboard, runtime};
use crate::support::repository_body;

fn mount(state: &DispatchState, mock: Mock) {
    let shared_runtime = runtime(state);
    state
        .server
        .with_ref(|server| shared_runtime.block_on(mock.mount(server)))
        .unwrap_or_else(|| panic!("mock server not initialised"));
}

#[given("a dashboard with no repositories configured")]
fn unconfigured_dashboard(dispatch_state: &DispatchState) {
    install_dashboard(dispatch_state, DashboardSettings::default());
}

#[given("a dashboard tracking {repository} with token {token}")]
fn authenticated_dashboard(dispatch_state: &DispatchState, repository: String, token: String) {
    install_dashboard(
        dispatch_state,
        DashboardSettings {
            github_token: token,
            repositories: vec![repository],
            ..DashboardSettings::default()
        },
    );
}

#[given("a dashboard tracking {repository} without a token")]
fn anonymous_dashboard(dispatch_state: &DispatchState, repository: String) {
    install_dashboard(
        dispatch_state,
        DashboardSettings {
            repositories: vec![repository],
            ..DashboardSettings::default()
        },
    );
}

#[given("a mock GitHub API serving repository {repository}")]
fn serve_repository(dispatch_state: &DispatchState, repository: String) {
    let mock = Mock::given(method("GET"))
        .and(path(format!("/repos/{repository}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(repository_body(&repository)));
    mount(dispatch_state, mock);
}

#[given("a mock GitHub API rejecting every token")]
fn reject_tokens(dispatch_state: &DispatchState) {
    let mock = Mock::given(method("GET"))
        .and(path("/user"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "message": "Bad credentials",
            "documentation_url": "https://docs.github.com/rest"
        })));
    mount(dispatch_state, mock);
}

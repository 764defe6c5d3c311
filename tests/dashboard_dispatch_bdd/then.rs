//! Then steps for dashboard dispatch behavioural tests.

use rstest_bdd_macros::then;
use serde_json::{Value, json};

use crate::dashboard_dispatch_bdd_state::{DispatchState, response, runtime};

fn data(dispatch_state: &DispatchState) -> Value {
    response(dispatch_state)
        .data
        .unwrap_or_else(|| panic!("response carries no data"))
}

#[then("the response succeeds")]
fn assert_success(dispatch_state: &DispatchState) {
    let envelope = response(dispatch_state);
    assert!(envelope.success, "expected success, got {envelope:?}");
    assert_eq!(envelope.error, None);
}

#[then("the response is unsuccessful")]
fn assert_unsuccessful(dispatch_state: &DispatchState) {
    assert!(!response(dispatch_state).success, "expected success to be false");
}

#[then("the response fails with {message}")]
fn assert_failure(dispatch_state: &DispatchState, message: String) {
    let envelope = response(dispatch_state);

    assert!(!envelope.success);
    assert_eq!(envelope.error.as_deref(), Some(message.trim_matches('"')));
    assert_eq!(envelope.data, None);
}

#[then("the response lists {count:usize} repositories written in Go")]
fn assert_demo_repositories(dispatch_state: &DispatchState, count: usize) {
    let payload = data(dispatch_state);
    let repositories = payload
        .as_array()
        .unwrap_or_else(|| panic!("expected an array, got {payload}"));

    assert_eq!(repositories.len(), count);
    assert!(
        repositories
            .iter()
            .all(|repository| repository.get("language") == Some(&json!("Go"))),
        "every demo repository should be written in Go"
    );
}

#[then("the response includes a draft pull request")]
fn assert_draft_pull_request(dispatch_state: &DispatchState) {
    let payload = data(dispatch_state);
    let pulls = payload
        .as_array()
        .unwrap_or_else(|| panic!("expected an array, got {payload}"));

    assert!(!pulls.is_empty());
    assert!(
        pulls
            .iter()
            .any(|pull| pull.get("draft") == Some(&json!(true))),
        "expected a draft pull request"
    );
}

#[then("the returned settings have refresh_interval {seconds:i64}")]
fn assert_refresh_interval(dispatch_state: &DispatchState, seconds: i64) {
    let payload = data(dispatch_state);

    assert_eq!(payload.get("refresh_interval"), Some(&json!(seconds)));
}

#[then("the health report counts {count:usize} configured repository")]
fn assert_health_counts(dispatch_state: &DispatchState, count: usize) {
    let payload = data(dispatch_state);

    assert_eq!(payload.get("healthy"), Some(&json!(false)));
    assert_eq!(payload.get("repos_configured"), Some(&json!(count)));
    assert_eq!(payload.get("has_github_token"), Some(&json!(true)));
}

#[then("the mock API received {count:usize} request for {repository}")]
fn assert_single_request(dispatch_state: &DispatchState, count: usize, repository: String) {
    assert_request_count(dispatch_state, count, &repository);
}

#[then("the mock API received {count:usize} requests for {repository}")]
fn assert_requests(dispatch_state: &DispatchState, count: usize, repository: String) {
    assert_request_count(dispatch_state, count, &repository);
}

fn assert_request_count(dispatch_state: &DispatchState, count: usize, repository: &str) {
    let shared_runtime = runtime(dispatch_state);
    let expected_path = format!("/repos/{repository}");

    let requests = dispatch_state
        .server
        .with_ref(|server| shared_runtime.block_on(server.received_requests()))
        .unwrap_or_else(|| panic!("mock server not initialised"))
        .unwrap_or_else(|| panic!("request recording is not enabled"));

    let matching = requests
        .iter()
        .filter(|request| request.url.path() == expected_path)
        .count();

    assert_eq!(matching, count, "unexpected upstream request count");
}

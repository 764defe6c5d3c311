//! When steps for dashboard dispatch behavioural tests.

use rstest_bdd_macros::when;
use serde_json::json;

use crate::dashboard_dispatch_bdd_state::{DispatchState, send};

#[when("the host sends message type {kind:u32}")]
fn send_message(dispatch_state: &DispatchState, kind: u32) {
    send(dispatch_state, kind, b"");
}

#[when("the host requests pull requests for {repository}")]
fn request_pull_requests(dispatch_state: &DispatchState, repository: String) {
    let payload = json!({
        "method": "getPullRequests",
        "params": {"repository": repository}
    });
    send(dispatch_state, 2, payload.to_string().as_bytes());
}

#[when("the host sets refresh_interval to {seconds:i64}")]
fn set_refresh_interval(dispatch_state: &DispatchState, seconds: i64) {
    let payload = json!({"refresh_interval": seconds});
    send(dispatch_state, 5, payload.to_string().as_bytes());
}

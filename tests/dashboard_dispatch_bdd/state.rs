//! Scenario state for dashboard dispatch behavioural tests.

use std::sync::Arc;
use std::time::Duration;

use github_dashboard::clock::SystemClock;
use github_dashboard::persistence::InMemorySettingsStore;
use github_dashboard::{Dashboard, DashboardSettings, Dispatcher, Envelope, OctocrabGateway};
use rstest_bdd::Slot;
use rstest_bdd_macros::ScenarioState;
use wiremock::MockServer;

pub(crate) use crate::support::runtime::{ScenarioRuntime, runtime_with_server};

#[derive(ScenarioState, Default)]
pub(crate) struct DispatchState {
    pub(crate) runtime: Slot<ScenarioRuntime>,
    pub(crate) server: Slot<MockServer>,
    pub(crate) dispatcher: Slot<Dispatcher>,
    pub(crate) response: Slot<Envelope>,
}

/// Starts the runtime and mock server when a step first needs them.
pub(crate) fn runtime(state: &DispatchState) -> ScenarioRuntime {
    runtime_with_server(&state.runtime, &state.server)
}

/// Builds a dispatcher over a real gateway pointed at the mock server.
pub(crate) fn install_dashboard(state: &DispatchState, settings: DashboardSettings) {
    let shared_runtime = runtime(state);
    let api_base = state
        .server
        .with_ref(MockServer::uri)
        .unwrap_or_else(|| panic!("mock server not initialised"));

    let dispatcher = shared_runtime.block_on(async {
        let gateway = OctocrabGateway::for_api_base(&api_base, Duration::from_secs(5))
            .unwrap_or_else(|error| panic!("gateway should build: {error}"));
        let dashboard = Dashboard::new(
            Arc::new(gateway),
            Arc::new(InMemorySettingsStore::new()),
            Arc::new(SystemClock),
            settings,
        );
        Dispatcher::new(Arc::new(dashboard), false)
    });

    state.dispatcher.set(dispatcher);
}

/// Sends one message and records the response.
pub(crate) fn send(state: &DispatchState, kind: u32, payload: &[u8]) {
    let shared_runtime = runtime(state);
    let dispatcher = state
        .dispatcher
        .get()
        .unwrap_or_else(|| panic!("dashboard not installed"));

    let envelope = shared_runtime.block_on(dispatcher.handle(kind, payload));
    state.response.set(envelope);
}

/// The most recent response.
pub(crate) fn response(state: &DispatchState) -> Envelope {
    state
        .response
        .get()
        .unwrap_or_else(|| panic!("no response recorded"))
}

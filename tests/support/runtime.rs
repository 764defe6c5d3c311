//! A Tokio runtime and mock GitHub server kept in scenario slots.

use std::rc::Rc;

use rstest_bdd::Slot;
use tokio::runtime::Runtime;
use wiremock::MockServer;

/// Runtime handle that scenario steps share through a [`Slot`].
#[derive(Clone)]
pub struct ScenarioRuntime(Rc<Runtime>);

impl ScenarioRuntime {
    /// Drives `future` to completion on the scenario runtime.
    pub fn block_on<F: Future>(&self, future: F) -> F::Output {
        self.0.block_on(future)
    }
}

/// Returns the scenario runtime, creating it and the mock server on first
/// use.
pub fn runtime_with_server(
    runtime: &Slot<ScenarioRuntime>,
    server: &Slot<MockServer>,
) -> ScenarioRuntime {
    let scenario_runtime = runtime.get().unwrap_or_else(|| {
        let created = Runtime::new()
            .unwrap_or_else(|error| panic!("failed to create Tokio runtime: {error}"));
        let shared = ScenarioRuntime(Rc::new(created));
        runtime.set(shared.clone());
        shared
    });

    if server.with_ref(|_| ()).is_none() {
        server.set(scenario_runtime.block_on(MockServer::start()));
    }

    scenario_runtime
}

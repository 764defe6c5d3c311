//! Layer composition for configuration tests.

use ortho_config::MergeComposer;
use serde_json::Value;

use crate::DashboardConfig;

/// A configuration source, lowest precedence first.
#[derive(Debug, Clone, Copy)]
pub enum Layer {
    Defaults,
    File,
    Environment,
    Cli,
}

/// Merges `layers` in order into a [`DashboardConfig`].
pub fn merge(layers: &[(Layer, Value)]) -> DashboardConfig {
    let mut composer = MergeComposer::new();

    for (layer, value) in layers.iter().cloned() {
        match layer {
            Layer::Defaults => composer.push_defaults(value),
            Layer::File => composer.push_file(value, None),
            Layer::Environment => composer.push_environment(value),
            Layer::Cli => composer.push_cli(value),
        }
    }

    DashboardConfig::merge_from_layers(composer.layers()).expect("layers should merge")
}

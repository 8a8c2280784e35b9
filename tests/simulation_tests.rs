// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests: configuration file to running network to snapshot.

use spikenn::prelude::*;
use std::fs;

const CONFIG: &str = r#"
[simulation]
time_step = 1.0
seed = 7
ticks = 300

[learning]
stdp_period = 100.0

[construction]
fanout_retry_budget = 2000
"#;

fn toml_config() -> SpikennConfig {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("spikenn.toml");
    fs::write(&path, CONFIG).unwrap();
    load_config(Some(&path), None).unwrap()
}

fn build(config: &SpikennConfig) -> (Network, MemoryLogSink) {
    let mut network = Network::from_config(config);
    let sink = MemoryLogSink::new();
    network.set_log_sink(Box::new(sink.clone()));

    let input = network.add_layer(false, false);
    let output = network.add_layer(true, false);
    let params = LIFParameters::default();

    let layer = network.layer_mut(input).expect("input layer");
    layer.add_neurons(16, NeuronType::Excitatory, params);
    layer.set_input_mode(InputMode::AllMax);

    let layer = network.layer_mut(output).expect("output layer");
    layer.add_neurons(6, NeuronType::Excitatory, params);
    layer.add_neurons(2, NeuronType::Inhibitory, params);
    layer.set_activity_logging(true);

    network
        .connect_fan_out(input, output, 3, &ConnectionParams::default())
        .expect("fan-out");
    (network, sink)
}

fn tracked_weights(network: &Network) -> Vec<f32> {
    let layer = &network.layers()[1];
    layer
        .synapses()
        .iter()
        .filter_map(|id| layer.weight_of(*id))
        .collect()
}

#[test]
fn test_config_file_drives_network() {
    let config = toml_config();
    assert_eq!(config.simulation.seed, Some(7));
    assert_eq!(config.construction.fanout_retry_budget, 2000);

    let (network, _sink) = build(&config);
    assert_eq!(network.seed(), Some(7));
    assert_eq!(network.fanout_retry_budget(), 2000);
    assert_eq!(network.layers()[1].stdp_period(), 100.0);
    assert_eq!(network.synapse_count(), 16 * 3);
}

#[test]
fn test_seeded_runs_are_reproducible() {
    let config = toml_config();
    let (mut a, _) = build(&config);
    let (mut b, _) = build(&config);

    let first = a.run(config.simulation.ticks);
    let second = b.run(config.simulation.ticks);
    assert_eq!(first.spikes, second.spikes);
    assert_eq!(first.stdp_passes, second.stdp_passes);
    assert_eq!(tracked_weights(&a), tracked_weights(&b));
}

#[test]
fn test_learned_weights_stay_bounded() {
    let config = toml_config();
    let (mut network, _) = build(&config);
    network.run(config.simulation.ticks);

    // every source neuron is excitatory
    let bounds = *network.layers()[1].bounds();
    let (min, max) = (
        bounds.min_weight(NeuronType::Excitatory),
        bounds.max_weight(NeuronType::Excitatory),
    );
    for w in tracked_weights(&network) {
        assert!(w >= min && w <= max, "weight {w} outside [{min}, {max}]");
    }
}

#[test]
fn test_snapshot_and_resume() {
    let config = toml_config();
    let (mut network, _) = build(&config);
    let summary = network.run(config.simulation.ticks);
    assert_eq!(summary.ticks, 300);
    assert_eq!(summary.stdp_passes, 3);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("network.snn");
    save_network(&network, &path, &SnapshotMetadata::describe("e2e")).unwrap();

    let snapshot = load_network(&path).unwrap();
    assert_eq!(snapshot.metadata.tick, 300);
    assert_eq!(snapshot.metadata.description, "e2e");

    let mut restored = snapshot.network;
    assert_ne!(restored.id(), network.id());
    assert_eq!(restored.synapse_count(), network.synapse_count());
    assert_eq!(restored.time(), network.time());
    assert_eq!(tracked_weights(&restored), tracked_weights(&network));

    let resumed = restored.run(100);
    assert_eq!(resumed.final_time, 400.0);
    assert_eq!(resumed.stdp_passes, 1);
}

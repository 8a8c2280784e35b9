// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Snapshot restore of a trained network

use spikenn_npu_engine::{
    ConnectionParams, InputMode, LayerHandle, MemoryLogSink, Network, SimClock,
};
use spikenn_npu_neural::{BoundingUpdate, LIFParameters, LayerId, NeuronType};
use spikenn_serialization::{
    decode_network, deserialize_layer, encode_network, load_network, save_network,
    serialize_layer, SnapshotMetadata,
};
use tempfile::NamedTempFile;

fn trained_network() -> (Network, LayerHandle, LayerHandle) {
    let mut network = Network::new(1.0, Some(31));
    let a = network.add_layer(false, false);
    let b = network.add_layer(true, false);
    network
        .layer_mut(a)
        .unwrap()
        .add_neurons(6, NeuronType::Excitatory, LIFParameters::default());
    let output = network.layer_mut(b).unwrap();
    output.add_neurons(3, NeuronType::Excitatory, LIFParameters::default());
    output.add_neuron(NeuronType::Inhibitory, LIFParameters::default());
    output
        .set_bounding_parameters(&BoundingUpdate {
            ex_max_weight: Some(8.0),
            max_rand_delay: Some(5),
            ..BoundingUpdate::default()
        })
        .unwrap();

    network
        .connect_probabilistic(a, b, 0.8, &ConnectionParams::default())
        .unwrap();
    network
        .connect_fan_out(b, b, 1, &ConnectionParams::default())
        .unwrap();
    network
        .layer_mut(a)
        .unwrap()
        .set_input_mode(InputMode::AllRandom);
    network.run(150);
    (network, a, b)
}

#[test]
fn test_network_file_roundtrip() {
    let (network, _, b) = trained_network();
    let temp_file = NamedTempFile::new().unwrap();
    save_network(&network, temp_file.path(), &SnapshotMetadata::describe("warm")).unwrap();

    let snapshot = load_network(temp_file.path()).unwrap();
    let restored = &snapshot.network;
    assert_eq!(snapshot.metadata.description, "warm");
    assert_eq!(snapshot.metadata.tick, 150);
    assert_eq!(restored.clock(), network.clock());
    assert_eq!(restored.neuron_count(), network.neuron_count());
    assert_eq!(restored.synapse_count(), network.synapse_count());
    assert_ne!(restored.id(), network.id());

    let original = network.layer(b).unwrap();
    let handle = restored.layer_handle(LayerId(1)).unwrap();
    let copy = restored.layer(handle).unwrap();
    assert_eq!(copy.bounds(), original.bounds());
    assert_eq!(copy.synapse_count(), original.synapse_count());
    for id in original.synapses() {
        assert_eq!(copy.weight_of(*id), original.weight_of(*id));
    }
    for (a, b) in original.neurons().iter().zip(copy.neurons()) {
        assert_eq!(a.membrane_potential(), b.membrane_potential());
        assert_eq!(a.pending_input(), b.pending_input());
    }
}

#[test]
fn test_restored_network_keeps_running() {
    let (network, _, _) = trained_network();
    let bytes = encode_network(&network, &SnapshotMetadata::default()).unwrap();
    let mut restored = decode_network(&bytes).unwrap().network;

    let sink = MemoryLogSink::new();
    restored.set_log_sink(Box::new(sink.clone()));
    let summary = restored.run(100);
    assert_eq!(summary.final_time, 250.0);
    // STDP at t = 200 on the learning layer
    assert_eq!(summary.stdp_passes, 1);
}

#[test]
fn test_sharing_state_survives() {
    let (mut network, _, b) = trained_network();
    network.layer_mut(b).unwrap().share_connection(0, 40.0).unwrap();
    let layer = network.layer(b).unwrap();

    let bytes = serialize_layer(layer).unwrap();
    let copy = deserialize_layer(&bytes, network.clock()).unwrap();
    assert!(copy.is_sharing());
    assert_eq!(copy.sharing(), layer.sharing());
    assert_eq!(copy.shared_connections(), layer.shared_connections());
    assert!(copy.synapses().is_empty());
    assert_eq!(copy.store().len(), layer.store().len());
    for (a, b) in layer.neurons().iter().zip(copy.neurons()) {
        assert_eq!(a.incoming_bases(), b.incoming_bases());
    }
}

#[test]
fn test_layer_wakes_with_new_clock() {
    let (network, a, _) = trained_network();
    let bytes = serialize_layer(network.layer(a).unwrap()).unwrap();
    let copy = deserialize_layer(&bytes, &SimClock::new(0.5)).unwrap();
    assert_eq!(copy.neuron_count(), 6);
    assert_eq!(copy.input_mode(), InputMode::AllRandom);
}

fn tracked_weights(network: &Network, layer: LayerHandle) -> Vec<Option<f32>> {
    let layer = network.layer(layer).unwrap();
    layer.synapses().iter().map(|id| layer.weight_of(*id)).collect()
}

#[test]
fn test_restore_restarts_random_stream_from_seed() {
    let (mut network, _, b) = trained_network();
    let bytes = encode_network(&network, &SnapshotMetadata::default()).unwrap();
    let mut first = decode_network(&bytes).unwrap().network;
    let mut second = decode_network(&bytes).unwrap().network;

    // the saved network, rewound to its seed, is what a restore continues as
    network.reseed(Some(31));
    let expected = network.run(100);

    for restored in [&mut first, &mut second] {
        let handle = restored.layer_handle(LayerId(1)).unwrap();
        let summary = restored.run(100);
        assert_eq!(summary.spikes, expected.spikes);
        assert_eq!(tracked_weights(restored, handle), tracked_weights(&network, b));
    }
}

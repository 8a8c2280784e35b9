// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connection construction invariants and failure modes

use std::collections::HashSet;

use proptest::prelude::*;
use spikenn_npu_engine::{ConnectionParams, EngineError, Network};
use spikenn_npu_neural::{LIFParameters, NeuronType};

fn mixed_layer(network: &mut Network, excitatory: usize, inhibitory: usize) -> spikenn_npu_engine::LayerHandle {
    let handle = network.add_layer(true, false);
    let layer = network.layer_mut(handle).unwrap();
    layer.add_neurons(excitatory, NeuronType::Excitatory, LIFParameters::default());
    layer.add_neurons(inhibitory, NeuronType::Inhibitory, LIFParameters::default());
    handle
}

proptest! {
    #[test]
    fn prop_fan_out_within_layer_is_clean(
        excitatory in 4usize..12,
        inhibitory in 0usize..4,
        per_source in 1usize..3,
        seed in any::<u64>(),
    ) {
        let mut network = Network::new(1.0, Some(seed));
        let handle = mixed_layer(&mut network, excitatory, inhibitory);
        let made = network
            .connect_fan_out(handle, handle, per_source, &ConnectionParams::default())
            .unwrap();
        prop_assert_eq!(made, (excitatory + inhibitory) * per_source);

        let layer = network.layer(handle).unwrap();
        let mut seen = HashSet::new();
        for synapse in layer.store().iter() {
            let source = synapse.source().neuron;
            let target = synapse.target();
            prop_assert_ne!(source, target);
            prop_assert!(seen.insert((source, target)));
            let source_type = layer.neurons()[source].neuron_type();
            let target_type = layer.neurons()[target].neuron_type();
            prop_assert!(!(source_type.is_inhibitory() && target_type.is_inhibitory()));
        }
    }
}

#[test]
fn test_exhausted_budget_is_an_error() {
    let mut network = Network::new(1.0, Some(3));
    network.set_fanout_retry_budget(500);
    let handle = mixed_layer(&mut network, 3, 0);
    // only two distinct non-self targets exist
    let err = network
        .connect_fan_out(handle, handle, 3, &ConnectionParams::default())
        .unwrap_err();
    match err {
        EngineError::TopologyConstruction {
            neuron,
            requested,
            made,
            attempts,
            ..
        } => {
            assert_eq!(neuron, 0);
            assert_eq!(requested, 3);
            assert_eq!(made, 2);
            assert_eq!(attempts, 500);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_inhibitory_only_layer_cannot_fan_out_to_itself() {
    let mut network = Network::new(1.0, Some(3));
    network.set_fanout_retry_budget(100);
    let handle = mixed_layer(&mut network, 0, 4);
    assert!(matches!(
        network.connect_fan_out(handle, handle, 1, &ConnectionParams::default()),
        Err(EngineError::TopologyConstruction { made: 0, .. })
    ));
}

#[test]
fn test_cross_network_connection_rejected() {
    let mut first = Network::new(1.0, Some(1));
    let mut second = Network::new(1.0, Some(1));
    let a = mixed_layer(&mut first, 2, 0);
    let b = mixed_layer(&mut second, 2, 0);

    let err = first
        .connect_probabilistic(a, b, 1.0, &ConnectionParams::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::CrossNetworkConnection { .. }));
    assert_eq!(first.synapse_count(), 0);
    assert!(first.layer(b).is_err());
}

#[test]
fn test_synapse_ids_unique_across_layers() {
    let mut network = Network::new(1.0, Some(8));
    let a = mixed_layer(&mut network, 3, 1);
    let b = mixed_layer(&mut network, 2, 2);
    network
        .connect_probabilistic(a, b, 1.0, &ConnectionParams::default())
        .unwrap();
    network
        .connect_probabilistic(b, a, 1.0, &ConnectionParams::default())
        .unwrap();

    let ids: HashSet<_> = network
        .layers()
        .iter()
        .flat_map(|l| l.store().iter().map(|s| s.id()))
        .collect();
    assert_eq!(ids.len(), 32);
    assert_eq!(network.synapse_count(), 32);
}

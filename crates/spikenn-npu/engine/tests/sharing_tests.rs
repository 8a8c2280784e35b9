// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight sharing and the shared winner

use spikenn_npu_engine::{
    ConnectionParams, EngineError, InputAction, InputDirective, InputMode, InputPattern,
    LayerHandle, Network,
};
use spikenn_npu_neural::{LIFParameters, NeuronType};

fn fully_connected(inputs: usize, outputs: usize) -> (Network, LayerHandle, LayerHandle) {
    let mut network = Network::new(1.0, Some(21));
    let a = network.add_layer(false, false);
    let b = network.add_layer(true, false);
    network
        .layer_mut(a)
        .unwrap()
        .add_neurons(inputs, NeuronType::Excitatory, LIFParameters::default());
    network
        .layer_mut(b)
        .unwrap()
        .add_neurons(outputs, NeuronType::Excitatory, LIFParameters::default());
    network
        .connect_probabilistic(a, b, 1.0, &ConnectionParams::default())
        .unwrap();
    (network, a, b)
}

#[test]
fn test_share_connection_is_exclusive() {
    let (mut network, _, b) = fully_connected(3, 4);
    let layer = network.layer_mut(b).unwrap();
    assert_eq!(layer.synapse_count(), 12);

    layer.share_connection(0, 50.0).unwrap();
    assert!(layer.is_sharing());
    assert!(layer.synapses().is_empty());

    let shared = layer.shared_connections().to_vec();
    assert_eq!(shared.len(), 3);
    for neuron in layer.neurons().iter().skip(1) {
        assert_eq!(neuron.incoming_bases(), shared.as_slice());
    }
    // the other neurons' private bases were released
    assert_eq!(layer.store().base_count(), 3);
    assert_eq!(layer.store().len(), 12);

    // positional rebinding: k-th incoming synapse of every neuron sees the
    // weight of the source neuron's k-th base
    for neuron in layer.neurons() {
        for (k, synapse) in neuron.pre_synapses().iter().enumerate() {
            let expected = layer.store().base(shared[k]).unwrap().weight();
            assert_eq!(layer.weight_of(*synapse), Some(expected));
        }
    }
}

#[test]
fn test_connecting_into_sharing_layer_is_refused() {
    let (mut network, a, b) = fully_connected(2, 3);
    network.layer_mut(b).unwrap().share_connection(0, 10.0).unwrap();
    let synapses_before = network.synapse_count();

    let err = network
        .connect_probabilistic(a, b, 1.0, &ConnectionParams::default())
        .unwrap_err();
    assert!(matches!(err, EngineError::SharedLayer(id) if id == b.layer()));

    let layer = network.layer(b).unwrap();
    assert!(layer.synapses().is_empty());
    assert_eq!(network.synapse_count(), synapses_before);
    let shared = layer.shared_connections().to_vec();
    for neuron in layer.neurons() {
        assert_eq!(neuron.incoming_bases(), shared.as_slice());
    }
    // no dangling outgoing edge was left on the source side
    for neuron in network.layer(a).unwrap().neurons() {
        assert_eq!(neuron.post_synapses().len(), 3);
    }
}

#[test]
fn test_shared_weights_learn_within_bounds() {
    let (mut network, a, b) = fully_connected(3, 4);
    network.layer_mut(b).unwrap().share_connection(0, 25.0).unwrap();
    let input = network.layer_mut(a).unwrap();
    input.set_input_mode(InputMode::AllRandom);
    input.set_input_current(10.0, 40.0).unwrap();

    let summary = network.run(400);
    assert!(summary.spikes > 0);
    assert_eq!(summary.stdp_passes, 4);

    let layer = network.layer(b).unwrap();
    let bounds = *layer.bounds();
    for base in layer.shared_connections() {
        let w = layer.store().base(*base).unwrap().weight();
        assert!(w >= bounds.ex_min_rand_weight && w <= bounds.ex_max_weight);
    }
}

#[test]
fn test_first_spike_wins_until_shared_period_reset() {
    let (mut network, _, b) = fully_connected(1, 3);
    let layer = network.layer_mut(b).unwrap();
    layer.share_connection(0, 10.0).unwrap();
    layer.set_input_mode(InputMode::Manual);
    layer.set_input_pattern(Some(InputPattern::new(|t| match t as u64 {
        3 => vec![InputDirective::new(2, InputAction::ForceFire)],
        5 => vec![InputDirective::new(1, InputAction::ForceFire)],
        12 => vec![InputDirective::new(0, InputAction::ForceFire)],
        _ => Vec::new(),
    })));

    let mut winners = Vec::new();
    for _ in 0..12 {
        network.tick();
        winners.push(network.layer(b).unwrap().shared_winner());
    }
    assert_eq!(winners[1], None);
    assert_eq!(winners[2], Some(2));
    assert_eq!(winners[4], Some(2));
    assert_eq!(winners[8], Some(2));
    // t = 10 resets the winner
    assert_eq!(winners[9], None);
    assert_eq!(winners[11], Some(0));
}

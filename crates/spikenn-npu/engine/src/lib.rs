// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # SpikeNN Engine
//!
//! Discrete-time simulation of layered spiking networks.
//!
//! ## Architecture
//! - [`Network`]: clock, layers, synapse id allocator, random stream, log sink
//! - [`Layer`]: neuron population plus the synapses terminating on it;
//!   input injection, STDP cadence, weight sharing and activity logging
//! - [`Neuron`]: integrate-and-fire state with a delayed input queue
//! - [`SynapseStore`]: per-layer arena of synapses and their weight bases
//!
//! ## Example
//! ```
//! use spikenn_npu_engine::{ConnectionParams, InputMode, Network};
//! use spikenn_npu_neural::{LIFParameters, NeuronType};
//!
//! let mut network = Network::new(1.0, Some(7));
//! let input = network.add_layer(false, false);
//! let output = network.add_layer(true, false);
//! network.layer_mut(input).unwrap().add_neurons(4, NeuronType::Excitatory, LIFParameters::default());
//! network.layer_mut(output).unwrap().add_neurons(2, NeuronType::Excitatory, LIFParameters::default());
//! network.connect_probabilistic(input, output, 1.0, &ConnectionParams::default()).unwrap();
//! network.layer_mut(input).unwrap().set_input_mode(InputMode::AllRandom);
//!
//! let summary = network.run(200);
//! assert_eq!(summary.ticks, 200);
//! ```

pub mod activity;
pub mod clock;
pub mod connectivity;
pub mod error;
pub mod input;
pub mod layer;
pub mod network;
pub mod neuromodulator;
pub mod neuron;
pub mod rng;
pub mod sink;
pub mod synapse;

pub use activity::{ActivityLog, SpikeRecord, ACTIVITY_FLUSH_PERIOD};
pub use clock::SimClock;
pub use connectivity::{ConnectionInfo, ConnectionParams, ConnectionPattern};
pub use error::{EngineError, Result};
pub use input::{InputAction, InputCurrentRange, InputDirective, InputMode, InputPattern};
pub use layer::{
    Layer, LayerDefaults, LayerTickReport, LearningFlags, SharingState, TickContext,
};
pub use network::{
    LayerHandle, Network, NetworkId, RunSummary, TickSummary, DEFAULT_FANOUT_RETRY_BUDGET,
};
pub use neuromodulator::NeuromodulatorHook;
pub use neuron::Neuron;
pub use rng::{create_rng, SimRng};
pub use sink::{FileLogSink, LogSink, MemoryLogSink, NullLogSink};
pub use synapse::{PostSynapse, Synapse, SynapseBase, SynapseStore};

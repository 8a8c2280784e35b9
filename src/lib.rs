// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # SpikeNN
//!
//! Layered spiking neural networks with leaky integrate-and-fire neurons,
//! delayed synapses and pair-based STDP, simulated on a discrete clock.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use spikenn::prelude::*;
//!
//! let mut network = Network::new(1.0, Some(42));
//! let retina = network.add_layer(false, false);
//! let cortex = network.add_layer(true, false);
//!
//! network.layer_mut(retina)?.add_neurons(64, NeuronType::Excitatory, LIFParameters::default());
//! network.layer_mut(cortex)?.add_neurons(16, NeuronType::Excitatory, LIFParameters::default());
//! network.connect_fan_out(retina, cortex, 4, &ConnectionParams::default())?;
//! network.layer_mut(retina)?.set_input_mode(InputMode::AllRandom);
//!
//! let summary = network.run(1_000);
//! println!("{} spikes", summary.spikes);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────┐
//! │  Foundation: spikenn-npu-neural, spikenn-config         │
//! │  (ids, LIF model, weight bounds, configuration)         │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Learning: spikenn-npu-plasticity                       │
//! │  (STDP rule, spike traces)                              │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Simulation: spikenn-npu-engine                         │
//! │  (network, layers, connectivity, activity logging)      │
//! └─────────────────────────────────────────────────────────┘
//!                         ↓
//! ┌─────────────────────────────────────────────────────────┐
//! │  Edges: spikenn-serialization, spikenn-observability    │
//! │  (snapshots, tracing setup)                             │
//! └─────────────────────────────────────────────────────────┘
//! ```
//!
//! ## License
//!
//! Apache-2.0

pub use spikenn_config as config;
pub use spikenn_npu_engine as engine;
pub use spikenn_npu_neural as neural;
pub use spikenn_npu_plasticity as plasticity;

#[cfg(feature = "observability")]
pub use spikenn_observability as observability;

#[cfg(feature = "serialization")]
pub use spikenn_serialization as serialization;

/// Prelude - commonly used types and traits
pub mod prelude {
    pub use crate::config::{load_config, SpikennConfig};
    pub use crate::engine::{
        ConnectionInfo, ConnectionParams, ConnectionPattern, EngineError, FileLogSink,
        InputAction, InputDirective, InputMode, InputPattern, Layer, LayerHandle, LogSink,
        MemoryLogSink, Network, NeuromodulatorHook, SimClock,
    };
    pub use crate::neural::{
        BoundingUpdate, DelaySpec, LIFParameters, LayerId, NeuronType, SynapseId, WeightSpec,
    };
    pub use crate::plasticity::STDPParameters;

    #[cfg(feature = "serialization")]
    pub use crate::serialization::{load_network, save_network, SnapshotMetadata};
}

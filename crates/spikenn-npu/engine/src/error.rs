// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Engine error types

use spikenn_npu_neural::{LayerId, NeuralError, NeuronIndex};
use thiserror::Error;

use crate::network::NetworkId;

/// Errors raised by topology construction and layer configuration.
///
/// Steady-state ticks never return these; tick-time anomalies are logged.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error("Cross-network connection: layer handle belongs to {found}, this is {expected}")]
    CrossNetworkConnection {
        expected: NetworkId,
        found: NetworkId,
    },

    #[error(
        "Topology construction failed for {layer} neuron {neuron}: made {made} of {requested} connections in {attempts} draws"
    )]
    TopologyConstruction {
        layer: LayerId,
        neuron: NeuronIndex,
        requested: usize,
        made: usize,
        attempts: usize,
    },

    #[error("Layer not found: {0}")]
    LayerNotFound(LayerId),

    #[error("Neuron {neuron} out of range for {layer} with {len} neurons")]
    NeuronOutOfRange {
        layer: LayerId,
        neuron: NeuronIndex,
        len: usize,
    },

    #[error("{0} shares its incoming weights; new synapses cannot be attached")]
    SharedLayer(LayerId),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(#[from] NeuralError),

    #[error("Log sink failed on stream '{stream}': {source}")]
    Sink {
        stream: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EngineError>;

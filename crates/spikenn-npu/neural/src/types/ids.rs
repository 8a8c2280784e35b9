// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Identity types for layers, neurons, synapses and weight bases

use core::fmt;
use serde::{Deserialize, Serialize};

/// Position of a neuron inside its layer's population.
///
/// Insertion order is addressing order, so an index stays valid for the
/// lifetime of the layer.
pub type NeuronIndex = usize;

/// Layer ID (unique within one network)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LayerId(pub u32);

impl fmt::Display for LayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Layer({})", self.0)
    }
}

/// Synapse ID (globally unique, issued by the network allocator)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct SynapseId(pub u64);

impl fmt::Display for SynapseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Synapse({})", self.0)
    }
}

/// Weight-base ID (unique within the owning layer's synapse store)
///
/// A base carries the learnable weight and the STDP trace. Several synapses
/// point at the same base when weights are tied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BaseId(pub u64);

impl fmt::Display for BaseId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Base({})", self.0)
    }
}

/// Fully qualified neuron location: owning layer plus population index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct NeuronAddress {
    pub layer: LayerId,
    pub neuron: NeuronIndex,
}

impl NeuronAddress {
    pub fn new(layer: LayerId, neuron: NeuronIndex) -> Self {
        Self { layer, neuron }
    }
}

impl fmt::Display for NeuronAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}N{}", self.layer.0, self.neuron)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_formats() {
        assert_eq!(LayerId(3).to_string(), "Layer(3)");
        assert_eq!(SynapseId(42).to_string(), "Synapse(42)");
        assert_eq!(NeuronAddress::new(LayerId(1), 7).to_string(), "L1N7");
    }

    #[test]
    fn test_ids_order_by_value() {
        assert!(SynapseId(1) < SynapseId(2));
        assert!(BaseId(10) > BaseId(9));
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron classification

use serde::{Deserialize, Serialize};

/// Neuron type, fixed at creation.
///
/// Selects the learning flag and weight bucket used by layer algorithms,
/// and the sign of the current its synapses deliver.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NeuronType {
    Excitatory,
    Inhibitory,
}

impl NeuronType {
    /// Sign applied to delivered current: +1 excitatory, -1 inhibitory
    #[inline(always)]
    pub fn sign(self) -> f32 {
        match self {
            NeuronType::Excitatory => 1.0,
            NeuronType::Inhibitory => -1.0,
        }
    }

    #[inline]
    pub fn is_inhibitory(self) -> bool {
        matches!(self, NeuronType::Inhibitory)
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Synapses and their weight bases
//!
//! A [`Synapse`] is the topological edge (source, target, delay). Its weight
//! and STDP trace live in a [`SynapseBase`]. Normally every synapse has its own
//! base; once a layer shares connections, several synapses resolve to the same
//! base and learn together.
//!
//! Both live in the [`SynapseStore`] owned by the destination layer. Neurons
//! and the layer's bookkeeping lists only hold ids into it.

use ahash::AHashMap;
use serde::{Deserialize, Serialize};
use spikenn_npu_neural::{
    BaseId, BoundingParameters, LayerId, NeuronAddress, NeuronIndex, SynapseId, SynapseType,
};
use spikenn_npu_plasticity::{update_weight, STDPParameters, SpikeTrace};

/// Weight and learning state, possibly shared by several synapses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynapseBase {
    id: BaseId,
    synapse_type: SynapseType,
    weight: f32,
    trace: SpikeTrace,
}

impl SynapseBase {
    /// A base not yet installed in any store; the store assigns its id.
    pub fn detached(synapse_type: SynapseType, weight: f32) -> Self {
        Self {
            id: BaseId(0),
            synapse_type,
            weight,
            trace: SpikeTrace::default(),
        }
    }

    #[inline]
    pub fn id(&self) -> BaseId {
        self.id
    }

    #[inline]
    pub fn synapse_type(&self) -> SynapseType {
        self.synapse_type
    }

    #[inline]
    pub fn weight(&self) -> f32 {
        self.weight
    }

    pub fn trace(&self) -> &SpikeTrace {
        &self.trace
    }

    pub fn record_pre(&mut self, time: f64) {
        self.trace.record_pre(time);
    }

    pub fn record_post(&mut self, time: f64) {
        self.trace.record_post(time);
    }

    /// Run the STDP rule over the trace gathered since the last pass,
    /// clamp to the type's bounds and start a fresh trace.
    pub fn apply_stdp(&mut self, params: &STDPParameters, bounds: &BoundingParameters) -> f32 {
        let kind = self.synapse_type;
        self.weight = update_weight(
            self.weight,
            &self.trace,
            params,
            bounds.min_weight(kind),
            bounds.max_weight(kind),
        );
        self.trace.clear();
        self.weight
    }
}

/// Directed, delayed edge terminating in the owning layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synapse {
    id: SynapseId,
    synapse_type: SynapseType,
    delay: u32,
    source: NeuronAddress,
    target: NeuronIndex,
    base: BaseId,
}

impl Synapse {
    #[inline]
    pub fn id(&self) -> SynapseId {
        self.id
    }

    #[inline]
    pub fn synapse_type(&self) -> SynapseType {
        self.synapse_type
    }

    /// Delay in ticks between emission and arrival
    #[inline]
    pub fn delay(&self) -> u32 {
        self.delay
    }

    #[inline]
    pub fn source(&self) -> NeuronAddress {
        self.source
    }

    /// Index of the destination neuron within the owning layer
    #[inline]
    pub fn target(&self) -> NeuronIndex {
        self.target
    }

    #[inline]
    pub fn base(&self) -> BaseId {
        self.base
    }
}

/// Outgoing edge as seen from the source neuron
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PostSynapse {
    pub layer: LayerId,
    pub synapse: SynapseId,
    pub target: NeuronIndex,
}

/// Parameters of a synapse about to be stored
#[derive(Debug, Clone, Copy)]
pub struct NewSynapse {
    pub id: SynapseId,
    pub synapse_type: SynapseType,
    pub weight: f32,
    pub delay: u32,
    pub source: NeuronAddress,
    pub target: NeuronIndex,
}

/// Arena of the synapses and bases terminating in one layer
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SynapseStore {
    synapses: Vec<Synapse>,
    index: AHashMap<SynapseId, usize>,
    bases: AHashMap<BaseId, SynapseBase>,
    next_base_id: u64,
    trace_capacity: usize,
}

impl SynapseStore {
    pub fn new(trace_capacity: usize) -> Self {
        Self {
            synapses: Vec::new(),
            index: AHashMap::new(),
            bases: AHashMap::new(),
            next_base_id: 0,
            trace_capacity,
        }
    }

    /// Store a synapse together with its own fresh base
    pub fn insert(&mut self, new: NewSynapse) -> (SynapseId, BaseId) {
        let base = self.install_base(SynapseBase::detached(new.synapse_type, new.weight));
        self.index.insert(new.id, self.synapses.len());
        self.synapses.push(Synapse {
            id: new.id,
            synapse_type: new.synapse_type,
            delay: new.delay,
            source: new.source,
            target: new.target,
            base,
        });
        (new.id, base)
    }

    /// Take ownership of `base` under a fresh id
    pub fn install_base(&mut self, mut base: SynapseBase) -> BaseId {
        let id = BaseId(self.next_base_id);
        self.next_base_id += 1;
        base.id = id;
        base.trace = SpikeTrace::with_capacity(self.trace_capacity);
        self.bases.insert(id, base);
        id
    }

    /// Point synapse `id` at another base; false when either is unknown.
    pub fn rebind(&mut self, id: SynapseId, base: BaseId) -> bool {
        if !self.bases.contains_key(&base) {
            return false;
        }
        match self.index.get(&id) {
            Some(&slot) => {
                self.synapses[slot].base = base;
                true
            }
            None => false,
        }
    }

    /// Drop every base in `candidates` that no synapse and no entry of
    /// `keep` still refers to. Returns how many were released.
    pub fn release_unreferenced(&mut self, candidates: &[BaseId], keep: &[BaseId]) -> usize {
        let mut released = 0;
        for id in candidates {
            if keep.contains(id) || self.synapses.iter().any(|s| s.base == *id) {
                continue;
            }
            if self.bases.remove(id).is_some() {
                released += 1;
            }
        }
        released
    }

    pub fn get(&self, id: SynapseId) -> Option<&Synapse> {
        self.index.get(&id).map(|&slot| &self.synapses[slot])
    }

    pub fn base(&self, id: BaseId) -> Option<&SynapseBase> {
        self.bases.get(&id)
    }

    pub fn base_mut(&mut self, id: BaseId) -> Option<&mut SynapseBase> {
        self.bases.get_mut(&id)
    }

    /// Current weight seen by synapse `id`
    pub fn weight_of(&self, id: SynapseId) -> Option<f32> {
        self.get(id)
            .and_then(|s| self.bases.get(&s.base))
            .map(SynapseBase::weight)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Synapse> {
        self.synapses.iter()
    }

    pub fn len(&self) -> usize {
        self.synapses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.synapses.is_empty()
    }

    pub fn base_count(&self) -> usize {
        self.bases.len()
    }
}

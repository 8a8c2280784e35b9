// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Single integrate-and-fire neuron.

A neuron keeps its membrane state, a queue of delayed input current keyed by
the tick at which it arrives, and id handles to its incoming synapses, the
bases those resolve to, and its outgoing edges.
*/

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use spikenn_npu_neural::{
    BaseId, LIFModel, LIFParameters, LayerId, NeuronIndex, NeuronModel, NeuronType, SynapseId,
};

use crate::synapse::PostSynapse;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Neuron {
    index: NeuronIndex,
    neuron_type: NeuronType,
    params: LIFParameters,
    membrane_potential: f32,
    refractory_countdown: u32,
    pending_input: BTreeMap<u64, f32>,
    pre_synapses: Vec<SynapseId>,
    pre_bases: Vec<BaseId>,
    post_synapses: Vec<PostSynapse>,
    last_spike_time: Option<f64>,
    spike_count: u64,
    log_potential: bool,

    /// Derived from the time step by [`Neuron::wakeup`]
    #[serde(skip)]
    leak_per_step: f32,
}

impl Neuron {
    pub fn new(index: NeuronIndex, neuron_type: NeuronType, params: LIFParameters) -> Self {
        Self {
            index,
            neuron_type,
            membrane_potential: params.resting_potential,
            params,
            refractory_countdown: 0,
            pending_input: BTreeMap::new(),
            pre_synapses: Vec::new(),
            pre_bases: Vec::new(),
            post_synapses: Vec::new(),
            last_spike_time: None,
            spike_count: 0,
            log_potential: false,
            leak_per_step: 0.0,
        }
    }

    /// Re-derive per-tick constants for `time_step`
    pub fn wakeup(&mut self, time_step: f64) {
        self.leak_per_step = self.params.leak_per_step(time_step);
    }

    #[inline]
    pub fn index(&self) -> NeuronIndex {
        self.index
    }

    #[inline]
    pub fn neuron_type(&self) -> NeuronType {
        self.neuron_type
    }

    pub fn params(&self) -> &LIFParameters {
        &self.params
    }

    #[inline]
    pub fn membrane_potential(&self) -> f32 {
        self.membrane_potential
    }

    #[inline]
    pub fn refractory_countdown(&self) -> u32 {
        self.refractory_countdown
    }

    pub fn last_spike_time(&self) -> Option<f64> {
        self.last_spike_time
    }

    pub fn spike_count(&self) -> u64 {
        self.spike_count
    }

    /// Current queued for ticks that have not been integrated yet
    pub fn pending_input(&self) -> f32 {
        self.pending_input.values().sum()
    }

    /// Queue `current` for integration at `tick`
    pub fn add_input_current(&mut self, tick: u64, current: f32) {
        *self.pending_input.entry(tick).or_insert(0.0) += current;
    }

    /// Advance one tick: integrate every current due by `tick`, leak and
    /// check threshold. Returns true when the neuron fires.
    pub fn update(&mut self, tick: u64, time: f64) -> bool {
        let input = self.drain_input(tick);
        if self.refractory_countdown > 0 {
            self.refractory_countdown -= 1;
            return false;
        }

        let model = LIFModel;
        self.membrane_potential = model.update_membrane_potential(
            self.membrane_potential,
            input,
            &self.params,
            self.leak_per_step,
        );
        if model.should_fire(
            self.membrane_potential,
            self.params.threshold,
            self.refractory_countdown,
        ) {
            self.fire(time);
            return true;
        }
        false
    }

    /// Emit a spike regardless of membrane state
    pub fn fire(&mut self, time: f64) {
        self.membrane_potential = LIFModel.reset_after_fire(&self.params);
        self.refractory_countdown = self.params.refractory_period;
        self.last_spike_time = Some(time);
        self.spike_count += 1;
    }

    /// Back to resting state with no queued input
    pub fn rest(&mut self) {
        self.membrane_potential = self.params.resting_potential;
        self.refractory_countdown = 0;
        self.pending_input.clear();
    }

    /// Drop input due by `tick` without integrating it
    pub(crate) fn discard_due_input(&mut self, tick: u64) {
        self.drain_input(tick);
    }

    fn drain_input(&mut self, tick: u64) -> f32 {
        let later = self.pending_input.split_off(&(tick + 1));
        let due = std::mem::replace(&mut self.pending_input, later);
        due.values().sum()
    }

    pub fn pre_synapses(&self) -> &[SynapseId] {
        &self.pre_synapses
    }

    /// Bases the incoming synapses resolve to
    pub fn incoming_bases(&self) -> &[BaseId] {
        &self.pre_bases
    }

    pub fn post_synapses(&self) -> &[PostSynapse] {
        &self.post_synapses
    }

    pub(crate) fn add_pre_synapse(&mut self, synapse: SynapseId, base: BaseId) {
        self.pre_synapses.push(synapse);
        self.pre_bases.push(base);
    }

    pub(crate) fn add_post_synapse(&mut self, post: PostSynapse) {
        self.post_synapses.push(post);
    }

    /// Replace the incoming base set; returns the bases it held before.
    pub(crate) fn set_shared_bases(&mut self, bases: &[BaseId]) -> Vec<BaseId> {
        std::mem::replace(&mut self.pre_bases, bases.to_vec())
    }

    /// Whether this neuron already projects onto `(layer, neuron)`
    pub fn is_connected_to(&self, layer: LayerId, neuron: NeuronIndex) -> bool {
        self.post_synapses
            .iter()
            .any(|p| p.layer == layer && p.target == neuron)
    }

    pub fn logs_potential(&self) -> bool {
        self.log_potential
    }

    pub(crate) fn set_log_potential(&mut self, enabled: bool) {
        self.log_potential = enabled;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn awake(params: LIFParameters) -> Neuron {
        let mut n = Neuron::new(0, NeuronType::Excitatory, params);
        n.wakeup(1.0);
        n
    }

    #[test]
    fn test_fires_on_threshold_and_enters_refractory() {
        let mut n = awake(LIFParameters::default().with_threshold(10.0).with_leak(0.0));
        n.add_input_current(1, 12.0);
        assert!(n.update(1, 1.0));
        assert_eq!(n.membrane_potential(), 0.0);
        assert_eq!(n.refractory_countdown(), 2);
        assert_eq!(n.last_spike_time(), Some(1.0));

        n.add_input_current(2, 50.0);
        assert!(!n.update(2, 2.0));
        assert!(!n.update(3, 3.0));
        assert_eq!(n.refractory_countdown(), 0);
    }

    #[test]
    fn test_future_input_waits_for_its_tick() {
        let mut n = awake(LIFParameters::default().with_leak(0.0));
        n.add_input_current(5, 4.0);
        n.update(1, 1.0);
        assert_eq!(n.membrane_potential(), 0.0);
        assert_eq!(n.pending_input(), 4.0);
        n.update(5, 5.0);
        assert_eq!(n.membrane_potential(), 4.0);
        assert_eq!(n.pending_input(), 0.0);
    }

    #[test]
    fn test_leak_pulls_toward_rest() {
        let mut n = awake(LIFParameters::default().with_leak(0.5));
        n.add_input_current(1, 8.0);
        n.update(1, 1.0);
        n.update(2, 2.0);
        assert!((n.membrane_potential() - 4.0).abs() < 1e-6);
    }

    #[test]
    fn test_rest_clears_state() {
        let mut n = awake(LIFParameters::default());
        n.add_input_current(1, 5.0);
        n.add_input_current(9, 5.0);
        n.update(1, 1.0);
        n.rest();
        assert_eq!(n.membrane_potential(), 0.0);
        assert_eq!(n.pending_input(), 0.0);
    }

    #[test]
    fn test_connection_lookup() {
        let mut n = awake(LIFParameters::default());
        n.add_post_synapse(PostSynapse {
            layer: LayerId(1),
            synapse: SynapseId(3),
            target: 4,
        });
        assert!(n.is_connected_to(LayerId(1), 4));
        assert!(!n.is_connected_to(LayerId(0), 4));
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Layer
//!
//! A population of neurons plus every synapse that terminates on it.
//!
//! One call to [`Layer::update`] is one tick for the layer:
//! 1. tick the neuromodulator hook
//! 2. inject input (once per unit of time)
//! 3. advance every neuron (skipped for containers)
//! 4. reset the shared winner (once per shared period)
//! 5. run STDP and write weight logs (once per STDP period)
//! 6. flush buffered spike activity (once per minute)
//!
//! Spikes emitted during the tick are returned in the report; the network
//! routes them to their destination layers.

use rand::Rng;
use serde::{Deserialize, Serialize};
use spikenn_config::SpikennConfig;
use spikenn_npu_neural::{
    BaseId, BoundingParameters, BoundingUpdate, LIFParameters, LayerId, NeuralError,
    NeuronAddress, NeuronIndex, NeuronType, SynapseId, SynapseType,
};
use spikenn_npu_plasticity::{STDPParameters, DEFAULT_MAX_TRACE_EVENTS};
use tracing::{debug, info, trace, warn};

use crate::activity::{potential_stream, synapse_address, ActivityLog, ACTIVITY_FLUSH_PERIOD};
use crate::clock::SimClock;
use crate::error::{EngineError, Result};
use crate::input::{InputAction, InputCurrentRange, InputMode, InputPattern};
use crate::neuromodulator::NeuromodulatorHook;
use crate::neuron::Neuron;
use crate::rng::{uniform, SimRng};
use crate::sink::LogSink;
use crate::synapse::{NewSynapse, PostSynapse, Synapse, SynapseBase, SynapseStore};

/// Input injection runs when a boundary of this period falls in the tick
const INPUT_PERIOD: f64 = 1.0;

/// Parameters every new layer starts from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerDefaults {
    pub stdp: STDPParameters,
    pub stdp_period: f64,
    pub bounds: BoundingParameters,
    pub input_current: InputCurrentRange,
    pub trace_capacity: usize,
}

impl Default for LayerDefaults {
    fn default() -> Self {
        Self {
            stdp: STDPParameters::default(),
            stdp_period: 100.0,
            bounds: BoundingParameters::default(),
            input_current: InputCurrentRange::default(),
            trace_capacity: DEFAULT_MAX_TRACE_EVENTS,
        }
    }
}

impl From<&SpikennConfig> for LayerDefaults {
    fn from(config: &SpikennConfig) -> Self {
        let learning = &config.learning;
        let bounds = &config.bounds;
        Self {
            stdp: STDPParameters {
                a_plus: learning.a_plus,
                a_minus: learning.a_minus,
                tau_plus: learning.tau_plus,
                tau_minus: learning.tau_minus,
                decay_weight_multiplier: learning.decay_weight_multiplier,
                consolidation_multiplier: learning.consolidation_multiplier,
            },
            stdp_period: learning.stdp_period,
            bounds: BoundingParameters {
                ex_max_weight: bounds.ex_max_weight,
                in_max_weight: bounds.in_max_weight,
                ex_min_rand_weight: bounds.ex_min_rand_weight,
                ex_max_rand_weight: bounds.ex_max_rand_weight,
                in_min_rand_weight: bounds.in_min_rand_weight,
                in_max_rand_weight: bounds.in_max_rand_weight,
                min_rand_delay: bounds.min_rand_delay,
                max_rand_delay: bounds.max_rand_delay,
            },
            input_current: InputCurrentRange {
                min: config.input.min_current,
                max: config.input.max_current,
            },
            trace_capacity: learning.max_trace_events,
        }
    }
}

/// Per-type learning switches; a locked switch ignores setters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LearningFlags {
    pub excitatory: bool,
    pub inhibitory: bool,
    pub excitatory_locked: bool,
    pub inhibitory_locked: bool,
}

impl LearningFlags {
    #[inline]
    pub fn learns(&self, kind: SynapseType) -> bool {
        match kind {
            NeuronType::Excitatory => self.excitatory,
            NeuronType::Inhibitory => self.inhibitory,
        }
    }

    #[inline]
    pub fn any(&self) -> bool {
        self.excitatory || self.inhibitory
    }
}

/// Weight-sharing state
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SharingState {
    pub enabled: bool,
    pub bases: Vec<BaseId>,
    pub period: Option<f64>,
    pub winner: Option<NeuronIndex>,
}

/// Everything the layer needs from the network for one tick
pub struct TickContext<'a> {
    pub clock: &'a SimClock,
    pub rng: &'a mut SimRng,
    pub sink: &'a mut dyn LogSink,
    pub default_input: &'a InputPattern,
}

/// What happened during one [`Layer::update`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LayerTickReport {
    /// Neurons that spiked, forced spikes first, then in population order
    pub fired: Vec<NeuronIndex>,
    pub input_injected: bool,
    pub winner_reset: bool,
    /// Bases updated by STDP, `None` when the STDP phase did not run
    pub stdp_updates: Option<usize>,
    pub weights_logged: usize,
    /// Spikes written by the activity flush, `None` when it did not run
    pub flushed_spikes: Option<usize>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Layer {
    id: LayerId,
    container: bool,
    neurons: Vec<Neuron>,
    store: SynapseStore,
    /// Synapses STDP walks when sharing is off
    synapses: Vec<SynapseId>,
    synapses_to_log: Vec<SynapseId>,
    learning: LearningFlags,
    stdp: STDPParameters,
    stdp_period: f64,
    bounds: BoundingParameters,
    input_mode: InputMode,
    input_current: InputCurrentRange,
    sharing: SharingState,
    activity: ActivityLog,

    #[serde(skip)]
    input_pattern: Option<InputPattern>,
    #[serde(skip)]
    hook: Option<Box<dyn NeuromodulatorHook>>,
    /// Bound by [`Layer::wakeup`]
    #[serde(skip)]
    time_step: f64,
}

impl Layer {
    /// Layers are normally created through the network, which also wakes them.
    pub fn new(id: LayerId, learning: bool, container: bool, defaults: &LayerDefaults) -> Self {
        Self {
            id,
            container,
            neurons: Vec::new(),
            store: SynapseStore::new(defaults.trace_capacity),
            synapses: Vec::new(),
            synapses_to_log: Vec::new(),
            learning: LearningFlags {
                excitatory: learning,
                inhibitory: learning,
                ..LearningFlags::default()
            },
            stdp: defaults.stdp,
            stdp_period: defaults.stdp_period,
            bounds: defaults.bounds,
            input_mode: InputMode::None,
            input_current: defaults.input_current,
            sharing: SharingState::default(),
            activity: ActivityLog::default(),
            input_pattern: None,
            hook: None,
            time_step: 0.0,
        }
    }

    /// Re-bind runtime state after creation or restore
    pub fn wakeup(&mut self, clock: &SimClock) {
        self.time_step = clock.time_step();
        for neuron in &mut self.neurons {
            neuron.wakeup(self.time_step);
        }
        if let Some(hook) = self.hook.as_mut() {
            hook.wakeup();
        }
        debug!(
            "[LAYER] {} awake: {} neurons, {} synapses, time step {}",
            self.id,
            self.neurons.len(),
            self.store.len(),
            self.time_step
        );
    }

    // ------------------------------------------------------------------
    // Population
    // ------------------------------------------------------------------

    pub fn add_neuron(&mut self, neuron_type: NeuronType, params: LIFParameters) -> NeuronIndex {
        let index = self.neurons.len();
        let mut neuron = Neuron::new(index, neuron_type, params);
        neuron.wakeup(self.time_step);
        self.neurons.push(neuron);
        index
    }

    /// Add `count` identical neurons, returning the index of the first
    pub fn add_neurons(
        &mut self,
        count: usize,
        neuron_type: NeuronType,
        params: LIFParameters,
    ) -> NeuronIndex {
        let first = self.neurons.len();
        for _ in 0..count {
            self.add_neuron(neuron_type, params);
        }
        first
    }

    #[inline]
    pub fn id(&self) -> LayerId {
        self.id
    }

    pub fn is_container(&self) -> bool {
        self.container
    }

    pub fn neurons(&self) -> &[Neuron] {
        &self.neurons
    }

    pub fn neuron(&self, index: NeuronIndex) -> Option<&Neuron> {
        self.neurons.get(index)
    }

    pub fn neuron_count(&self) -> usize {
        self.neurons.len()
    }

    pub fn rest_neurons(&mut self) {
        for neuron in &mut self.neurons {
            neuron.rest();
        }
    }

    pub fn address(&self, neuron: NeuronIndex) -> NeuronAddress {
        NeuronAddress::new(self.id, neuron)
    }

    // ------------------------------------------------------------------
    // Synapses
    // ------------------------------------------------------------------

    /// Synapses in the STDP bookkeeping list
    pub fn synapses(&self) -> &[SynapseId] {
        &self.synapses
    }

    pub fn synapse_count(&self) -> usize {
        self.synapses.len()
    }

    /// Every synapse terminating here, whether or not STDP tracks it
    pub fn store(&self) -> &SynapseStore {
        &self.store
    }

    /// Look up a synapse tracked in the bookkeeping list
    pub fn get_synapse(&self, id: SynapseId) -> Option<&Synapse> {
        if self.synapses.contains(&id) {
            self.store.get(id)
        } else {
            None
        }
    }

    pub fn weight_of(&self, id: SynapseId) -> Option<f32> {
        self.store.weight_of(id)
    }

    /// Store a synapse terminating here. Refused while sharing is enabled:
    /// every incoming set equals the shared set.
    pub(crate) fn attach_incoming(&mut self, new: NewSynapse) -> Result<BaseId> {
        if self.sharing.enabled {
            return Err(EngineError::SharedLayer(self.id));
        }
        let len = self.neurons.len();
        if new.target >= len {
            return Err(EngineError::NeuronOutOfRange {
                layer: self.id,
                neuron: new.target,
                len,
            });
        }
        let (id, base) = self.store.insert(new);
        self.neurons[new.target].add_pre_synapse(id, base);
        self.synapses.push(id);
        Ok(base)
    }

    pub(crate) fn attach_outgoing(&mut self, source: NeuronIndex, post: PostSynapse) -> Result<()> {
        let len = self.neurons.len();
        let neuron = self
            .neurons
            .get_mut(source)
            .ok_or(EngineError::NeuronOutOfRange {
                layer: self.id,
                neuron: source,
                len,
            })?;
        neuron.add_post_synapse(post);
        Ok(())
    }

    /// Queue the current carried by `synapse` for its arrival tick and record
    /// the arrival on the synapse's trace. False when the synapse is unknown.
    pub(crate) fn deliver_spike(&mut self, synapse: SynapseId, clock: &SimClock) -> bool {
        let Some(syn) = self.store.get(synapse) else {
            warn!("[LAYER] {} dropped spike for unknown {}", self.id, synapse);
            return false;
        };
        let (base, target, sign) = (syn.base(), syn.target(), syn.synapse_type().sign());
        let arrival = clock.tick() + u64::from(syn.delay());

        let Some(base) = self.store.base_mut(base) else {
            return false;
        };
        base.record_pre(clock.time_of_tick(arrival));
        let current = sign * base.weight();

        match self.neurons.get_mut(target) {
            Some(neuron) => {
                neuron.add_input_current(arrival, current);
                true
            }
            None => false,
        }
    }

    // ------------------------------------------------------------------
    // Configuration
    // ------------------------------------------------------------------

    pub fn learning(&self) -> LearningFlags {
        self.learning
    }

    pub fn should_learn(&self, kind: SynapseType) -> bool {
        self.learning.learns(kind)
    }

    /// Returns false when the flag is locked and left unchanged
    pub fn set_excitatory_learning(&mut self, enabled: bool) -> bool {
        if self.learning.excitatory_locked {
            debug!("[LAYER] {} excitatory learning is locked", self.id);
            return false;
        }
        self.learning.excitatory = enabled;
        true
    }

    /// Returns false when the flag is locked and left unchanged
    pub fn set_inhibitory_learning(&mut self, enabled: bool) -> bool {
        if self.learning.inhibitory_locked {
            debug!("[LAYER] {} inhibitory learning is locked", self.id);
            return false;
        }
        self.learning.inhibitory = enabled;
        true
    }

    pub fn lock_excitatory_learning(&mut self, locked: bool) {
        self.learning.excitatory_locked = locked;
    }

    pub fn lock_inhibitory_learning(&mut self, locked: bool) {
        self.learning.inhibitory_locked = locked;
    }

    pub fn stdp_parameters(&self) -> &STDPParameters {
        &self.stdp
    }

    pub fn set_stdp_parameters(&mut self, params: STDPParameters) {
        self.stdp = params;
    }

    pub fn stdp_period(&self) -> f64 {
        self.stdp_period
    }

    pub fn set_stdp_period(&mut self, period: f64) -> Result<()> {
        if !(period > 0.0) {
            return Err(NeuralError::InvalidParameter {
                field: "stdp_period",
                reason: format!("must be positive, got {period}"),
            }
            .into());
        }
        self.stdp_period = period;
        Ok(())
    }

    pub fn bounds(&self) -> &BoundingParameters {
        &self.bounds
    }

    /// Apply every present field of `update`; absent fields stay unchanged.
    ///
    /// The result is validated as a whole and rejected if any range ends up
    /// inverted, leaving the current bounds untouched. Moving a range past its
    /// other end (delay `[0, 20]` to `[25, 30]`) must set both ends in one call.
    pub fn set_bounding_parameters(&mut self, update: &BoundingUpdate) -> Result<()> {
        if update.is_empty() {
            return Ok(());
        }
        let mut next = self.bounds;
        next.apply(update);
        next.validate()?;
        self.bounds = next;
        Ok(())
    }

    pub fn input_mode(&self) -> InputMode {
        self.input_mode
    }

    pub fn set_input_mode(&mut self, mode: InputMode) {
        self.input_mode = mode;
    }

    pub fn input_current(&self) -> InputCurrentRange {
        self.input_current
    }

    pub fn set_input_current(&mut self, min: f32, max: f32) -> Result<()> {
        if min > max {
            return Err(NeuralError::InvertedRange {
                field: "input_current",
                min: f64::from(min),
                max: f64::from(max),
            }
            .into());
        }
        self.input_current = InputCurrentRange { min, max };
        Ok(())
    }

    /// Pattern used in [`InputMode::Manual`]; `None` falls back to the
    /// network default
    pub fn set_input_pattern(&mut self, pattern: Option<InputPattern>) {
        self.input_pattern = pattern;
    }

    pub fn set_neuromodulator(&mut self, hook: Box<dyn NeuromodulatorHook>) {
        self.hook = Some(hook);
    }

    pub fn take_neuromodulator(&mut self) -> Option<Box<dyn NeuromodulatorHook>> {
        self.hook.take()
    }

    pub fn has_neuromodulator(&self) -> bool {
        self.hook.is_some()
    }

    // ------------------------------------------------------------------
    // Logging selection
    // ------------------------------------------------------------------

    /// Select which tracked synapses get their weight written at every STDP
    /// boundary. Returns the number selected.
    pub fn log_weight<F>(&mut self, predicate: F) -> usize
    where
        F: Fn(SynapseId) -> bool,
    {
        self.synapses_to_log = self
            .synapses
            .iter()
            .copied()
            .filter(|id| predicate(*id))
            .collect();
        self.synapses_to_log.len()
    }

    pub fn synapses_to_log(&self) -> &[SynapseId] {
        &self.synapses_to_log
    }

    /// Flag neurons whose membrane potential is written every tick;
    /// `None` selects all of them.
    pub fn log_potential(&mut self, predicate: Option<&dyn Fn(NeuronIndex) -> bool>) -> usize {
        let mut selected = 0;
        for neuron in &mut self.neurons {
            let enabled = predicate.map_or(true, |p| p(neuron.index()));
            neuron.set_log_potential(enabled);
            selected += usize::from(enabled);
        }
        selected
    }

    pub fn set_activity_logging(&mut self, enabled: bool) {
        self.activity.set_enabled(enabled);
    }

    pub fn activity(&self) -> &ActivityLog {
        &self.activity
    }

    // ------------------------------------------------------------------
    // Weight sharing
    // ------------------------------------------------------------------

    pub fn sharing(&self) -> &SharingState {
        &self.sharing
    }

    pub fn is_sharing(&self) -> bool {
        self.sharing.enabled
    }

    pub fn shared_connections(&self) -> &[BaseId] {
        &self.sharing.bases
    }

    pub fn shared_winner(&self) -> Option<NeuronIndex> {
        self.sharing.winner
    }

    /// Tie every neuron's incoming weights to those of `source`.
    ///
    /// Incoming synapses are rebound to the shared bases by position. STDP
    /// then walks the shared set only, so the bookkeeping list is cleared.
    pub fn share_connection(&mut self, source: NeuronIndex, period: f64) -> Result<()> {
        let len = self.neurons.len();
        let bases = self
            .neurons
            .get(source)
            .ok_or(EngineError::NeuronOutOfRange {
                layer: self.id,
                neuron: source,
                len,
            })?
            .incoming_bases()
            .to_vec();

        self.install_shared(bases, Some(source), period);
        info!(
            "[SHARING] {} shares the {} incoming weights of neuron {} (period {})",
            self.id,
            self.sharing.bases.len(),
            source,
            period
        );
        Ok(())
    }

    /// Install an externally built base set as every neuron's incoming weights
    pub fn share_connection_with(&mut self, bases: Vec<SynapseBase>, period: f64) {
        let ids: Vec<BaseId> = bases
            .into_iter()
            .map(|base| self.store.install_base(base))
            .collect();
        self.install_shared(ids, None, period);
        info!(
            "[SHARING] {} installed {} external shared weights (period {})",
            self.id,
            self.sharing.bases.len(),
            period
        );
    }

    fn install_shared(&mut self, bases: Vec<BaseId>, skip: Option<NeuronIndex>, period: f64) {
        let mut displaced = Vec::new();
        for neuron in self.neurons.iter_mut() {
            if Some(neuron.index()) == skip {
                continue;
            }
            displaced.extend(neuron.set_shared_bases(&bases));
            for (synapse, base) in neuron.pre_synapses().iter().zip(bases.iter()) {
                self.store.rebind(*synapse, *base);
            }
        }

        let previous = std::mem::replace(&mut self.sharing.bases, bases);
        displaced.extend(previous);
        self.sharing.enabled = true;
        self.sharing.period = Some(period);
        self.synapses.clear();

        let released = self
            .store
            .release_unreferenced(&displaced, &self.sharing.bases);
        debug!("[SHARING] {} released {} unreferenced bases", self.id, released);
    }

    // ------------------------------------------------------------------
    // Tick
    // ------------------------------------------------------------------

    pub fn update(&mut self, ctx: &mut TickContext<'_>) -> LayerTickReport {
        let clock = *ctx.clock;
        let (tick, time) = (clock.tick(), clock.time());
        let mut report = LayerTickReport::default();

        if let Some(hook) = self.hook.as_mut() {
            hook.update(&clock);
        }

        if clock.is_period_boundary(INPUT_PERIOD) {
            report.input_injected = self.inject_input(ctx, &mut report.fired);
        }

        if self.container {
            for neuron in &mut self.neurons {
                neuron.discard_due_input(tick);
            }
        } else {
            for neuron in &mut self.neurons {
                if neuron.update(tick, time) {
                    report.fired.push(neuron.index());
                }
            }
        }
        for &index in &report.fired {
            self.on_spike(index, time);
        }
        self.write_potentials(time, &mut *ctx.sink);

        if self.sharing.enabled {
            if let Some(period) = self.sharing.period {
                if clock.is_period_boundary(period) {
                    self.sharing.winner = None;
                    report.winner_reset = true;
                }
            }
        }

        if self.learning.any() && clock.is_period_boundary(self.stdp_period) {
            report.stdp_updates = Some(self.apply_stdp());
            report.weights_logged = self.write_weights(time, &mut *ctx.sink);
        }

        if self.activity.is_enabled() && clock.is_period_boundary(ACTIVITY_FLUSH_PERIOD) {
            match self.flush_activity(time, &mut *ctx.sink) {
                Ok(spikes) => report.flushed_spikes = Some(spikes),
                Err(e) => warn!("[ACTIVITY] {} flush failed: {}", self.id, e),
            }
        }

        trace!(
            "[TICK {}] {} fired {} neurons",
            tick,
            self.id,
            report.fired.len()
        );
        report
    }

    fn inject_input(&mut self, ctx: &mut TickContext<'_>, fired: &mut Vec<NeuronIndex>) -> bool {
        let (tick, time) = (ctx.clock.tick(), ctx.clock.time());
        let InputCurrentRange { min, max } = self.input_current;
        let rng = &mut *ctx.rng;

        match self.input_mode {
            InputMode::None => return false,
            // AllMax draws random currents like AllRandom
            InputMode::AllRandom | InputMode::AllMax => {
                for neuron in &mut self.neurons {
                    neuron.add_input_current(tick, uniform(rng, min, max));
                }
            }
            InputMode::OneRandom => {
                let index = self.random_neuron(rng);
                let current = uniform(rng, min, max);
                self.neurons[index].add_input_current(tick, current);
            }
            InputMode::OneMax => {
                let index = self.random_neuron(rng);
                self.neurons[index].add_input_current(tick, max);
            }
            InputMode::Manual => {
                let directives = match &self.input_pattern {
                    Some(pattern) => pattern.directives(time),
                    None => ctx.default_input.directives(time),
                };
                let len = self.neurons.len();
                for directive in directives {
                    let Some(neuron) = self.neurons.get_mut(directive.neuron) else {
                        warn!(
                            "[INPUT] {} skipped directive for neuron {} (population {})",
                            self.id, directive.neuron, len
                        );
                        continue;
                    };
                    match directive.action {
                        InputAction::ForceFire => {
                            neuron.fire(time);
                            fired.push(directive.neuron);
                        }
                        InputAction::RandomCurrent => {
                            neuron.add_input_current(tick, uniform(rng, min, max))
                        }
                        InputAction::MaxCurrent => neuron.add_input_current(tick, max),
                        InputAction::ManualCurrent(current) => {
                            neuron.add_input_current(tick, current)
                        }
                    }
                }
            }
        }
        true
    }

    /// Uniformly chosen neuron index.
    ///
    /// # Panics
    /// When the layer has no neurons.
    fn random_neuron(&self, rng: &mut SimRng) -> NeuronIndex {
        assert!(
            !self.neurons.is_empty(),
            "{} has no neurons to choose an input target from",
            self.id
        );
        rng.gen_range(0..self.neurons.len())
    }

    fn on_spike(&mut self, index: NeuronIndex, time: f64) {
        for base in self.neurons[index].incoming_bases() {
            if let Some(base) = self.store.base_mut(*base) {
                base.record_post(time);
            }
        }
        if self.sharing.enabled && self.sharing.winner.is_none() {
            self.sharing.winner = Some(index);
        }
        self.record_spike(index, time);
    }

    /// Buffer a spike for the activity log and notify the neuromodulator
    pub fn record_spike(&mut self, neuron: NeuronIndex, time: f64) {
        self.activity.record(neuron, time);
        if let Some(hook) = self.hook.as_mut() {
            hook.notify_of_spike(neuron);
        }
    }

    /// Run STDP over the active collection; returns the number of bases updated
    fn apply_stdp(&mut self) -> usize {
        let learning = self.learning;
        let mut updated = 0;

        if self.sharing.enabled {
            for id in &self.sharing.bases {
                if let Some(base) = self.store.base_mut(*id) {
                    if learning.learns(base.synapse_type()) {
                        base.apply_stdp(&self.stdp, &self.bounds);
                        updated += 1;
                    }
                }
            }
        } else {
            for id in &self.synapses {
                let Some(base_id) = self.store.get(*id).map(Synapse::base) else {
                    continue;
                };
                if let Some(base) = self.store.base_mut(base_id) {
                    if learning.learns(base.synapse_type()) {
                        base.apply_stdp(&self.stdp, &self.bounds);
                        updated += 1;
                    }
                }
            }
        }

        debug!(
            "[STDP] {} updated {} bases (sharing: {})",
            self.id, updated, self.sharing.enabled
        );
        updated
    }

    fn write_weights(&self, time: f64, sink: &mut dyn LogSink) -> usize {
        let mut written = 0;
        for id in &self.synapses_to_log {
            let Some(synapse) = self.store.get(*id) else {
                continue;
            };
            let Some(weight) = self.store.base(synapse.base()).map(SynapseBase::weight) else {
                continue;
            };
            let stream = synapse_address(synapse.source(), self.address(synapse.target()));
            match sink.append(&stream, &format!("{} {}\n", time, weight)) {
                Ok(()) => written += 1,
                Err(e) => warn!("[STDP] weight log '{}' failed: {}", stream, e),
            }
        }
        written
    }

    fn write_potentials(&self, time: f64, sink: &mut dyn LogSink) {
        for neuron in self.neurons.iter().filter(|n| n.logs_potential()) {
            let stream = potential_stream(self.id, neuron.index());
            let line = format!("{} {}\n", time, neuron.membrane_potential());
            if let Err(e) = sink.append(&stream, &line) {
                warn!("[LAYER] potential log '{}' failed: {}", stream, e);
            }
        }
    }

    /// Write buffered spikes to the stream of the minute containing `time`.
    /// Returns the number of spikes written.
    pub fn flush_activity(&mut self, time: f64, sink: &mut dyn LogSink) -> Result<usize> {
        let Some(chunk) = self.activity.drain(self.id, time) else {
            return Ok(0);
        };
        sink.append(&chunk.stream, &chunk.text)
            .map_err(|source| EngineError::Sink {
                stream: chunk.stream.clone(),
                source,
            })?;
        info!(
            "[ACTIVITY] {} wrote {} spikes to {}",
            self.id, chunk.spikes, chunk.stream
        );
        Ok(chunk.spikes)
    }

    /// Final flush before the layer goes away
    pub fn shutdown(&mut self, clock: &SimClock, sink: &mut dyn LogSink) {
        if !self.activity.is_enabled() {
            return;
        }
        if let Err(e) = self.flush_activity(clock.time(), sink) {
            warn!("[ACTIVITY] {} final flush failed: {}", self.id, e);
        }
    }
}

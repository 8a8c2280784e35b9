// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Network
//!
//! Owns the clock, the layers (in registration order), the synapse id
//! allocator, the random stream and the log sink. [`Network::tick`] advances
//! time by one step, updates every layer and routes the spikes they emit.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};
use spikenn_config::SpikennConfig;
use spikenn_npu_neural::{LayerId, NeuronAddress, NeuronIndex, SynapseId};
use tracing::{debug, info, warn};

use crate::activity::synapse_address;
use crate::clock::SimClock;
use crate::connectivity::ConnectionPattern;
use crate::error::{EngineError, Result};
use crate::input::InputPattern;
use crate::layer::{Layer, LayerDefaults, TickContext};
use crate::rng::{create_rng, SimRng};
use crate::sink::{LogSink, NullLogSink};

/// Draws per source neuron before fan-out construction gives up
pub const DEFAULT_FANOUT_RETRY_BUDGET: usize = 10_000;

static NEXT_NETWORK_ID: AtomicU64 = AtomicU64::new(1);

/// Process-unique network identity; a restored network gets a new one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NetworkId(u64);

impl NetworkId {
    fn fresh() -> Self {
        Self(NEXT_NETWORK_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NetworkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Network({})", self.0)
    }
}

/// Reference to a layer of a specific network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LayerHandle {
    network: NetworkId,
    layer: LayerId,
}

impl LayerHandle {
    pub fn network(&self) -> NetworkId {
        self.network
    }

    pub fn layer(&self) -> LayerId {
        self.layer
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct TickSummary {
    pub tick: u64,
    pub time: f64,
    pub spikes: usize,
    pub stdp_layers: usize,
    pub flushed_layers: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RunSummary {
    pub ticks: u64,
    pub final_time: f64,
    pub spikes: usize,
    pub stdp_passes: usize,
    pub activity_flushes: usize,
}

fn entropy_rng() -> SimRng {
    create_rng(None)
}

fn null_sink() -> Box<dyn LogSink> {
    Box::new(NullLogSink)
}

#[derive(Serialize, Deserialize)]
pub struct Network {
    #[serde(skip, default = "NetworkId::fresh")]
    id: NetworkId,
    clock: SimClock,
    next_synapse_id: u64,
    layers: Vec<Layer>,
    defaults: LayerDefaults,
    fanout_retry_budget: usize,
    seed: Option<u64>,

    #[serde(skip, default = "entropy_rng")]
    pub(crate) rng: SimRng,
    #[serde(skip, default = "null_sink")]
    sink: Box<dyn LogSink>,
    #[serde(skip)]
    default_input: InputPattern,
    #[serde(skip)]
    pub(crate) default_connection: ConnectionPattern,
}

impl Network {
    pub fn new(time_step: f64, seed: Option<u64>) -> Self {
        Self::with_defaults(
            time_step,
            seed,
            LayerDefaults::default(),
            DEFAULT_FANOUT_RETRY_BUDGET,
        )
    }

    pub fn from_config(config: &SpikennConfig) -> Self {
        Self::with_defaults(
            config.simulation.time_step,
            config.simulation.seed,
            LayerDefaults::from(config),
            config.construction.fanout_retry_budget,
        )
    }

    pub fn with_defaults(
        time_step: f64,
        seed: Option<u64>,
        defaults: LayerDefaults,
        fanout_retry_budget: usize,
    ) -> Self {
        let network = Self {
            id: NetworkId::fresh(),
            clock: SimClock::new(time_step),
            next_synapse_id: 0,
            layers: Vec::new(),
            defaults,
            fanout_retry_budget,
            seed,
            rng: create_rng(seed),
            sink: null_sink(),
            default_input: InputPattern::default(),
            default_connection: ConnectionPattern::default(),
        };
        info!(
            "[NETWORK] Created {} (time step {}, seed {:?})",
            network.id, time_step, seed
        );
        network
    }

    pub fn id(&self) -> NetworkId {
        self.id
    }

    pub fn clock(&self) -> &SimClock {
        &self.clock
    }

    pub fn time(&self) -> f64 {
        self.clock.time()
    }

    pub fn time_step(&self) -> f64 {
        self.clock.time_step()
    }

    pub fn seed(&self) -> Option<u64> {
        self.seed
    }

    /// Restart the random stream from `seed`, or from entropy
    pub fn reseed(&mut self, seed: Option<u64>) {
        self.seed = seed;
        self.rng = create_rng(seed);
    }

    pub fn layer_defaults(&self) -> &LayerDefaults {
        &self.defaults
    }

    /// Applies to layers added afterwards
    pub fn set_layer_defaults(&mut self, defaults: LayerDefaults) {
        self.defaults = defaults;
    }

    pub fn fanout_retry_budget(&self) -> usize {
        self.fanout_retry_budget
    }

    pub fn set_fanout_retry_budget(&mut self, budget: usize) {
        self.fanout_retry_budget = budget;
    }

    pub fn set_log_sink(&mut self, sink: Box<dyn LogSink>) {
        self.sink = sink;
    }

    pub fn set_default_input_pattern(&mut self, pattern: InputPattern) {
        self.default_input = pattern;
    }

    pub fn set_default_connection_pattern(&mut self, pattern: ConnectionPattern) {
        self.default_connection = pattern;
    }

    /// Allocate the next globally unique synapse id
    pub fn next_synapse_id(&mut self) -> SynapseId {
        let id = SynapseId(self.next_synapse_id);
        self.next_synapse_id += 1;
        id
    }

    /// Stable textual address of the edge between two neurons
    pub fn address(
        &self,
        source_layer: LayerId,
        source_neuron: NeuronIndex,
        dest_layer: LayerId,
        dest_neuron: NeuronIndex,
    ) -> String {
        synapse_address(
            NeuronAddress::new(source_layer, source_neuron),
            NeuronAddress::new(dest_layer, dest_neuron),
        )
    }

    // ------------------------------------------------------------------
    // Layers
    // ------------------------------------------------------------------

    pub fn add_layer(&mut self, learning: bool, container: bool) -> LayerHandle {
        let id = LayerId(self.layers.len() as u32);
        let mut layer = Layer::new(id, learning, container, &self.defaults);
        layer.wakeup(&self.clock);
        self.layers.push(layer);
        info!(
            "[NETWORK] Added {} to {} (learning: {}, container: {})",
            id, self.id, learning, container
        );
        LayerHandle {
            network: self.id,
            layer: id,
        }
    }

    pub fn layer_handle(&self, id: LayerId) -> Option<LayerHandle> {
        self.layers.get(id.0 as usize).map(|_| LayerHandle {
            network: self.id,
            layer: id,
        })
    }

    pub(crate) fn resolve(&self, handle: LayerHandle) -> Result<usize> {
        if handle.network != self.id {
            return Err(EngineError::CrossNetworkConnection {
                expected: self.id,
                found: handle.network,
            });
        }
        let index = handle.layer.0 as usize;
        if index >= self.layers.len() {
            return Err(EngineError::LayerNotFound(handle.layer));
        }
        Ok(index)
    }

    pub fn layer(&self, handle: LayerHandle) -> Result<&Layer> {
        let index = self.resolve(handle)?;
        Ok(&self.layers[index])
    }

    pub fn layer_mut(&mut self, handle: LayerHandle) -> Result<&mut Layer> {
        let index = self.resolve(handle)?;
        Ok(&mut self.layers[index])
    }

    pub fn layer_by_id(&self, id: LayerId) -> Option<&Layer> {
        self.layers.get(id.0 as usize)
    }

    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    pub(crate) fn layers_mut(&mut self) -> &mut [Layer] {
        &mut self.layers
    }

    pub fn neuron_count(&self) -> usize {
        self.layers.iter().map(Layer::neuron_count).sum()
    }

    /// Synapses stored across all layers, shared or not
    pub fn synapse_count(&self) -> usize {
        self.layers.iter().map(|l| l.store().len()).sum()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Re-bind every layer to the clock; required after a restore
    pub fn wakeup(&mut self) {
        for layer in &mut self.layers {
            layer.wakeup(&self.clock);
        }
        info!(
            "[NETWORK] {} awake at t={} with {} layers",
            self.id,
            self.clock.time(),
            self.layers.len()
        );
    }

    /// Advance time by one step and update every layer in registration order
    pub fn tick(&mut self) -> TickSummary {
        self.clock.advance();
        let mut summary = TickSummary {
            tick: self.clock.tick(),
            time: self.clock.time(),
            ..TickSummary::default()
        };

        for index in 0..self.layers.len() {
            let report = {
                let mut ctx = TickContext {
                    clock: &self.clock,
                    rng: &mut self.rng,
                    sink: self.sink.as_mut(),
                    default_input: &self.default_input,
                };
                self.layers[index].update(&mut ctx)
            };
            summary.spikes += report.fired.len();
            summary.stdp_layers += usize::from(report.stdp_updates.is_some());
            summary.flushed_layers += usize::from(report.flushed_spikes.is_some());
            self.route_spikes(index, &report.fired);
        }
        summary
    }

    pub fn run(&mut self, ticks: u64) -> RunSummary {
        let mut run = RunSummary::default();
        for _ in 0..ticks {
            let tick = self.tick();
            run.ticks += 1;
            run.spikes += tick.spikes;
            run.stdp_passes += tick.stdp_layers;
            run.activity_flushes += tick.flushed_layers;
        }
        run.final_time = self.clock.time();
        debug!(
            "[NETWORK] Ran {} ticks: {} spikes, {} STDP passes",
            run.ticks, run.spikes, run.stdp_passes
        );
        run
    }

    fn route_spikes(&mut self, layer: usize, fired: &[NeuronIndex]) {
        for &neuron in fired {
            let posts = self.layers[layer].neurons()[neuron].post_synapses().to_vec();
            for post in posts {
                match self.layers.get_mut(post.layer.0 as usize) {
                    Some(dest) => {
                        dest.deliver_spike(post.synapse, &self.clock);
                    }
                    None => warn!(
                        "[NETWORK] {} has no {} for spike routing",
                        self.id, post.layer
                    ),
                }
            }
        }
    }
}

impl fmt::Debug for Network {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Network")
            .field("id", &self.id)
            .field("clock", &self.clock)
            .field("layers", &self.layers.len())
            .field("next_synapse_id", &self.next_synapse_id)
            .field("seed", &self.seed)
            .finish()
    }
}

impl Drop for Network {
    fn drop(&mut self) {
        for layer in &mut self.layers {
            layer.shutdown(&self.clock, self.sink.as_mut());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::{InputAction, InputDirective, InputMode};
    use crate::sink::MemoryLogSink;
    use crate::connectivity::ConnectionInfo;
    use spikenn_npu_neural::{LIFParameters, NeuronType};

    #[test]
    fn test_clock_advances_per_tick() {
        let mut network = Network::new(0.5, Some(1));
        network.tick();
        network.tick();
        assert_eq!(network.clock().tick(), 2);
        assert_eq!(network.time(), 1.0);
    }

    #[test]
    fn test_synapse_ids_are_monotonic() {
        let mut network = Network::new(1.0, Some(1));
        let a = network.next_synapse_id();
        let b = network.next_synapse_id();
        assert!(b > a);
    }

    #[test]
    fn test_layer_handles_resolve() {
        let mut network = Network::new(1.0, Some(1));
        let handle = network.add_layer(true, false);
        assert_eq!(network.layer_handle(handle.layer()), Some(handle));
        assert!(network.layer(handle).is_ok());
        assert!(network.layer_handle(LayerId(9)).is_none());
    }

    #[test]
    fn test_address_format() {
        let network = Network::new(1.0, Some(1));
        assert_eq!(network.address(LayerId(1), 2, LayerId(3), 4), "L1N2-L3N4");
    }

    #[test]
    fn test_spike_arrives_after_delay() {
        let mut network = Network::new(1.0, Some(1));
        let input = network.add_layer(false, false);
        let output = network.add_layer(false, false);
        let params = LIFParameters::default().with_threshold(5.0).with_leak(0.0);
        network
            .layer_mut(input)
            .unwrap()
            .add_neuron(NeuronType::Excitatory, params);
        network
            .layer_mut(output)
            .unwrap()
            .add_neuron(NeuronType::Excitatory, params);
        network
            .connect_with_pattern(
                input,
                output,
                Some(&ConnectionPattern::new(|_, _| ConnectionInfo::new(6.0, 3))),
            )
            .unwrap();

        let layer = network.layer_mut(input).unwrap();
        layer.set_input_mode(InputMode::Manual);
        layer.set_input_pattern(Some(InputPattern::new(|t| {
            if t == 1.0 {
                vec![InputDirective::new(0, InputAction::ForceFire)]
            } else {
                Vec::new()
            }
        })));

        let spikes: Vec<usize> = (0..6).map(|_| network.tick().spikes).collect();
        // forced at tick 1, delivered for tick 4
        assert_eq!(spikes, vec![1, 0, 0, 1, 0, 0]);
    }

    #[test]
    fn test_drop_flushes_activity() {
        let sink = MemoryLogSink::new();
        {
            let mut network = Network::new(1.0, Some(1));
            network.set_log_sink(Box::new(sink.clone()));
            let handle = network.add_layer(false, false);
            let layer = network.layer_mut(handle).unwrap();
            layer.add_neuron(NeuronType::Excitatory, LIFParameters::default());
            layer.set_activity_logging(true);
            layer.set_input_mode(InputMode::Manual);
            layer.set_input_pattern(Some(InputPattern::new(|_| {
                vec![InputDirective::new(0, InputAction::ForceFire)]
            })));
            network.run(1);
        }
        assert_eq!(sink.lines("Layer0Min0"), vec!["60001 0"]);
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Connection construction between two layers of one network
//!
//! Three strategies are offered: independent probability per pair, fixed
//! fan-out per source neuron, and a pattern function over `(source, dest)`
//! index pairs. Every new synapse is stored in the destination layer; the
//! source neuron only keeps an outgoing edge handle.

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use spikenn_npu_neural::{
    DelaySpec, LayerId, NeuronAddress, NeuronIndex, NeuronType, SynapseId, SynapseType, WeightSpec,
};
use tracing::{debug, info};

use crate::error::{EngineError, Result};
use crate::network::{LayerHandle, Network};
use crate::rng::{uniform, uniform_inclusive};
use crate::synapse::{NewSynapse, PostSynapse};

/// Decision of a connection pattern for one `(source, dest)` pair
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionInfo {
    pub connect: bool,
    pub weight: f32,
    /// Delay in ticks
    pub delay: u32,
    /// Overrides the source neuron's type when set
    pub synapse_type: Option<SynapseType>,
}

impl ConnectionInfo {
    pub fn new(weight: f32, delay: u32) -> Self {
        Self {
            connect: true,
            weight,
            delay,
            synapse_type: None,
        }
    }

    pub fn none() -> Self {
        Self {
            connect: false,
            weight: 0.0,
            delay: 0,
            synapse_type: None,
        }
    }

    pub fn with_type(mut self, synapse_type: SynapseType) -> Self {
        self.synapse_type = Some(synapse_type);
        self
    }
}

type PatternFn = dyn Fn(NeuronIndex, NeuronIndex) -> ConnectionInfo + Send + Sync;

/// Maps `(source index, dest index)` to a connection decision
#[derive(Clone)]
pub struct ConnectionPattern(Arc<PatternFn>);

impl ConnectionPattern {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(NeuronIndex, NeuronIndex) -> ConnectionInfo + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn info(&self, source: NeuronIndex, dest: NeuronIndex) -> ConnectionInfo {
        (self.0)(source, dest)
    }
}

impl Default for ConnectionPattern {
    /// Connects nothing
    fn default() -> Self {
        Self::new(|_, _| ConnectionInfo::none())
    }
}

impl fmt::Debug for ConnectionPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ConnectionPattern(..)")
    }
}

/// Weight and delay choice per source neuron type
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConnectionParams {
    pub excitatory_weight: WeightSpec,
    pub inhibitory_weight: WeightSpec,
    pub excitatory_delay: DelaySpec,
    pub inhibitory_delay: DelaySpec,
}

impl Default for ConnectionParams {
    fn default() -> Self {
        Self::uniform(WeightSpec::Random, DelaySpec::Random)
    }
}

impl ConnectionParams {
    /// Same weight and delay spec for both types
    pub fn uniform(weight: WeightSpec, delay: DelaySpec) -> Self {
        Self {
            excitatory_weight: weight,
            inhibitory_weight: weight,
            excitatory_delay: delay,
            inhibitory_delay: delay,
        }
    }

    fn for_type(&self, kind: NeuronType) -> (WeightSpec, DelaySpec) {
        match kind {
            NeuronType::Excitatory => (self.excitatory_weight, self.excitatory_delay),
            NeuronType::Inhibitory => (self.inhibitory_weight, self.inhibitory_delay),
        }
    }
}

impl Network {
    /// Connect every `(i, j)` pair independently with `probability`.
    /// Returns the number of synapses created.
    pub fn connect_probabilistic(
        &mut self,
        source: LayerHandle,
        dest: LayerHandle,
        probability: f32,
        params: &ConnectionParams,
    ) -> Result<usize> {
        let (src, dst) = (self.resolve(source)?, self.resolve(dest)?);
        let (src_len, dst_len) = (
            self.layers()[src].neuron_count(),
            self.layers()[dst].neuron_count(),
        );

        let mut made = 0;
        for i in 0..src_len {
            let kind = self.layers()[src].neurons()[i].neuron_type();
            let (weight, delay) = params.for_type(kind);
            for j in 0..dst_len {
                if self.rng.gen::<f32>() < probability {
                    self.create_synapse(src, i, dst, j, kind, weight, delay)?;
                    made += 1;
                }
            }
        }

        info!(
            "[CONNECT] {} -> {}: {} synapses at p={}",
            source.layer(),
            dest.layer(),
            made,
            probability
        );
        Ok(made)
    }

    /// Give every source neuron exactly `per_source` outgoing synapses to
    /// distinct random destinations.
    ///
    /// Rejected draws: the neuron itself (same layer), an existing target and
    /// inhibitory onto inhibitory. Fails with `TopologyConstruction` once a
    /// source neuron exhausts the retry budget; synapses made before the
    /// failure are kept.
    pub fn connect_fan_out(
        &mut self,
        source: LayerHandle,
        dest: LayerHandle,
        per_source: usize,
        params: &ConnectionParams,
    ) -> Result<usize> {
        let (src, dst) = (self.resolve(source)?, self.resolve(dest)?);
        let (src_len, dst_len) = (
            self.layers()[src].neuron_count(),
            self.layers()[dst].neuron_count(),
        );
        let budget = self.fanout_retry_budget();
        let dst_id = dest.layer();

        let mut total = 0;
        for i in 0..src_len {
            let kind = self.layers()[src].neurons()[i].neuron_type();
            let (weight, delay) = params.for_type(kind);
            let mut made = 0;
            let mut attempts = 0;

            while made < per_source {
                if attempts >= budget || dst_len == 0 {
                    return Err(EngineError::TopologyConstruction {
                        layer: source.layer(),
                        neuron: i,
                        requested: per_source,
                        made,
                        attempts,
                    });
                }
                attempts += 1;

                let k = self.rng.gen_range(0..dst_len);
                if src == dst && k == i {
                    continue;
                }
                let layers = self.layers();
                if layers[src].neurons()[i].is_connected_to(dst_id, k) {
                    continue;
                }
                if kind.is_inhibitory() && layers[dst].neurons()[k].neuron_type().is_inhibitory() {
                    continue;
                }

                self.create_synapse(src, i, dst, k, kind, weight, delay)?;
                made += 1;
            }
            total += made;
        }

        info!(
            "[CONNECT] {} -> {}: fan-out {} per neuron, {} synapses",
            source.layer(),
            dest.layer(),
            per_source,
            total
        );
        Ok(total)
    }

    /// Connect every pair the pattern accepts; `None` uses the network's
    /// default connection pattern.
    pub fn connect_with_pattern(
        &mut self,
        source: LayerHandle,
        dest: LayerHandle,
        pattern: Option<&ConnectionPattern>,
    ) -> Result<usize> {
        let (src, dst) = (self.resolve(source)?, self.resolve(dest)?);
        let pattern = pattern
            .cloned()
            .unwrap_or_else(|| self.default_connection.clone());
        let (src_len, dst_len) = (
            self.layers()[src].neuron_count(),
            self.layers()[dst].neuron_count(),
        );

        let mut made = 0;
        for i in 0..src_len {
            let source_type = self.layers()[src].neurons()[i].neuron_type();
            for j in 0..dst_len {
                let info = pattern.info(i, j);
                if !info.connect {
                    continue;
                }
                let kind = info.synapse_type.unwrap_or(source_type);
                self.create_synapse(
                    src,
                    i,
                    dst,
                    j,
                    kind,
                    WeightSpec::Fixed(info.weight),
                    DelaySpec::Fixed(info.delay),
                )?;
                made += 1;
            }
        }

        info!(
            "[CONNECT] {} -> {}: {} synapses from pattern",
            source.layer(),
            dest.layer(),
            made
        );
        Ok(made)
    }

    #[allow(clippy::too_many_arguments)]
    fn create_synapse(
        &mut self,
        src: usize,
        source: NeuronIndex,
        dst: usize,
        target: NeuronIndex,
        kind: SynapseType,
        weight: WeightSpec,
        delay: DelaySpec,
    ) -> Result<SynapseId> {
        let bounds = *self.layers()[dst].bounds();
        let weight = match weight {
            WeightSpec::Fixed(w) => w,
            WeightSpec::Random => {
                let (min, max) = bounds.rand_weight_range(kind);
                uniform(&mut self.rng, min, max)
            }
        };
        let delay = match delay {
            DelaySpec::Fixed(d) => d,
            DelaySpec::Random => {
                let (min, max) = bounds.rand_delay_range();
                uniform_inclusive(&mut self.rng, min, max)
            }
        };

        let id = self.next_synapse_id();
        let (src_id, dst_id) = (LayerId(src as u32), LayerId(dst as u32));
        self.layers_mut()[dst].attach_incoming(NewSynapse {
            id,
            synapse_type: kind,
            weight,
            delay,
            source: NeuronAddress::new(src_id, source),
            target,
        })?;
        self.layers_mut()[src].attach_outgoing(
            source,
            PostSynapse {
                layer: dst_id,
                synapse: id,
                target,
            },
        )?;

        debug!(
            "[CONNECT] {} {}->{} w={} d={}",
            id,
            NeuronAddress::new(src_id, source),
            NeuronAddress::new(dst_id, target),
            weight,
            delay
        );
        Ok(id)
    }
}

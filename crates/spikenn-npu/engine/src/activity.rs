// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike activity buffering
//!
//! Spikes are buffered as `(neuron, time)` and written once per minute of
//! simulation time to a stream named after the layer and the minute.

use serde::{Deserialize, Serialize};
use spikenn_npu_neural::{LayerId, NeuronAddress, NeuronIndex};

/// Simulation time units per activity stream
pub const ACTIVITY_FLUSH_PERIOD: f64 = 60_000.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SpikeRecord {
    pub neuron: NeuronIndex,
    pub time: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ActivityLog {
    enabled: bool,
    buffer: Vec<SpikeRecord>,
}

/// Stream name and body produced by one flush
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityChunk {
    pub stream: String,
    pub text: String,
    pub spikes: usize,
}

impl ActivityLog {
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn record(&mut self, neuron: NeuronIndex, time: f64) {
        if self.enabled {
            self.buffer.push(SpikeRecord { neuron, time });
        }
    }

    pub fn buffered(&self) -> &[SpikeRecord] {
        &self.buffer
    }

    /// Drain the buffer into the chunk for the minute containing `time`.
    /// Returns `None` when nothing was buffered.
    pub fn drain(&mut self, layer: LayerId, time: f64) -> Option<ActivityChunk> {
        if self.buffer.is_empty() {
            return None;
        }
        let minute = (time / ACTIVITY_FLUSH_PERIOD).floor() as i64;
        let minute_start = (minute - 1) as f64 * ACTIVITY_FLUSH_PERIOD;

        let mut text = String::new();
        for spike in &self.buffer {
            text.push_str(&format!("{} {}\n", spike.time - minute_start, spike.neuron));
        }
        let spikes = self.buffer.len();
        self.buffer.clear();
        Some(ActivityChunk {
            stream: activity_stream(layer, minute),
            text,
            spikes,
        })
    }
}

pub fn activity_stream(layer: LayerId, minute: i64) -> String {
    format!("Layer{}Min{}", layer.0, minute)
}

/// Stable textual address of the edge `source -> dest`
pub fn synapse_address(source: NeuronAddress, dest: NeuronAddress) -> String {
    format!("{}-{}", source, dest)
}

pub fn potential_stream(layer: LayerId, neuron: NeuronIndex) -> String {
    format!("Layer{}Neuron{}Potential", layer.0, neuron)
}

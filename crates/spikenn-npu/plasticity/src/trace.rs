// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Spike-time trace kept per weight base between two STDP passes

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

/// Events kept per side before the oldest one is dropped
pub const DEFAULT_MAX_TRACE_EVENTS: usize = 64;

/// Pre- and post-synaptic spike times recorded since the last STDP pass.
///
/// Pre times are recorded at arrival (emission time plus synaptic delay),
/// post times when the destination neuron fires.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpikeTrace {
    pre: VecDeque<f64>,
    post: VecDeque<f64>,
    capacity: usize,
}

impl Default for SpikeTrace {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_MAX_TRACE_EVENTS)
    }
}

impl SpikeTrace {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            pre: VecDeque::with_capacity(capacity),
            post: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    pub fn record_pre(&mut self, time: f64) {
        push_bounded(&mut self.pre, time, self.capacity);
    }

    pub fn record_post(&mut self, time: f64) {
        push_bounded(&mut self.post, time, self.capacity);
    }

    pub fn pre_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.pre.iter().copied()
    }

    pub fn post_times(&self) -> impl Iterator<Item = f64> + '_ {
        self.post.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.pre.is_empty() && self.post.is_empty()
    }

    pub fn clear(&mut self) {
        self.pre.clear();
        self.post.clear();
    }
}

fn push_bounded(events: &mut VecDeque<f64>, time: f64, capacity: usize) {
    if events.len() == capacity {
        events.pop_front();
    }
    events.push_back(time);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capacity_drops_oldest() {
        let mut trace = SpikeTrace::with_capacity(2);
        trace.record_pre(1.0);
        trace.record_pre(2.0);
        trace.record_pre(3.0);

        assert_eq!(trace.pre_times().collect::<Vec<_>>(), vec![2.0, 3.0]);
    }

    #[test]
    fn test_clear() {
        let mut trace = SpikeTrace::default();
        trace.record_pre(1.0);
        trace.record_post(2.0);
        assert!(!trace.is_empty());

        trace.clear();
        assert!(trace.is_empty());
    }
}

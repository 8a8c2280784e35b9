// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuromodulator observer contract
//!
//! A layer may carry one hook. It is told about every spike the layer
//! records and ticked once per layer update. Hooks are runtime attachments
//! and are not part of a snapshot.

use std::fmt::Debug;

use spikenn_npu_neural::NeuronIndex;

use crate::clock::SimClock;

pub trait NeuromodulatorHook: Send + Debug {
    /// Called when the owning layer wakes up
    fn wakeup(&mut self) {}

    /// Called at the start of every layer update
    fn update(&mut self, clock: &SimClock);

    fn notify_of_spike(&mut self, neuron: NeuronIndex);
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! External input injection

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use spikenn_npu_neural::NeuronIndex;

/// How a layer injects input once per unit of time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum InputMode {
    #[default]
    None,
    /// Independent random current to every neuron
    AllRandom,
    /// Same as `AllRandom`: every neuron gets a random current, not the max
    AllMax,
    OneRandom,
    OneMax,
    /// Directives produced by the layer's input pattern
    Manual,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum InputAction {
    ForceFire,
    RandomCurrent,
    MaxCurrent,
    ManualCurrent(f32),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputDirective {
    pub neuron: NeuronIndex,
    pub action: InputAction,
}

impl InputDirective {
    pub fn new(neuron: NeuronIndex, action: InputAction) -> Self {
        Self { neuron, action }
    }
}

type PatternFn = dyn Fn(f64) -> Vec<InputDirective> + Send + Sync;

/// Maps simulation time to the directives applied at that time
#[derive(Clone)]
pub struct InputPattern(Arc<PatternFn>);

impl InputPattern {
    pub fn new<F>(f: F) -> Self
    where
        F: Fn(f64) -> Vec<InputDirective> + Send + Sync + 'static,
    {
        Self(Arc::new(f))
    }

    pub fn directives(&self, time: f64) -> Vec<InputDirective> {
        (self.0)(time)
    }
}

impl Default for InputPattern {
    /// Produces no directives
    fn default() -> Self {
        Self::new(|_| Vec::new())
    }
}

impl fmt::Debug for InputPattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("InputPattern(..)")
    }
}

/// Current range used by the random and max input actions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputCurrentRange {
    pub min: f32,
    pub max: f32,
}

impl Default for InputCurrentRange {
    fn default() -> Self {
        Self { min: 0.0, max: 20.0 }
    }
}

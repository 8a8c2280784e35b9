// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # LIF (Leaky Integrate-and-Fire) Neuron Model
//!
//! ```text
//! Membrane Potential Update (one tick):
//!     V(t+1) = V(t) + I(t) - g_step × (V(t) - V_rest)
//!
//!     Where:
//!     - I(t)   = input current delivered for this tick
//!     - g_step = 1 - (1 - leak_coefficient)^dt, the leak scaled to the step
//!
//! Firing Check:
//!     if refractory_countdown > 0:
//!         hold at V_reset and count down
//!     else if V(t+1) ≥ threshold:
//!         FIRE, set V to V_reset, start the refractory countdown
//! ```

use serde::{Deserialize, Serialize};

use super::traits::{ModelParameters, NeuronModel};

/// LIF (Leaky Integrate-and-Fire) neuron model
#[derive(Debug, Clone, Copy, Default)]
pub struct LIFModel;

impl LIFModel {
    pub fn new() -> Self {
        Self
    }
}

impl NeuronModel for LIFModel {
    type Parameters = LIFParameters;

    fn model_name(&self) -> &'static str {
        "Leaky Integrate-and-Fire (LIF)"
    }

    #[inline(always)]
    fn update_membrane_potential(
        &self,
        current_mp: f32,
        input_current: f32,
        params: &LIFParameters,
        leak_per_step: f32,
    ) -> f32 {
        current_mp + input_current - leak_per_step * (current_mp - params.resting_potential)
    }

    #[inline(always)]
    fn should_fire(&self, membrane_potential: f32, threshold: f32, refractory_countdown: u32) -> bool {
        refractory_countdown == 0 && membrane_potential >= threshold
    }

    #[inline(always)]
    fn reset_after_fire(&self, params: &LIFParameters) -> f32 {
        params.reset_potential
    }
}

/// LIF parameters, one block per neuron
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LIFParameters {
    /// Fraction (0.0-1.0) of `(V - V_rest)` lost per unit of time
    pub leak_coefficient: f32,

    /// Baseline membrane potential with no input
    pub resting_potential: f32,

    /// Potential right after a spike
    pub reset_potential: f32,

    /// Spike threshold
    pub threshold: f32,

    /// Ticks during which the neuron ignores input after a spike
    pub refractory_period: u32,
}

impl LIFParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_threshold(mut self, threshold: f32) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn with_leak(mut self, leak_coefficient: f32) -> Self {
        self.leak_coefficient = leak_coefficient;
        self
    }

    pub fn with_refractory_period(mut self, ticks: u32) -> Self {
        self.refractory_period = ticks;
        self
    }

    /// Leak fraction applied during one tick of `time_step` time units.
    pub fn leak_per_step(&self, time_step: f64) -> f32 {
        let retained = (1.0 - self.leak_coefficient as f64).max(0.0);
        (1.0 - retained.powf(time_step)) as f32
    }
}

impl Default for LIFParameters {
    fn default() -> Self {
        Self {
            leak_coefficient: 0.1,
            resting_potential: 0.0,
            reset_potential: 0.0,
            threshold: 30.0,
            refractory_period: 2,
        }
    }
}

impl ModelParameters for LIFParameters {
    fn validate(&self) -> Result<(), &'static str> {
        if !(0.0..=1.0).contains(&self.leak_coefficient) {
            return Err("LIF: Leak coefficient must be in [0, 1]");
        }
        if self.threshold <= self.reset_potential {
            return Err("LIF: Threshold must be above the reset potential");
        }
        Ok(())
    }

    fn parameter_count() -> usize {
        5
    }
}

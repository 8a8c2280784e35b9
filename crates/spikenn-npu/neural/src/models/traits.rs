// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Neuron model traits

/// Membrane dynamics of one neuron model.
pub trait NeuronModel {
    type Parameters: ModelParameters;

    fn model_name(&self) -> &'static str;

    /// Advance the membrane potential by one tick.
    ///
    /// `leak_per_step` is the fraction of `(V - V_rest)` lost during one tick,
    /// already scaled to the simulation time step.
    fn update_membrane_potential(
        &self,
        current_mp: f32,
        input_current: f32,
        params: &Self::Parameters,
        leak_per_step: f32,
    ) -> f32;

    fn should_fire(&self, membrane_potential: f32, threshold: f32, refractory_countdown: u32)
        -> bool;

    /// Potential the membrane is set to right after a spike.
    fn reset_after_fire(&self, params: &Self::Parameters) -> f32;
}

/// Parameter block of a neuron model.
pub trait ModelParameters {
    fn validate(&self) -> Result<(), &'static str>;

    fn parameter_count() -> usize;
}

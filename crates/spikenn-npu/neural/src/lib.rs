// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # SpikeNN Neural Primitives
//!
//! Leaf types shared by every other SpikeNN crate:
//! - **Types**: layer, neuron, synapse and weight-base identifiers, neuron addresses
//! - **Synapse**: excitatory/inhibitory typing, weight and delay bounding parameters
//! - **Models**: integrate-and-fire membrane dynamics
//!
//! Nothing in here knows about time stepping or layers; the engine crate
//! drives these pieces once per tick.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod models;
pub mod synapse;
pub mod types;

pub use models::{LIFModel, LIFParameters, ModelParameters, NeuronModel};
pub use synapse::{
    BoundingParameters, BoundingUpdate, DelaySpec, SynapseType, WeightSpec,
};
pub use types::{
    BaseId, LayerId, NeuralError, NeuronAddress, NeuronIndex, NeuronType, Result, SynapseId,
};

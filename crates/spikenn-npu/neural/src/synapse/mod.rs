// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Synaptic typing, weight specifications and bounding parameters

pub mod bounds;
pub mod weight;

pub use bounds::{BoundingParameters, BoundingUpdate};
pub use weight::{DelaySpec, WeightSpec};

/// Synapses take the type of their source neuron unless a connection
/// pattern overrides it.
pub type SynapseType = crate::types::NeuronType;

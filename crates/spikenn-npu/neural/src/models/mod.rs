// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # Neuron Model Architecture
//!
//! Membrane dynamics are expressed through the `NeuronModel` trait so the
//! engine's neuron state machine stays independent of the equations.
//! Integrate-and-fire is the only model shipped.

pub mod lif;
pub mod traits;

pub use lif::{LIFModel, LIFParameters};
pub use traits::{ModelParameters, NeuronModel};

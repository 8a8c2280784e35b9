// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Weight and delay specifications used at connection time

use serde::{Deserialize, Serialize};

/// Initial weight of a new synapse
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum WeightSpec {
    Fixed(f32),
    /// Uniform draw from the destination layer's random weight range for the
    /// synapse type
    Random,
}

impl From<f32> for WeightSpec {
    fn from(weight: f32) -> Self {
        WeightSpec::Fixed(weight)
    }
}

/// Initial delay of a new synapse, in ticks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DelaySpec {
    Fixed(u32),
    /// Uniform draw from the destination layer's random delay range
    Random,
}

impl From<u32> for DelaySpec {
    fn from(delay: u32) -> Self {
        DelaySpec::Fixed(delay)
    }
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # Neural Types Module
//!
//! Identity and classification types used across the simulator.

pub mod error;
pub mod ids;
pub mod kind;

pub use error::{NeuralError, Result};
pub use ids::{BaseId, LayerId, NeuronAddress, NeuronIndex, SynapseId};
pub use kind::NeuronType;

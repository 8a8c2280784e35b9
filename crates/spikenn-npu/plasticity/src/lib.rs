// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # SpikeNN Plasticity Module
//!
//! Spike-timing-dependent plasticity for SpikeNN synapses:
//! - `trace`: bounded record of pre/post spike times between learning passes
//! - `stdp`: pair-based exponential rule, weight decay, consolidation and clamping
//!
//! The engine decides *when* a weight is updated and *which* weights are
//! eligible; this crate only does the arithmetic.

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod stdp;
pub mod trace;

pub use stdp::{compute_stdp_weight_change, compute_trace_delta, update_weight, STDPParameters};
pub use trace::{SpikeTrace, DEFAULT_MAX_TRACE_EVENTS};

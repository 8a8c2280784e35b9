// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! STDP (Spike-Timing-Dependent Plasticity) computation
//!
//! Pair-based exponential rule over every recorded (pre, post) pair:
//! - Δw += A+ · exp(-Δt/τ+)   if post fired after pre (potentiation)
//! - Δw -= A- · exp(-|Δt|/τ-) if pre arrived after post (depression)
//!
//! The resulting weight is `clamp(w · decay + consolidation · Δw, min, max)`.

use serde::{Deserialize, Serialize};

use crate::trace::SpikeTrace;

/// STDP parameters carried by each layer
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct STDPParameters {
    /// Potentiation amplitude (A+)
    pub a_plus: f32,

    /// Depression amplitude (A-)
    pub a_minus: f32,

    /// Potentiation time constant (τ+)
    pub tau_plus: f32,

    /// Depression time constant (τ-)
    pub tau_minus: f32,

    /// Multiplier applied to the existing weight before the change is added
    pub decay_weight_multiplier: f32,

    /// Scale applied to the accumulated change
    pub consolidation_multiplier: f32,
}

impl Default for STDPParameters {
    fn default() -> Self {
        Self {
            a_plus: 0.1,
            a_minus: 0.12,
            tau_plus: 20.0,
            tau_minus: 20.0,
            decay_weight_multiplier: 1.0,
            consolidation_multiplier: 0.9,
        }
    }
}

/// Weight change for one spike pair.
///
/// `dt` is `post_time - pre_time`. Coincident spikes contribute nothing.
///
/// # Example
/// ```
/// use spikenn_npu_plasticity::{compute_stdp_weight_change, STDPParameters};
///
/// let params = STDPParameters::default();
/// assert!(compute_stdp_weight_change(5.0, &params) > 0.0);
/// assert!(compute_stdp_weight_change(-5.0, &params) < 0.0);
/// assert_eq!(compute_stdp_weight_change(0.0, &params), 0.0);
/// ```
#[inline]
pub fn compute_stdp_weight_change(dt: f64, params: &STDPParameters) -> f32 {
    if dt > 0.0 {
        params.a_plus * (-(dt as f32) / params.tau_plus.max(1e-6)).exp()
    } else if dt < 0.0 {
        -params.a_minus * ((dt as f32) / params.tau_minus.max(1e-6)).exp()
    } else {
        0.0
    }
}

/// Net change accumulated over every (pre, post) pair in `trace`.
pub fn compute_trace_delta(trace: &SpikeTrace, params: &STDPParameters) -> f32 {
    let mut delta = 0.0f32;
    for pre in trace.pre_times() {
        for post in trace.post_times() {
            delta += compute_stdp_weight_change(post - pre, params);
        }
    }
    delta
}

/// Apply decay, consolidation and the trace delta to `weight`, then clamp.
pub fn update_weight(
    weight: f32,
    trace: &SpikeTrace,
    params: &STDPParameters,
    min_weight: f32,
    max_weight: f32,
) -> f32 {
    let delta = compute_trace_delta(trace, params);
    let updated = weight * params.decay_weight_multiplier + params.consolidation_multiplier * delta;
    let min_weight = min_weight.min(max_weight);
    if updated.is_nan() {
        tracing::warn!(weight, delta, "STDP produced NaN weight, clamping to lower bound");
        return min_weight;
    }
    updated.clamp(min_weight, max_weight)
}

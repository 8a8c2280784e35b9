// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Configuration type definitions
//!
//! Each struct maps to one section of `spikenn.toml`. Every section is
//! optional; missing keys fall back to the defaults below.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SpikennConfig {
    pub simulation: SimulationConfig,
    pub learning: LearningConfig,
    pub bounds: BoundsConfig,
    pub input: InputConfig,
    pub construction: ConstructionConfig,
    pub logging: LoggingConfig,
}

/// Clock and run length
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Tick granularity in simulation time units
    pub time_step: f64,
    /// Seed for the network RNG; `None` seeds from entropy
    pub seed: Option<u64>,
    /// Ticks executed by the `run_simulation` tool
    pub ticks: u64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            time_step: 1.0,
            seed: None,
            ticks: 1000,
        }
    }
}

/// Default STDP parameters for new layers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LearningConfig {
    pub a_plus: f32,
    pub a_minus: f32,
    pub tau_plus: f32,
    pub tau_minus: f32,
    pub decay_weight_multiplier: f32,
    pub consolidation_multiplier: f32,
    pub stdp_period: f64,
    pub max_trace_events: usize,
}

impl Default for LearningConfig {
    fn default() -> Self {
        Self {
            a_plus: 0.1,
            a_minus: 0.12,
            tau_plus: 20.0,
            tau_minus: 20.0,
            decay_weight_multiplier: 1.0,
            consolidation_multiplier: 0.9,
            stdp_period: 100.0,
            max_trace_events: 64,
        }
    }
}

/// Default bounding parameters for new layers
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct BoundsConfig {
    pub ex_max_weight: f32,
    pub in_max_weight: f32,
    pub ex_min_rand_weight: f32,
    pub ex_max_rand_weight: f32,
    pub in_min_rand_weight: f32,
    pub in_max_rand_weight: f32,
    pub min_rand_delay: u32,
    pub max_rand_delay: u32,
}

impl Default for BoundsConfig {
    fn default() -> Self {
        Self {
            ex_max_weight: 10.0,
            in_max_weight: 20.0,
            ex_min_rand_weight: 0.0,
            ex_max_rand_weight: 10.0,
            in_min_rand_weight: 0.0,
            in_max_rand_weight: 20.0,
            min_rand_delay: 0,
            max_rand_delay: 20,
        }
    }
}

/// Default external input current range
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct InputConfig {
    pub min_current: f32,
    pub max_current: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            min_current: 0.0,
            max_current: 20.0,
        }
    }
}

/// Topology construction limits
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct ConstructionConfig {
    /// Random draws allowed per source neuron in fan-out construction
    pub fanout_retry_budget: usize,
}

impl Default for ConstructionConfig {
    fn default() -> Self {
        Self {
            fanout_retry_budget: 10_000,
        }
    }
}

/// Diagnostic and activity logging
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// tracing filter level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Directory for diagnostic log files; empty = console only
    pub log_dir: PathBuf,
    /// Directory receiving activity and weight streams
    pub activity_dir: PathBuf,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_dir: PathBuf::new(),
            activity_dir: PathBuf::from("./activity"),
        }
    }
}

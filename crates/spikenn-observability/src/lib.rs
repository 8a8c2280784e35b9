// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! # spikenn-observability
//!
//! Logging setup shared by SpikeNN binaries and tests: a console layer,
//! an optional rolling file layer, and per-crate debug flags
//! (`--debug-spikenn-npu-engine`, `--debug-all`, `SPIKENN_DEBUG`).

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod cli;
pub mod init;

pub use cli::*;
pub use init::*;

/// Known SpikeNN crate names for debug flags
pub const KNOWN_CRATES: &[&str] = &[
    "spikenn",
    "spikenn-config",
    "spikenn-npu-neural",
    "spikenn-npu-plasticity",
    "spikenn-npu-engine",
    "spikenn-serialization",
];

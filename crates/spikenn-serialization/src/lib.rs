// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! # SpikeNN Snapshots
//!
//! Save and restore a complete [`Network`](spikenn_npu_engine::Network):
//! layers, neurons with their pending input, synapse stores, learning and
//! sharing state, the clock and the id allocator.
//!
//! Runtime attachments are not part of a snapshot: the log sink, input and
//! connection patterns and neuromodulator hooks must be set again after a
//! restore. Restored networks are woken up and their random stream restarts
//! from the stored seed: the generator state is not saved, so a resumed run
//! replays the draws of tick 0 onwards rather than continuing the sequence
//! the saved network was on. Two restores of the same snapshot still run
//! identically.
//!
//! ## Usage
//! ```ignore
//! use spikenn_serialization::{load_network, save_network, SnapshotMetadata};
//!
//! save_network(&network, "run.spknn", &SnapshotMetadata::describe("after warmup"))?;
//! let restored = load_network("run.spknn")?.network;
//! ```

/// Crate version from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

use thiserror::Error;

mod format;
mod snapshot;

pub use format::{FORMAT_VERSION, MAGIC};
pub use snapshot::{
    decode_network, deserialize_layer, encode_network, load_network, save_network,
    serialize_layer, NetworkSnapshot, SnapshotMetadata,
};

/// Snapshot I/O errors
#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Deserialization error: {0}")]
    Deserialization(String),

    #[error("Version mismatch: file version {file_version}, expected {expected_version}")]
    VersionMismatch {
        file_version: u32,
        expected_version: u32,
    },

    #[error("Invalid magic number: expected SPKNN, got {0:?}")]
    InvalidMagic([u8; 5]),

    #[error("Truncated snapshot: {0} bytes is shorter than the header")]
    Truncated(usize),

    #[error("Checksum mismatch: file may be corrupted")]
    ChecksumMismatch,

    #[error("Compression error: {0}")]
    Compression(String),
}

pub type Result<T> = std::result::Result<T, SnapshotError>;

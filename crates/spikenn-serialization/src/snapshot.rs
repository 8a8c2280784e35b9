// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Network and layer snapshots

use std::fs::File;
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};
use spikenn_npu_engine::{Layer, Network, SimClock};
use tracing::info;

use crate::format::{frame, unframe};
use crate::{Result, SnapshotError};

/// Tracking information stored next to the network
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotMetadata {
    /// Seconds since the Unix epoch at save time
    pub timestamp: u64,

    pub description: String,

    /// Simulation tick the snapshot was taken at
    pub tick: u64,
}

impl Default for SnapshotMetadata {
    fn default() -> Self {
        Self {
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
            description: String::new(),
            tick: 0,
        }
    }
}

impl SnapshotMetadata {
    pub fn describe(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }
}

#[derive(Serialize)]
struct SnapshotRef<'a> {
    metadata: &'a SnapshotMetadata,
    network: &'a Network,
}

/// A restored network, already woken up
#[derive(Debug, Deserialize)]
pub struct NetworkSnapshot {
    pub metadata: SnapshotMetadata,
    pub network: Network,
}

/// Encode `network` into framed snapshot bytes
pub fn encode_network(network: &Network, metadata: &SnapshotMetadata) -> Result<Vec<u8>> {
    let metadata = SnapshotMetadata {
        tick: network.clock().tick(),
        ..metadata.clone()
    };
    let body = bincode::serialize(&SnapshotRef {
        metadata: &metadata,
        network,
    })
    .map_err(|e| SnapshotError::Serialization(e.to_string()))?;
    frame(body)
}

/// Decode framed snapshot bytes and wake the network up.
///
/// The random stream restarts from the stored seed; it does not continue
/// from where the saved network stopped.
pub fn decode_network(bytes: &[u8]) -> Result<NetworkSnapshot> {
    let body = unframe(bytes)?;
    let mut snapshot: NetworkSnapshot = bincode::deserialize(&body)
        .map_err(|e| SnapshotError::Deserialization(e.to_string()))?;

    let seed = snapshot.network.seed();
    snapshot.network.reseed(seed);
    snapshot.network.wakeup();
    Ok(snapshot)
}

/// Save a network snapshot to `path` with optional LZ4 compression
pub fn save_network<P: AsRef<Path>>(
    network: &Network,
    path: P,
    metadata: &SnapshotMetadata,
) -> Result<()> {
    let bytes = encode_network(network, metadata)?;
    let mut file = File::create(path.as_ref())?;
    file.write_all(&bytes)?;
    info!(
        "[SNAPSHOT] Saved {} layers at tick {} to {} ({} bytes)",
        network.layers().len(),
        network.clock().tick(),
        path.as_ref().display(),
        bytes.len()
    );
    Ok(())
}

/// Load a network snapshot from `path`
pub fn load_network<P: AsRef<Path>>(path: P) -> Result<NetworkSnapshot> {
    let mut bytes = Vec::new();
    File::open(path.as_ref())?.read_to_end(&mut bytes)?;
    let snapshot = decode_network(&bytes)?;
    info!(
        "[SNAPSHOT] Loaded {} layers at tick {} from {}",
        snapshot.network.layers().len(),
        snapshot.metadata.tick,
        path.as_ref().display()
    );
    Ok(snapshot)
}

/// Framed snapshot of a single layer
pub fn serialize_layer(layer: &Layer) -> Result<Vec<u8>> {
    let body =
        bincode::serialize(layer).map_err(|e| SnapshotError::Serialization(e.to_string()))?;
    frame(body)
}

/// Restore a single layer and bind it to `clock`
pub fn deserialize_layer(bytes: &[u8], clock: &SimClock) -> Result<Layer> {
    let body = unframe(bytes)?;
    let mut layer: Layer =
        bincode::deserialize(&body).map_err(|e| SnapshotError::Deserialization(e.to_string()))?;
    layer.wakeup(clock);
    Ok(layer)
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Snapshot framing
//!
//! ```text
//! [Header]
//! - Magic: "SPKNN" (5 bytes)
//! - Version: u32 LE (4 bytes)
//! - Flags: u8 (1 byte) - bit 0: compressed
//! - Uncompressed size: u64 LE (8 bytes, 0 when not compressed)
//! - Checksum: u64 LE (8 bytes, FNV-1a of the payload as stored)
//! [Payload]
//! - bincode body, optionally LZ4 block-compressed
//! ```

use crate::{Result, SnapshotError};

/// Magic number for snapshot files
pub const MAGIC: &[u8; 5] = b"SPKNN";

/// Current format version (increment when the payload layout changes)
pub const FORMAT_VERSION: u32 = 1;

const FLAG_COMPRESSED: u8 = 1;
const HEADER_LEN: usize = 5 + 4 + 1 + 8 + 8;

/// Wrap a bincode body into a framed snapshot
pub(crate) fn frame(body: Vec<u8>) -> Result<Vec<u8>> {
    #[cfg(feature = "compression")]
    let (payload, flags, uncompressed_size) = {
        let original_size = body.len() as u64;
        let compressed = lz4::block::compress(&body, None, false)
            .map_err(|e| SnapshotError::Compression(e.to_string()))?;
        (compressed, FLAG_COMPRESSED, original_size)
    };

    #[cfg(not(feature = "compression"))]
    let (payload, flags, uncompressed_size) = (body, 0u8, 0u64);

    let mut out = Vec::with_capacity(HEADER_LEN + payload.len());
    out.extend_from_slice(MAGIC);
    out.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
    out.push(flags);
    out.extend_from_slice(&uncompressed_size.to_le_bytes());
    out.extend_from_slice(&calculate_checksum(&payload).to_le_bytes());
    out.extend_from_slice(&payload);
    Ok(out)
}

/// Validate the header and return the bincode body
pub(crate) fn unframe(bytes: &[u8]) -> Result<Vec<u8>> {
    if bytes.len() < 5 {
        return Err(SnapshotError::Truncated(bytes.len()));
    }
    let mut magic = [0u8; 5];
    magic.copy_from_slice(&bytes[..5]);
    if &magic != MAGIC {
        return Err(SnapshotError::InvalidMagic(magic));
    }
    if bytes.len() < HEADER_LEN {
        return Err(SnapshotError::Truncated(bytes.len()));
    }

    let version = u32::from_le_bytes(le_array(&bytes[5..9]));
    if version != FORMAT_VERSION {
        return Err(SnapshotError::VersionMismatch {
            file_version: version,
            expected_version: FORMAT_VERSION,
        });
    }
    let flags = bytes[9];
    let uncompressed_size = u64::from_le_bytes(le_array(&bytes[10..18]));
    let expected_checksum = u64::from_le_bytes(le_array(&bytes[18..26]));

    let payload = &bytes[HEADER_LEN..];
    if calculate_checksum(payload) != expected_checksum {
        return Err(SnapshotError::ChecksumMismatch);
    }

    if flags & FLAG_COMPRESSED == 0 {
        return Ok(payload.to_vec());
    }

    #[cfg(feature = "compression")]
    {
        let size = i32::try_from(uncompressed_size).map_err(|_| {
            SnapshotError::Compression(format!("Uncompressed size {} too large", uncompressed_size))
        })?;
        lz4::block::decompress(payload, Some(size))
            .map_err(|e| SnapshotError::Compression(format!("Decompression failed: {}", e)))
    }
    #[cfg(not(feature = "compression"))]
    {
        let _ = uncompressed_size;
        Err(SnapshotError::Compression(
            "Snapshot is compressed but compression feature is not enabled".to_string(),
        ))
    }
}

fn le_array<const N: usize>(bytes: &[u8]) -> [u8; N] {
    let mut out = [0u8; N];
    out.copy_from_slice(bytes);
    out
}

/// FNV-1a over the stored payload
fn calculate_checksum(data: &[u8]) -> u64 {
    const FNV_OFFSET: u64 = 14695981039346656037;
    const FNV_PRIME: u64 = 1099511628211;

    let mut hash = FNV_OFFSET;
    for &byte in data {
        hash ^= byte as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
    }
    hash
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_unframe() {
        let body = b"layer state".repeat(40);
        let framed = frame(body.clone()).unwrap();
        assert_eq!(&framed[..5], MAGIC);
        assert_eq!(unframe(&framed).unwrap(), body);
    }

    #[test]
    fn test_invalid_magic() {
        let result = unframe(b"WRONG-and-more-bytes-after-it");
        assert!(matches!(result, Err(SnapshotError::InvalidMagic(_))));
    }

    #[test]
    fn test_truncated_header() {
        assert!(matches!(
            unframe(b"SPKNN\x01"),
            Err(SnapshotError::Truncated(6))
        ));
    }

    #[test]
    fn test_corrupted_payload_detected() {
        let mut framed = frame(vec![7u8; 64]).unwrap();
        let last = framed.len() - 1;
        framed[last] ^= 0xFF;
        assert!(matches!(
            unframe(&framed),
            Err(SnapshotError::ChecksumMismatch)
        ));
    }

    #[test]
    fn test_future_version_rejected() {
        let mut framed = frame(vec![1, 2, 3]).unwrap();
        framed[5..9].copy_from_slice(&(FORMAT_VERSION + 1).to_le_bytes());
        assert!(matches!(
            unframe(&framed),
            Err(SnapshotError::VersionMismatch { .. })
        ));
    }

    #[test]
    fn test_checksum() {
        assert_eq!(calculate_checksum(b"hello world"), calculate_checksum(b"hello world"));
        assert_ne!(calculate_checksum(b"hello world"), calculate_checksum(b"hello worlD"));
    }
}

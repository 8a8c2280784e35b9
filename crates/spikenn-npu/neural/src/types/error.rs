// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Error types for neural parameter handling

use thiserror::Error;

/// Errors raised while validating neural parameters
#[derive(Debug, Clone, PartialEq, Error)]
pub enum NeuralError {
    #[error("Invalid {field}: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    #[error("Invalid range for {field}: min {min} exceeds max {max}")]
    InvertedRange {
        field: &'static str,
        min: f64,
        max: f64,
    },
}

pub type Result<T> = core::result::Result<T, NeuralError>;

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*
 * Copyright 2025 Neuraville Inc.
 *
 * Licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License.
 */

//! Bounding parameters for synaptic weights and delays
//!
//! Every learned weight is clamped into `[min_rand_weight, max_weight]` of its
//! type. Delays are only bounded when they are drawn at random.

use serde::{Deserialize, Serialize};

use crate::types::{NeuralError, NeuronType, Result};

/// Per-type weight limits and the random delay range
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingParameters {
    pub ex_max_weight: f32,
    pub in_max_weight: f32,
    pub ex_min_rand_weight: f32,
    pub ex_max_rand_weight: f32,
    pub in_min_rand_weight: f32,
    pub in_max_rand_weight: f32,
    pub min_rand_delay: u32,
    pub max_rand_delay: u32,
}

impl Default for BoundingParameters {
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

impl BoundingParameters {
    #[inline]
    pub fn max_weight(&self, kind: NeuronType) -> f32 {
        match kind {
            NeuronType::Excitatory => self.ex_max_weight,
            NeuronType::Inhibitory => self.in_max_weight,
        }
    }

    /// Lower learning bound, shared with the low end of random initialization
    #[inline]
    pub fn min_weight(&self, kind: NeuronType) -> f32 {
        match kind {
            NeuronType::Excitatory => self.ex_min_rand_weight,
            NeuronType::Inhibitory => self.in_min_rand_weight,
        }
    }

    pub fn rand_weight_range(&self, kind: NeuronType) -> (f32, f32) {
        match kind {
            NeuronType::Excitatory => (self.ex_min_rand_weight, self.ex_max_rand_weight),
            NeuronType::Inhibitory => (self.in_min_rand_weight, self.in_max_rand_weight),
        }
    }

    pub fn rand_delay_range(&self) -> (u32, u32) {
        (self.min_rand_delay, self.max_rand_delay)
    }

    /// Overwrite every field that is present in `update`.
    pub fn apply(&mut self, update: &BoundingUpdate) {
        if let Some(v) = update.ex_max_weight {
            self.ex_max_weight = v;
        }
        if let Some(v) = update.in_max_weight {
            self.in_max_weight = v;
        }
        if let Some(v) = update.ex_min_rand_weight {
            self.ex_min_rand_weight = v;
        }
        if let Some(v) = update.ex_max_rand_weight {
            self.ex_max_rand_weight = v;
        }
        if let Some(v) = update.in_min_rand_weight {
            self.in_min_rand_weight = v;
        }
        if let Some(v) = update.in_max_rand_weight {
            self.in_max_rand_weight = v;
        }
        if let Some(v) = update.min_rand_delay {
            self.min_rand_delay = v;
        }
        if let Some(v) = update.max_rand_delay {
            self.max_rand_delay = v;
        }
    }

    pub fn validate(&self) -> Result<()> {
        check_range(
            "excitatory random weight",
            self.ex_min_rand_weight as f64,
            self.ex_max_rand_weight as f64,
        )?;
        check_range(
            "inhibitory random weight",
            self.in_min_rand_weight as f64,
            self.in_max_rand_weight as f64,
        )?;
        check_range(
            "random delay",
            self.min_rand_delay as f64,
            self.max_rand_delay as f64,
        )?;
        if self.ex_max_weight < self.ex_min_rand_weight {
            return Err(NeuralError::InvalidParameter {
                field: "ex_max_weight",
                reason: "below the excitatory minimum weight".to_string(),
            });
        }
        if self.in_max_weight < self.in_min_rand_weight {
            return Err(NeuralError::InvalidParameter {
                field: "in_max_weight",
                reason: "below the inhibitory minimum weight".to_string(),
            });
        }
        Ok(())
    }
}

fn check_range(field: &'static str, min: f64, max: f64) -> Result<()> {
    if min > max {
        return Err(NeuralError::InvertedRange { field, min, max });
    }
    Ok(())
}

/// Partial update of [`BoundingParameters`]; `None` leaves a field unchanged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingUpdate {
    pub ex_max_weight: Option<f32>,
    pub in_max_weight: Option<f32>,
    pub ex_min_rand_weight: Option<f32>,
    pub ex_max_rand_weight: Option<f32>,
    pub in_min_rand_weight: Option<f32>,
    pub in_max_rand_weight: Option<f32>,
    pub min_rand_delay: Option<u32>,
    pub max_rand_delay: Option<u32>,
}

impl BoundingUpdate {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_update_is_noop() {
        let mut bounds = BoundingParameters::default();
        let before = bounds;
        let update = BoundingUpdate::default();
        assert!(update.is_empty());

        bounds.apply(&update);
        assert_eq!(bounds, before);
    }

    #[test]
    fn test_partial_update() {
        let mut bounds = BoundingParameters::default();
        bounds.apply(&BoundingUpdate {
            ex_max_weight: Some(5.0),
            max_rand_delay: Some(4),
            ..Default::default()
        });

        assert_eq!(bounds.ex_max_weight, 5.0);
        assert_eq!(bounds.max_rand_delay, 4);
        assert_eq!(bounds.in_max_weight, 20.0);
    }

    #[test]
    fn test_negative_values_are_legitimate() {
        let mut bounds = BoundingParameters::default();
        bounds.apply(&BoundingUpdate {
            ex_min_rand_weight: Some(-1.0),
            ..Default::default()
        });
        assert_eq!(bounds.ex_min_rand_weight, -1.0);
    }

    #[test]
    fn test_weight_limits_per_type() {
        let bounds = BoundingParameters::default();
        assert_eq!(bounds.min_weight(NeuronType::Excitatory), 0.0);
        assert_eq!(bounds.max_weight(NeuronType::Excitatory), 10.0);
        assert_eq!(bounds.max_weight(NeuronType::Inhibitory), 20.0);
        assert_eq!(bounds.rand_weight_range(NeuronType::Inhibitory), (0.0, 20.0));
    }

    #[test]
    fn test_validate_rejects_inverted_ranges() {
        let mut bounds = BoundingParameters::default();
        assert!(bounds.validate().is_ok());

        bounds.min_rand_delay = 30;
        assert!(matches!(
            bounds.validate(),
            Err(NeuralError::InvertedRange { field: "random delay", .. })
        ));
    }
}

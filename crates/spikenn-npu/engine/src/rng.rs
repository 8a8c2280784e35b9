// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

/*!
Random number generation for the simulator.

Every stochastic decision (input injection, connection construction) draws
from the single generator owned by the network, so a seed reproduces a run.
*/

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// The network's random stream
pub type SimRng = StdRng;

/// Seeded generator, or an entropy-seeded one when `seed` is `None`
pub fn create_rng(seed: Option<u64>) -> SimRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// Uniform draw in `[min, max]`; returns `min` for an empty or inverted range
#[inline]
pub fn uniform(rng: &mut SimRng, min: f32, max: f32) -> f32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

/// Uniform integer draw in `[min, max]`; returns `min` for an inverted range
#[inline]
pub fn uniform_inclusive(rng: &mut SimRng, min: u32, max: u32) -> u32 {
    if max <= min {
        return min;
    }
    rng.gen_range(min..=max)
}

// Copyright 2025 Neuraville Inc.
// SPDX-License-Identifier: Apache-2.0

//! Simulation clock
//!
//! Time is derived from the tick counter (`tick × time_step`) rather than
//! accumulated, so sub-unit steps never drift.

use serde::{Deserialize, Serialize};

/// Period boundaries are evaluated on time snapped to this many steps per unit
const TIME_SNAP_SCALE: f64 = 1e6;

/// Shared time source; only the network advances it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SimClock {
    tick: u64,
    time_step: f64,
}

impl SimClock {
    pub fn new(time_step: f64) -> Self {
        Self::at(0, time_step)
    }

    /// Clock positioned at an arbitrary tick
    pub fn at(tick: u64, time_step: f64) -> Self {
        Self { tick, time_step }
    }

    #[inline]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    #[inline]
    pub fn time_step(&self) -> f64 {
        self.time_step
    }

    #[inline]
    pub fn time(&self) -> f64 {
        self.tick as f64 * self.time_step
    }

    /// Simulation time at which tick `tick` starts
    #[inline]
    pub fn time_of_tick(&self, tick: u64) -> f64 {
        tick as f64 * self.time_step
    }

    pub(crate) fn advance(&mut self) {
        self.tick += 1;
    }

    /// True when a boundary of `period` falls within the current tick,
    /// i.e. `time mod period < time_step`.
    ///
    /// Fires exactly once per period however finely time is subdivided.
    pub fn is_period_boundary(&self, period: f64) -> bool {
        if !(period > 0.0) {
            return false;
        }
        let time = (self.time() * TIME_SNAP_SCALE).round() / TIME_SNAP_SCALE;
        time.rem_euclid(period) < self.time_step
    }
}

impl Default for SimClock {
    fn default() -> Self {
        Self::new(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_from_ticks() {
        let clock = SimClock::at(25, 0.1);
        assert!((clock.time() - 2.5).abs() < 1e-12);
        assert_eq!(clock.tick(), 25);
    }

    #[test]
    fn test_unit_step_boundary_once_per_period() {
        let mut clock = SimClock::new(1.0);
        let mut hits = Vec::new();
        for _ in 0..250 {
            clock.advance();
            if clock.is_period_boundary(100.0) {
                hits.push(clock.tick());
            }
        }
        assert_eq!(hits, vec![100, 200]);
    }

    #[test]
    fn test_sub_unit_step_boundary_once_per_unit() {
        let mut clock = SimClock::new(0.1);
        let mut hits = 0;
        for _ in 0..100 {
            clock.advance();
            if clock.is_period_boundary(1.0) {
                hits += 1;
            }
        }
        // t = 1.0 .. 10.0
        assert_eq!(hits, 10);
    }

    #[test]
    fn test_non_positive_period_never_fires() {
        let clock = SimClock::at(0, 1.0);
        assert!(!clock.is_period_boundary(0.0));
        assert!(!clock.is_period_boundary(-1.0));
    }
}

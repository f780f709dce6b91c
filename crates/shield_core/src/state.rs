//! Per-instance shield state.
//!
//! One [`ShieldState`] exists per projector block. The first five fields
//! are persisted across save/load (see [`crate::persistence`]); the rest
//! is transient and restarts from zero on load.

use serde::{Deserialize, Serialize};

use crate::proxy::ProxyHandle;

/// Coarse state of the field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShieldPhase {
    /// Field is up and absorbing.
    Healthy,
    /// Field is down and recovering.
    Broken,
}

/// Interval timer that only resets when it is checked.
///
/// Elapsed time accumulates every tick. [`UseTimer::fire`] returns true
/// and restarts the interval once it has elapsed.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct UseTimer {
    elapsed: f32,
}

impl UseTimer {
    /// Advance the timer.
    pub fn advance(&mut self, delta: f32) {
        self.elapsed += delta;
    }

    /// Time since the timer last fired.
    #[must_use]
    pub const fn elapsed(&self) -> f32 {
        self.elapsed
    }

    /// Fire if `interval` has elapsed, restarting the interval.
    pub fn fire(&mut self, interval: f32) -> bool {
        let done = self.elapsed >= interval;
        if done {
            self.elapsed = 0.0;
        }
        done
    }
}

/// Mutable state of one force projector.
#[derive(Debug, Clone, PartialEq)]
pub struct ShieldState {
    /// Field is down.
    pub broken: bool,
    /// Accumulated structural stress, `0..=breakage`.
    pub buildup: f32,
    /// Smoothed radius multiplier in `[0, 1]`.
    pub radius_scale: f32,
    /// Smoothed power-adequacy indicator in `[0, 1]`.
    pub warmup: f32,
    /// Smoothed charge-buffer fill ratio in `[0, 1]`.
    pub heat_level: f32,
    /// Absorption flash, decays to 0.
    pub hit_flash: f32,
    /// Render proxy, resolved through the arena each tick.
    pub proxy: Option<ProxyHandle>,
    /// Charge-item use interval.
    pub use_timer: UseTimer,
}

impl ShieldState {
    /// Fresh state for a newly placed block: broken until powered.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            broken: true,
            buildup: 0.0,
            radius_scale: 0.0,
            warmup: 0.0,
            heat_level: 0.0,
            hit_flash: 0.0,
            proxy: None,
            use_timer: UseTimer { elapsed: 0.0 },
        }
    }

    /// Current phase.
    #[must_use]
    pub const fn phase(&self) -> ShieldPhase {
        if self.broken {
            ShieldPhase::Broken
        } else {
            ShieldPhase::Healthy
        }
    }

    /// Whether the persisted fields of `self` and `other` have identical bits.
    #[must_use]
    pub fn persisted_eq(&self, other: &Self) -> bool {
        self.broken == other.broken
            && self.buildup.to_bits() == other.buildup.to_bits()
            && self.radius_scale.to_bits() == other.radius_scale.to_bits()
            && self.warmup.to_bits() == other.warmup.to_bits()
            && self.heat_level.to_bits() == other.heat_level.to_bits()
    }
}

impl Default for ShieldState {
    fn default() -> Self {
        Self::new()
    }
}

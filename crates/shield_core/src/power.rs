//! Buffered power consumer.
//!
//! The projector stores power in a bounded buffer. `satisfaction` is the
//! fill level of that buffer as a fraction of capacity. Each tick the
//! shield pays a fixed upkeep out of it, and every absorbed projectile
//! draws more. The power graph refills it through [`PowerEconomy::charge`].

use serde::{Deserialize, Serialize};

use crate::config::ShieldConfig;
use crate::math::lerp_delta;

/// Warmup rate toward 1 while supply is adequate.
pub const WARMUP_RISE_RATE: f32 = 0.1;

/// Warmup rate toward 0 while supply is inadequate.
pub const WARMUP_DECAY_RATE: f32 = 0.15;

/// Outcome of the upkeep draw for one tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Supply {
    /// Upkeep was paid.
    Adequate,
    /// The buffer could not cover upkeep and was emptied.
    Inadequate,
}

/// Power buffer of one projector.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PowerEconomy {
    /// Buffer fill level in `[0, 1]`.
    pub satisfaction: f32,
    /// Buffer capacity in power units.
    capacity: f32,
    /// Power units accepted per tick at most.
    fill_rate: f32,
}

impl PowerEconomy {
    /// Create an empty buffer.
    #[must_use]
    pub fn new(capacity: f32, ticks_to_fill: f32) -> Self {
        Self {
            satisfaction: 0.0,
            capacity,
            fill_rate: capacity / ticks_to_fill,
        }
    }

    /// Create an empty buffer sized by `config`.
    #[must_use]
    pub fn from_config(config: &ShieldConfig) -> Self {
        Self::new(config.power_capacity, config.ticks_to_fill)
    }

    /// Buffer capacity in power units.
    #[must_use]
    pub const fn capacity(&self) -> f32 {
        self.capacity
    }

    /// Power units currently stored.
    #[must_use]
    pub fn stored(&self) -> f32 {
        self.satisfaction * self.capacity
    }

    /// Offer power from the graph.
    ///
    /// Accepts at most one tick's fill rate and never beyond capacity.
    /// Returns the power units actually accepted.
    pub fn charge(&mut self, offered: f32, delta: f32) -> f32 {
        let room = (1.0 - self.satisfaction).max(0.0) * self.capacity;
        let accepted = offered.max(0.0).min(self.fill_rate * delta).min(room);
        if accepted > 0.0 {
            self.satisfaction = (self.satisfaction + accepted / self.capacity).min(1.0);
        }
        accepted
    }

    /// Whether the consumer reports itself satisfied to the block framework.
    ///
    /// Uses the configured upkeep even for cheating instances.
    #[must_use]
    pub fn consumer_valid(&self, base_power_draw: f32) -> bool {
        self.satisfaction >= base_power_draw / self.capacity
    }

    /// Pay one tick of upkeep and move `warmup` accordingly.
    ///
    /// An underpowered buffer is emptied and warmup decays toward 0;
    /// otherwise the upkeep is deducted and warmup rises toward 1.
    pub fn draw_upkeep(&mut self, base_draw_ratio: f32, warmup: &mut f32, delta: f32) -> Supply {
        if self.satisfaction < base_draw_ratio {
            *warmup = lerp_delta(*warmup, 0.0, WARMUP_DECAY_RATE, delta);
            self.satisfaction = 0.0;
            Supply::Inadequate
        } else {
            *warmup = lerp_delta(*warmup, 1.0, WARMUP_RISE_RATE, delta);
            self.satisfaction -= self.satisfaction.min(base_draw_ratio);
            Supply::Adequate
        }
    }

    /// Deduct up to `ratio` of the buffer. Returns the fraction removed.
    pub fn drain(&mut self, ratio: f32) -> f32 {
        let taken = ratio.min(self.satisfaction);
        self.satisfaction -= taken;
        taken
    }
}

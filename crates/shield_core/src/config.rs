//! Data-driven force projector definition.
//!
//! Every tunable of the block lives in [`ShieldConfig`], which is
//! deserialized from RON. Missing fields fall back to the stock block.
//!
//! # Example RON
//!
//! ```ron
//! ShieldConfig(
//!     radius: 100.0,
//!     phase_radius_boost: 80.0,
//!     breakage: 550.0,
//!     base_power_draw: 0.2,
//!     coolant: CoolantFilter(max_temperature: 0.5),
//! )
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::consume::{Consumers, Coolant};
use crate::error::{Result, ShieldError};

/// Simulation ticks per second of game time.
pub const TICKS_PER_SECOND: f32 = 60.0;

/// Which liquids count as coolant and how fast they are used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CoolantFilter {
    /// Hottest accepted liquid (inclusive).
    pub max_temperature: f32,
    /// Flammability must stay strictly below this.
    pub max_flammability: f32,
    /// Liquid used per tick while cooling.
    pub use_per_tick: f32,
}

impl Default for CoolantFilter {
    fn default() -> Self {
        Self {
            max_temperature: 0.5,
            max_flammability: 0.1,
            use_per_tick: 0.1,
        }
    }
}

impl CoolantFilter {
    /// Whether `coolant` passes the temperature and flammability filter.
    #[must_use]
    pub fn accepts(&self, coolant: &Coolant) -> bool {
        coolant.temperature <= self.max_temperature && coolant.flammability < self.max_flammability
    }

    /// Coolant usable this tick, if the tank holds an accepted liquid
    /// in at least the amount one tick consumes.
    pub fn usable<C: Consumers + ?Sized>(&self, consumers: &C, delta: f32) -> Option<Coolant> {
        let (coolant, amount) = consumers.liquid()?;
        (self.accepts(&coolant) && amount >= self.use_per_tick * delta).then_some(coolant)
    }
}

/// Force projector block definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShieldConfig {
    /// Nominal field radius in world units.
    pub radius: f32,
    /// Radius added when the charge buffer is full.
    pub phase_radius_boost: f32,
    /// Buildup at which the field breaks.
    pub breakage: f32,
    /// Buildup decay per tick while healthy.
    pub cooldown_normal: f32,
    /// Decay multiplier base while coolant is flowing.
    pub cooldown_liquid: f32,
    /// Buildup decay per tick while broken.
    pub cooldown_broken_base: f32,
    /// Power units drawn per tick to keep the field up.
    pub base_power_draw: f32,
    /// Power units drawn per point of absorbed shield damage.
    pub power_damage: f32,
    /// Size of the power buffer.
    pub power_capacity: f32,
    /// Ticks to fill the buffer from empty at full supply.
    pub ticks_to_fill: f32,
    /// Ticks between charge-item uses.
    pub phase_use_time: f32,
    /// Charge-item buffer size.
    pub item_capacity: u32,
    /// Coolant tank size.
    pub liquid_capacity: f32,
    /// Accepted coolant.
    pub coolant: CoolantFilter,
}

impl Default for ShieldConfig {
    fn default() -> Self {
        Self {
            radius: 100.0,
            phase_radius_boost: 80.0,
            breakage: 550.0,
            cooldown_normal: 1.75,
            cooldown_liquid: 1.5,
            cooldown_broken_base: 0.35,
            base_power_draw: 0.2,
            power_damage: 0.1,
            power_capacity: 60.0,
            ticks_to_fill: 60.0,
            phase_use_time: 350.0,
            item_capacity: 10,
            liquid_capacity: 10.0,
            coolant: CoolantFilter::default(),
        }
    }
}

/// Player-facing stat sheet.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ShieldStats {
    /// Upkeep in power units per second.
    pub power_use_per_second: f32,
    /// Power units per point of absorbed damage.
    pub power_damage: f32,
}

impl ShieldConfig {
    /// Parse and validate a config from RON text.
    pub fn from_ron_str(ron: &str) -> Result<Self> {
        let config: Self =
            ron::from_str(ron).map_err(|e| ShieldError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a config from a RON file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path.as_ref())?;
        Self::from_ron_str(&contents)
    }

    /// Check every field is in range.
    pub fn validate(&self) -> Result<()> {
        positive("radius", self.radius)?;
        positive("breakage", self.breakage)?;
        positive("power_capacity", self.power_capacity)?;
        positive("ticks_to_fill", self.ticks_to_fill)?;
        positive("phase_use_time", self.phase_use_time)?;
        non_negative("phase_radius_boost", self.phase_radius_boost)?;
        non_negative("cooldown_normal", self.cooldown_normal)?;
        non_negative("cooldown_liquid", self.cooldown_liquid)?;
        non_negative("cooldown_broken_base", self.cooldown_broken_base)?;
        non_negative("base_power_draw", self.base_power_draw)?;
        non_negative("power_damage", self.power_damage)?;
        non_negative("liquid_capacity", self.liquid_capacity)?;
        non_negative("coolant.use_per_tick", self.coolant.use_per_tick)?;
        if self.item_capacity == 0 {
            return Err(ShieldError::InvalidConfig {
                field: "item_capacity",
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Fraction of the power buffer drawn as upkeep each tick.
    ///
    /// Cheating instances pay no upkeep.
    #[must_use]
    pub fn base_draw_ratio(&self, cheat: bool) -> f32 {
        if cheat {
            0.0
        } else {
            self.base_power_draw / self.power_capacity
        }
    }

    /// Power units the buffer accepts per tick.
    #[must_use]
    pub fn fill_rate(&self) -> f32 {
        self.power_capacity / self.ticks_to_fill
    }

    /// Stat sheet for UI display.
    #[must_use]
    pub fn stats(&self) -> ShieldStats {
        ShieldStats {
            power_use_per_second: self.base_power_draw * TICKS_PER_SECOND,
            power_damage: self.power_damage,
        }
    }
}

fn positive(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ShieldError::InvalidConfig {
            field,
            reason: format!("must be finite and positive, got {value}"),
        })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ShieldError::InvalidConfig {
            field,
            reason: format!("must be finite and non-negative, got {value}"),
        })
    }
}

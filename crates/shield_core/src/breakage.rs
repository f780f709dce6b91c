//! Breakage state machine.
//!
//! Advances a [`ShieldState`] by one tick before absorption runs:
//! heat and radius smoothing, charge-item use, power upkeep, stress
//! decay, and the transitions between healthy and broken.
//!
//! | From    | Condition                              | To      |
//! |---------|----------------------------------------|---------|
//! | Healthy | warmup ≤ 0.09 while underpowered       | Broken  |
//! | Healthy | buildup ≥ breakage                     | Broken  |
//! | Broken  | buildup ≤ 0 and warmup ≥ 0.9           | Healthy |

use serde::{Deserialize, Serialize};

use crate::config::ShieldConfig;
use crate::consume::{Consumers, Coolant};
use crate::math::lerp_delta;
use crate::power::{PowerEconomy, Supply};
use crate::state::ShieldState;

/// Warmup at or below which an underpowered field collapses.
pub const BREAK_WARMUP: f32 = 0.09;

/// Warmup needed before a broken field comes back.
pub const RECOVER_WARMUP: f32 = 0.9;

/// Radius scale smoothing rate.
pub const RADIUS_SCALE_RATE: f32 = 0.05;

/// Heat level smoothing rate.
pub const HEAT_RATE: f32 = 0.1;

/// Hit flash decay per tick; a full flash fades in 5 ticks.
pub const HIT_FLASH_DECAY: f32 = 1.0 / 5.0;

/// Heat capacity at which coolant gives exactly the base liquid bonus.
const COOLANT_BASE_HEAT_CAPACITY: f32 = 0.4;

/// Weight of heat capacity above the base in the liquid bonus.
const COOLANT_HEAT_WEIGHT: f32 = 0.9;

/// Why the field went down.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BreakCause {
    /// Buildup reached the breakage threshold.
    Overload,
    /// Warmup collapsed because upkeep could not be paid.
    PowerLoss,
}

/// A change of phase during a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Transition {
    /// Healthy to broken.
    Broke(BreakCause),
    /// Broken to healthy.
    Recovered,
}

/// Result of [`ShieldState::advance`].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Advance {
    /// Phase change this tick, if any.
    pub transition: Option<Transition>,
    /// Whether a charge item was used.
    pub item_consumed: bool,
    /// Supply outcome of the upkeep draw.
    pub underpowered: bool,
    /// Smoke chance, taken before upkeep and decay touch buildup.
    pub smoke_chance: f32,
}

impl ShieldState {
    /// Advance the state machine by one tick.
    ///
    /// At most one transition can happen per tick: recovery needs
    /// warmup ≥ 0.9 and zero buildup, which excludes both break paths.
    pub fn advance<C: Consumers + ?Sized>(
        &mut self,
        power: &mut PowerEconomy,
        config: &ShieldConfig,
        consumers: &mut C,
        cheat: bool,
        delta: f32,
    ) -> Advance {
        let mut outcome = Advance::default();

        let items = consumers.items();
        self.heat_level = lerp_delta(self.heat_level, items.fill_ratio(), HEAT_RATE, delta);

        self.use_timer.advance(delta);
        if power.consumer_valid(config.base_power_draw)
            && consumers.consumes_valid()
            && !self.broken
            && self.use_timer.fire(config.phase_use_time)
            && items.total > 0
        {
            consumers.remove_item();
            outcome.item_consumed = true;
        }

        let scale_target = if self.broken { 0.0 } else { 1.0 };
        self.radius_scale = lerp_delta(self.radius_scale, scale_target, RADIUS_SCALE_RATE, delta);
        outcome.smoke_chance = self.smoke_chance(config.breakage, delta);

        let supply = power.draw_upkeep(config.base_draw_ratio(cheat), &mut self.warmup, delta);
        if supply == Supply::Inadequate {
            outcome.underpowered = true;
            if self.warmup <= BREAK_WARMUP && !self.broken {
                self.broken = true;
                outcome.transition = Some(Transition::Broke(BreakCause::PowerLoss));
            }
        }

        if self.buildup > 0.0 {
            let coolant = config.coolant.usable(&*consumers, delta);
            if coolant.is_some() {
                consumers.remove_liquid(config.coolant.use_per_tick * delta);
            }
            self.decay_buildup(config, coolant, delta);
        }

        if self.try_recover() {
            outcome.transition = Some(Transition::Recovered);
        }

        if self.settle_overload(config.breakage) {
            outcome.transition = Some(Transition::Broke(BreakCause::Overload));
        }

        self.decay_hit_flash(delta);

        outcome
    }

    /// Bleed off buildup, faster while healthy or cooled.
    pub fn decay_buildup(&mut self, config: &ShieldConfig, coolant: Option<Coolant>, delta: f32) {
        let mut scale = if self.broken {
            config.cooldown_broken_base
        } else {
            config.cooldown_normal
        };
        if let Some(coolant) = coolant {
            scale *= config.cooldown_liquid
                * (1.0 + (coolant.heat_capacity - COOLANT_BASE_HEAT_CAPACITY) * COOLANT_HEAT_WEIGHT);
        }
        self.buildup = (self.buildup - delta * scale).max(0.0);
    }

    /// Bring a broken field back once stress is gone and power is steady.
    pub fn try_recover(&mut self) -> bool {
        if self.broken && self.buildup <= 0.0 && self.warmup >= RECOVER_WARMUP {
            self.broken = false;
            true
        } else {
            false
        }
    }

    /// Break a healthy field whose buildup reached `breakage`, clamping it.
    pub fn settle_overload(&mut self, breakage: f32) -> bool {
        if self.buildup >= breakage && !self.broken {
            self.broken = true;
            self.buildup = breakage;
            true
        } else {
            false
        }
    }

    /// Fade the absorption flash.
    pub fn decay_hit_flash(&mut self, delta: f32) {
        if self.hit_flash > 0.0 {
            self.hit_flash = (self.hit_flash - HIT_FLASH_DECAY * delta).max(0.0);
        }
    }

    /// Alpha of the overheat glow on the block, `buildup / breakage × 0.75`.
    #[must_use]
    pub fn overheat_alpha(&self, breakage: f32) -> f32 {
        if self.buildup <= 0.0 {
            0.0
        } else {
            self.buildup / breakage * 0.75
        }
    }

    /// Per-tick chance the block emits a smoke puff.
    #[must_use]
    pub fn smoke_chance(&self, breakage: f32, delta: f32) -> f32 {
        delta * self.buildup / breakage * 0.1
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consume::BlockStorage;

    struct Rig {
        state: ShieldState,
        power: PowerEconomy,
        config: ShieldConfig,
        storage: BlockStorage,
    }

    impl Rig {
        fn new() -> Self {
            let config = ShieldConfig::default();
            Self {
                state: ShieldState::new(),
                power: PowerEconomy::from_config(&config),
                storage: BlockStorage::new(config.item_capacity, config.liquid_capacity),
                config,
            }
        }

        fn healthy() -> Self {
            let mut rig = Self::new();
            rig.state.broken = false;
            rig.state.warmup = 1.0;
            rig.state.radius_scale = 1.0;
            rig
        }

        fn step(&mut self) -> Advance {
            self.state.advance(
                &mut self.power,
                &self.config,
                &mut self.storage,
                false,
                1.0,
            )
        }
    }

    #[test]
    fn test_powered_field_recovers_on_crossing_warmup() {
        let mut rig = Rig::new();
        let mut recovered_at = None;
        for tick in 1..=200 {
            rig.power.satisfaction = 1.0;
            let before = rig.state.warmup;
            let outcome = rig.step();
            if outcome.transition == Some(Transition::Recovered) {
                assert!(before < RECOVER_WARMUP);
                assert!(rig.state.warmup >= RECOVER_WARMUP);
                recovered_at = Some(tick);
                break;
            }
            assert!(rig.state.broken);
        }
        assert_eq!(recovered_at, Some(22));
    }

    #[test]
    fn test_power_loss_breaks_only_at_low_warmup() {
        let mut rig = Rig::healthy();
        let mut broke = None;
        for tick in 1..=40 {
            let outcome = rig.step();
            if let Some(Transition::Broke(cause)) = outcome.transition {
                assert_eq!(cause, BreakCause::PowerLoss);
                broke = Some(tick);
                break;
            }
            assert!(rig.state.warmup > BREAK_WARMUP);
        }
        // 0.85^n <= 0.09 first at n = 15
        assert_eq!(broke, Some(15));
        assert!(rig.state.warmup <= BREAK_WARMUP);
    }

    #[test]
    fn test_overload_clamps_buildup() {
        let mut rig = Rig::healthy();
        rig.power.satisfaction = 1.0;
        rig.state.buildup = 2000.0;

        let outcome = rig.step();

        assert_eq!(
            outcome.transition,
            Some(Transition::Broke(BreakCause::Overload))
        );
        assert!(rig.state.broken);
        assert_eq!(rig.state.buildup, rig.config.breakage);
    }

    #[test]
    fn test_broken_field_waits_for_buildup_to_clear() {
        let mut rig = Rig::new();
        rig.state.warmup = 1.0;
        rig.state.buildup = 1.0;
        rig.power.satisfaction = 1.0;

        // 0.35 per tick while broken: 1.0 clears on the third tick
        assert_eq!(rig.step().transition, None);
        rig.power.satisfaction = 1.0;
        assert_eq!(rig.step().transition, None);
        rig.power.satisfaction = 1.0;
        assert_eq!(rig.step().transition, Some(Transition::Recovered));
        assert_eq!(rig.state.buildup, 0.0);
    }

    #[test]
    fn test_decay_rates() {
        let config = ShieldConfig::default();
        let mut state = ShieldState::new();
        state.buildup = 10.0;
        state.decay_buildup(&config, None, 1.0);
        assert!((state.buildup - 9.65).abs() < 1e-5);

        state.broken = false;
        state.decay_buildup(&config, None, 1.0);
        assert!((state.buildup - 7.9).abs() < 1e-5);
    }

    #[test]
    fn test_coolant_multiplies_decay() {
        let config = ShieldConfig::default();
        let mut state = ShieldState::new();
        state.broken = false;
        state.buildup = 100.0;

        // cryofluid: 1.75 * 1.5 * (1 + 0.5 * 0.9) = 3.80625
        state.decay_buildup(&config, Some(Coolant::CRYOFLUID), 1.0);
        assert!((state.buildup - (100.0 - 3.806_25)).abs() < 1e-4);
    }

    #[test]
    fn test_coolant_consumed_only_while_buildup() {
        let mut rig = Rig::healthy();
        rig.storage.add_liquid(Coolant::WATER, 5.0);

        rig.power.satisfaction = 1.0;
        rig.step();
        assert_eq!(rig.storage.liquid_amount, 5.0);

        rig.state.buildup = 50.0;
        rig.power.satisfaction = 1.0;
        rig.step();
        assert!((rig.storage.liquid_amount - 4.9).abs() < 1e-5);
        // water: 1.75 * 1.5 * 1.0
        assert!((rig.state.buildup - (50.0 - 2.625)).abs() < 1e-4);
    }

    #[test]
    fn test_rejected_coolant_is_not_used() {
        let mut rig = Rig::healthy();
        rig.storage.add_liquid(Coolant::OIL, 5.0);
        rig.state.buildup = 50.0;
        rig.power.satisfaction = 1.0;
        rig.step();
        assert_eq!(rig.storage.liquid_amount, 5.0);
        assert!((rig.state.buildup - 48.25).abs() < 1e-4);
    }

    #[test]
    fn test_buildup_never_negative() {
        let mut rig = Rig::healthy();
        rig.state.buildup = 0.5;
        rig.power.satisfaction = 1.0;
        rig.step();
        assert_eq!(rig.state.buildup, 0.0);
    }

    #[test]
    fn test_hit_flash_fades_in_five_ticks() {
        let mut state = ShieldState::new();
        state.hit_flash = 1.0;
        for _ in 0..4 {
            state.decay_hit_flash(1.0);
            assert!(state.hit_flash > 0.0);
        }
        state.decay_hit_flash(1.0);
        assert!(state.hit_flash < 1e-6);
        assert!(state.hit_flash >= 0.0);
    }

    #[test]
    fn test_item_used_on_interval() {
        let mut rig = Rig::healthy();
        rig.storage.add_items(3);
        let mut used = Vec::new();
        for tick in 1..=700 {
            rig.power.satisfaction = 1.0;
            if rig.step().item_consumed {
                used.push(tick);
            }
        }
        assert_eq!(used, vec![350, 700]);
        assert_eq!(rig.storage.items, 1);
    }

    #[test]
    fn test_no_item_use_while_broken() {
        let mut rig = Rig::new();
        rig.storage.add_items(3);
        for _ in 0..400 {
            rig.step();
        }
        assert_eq!(rig.storage.items, 3);
    }

    #[test]
    fn test_heat_follows_fill_ratio() {
        let mut rig = Rig::healthy();
        rig.storage.add_items(10);
        rig.power.satisfaction = 1.0;
        rig.step();
        assert!((rig.state.heat_level - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_cheat_skips_upkeep() {
        let mut rig = Rig::healthy();
        for _ in 0..50 {
            rig.state.advance(
                &mut rig.power,
                &rig.config,
                &mut rig.storage,
                true,
                1.0,
            );
        }
        assert!(!rig.state.broken);
        assert!(rig.state.warmup > 0.99);
    }

    #[test]
    fn test_smoke_chance_uses_buildup_before_decay() {
        let mut rig = Rig::healthy();
        rig.power.satisfaction = 1.0;
        rig.state.buildup = 10.0;

        let advance = rig.step();

        let expected = 10.0 / 550.0 * 0.1;
        assert!((advance.smoke_chance - expected).abs() < 1e-7);
        assert!((rig.state.buildup - 8.25).abs() < 1e-5);
    }

    #[test]
    fn test_overheat_alpha_and_smoke() {
        let mut state = ShieldState::new();
        assert_eq!(state.overheat_alpha(550.0), 0.0);
        state.buildup = 275.0;
        assert!((state.overheat_alpha(550.0) - 0.375).abs() < 1e-6);
        assert!((state.smoke_chance(550.0, 1.0) - 0.05).abs() < 1e-6);
    }
}

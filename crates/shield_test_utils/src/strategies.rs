//! Proptest strategies for shield inputs.
//!
//! These generate random but reproducible inputs for property-based
//! testing of the shield invariants.

use proptest::prelude::*;
use shield_core::prelude::*;

/// A tick delta in `[0, 2]`.
pub fn arb_delta() -> impl Strategy<Value = f32> {
    0.0f32..=2.0
}

/// A buffer fill level in `[0, 1]`.
pub fn arb_satisfaction() -> impl Strategy<Value = f32> {
    0.0f32..=1.0
}

/// Power offered per tick, sometimes none at all.
pub fn arb_supply() -> impl Strategy<Value = f32> {
    prop_oneof![Just(0.0f32), 0.0f32..2.0, Just(1.0f32)]
}

/// Shield damage of a single projectile.
pub fn arb_damage() -> impl Strategy<Value = f32> {
    prop_oneof![0.0f32..50.0, 50.0f32..1500.0]
}

/// A state with every field inside its documented range for `breakage`.
pub fn arb_shield_state(breakage: f32) -> impl Strategy<Value = ShieldState> {
    (
        any::<bool>(),
        0.0f32..=breakage,
        0.0f32..=1.0,
        0.0f32..=1.0,
        0.0f32..=1.0,
    )
        .prop_map(|(broken, buildup, radius_scale, warmup, heat_level)| {
            let mut state = ShieldState::new();
            state.broken = broken;
            state.buildup = buildup;
            state.radius_scale = radius_scale;
            state.warmup = warmup;
            state.heat_level = heat_level;
            state
        })
}

/// Any bit pattern for the persisted fields, NaN and infinities included.
pub fn arb_persisted_bits() -> impl Strategy<Value = ShieldState> {
    (any::<bool>(), any::<u32>(), any::<u32>(), any::<u32>(), any::<u32>()).prop_map(
        |(broken, buildup, radius_scale, warmup, heat_level)| {
            let mut state = ShieldState::new();
            state.broken = broken;
            state.buildup = f32::from_bits(buildup);
            state.radius_scale = f32::from_bits(radius_scale);
            state.warmup = f32::from_bits(warmup);
            state.heat_level = f32::from_bits(heat_level);
            state
        },
    )
}

/// A team, weighted toward hostile.
pub fn arb_team() -> impl Strategy<Value = Team> {
    prop_oneof![3 => Just(Team::CRUX), 1 => Just(Team::SHARDED), 1 => Just(Team::DERELICT)]
}

/// A projectile within `reach` of the origin on integer coordinates.
pub fn arb_projectile(reach: i32) -> impl Strategy<Value = Projectile> {
    (
        -reach..=reach,
        -reach..=reach,
        arb_team(),
        arb_damage(),
        prop::bool::weighted(0.9),
    )
        .prop_map(|(x, y, team, damage, absorbable)| {
            let projectile = Projectile::new(Vec2::new(x as f32, y as f32), team, damage);
            if absorbable {
                projectile
            } else {
                projectile.unabsorbable()
            }
        })
}

/// Projectiles arriving on one tick.
pub fn arb_volley(reach: i32, max_len: usize) -> impl Strategy<Value = Vec<Projectile>> {
    prop::collection::vec(arb_projectile(reach), 0..=max_len)
}

/// One tick of inputs: delta, supply offered and the projectiles that arrive.
pub fn arb_tick_input(reach: i32) -> impl Strategy<Value = (f32, f32, Vec<Projectile>)> {
    (arb_delta(), arb_supply(), arb_volley(reach, 6))
}

/// A sequence of tick inputs.
pub fn arb_tick_sequence(
    reach: i32,
    max_len: usize,
) -> impl Strategy<Value = Vec<(f32, f32, Vec<Projectile>)>> {
    prop::collection::vec(arb_tick_input(reach), 1..=max_len)
}

/// A point on an integer grid within `reach` of the origin.
pub fn arb_grid_point(reach: i32) -> impl Strategy<Value = (i32, i32)> {
    (-reach..=reach, -reach..=reach)
}

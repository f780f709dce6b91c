//! Projectile absorption.
//!
//! Once per tick, while the field is up, every hostile absorbable
//! projectile inside the hexagon is nullified. Each one costs power in
//! proportion to its shield damage and adds structural stress scaled by
//! warmup. A hit that leaves the buffer (nearly) empty costs triple.
//!
//! Candidates are processed in the order the query delivers them. The
//! power deduction is cumulative across the pass, so whether a later
//! candidate hits an empty buffer depends on the ones before it.

use crate::config::ShieldConfig;
use crate::geometry::{effective_radius, inside_hexagon};
use crate::math::Vec2;
use crate::power::PowerEconomy;
use crate::state::ShieldState;
use crate::team::Team;

/// Satisfaction at or below which a hit counts as unpowered.
pub const POWER_EPSILON: f32 = 0.0001;

/// Something the field can catch.
pub trait Absorbable {
    /// Team that fired it.
    fn team(&self) -> Team;

    /// Current position.
    fn position(&self) -> Vec2;

    /// Whether a shield may absorb it right now.
    fn can_be_absorbed(&self) -> bool;

    /// Stress and power cost of absorbing it.
    fn shield_damage(&self) -> f32;

    /// Mark it absorbed. Must be idempotent.
    fn absorb(&mut self);
}

/// Spatial index over absorbable entities.
pub trait AbsorbableQuery {
    /// Entity type yielded.
    type Item: Absorbable;

    /// Visit every entity within `radius` of `center`, in index order.
    fn for_each_nearby<F>(&mut self, center: Vec2, radius: f32, visit: F)
    where
        F: FnMut(&mut Self::Item);
}

/// Record of one absorbed projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Absorption {
    /// Where it was caught.
    pub position: Vec2,
    /// Its shield damage.
    pub damage: f32,
    /// Fraction of the power buffer it drained.
    pub power_drawn: f32,
    /// Buildup it added, penalty included.
    pub stress: f32,
    /// Whether the buffer was at or below [`POWER_EPSILON`] after the draw.
    pub unpowered: bool,
}

/// Absorb every hostile projectile inside the field.
///
/// Does nothing while the field is broken. The doubled-radius query and
/// hexagon test both use twice the effective radius.
pub fn absorb_projectiles<Q: AbsorbableQuery>(
    state: &mut ShieldState,
    power: &mut PowerEconomy,
    config: &ShieldConfig,
    center: Vec2,
    team: Team,
    query: &mut Q,
) -> Vec<Absorption> {
    let mut absorbed = Vec::new();
    if state.broken {
        return absorbed;
    }

    let half_width = effective_radius(config, state.heat_level, state.radius_scale) * 2.0;

    query.for_each_nearby(center, half_width, |candidate| {
        if !candidate.can_be_absorbed()
            || candidate.team() == team
            || !inside_hexagon(candidate.position(), center, half_width)
        {
            return;
        }

        candidate.absorb();
        state.hit_flash = 1.0;

        let damage = candidate.shield_damage();
        let power_drawn = power.drain(damage * config.power_damage / power.capacity());

        let base = damage * state.warmup;
        let unpowered = power.satisfaction <= POWER_EPSILON;
        let mut stress = base;
        if unpowered {
            let penalty = damage * state.warmup * 2.0;
            state.buildup += penalty;
            stress += penalty;
        }
        state.buildup += base;

        tracing::trace!(
            damage,
            satisfaction = power.satisfaction,
            stress,
            unpowered,
            "Absorbed projectile"
        );

        absorbed.push(Absorption {
            position: candidate.position(),
            damage,
            power_drawn,
            stress,
            unpowered,
        });
    });

    absorbed
}

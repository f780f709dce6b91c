//! In-memory projectile set.
//!
//! Projectile physics and the real spatial index live outside this crate.
//! [`ProjectileSet`] is the linear-scan stand-in used by the simulation
//! host, tools and tests. It delivers candidates in insertion order.

use serde::{Deserialize, Serialize};

use crate::absorption::{Absorbable, AbsorbableQuery};
use crate::math::Vec2;
use crate::team::Team;

/// A projectile in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Position in world space.
    pub position: Vec2,
    /// Team that fired it.
    pub team: Team,
    /// Shield damage dealt on absorption.
    pub damage: f32,
    /// Whether shields may absorb this kind of projectile.
    pub absorbable: bool,
    absorbed: bool,
}

impl Projectile {
    /// Create an absorbable projectile.
    #[must_use]
    pub const fn new(position: Vec2, team: Team, damage: f32) -> Self {
        Self {
            position,
            team,
            damage,
            absorbable: true,
            absorbed: false,
        }
    }

    /// Builder method: shields cannot absorb this projectile.
    #[must_use]
    pub const fn unabsorbable(mut self) -> Self {
        self.absorbable = false;
        self
    }

    /// Whether a shield has absorbed it.
    #[must_use]
    pub const fn is_absorbed(&self) -> bool {
        self.absorbed
    }
}

impl Absorbable for Projectile {
    fn team(&self) -> Team {
        self.team
    }

    fn position(&self) -> Vec2 {
        self.position
    }

    fn can_be_absorbed(&self) -> bool {
        self.absorbable && !self.absorbed
    }

    fn shield_damage(&self) -> f32 {
        self.damage
    }

    fn absorb(&mut self) {
        self.absorbed = true;
    }
}

/// Projectiles in insertion order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProjectileSet {
    projectiles: Vec<Projectile>,
}

impl ProjectileSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a projectile.
    pub fn push(&mut self, projectile: Projectile) {
        self.projectiles.push(projectile);
    }

    /// Get a projectile by insertion index.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Projectile> {
        self.projectiles.get(index)
    }

    /// Number of projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// Check if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Iterate in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Drop absorbed projectiles. Returns how many were removed.
    pub fn remove_absorbed(&mut self) -> usize {
        let before = self.projectiles.len();
        self.projectiles.retain(|p| !p.absorbed);
        before - self.projectiles.len()
    }
}

impl Extend<Projectile> for ProjectileSet {
    fn extend<T: IntoIterator<Item = Projectile>>(&mut self, iter: T) {
        self.projectiles.extend(iter);
    }
}

impl FromIterator<Projectile> for ProjectileSet {
    fn from_iter<T: IntoIterator<Item = Projectile>>(iter: T) -> Self {
        Self {
            projectiles: iter.into_iter().collect(),
        }
    }
}

impl AbsorbableQuery for ProjectileSet {
    type Item = Projectile;

    fn for_each_nearby<F>(&mut self, center: Vec2, radius: f32, mut visit: F)
    where
        F: FnMut(&mut Projectile),
    {
        for projectile in &mut self.projectiles {
            if projectile.position.within(center, radius) {
                visit(projectile);
            }
        }
    }
}

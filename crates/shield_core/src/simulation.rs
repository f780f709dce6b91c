//! Minimal simulation host.
//!
//! Owns projectors, their block storage and the shared proxy arena, and
//! advances them all once per tick against a shared projectile set. The
//! host stands in for the game world's block update loop.
//!
//! # Determinism
//!
//! - Projectors are stored in a `BTreeMap` and updated in id order
//! - Projectiles are visited in insertion order
//! - No system randomness (smoke chances are reported, not rolled)
//!
//! # Example
//!
//! ```
//! use shield_core::prelude::*;
//!
//! let mut sim = ShieldSimulation::new();
//! let id = sim.spawn(ShieldConfig::default(), Vec2::ZERO, Team::SHARDED);
//! sim.set_supply(id, 1.0).unwrap();
//!
//! let mut projectiles = ProjectileSet::new();
//! for _ in 0..60 {
//!     sim.tick(&mut projectiles);
//! }
//! assert!(!sim.get(id).unwrap().projector.is_broken());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::BTreeMap;
use std::hash::{Hash, Hasher};

use crate::capability::Drawable;
use crate::config::ShieldConfig;
use crate::consume::BlockStorage;
use crate::error::{Result, ShieldError};
use crate::events::ShieldEvent;
use crate::math::Vec2;
use crate::projectile::ProjectileSet;
use crate::projector::{ForceProjector, ProjectorId, TickContext};
use crate::proxy::{ProxyArena, ShieldDraw};
use crate::state::ShieldState;
use crate::team::Team;

/// A placed projector plus what the world feeds it.
#[derive(Debug, Clone, PartialEq)]
pub struct Installation {
    /// The block itself.
    pub projector: ForceProjector,
    /// Its item and liquid storage.
    pub storage: BlockStorage,
    /// Power units the graph offers each tick.
    pub supply_per_tick: f32,
    /// Owning team pays no upkeep.
    pub cheat: bool,
}

/// Events generated during a single tick.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickEvents {
    /// Events tagged with the projector that produced them, in id order.
    pub events: Vec<(ProjectorId, ShieldEvent)>,
    /// Projectiles absorbed (and removed) this tick.
    pub absorbed: usize,
    /// Power units accepted by all buffers this tick.
    pub power_accepted: f32,
    /// Per-projector smoke chances, for the effect layer to roll.
    pub smoke: Vec<(ProjectorId, f32)>,
}

impl TickEvents {
    /// Projectors that broke this tick.
    #[must_use]
    pub fn broken(&self) -> Vec<ProjectorId> {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, ShieldEvent::Broke { .. }))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Projectors that recovered this tick.
    #[must_use]
    pub fn recovered(&self) -> Vec<ProjectorId> {
        self.events
            .iter()
            .filter(|(_, e)| matches!(e, ShieldEvent::Recovered { .. }))
            .map(|(id, _)| *id)
            .collect()
    }
}

/// Host for a set of force projectors.
#[derive(Debug, Clone)]
pub struct ShieldSimulation {
    tick: u64,
    delta: f32,
    installations: BTreeMap<ProjectorId, Installation>,
    proxies: ProxyArena,
    next_id: ProjectorId,
}

impl ShieldSimulation {
    /// Create an empty host running at one tick per update.
    #[must_use]
    pub fn new() -> Self {
        Self::with_delta(1.0)
    }

    /// Create an empty host with a fixed tick delta.
    #[must_use]
    pub fn with_delta(delta: f32) -> Self {
        Self {
            tick: 0,
            delta,
            installations: BTreeMap::new(),
            proxies: ProxyArena::new(),
            next_id: 1,
        }
    }

    /// Get the current tick number.
    #[must_use]
    pub const fn get_tick(&self) -> u64 {
        self.tick
    }

    /// Place a projector with empty storage and no power supply.
    pub fn spawn(&mut self, config: ShieldConfig, position: Vec2, team: Team) -> ProjectorId {
        let id = self.next_id;
        self.next_id += 1;
        let storage = BlockStorage::new(config.item_capacity, config.liquid_capacity);
        self.installations.insert(
            id,
            Installation {
                projector: ForceProjector::new(id, config, position, team),
                storage,
                supply_per_tick: 0.0,
                cheat: false,
            },
        );
        id
    }

    /// Remove a projector and its render proxy.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::UnknownProjector`] if `id` is not placed.
    pub fn despawn(&mut self, id: ProjectorId) -> Result<ShieldState> {
        let installation = self
            .installations
            .remove(&id)
            .ok_or(ShieldError::UnknownProjector(id))?;
        Ok(installation.projector.destroy(&mut self.proxies))
    }

    /// Get an installation.
    #[must_use]
    pub fn get(&self, id: ProjectorId) -> Option<&Installation> {
        self.installations.get(&id)
    }

    /// Get an installation mutably.
    pub fn get_mut(&mut self, id: ProjectorId) -> Option<&mut Installation> {
        self.installations.get_mut(&id)
    }

    fn installation_mut(&mut self, id: ProjectorId) -> Result<&mut Installation> {
        self.installations
            .get_mut(&id)
            .ok_or(ShieldError::UnknownProjector(id))
    }

    /// Set the power offered to a projector each tick.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::UnknownProjector`] if `id` is not placed.
    pub fn set_supply(&mut self, id: ProjectorId, supply_per_tick: f32) -> Result<()> {
        self.installation_mut(id)?.supply_per_tick = supply_per_tick;
        Ok(())
    }

    /// Toggle free upkeep for a projector.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::UnknownProjector`] if `id` is not placed.
    pub fn set_cheat(&mut self, id: ProjectorId, cheat: bool) -> Result<()> {
        self.installation_mut(id)?.cheat = cheat;
        Ok(())
    }

    /// Number of placed projectors.
    #[must_use]
    pub fn len(&self) -> usize {
        self.installations.len()
    }

    /// Check if no projectors are placed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.installations.is_empty()
    }

    /// Render proxy storage.
    #[must_use]
    pub const fn proxies(&self) -> &ProxyArena {
        &self.proxies
    }

    /// Advance every projector by one tick.
    ///
    /// Each projector is charged from its supply and then updated, in id
    /// order. Absorbed projectiles are removed from `projectiles` and
    /// proxies of projectors that no longer exist are swept.
    pub fn tick(&mut self, projectiles: &mut ProjectileSet) -> TickEvents {
        let mut events = TickEvents::default();
        let delta = self.delta;

        for (&id, installation) in &mut self.installations {
            events.power_accepted += installation
                .projector
                .power
                .charge(installation.supply_per_tick, delta);

            let mut ctx = TickContext {
                delta,
                cheat: installation.cheat,
                projectiles: &mut *projectiles,
                consumers: &mut installation.storage,
                proxies: &mut self.proxies,
            };
            let out = installation.projector.update(&mut ctx);

            if out.smoke_chance > 0.0 {
                events.smoke.push((id, out.smoke_chance));
            }
            events
                .events
                .extend(out.events.into_iter().map(|event| (id, event)));
        }

        events.absorbed = projectiles.remove_absorbed();

        let installations = &self.installations;
        self.proxies
            .sweep(|owner| installations.contains_key(&owner));

        self.tick += 1;

        #[cfg(debug_assertions)]
        {
            let hash = self.state_hash();
            tracing::debug!(tick = self.tick, state_hash = hash, "Simulation state hash");
        }

        events
    }

    /// Draw parameters for every field that is up, in id order.
    #[must_use]
    pub fn draw_list(&self) -> Vec<(ProjectorId, ShieldDraw)> {
        self.installations
            .iter()
            .filter(|(_, i)| !i.projector.is_broken())
            .map(|(&id, i)| (id, i.projector.draw()))
            .collect()
    }

    /// Calculate a hash of the current simulation state.
    ///
    /// Used for determinism verification. Two simulations with identical
    /// state produce identical hashes.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        let mut hasher = DefaultHasher::new();

        self.tick.hash(&mut hasher);
        self.installations.len().hash(&mut hasher);

        for (id, installation) in &self.installations {
            id.hash(&mut hasher);
            let state = &installation.projector.state;
            state.broken.hash(&mut hasher);
            state.buildup.to_bits().hash(&mut hasher);
            state.radius_scale.to_bits().hash(&mut hasher);
            state.warmup.to_bits().hash(&mut hasher);
            state.heat_level.to_bits().hash(&mut hasher);
            state.hit_flash.to_bits().hash(&mut hasher);
            installation.projector.power.satisfaction.to_bits().hash(&mut hasher);
            installation.storage.items.hash(&mut hasher);
            installation.storage.liquid_amount.to_bits().hash(&mut hasher);
        }

        self.proxies.len().hash(&mut hasher);
        hasher.finish()
    }

    /// Persist one projector's state.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::UnknownProjector`] if `id` is not placed.
    pub fn save_state(&self, id: ProjectorId) -> Result<Vec<u8>> {
        self.installations
            .get(&id)
            .ok_or(ShieldError::UnknownProjector(id))?
            .projector
            .state
            .to_bytes()
    }

    /// Restore one projector's persisted state.
    ///
    /// # Errors
    ///
    /// Returns [`ShieldError::UnknownProjector`] if `id` is not placed, or
    /// [`ShieldError::Persistence`] if `bytes` is not a valid state.
    pub fn load_state(&mut self, id: ProjectorId, bytes: &[u8]) -> Result<()> {
        let restored = ShieldState::from_bytes(bytes)?;
        let state = &mut self.installation_mut(id)?.projector.state;
        state.broken = restored.broken;
        state.buildup = restored.buildup;
        state.radius_scale = restored.radius_scale;
        state.warmup = restored.warmup;
        state.heat_level = restored.heat_level;
        Ok(())
    }
}

impl Default for ShieldSimulation {
    fn default() -> Self {
        Self::new()
    }
}

//! Test fixtures and helpers.
//!
//! Pre-built configs, projectile volleys, scripted consumers and a
//! repeatable barrage scenario for consistent testing.

use std::f32::consts::TAU;

use serde::{Deserialize, Serialize};
use shield_core::prelude::{
    Consumers, Coolant, ForceProjector, ItemCount, Projectile, ProjectileSet, ShieldConfig,
    ShieldSimulation, Team, TickEvents, Vec2,
};

/// Default block definition.
#[must_use]
pub fn default_config() -> ShieldConfig {
    ShieldConfig::default()
}

/// A block that effectively never overloads.
#[must_use]
pub fn sturdy_config() -> ShieldConfig {
    ShieldConfig {
        breakage: 1.0e6,
        ..ShieldConfig::default()
    }
}

/// A hostile (crux) projectile.
#[must_use]
pub fn hostile(x: f32, y: f32, damage: f32) -> Projectile {
    Projectile::new(Vec2::new(x, y), Team::CRUX, damage)
}

/// `count` projectiles evenly spaced on a ring of `spread` around `center`.
#[must_use]
pub fn volley(center: Vec2, count: usize, spread: f32, damage: f32, team: Team) -> Vec<Projectile> {
    (0..count)
        .map(|i| {
            let angle = TAU * i as f32 / count as f32;
            Projectile::new(center.offset_polar(angle, spread), team, damage)
        })
        .collect()
}

/// A projector that has been brought up: healthy, full warmup and radius.
#[must_use]
pub fn healthy_projector(config: ShieldConfig) -> ForceProjector {
    let mut projector = ForceProjector::new(1, config, Vec2::ZERO, Team::SHARDED);
    projector.state.broken = false;
    projector.state.warmup = 1.0;
    projector.state.radius_scale = 1.0;
    projector.power.satisfaction = 1.0;
    projector
}

/// Consumers whose answers are set directly by the test.
///
/// Records what the projector removed.
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptedConsumers {
    /// Answer to [`Consumers::consumes_valid`].
    pub valid: bool,
    /// Items held.
    pub items: u32,
    /// Item capacity.
    pub item_capacity: u32,
    /// Liquid held.
    pub liquid: Option<(Coolant, f32)>,
    /// Items removed so far.
    pub items_removed: u32,
    /// Liquid removed so far.
    pub liquid_removed: f32,
}

impl ScriptedConsumers {
    /// Valid consumers with empty storage.
    #[must_use]
    pub fn new(item_capacity: u32) -> Self {
        Self {
            valid: true,
            items: 0,
            item_capacity,
            liquid: None,
            items_removed: 0,
            liquid_removed: 0.0,
        }
    }

    /// Builder method: hold `items` charge items.
    #[must_use]
    pub fn with_items(mut self, items: u32) -> Self {
        self.items = items;
        self
    }

    /// Builder method: hold `amount` of `coolant`.
    #[must_use]
    pub fn with_liquid(mut self, coolant: Coolant, amount: f32) -> Self {
        self.liquid = Some((coolant, amount));
        self
    }
}

impl Consumers for ScriptedConsumers {
    fn consumes_valid(&self) -> bool {
        self.valid
    }

    fn liquid(&self) -> Option<(Coolant, f32)> {
        self.liquid
    }

    fn remove_liquid(&mut self, amount: f32) {
        if let Some((_, held)) = &mut self.liquid {
            let removed = amount.min(*held);
            *held -= removed;
            self.liquid_removed += removed;
        }
    }

    fn items(&self) -> ItemCount {
        ItemCount {
            total: self.items,
            capacity: self.item_capacity,
        }
    }

    fn remove_item(&mut self) {
        if self.items > 0 {
            self.items -= 1;
            self.items_removed += 1;
        }
    }
}

/// Parameters of a repeatable barrage, loadable from RON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BarrageSpec {
    /// Projector positions.
    pub projectors: Vec<(f32, f32)>,
    /// Power offered to each projector per tick.
    pub supply: f32,
    /// Damage per projectile.
    pub damage: f32,
    /// Ticks between volleys.
    pub volley_every: u64,
    /// Projectiles per volley, per projector.
    pub volley_size: usize,
    /// Ring radius of each volley.
    pub spread: f32,
}

impl Default for BarrageSpec {
    fn default() -> Self {
        Self {
            projectors: vec![(0.0, 0.0)],
            supply: 1.0,
            damage: 20.0,
            volley_every: 10,
            volley_size: 4,
            spread: 40.0,
        }
    }
}

/// A host plus a scripted stream of hostile volleys.
///
/// Projectiles that are not absorbed fly past and are discarded at the
/// end of each step.
#[derive(Debug, Clone)]
pub struct Barrage {
    /// The host under test.
    pub sim: ShieldSimulation,
    /// Projectiles in flight this tick.
    pub projectiles: ProjectileSet,
    spec: BarrageSpec,
}

impl Barrage {
    /// Place every projector and set its supply.
    ///
    /// # Panics
    ///
    /// Panics if a freshly spawned projector cannot be found.
    #[must_use]
    pub fn new(spec: BarrageSpec, config: &ShieldConfig) -> Self {
        let mut sim = ShieldSimulation::new();
        for &(x, y) in &spec.projectors {
            let id = sim.spawn(config.clone(), Vec2::new(x, y), Team::SHARDED);
            sim.set_supply(id, spec.supply)
                .expect("projector was just spawned");
        }
        Self {
            sim,
            projectiles: ProjectileSet::new(),
            spec,
        }
    }

    /// Parse a [`BarrageSpec`] from RON and build the scenario.
    pub fn from_ron(ron: &str, config: &ShieldConfig) -> Result<Self, ron::error::SpannedError> {
        let spec: BarrageSpec = ron::from_str(ron)?;
        Ok(Self::new(spec, config))
    }

    /// The scenario parameters.
    #[must_use]
    pub const fn spec(&self) -> &BarrageSpec {
        &self.spec
    }

    /// Fire this tick's volley (if due) and advance the host one tick.
    pub fn step(&mut self) -> TickEvents {
        let due = self.spec.volley_every > 0 && self.sim.get_tick() % self.spec.volley_every == 0;
        if due {
            for &(x, y) in &self.spec.projectors {
                self.projectiles.extend(volley(
                    Vec2::new(x, y),
                    self.spec.volley_size,
                    self.spec.spread,
                    self.spec.damage,
                    Team::CRUX,
                ));
            }
            tracing::trace!(tick = self.sim.get_tick(), "Volley fired");
        }
        let events = self.sim.tick(&mut self.projectiles);
        self.projectiles = ProjectileSet::new();
        events
    }

    /// Hash of the host state.
    #[must_use]
    pub fn state_hash(&self) -> u64 {
        self.sim.state_hash()
    }
}

//! Force projector block instance.
//!
//! Ties the power buffer, state machine, absorption pass and render proxy
//! together for one placed block. Collaborators (projectile index, block
//! storage, proxy arena) are handed in through [`TickContext`] each tick.
//!
//! # Tick Order
//!
//! 1. Ensure the render proxy exists
//! 2. Advance the state machine (heat, items, radius, upkeep, decay,
//!    recovery, overload)
//! 3. Absorb projectiles inside the field
//! 4. Settle an overload caused by this tick's absorptions

use std::io::{Read, Write};

use crate::absorption::{absorb_projectiles, AbsorbableQuery};
use crate::breakage::{BreakCause, Transition};
use crate::capability::{Drawable, Persistable, Tickable};
use crate::config::{ShieldConfig, ShieldStats};
use crate::consume::Consumers;
use crate::error::Result;
use crate::events::ShieldEvent;
use crate::geometry::{effective_radius, hexagon_vertices};
use crate::math::Vec2;
use crate::power::PowerEconomy;
use crate::proxy::{ProxyArena, ShieldDraw};
use crate::state::ShieldState;
use crate::team::Team;

/// Unique identifier for a projector instance.
pub type ProjectorId = u64;

/// Collaborators for one projector tick.
pub struct TickContext<'a, Q, C: ?Sized> {
    /// Elapsed ticks since the last update, normally 1.
    pub delta: f32,
    /// Owning team pays no upkeep.
    pub cheat: bool,
    /// Spatial index of absorbable projectiles.
    pub projectiles: &'a mut Q,
    /// The block's item and liquid storage.
    pub consumers: &'a mut C,
    /// Render proxy storage.
    pub proxies: &'a mut ProxyArena,
}

/// What one projector tick produced.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProjectorTick {
    /// Events in the order they happened.
    pub events: Vec<ShieldEvent>,
    /// Chance of emitting a smoke puff this tick, rolled by the caller.
    pub smoke_chance: f32,
}

impl ProjectorTick {
    /// Number of projectiles absorbed this tick.
    #[must_use]
    pub fn absorbed(&self) -> usize {
        self.events
            .iter()
            .filter(|e| matches!(e, ShieldEvent::Absorbed { .. }))
            .count()
    }
}

/// One placed force projector.
#[derive(Debug, Clone, PartialEq)]
pub struct ForceProjector {
    id: ProjectorId,
    /// Block center in world space.
    pub position: Vec2,
    /// Owning team.
    pub team: Team,
    config: ShieldConfig,
    /// Field state.
    pub state: ShieldState,
    /// Power buffer.
    pub power: PowerEconomy,
}

impl ForceProjector {
    /// Place a projector. The field starts broken with an empty buffer.
    #[must_use]
    pub fn new(id: ProjectorId, config: ShieldConfig, position: Vec2, team: Team) -> Self {
        Self {
            id,
            position,
            team,
            power: PowerEconomy::from_config(&config),
            config,
            state: ShieldState::new(),
        }
    }

    /// Instance id.
    #[must_use]
    pub const fn id(&self) -> ProjectorId {
        self.id
    }

    /// Block definition.
    #[must_use]
    pub const fn config(&self) -> &ShieldConfig {
        &self.config
    }

    /// Whether the field is down.
    #[must_use]
    pub const fn is_broken(&self) -> bool {
        self.state.broken
    }

    /// Current field radius.
    #[must_use]
    pub fn effective_radius(&self) -> f32 {
        effective_radius(&self.config, self.state.heat_level, self.state.radius_scale)
    }

    /// Current absorption flash.
    #[must_use]
    pub const fn hit_flash(&self) -> f32 {
        self.state.hit_flash
    }

    /// Alpha of the block's overheat glow.
    #[must_use]
    pub fn overheat_alpha(&self) -> f32 {
        self.state.overheat_alpha(self.config.breakage)
    }

    /// Stat sheet of the block definition.
    #[must_use]
    pub fn stats(&self) -> ShieldStats {
        self.config.stats()
    }

    /// Advance one tick.
    pub fn update<Q, C>(&mut self, ctx: &mut TickContext<'_, Q, C>) -> ProjectorTick
    where
        Q: AbsorbableQuery,
        C: Consumers + ?Sized,
    {
        let mut out = ProjectorTick::default();
        ctx.proxies
            .ensure(&mut self.state.proxy, self.id, self.position);

        let advance = self.state.advance(
            &mut self.power,
            &self.config,
            &mut *ctx.consumers,
            ctx.cheat,
            ctx.delta,
        );
        if advance.item_consumed {
            out.events.push(ShieldEvent::ItemConsumed);
        }
        match advance.transition {
            Some(Transition::Broke(cause)) => self.on_break(cause, ctx.proxies, &mut out),
            Some(Transition::Recovered) => {
                tracing::debug!(
                    projector = self.id,
                    warmup = self.state.warmup,
                    "Shield recovered"
                );
                out.events.push(ShieldEvent::Recovered {
                    position: self.position,
                });
            }
            None => {}
        }

        out.smoke_chance = advance.smoke_chance;

        let absorbed = absorb_projectiles(
            &mut self.state,
            &mut self.power,
            &self.config,
            self.position,
            self.team,
            &mut *ctx.projectiles,
        );
        if !absorbed.is_empty() {
            out.events
                .extend(absorbed.iter().map(|a| ShieldEvent::Absorbed {
                    position: a.position,
                    damage: a.damage,
                }));
            if self.state.settle_overload(self.config.breakage) {
                self.on_break(BreakCause::Overload, ctx.proxies, &mut out);
            }
        }

        out
    }

    fn on_break(&mut self, cause: BreakCause, proxies: &mut ProxyArena, out: &mut ProjectorTick) {
        tracing::debug!(
            projector = self.id,
            x = self.position.x,
            y = self.position.y,
            buildup = self.state.buildup,
            warmup = self.state.warmup,
            ?cause,
            "Shield broke"
        );
        proxies.ensure(&mut self.state.proxy, self.id, self.position);
        out.events.push(ShieldEvent::Broke {
            position: self.position,
            radius: self.config.radius,
            cause,
        });
    }

    /// Remove the block, releasing its render proxy.
    pub fn destroy(mut self, proxies: &mut ProxyArena) -> ShieldState {
        if let Some(handle) = self.state.proxy.take() {
            proxies.remove(handle);
        }
        self.state
    }
}

impl<'a, Q, C> Tickable<TickContext<'a, Q, C>> for ForceProjector
where
    Q: AbsorbableQuery,
    C: Consumers + ?Sized,
{
    type Output = ProjectorTick;

    fn update(&mut self, ctx: &mut TickContext<'a, Q, C>) -> ProjectorTick {
        ForceProjector::update(self, ctx)
    }
}

impl Drawable for ForceProjector {
    fn draw(&self) -> ShieldDraw {
        let radius = self.effective_radius();
        ShieldDraw {
            center: self.position,
            radius,
            draw_size: radius * 2.0 + 2.0,
            hexagon: hexagon_vertices(self.position, radius),
            flash_alpha: (self.state.hit_flash > 0.0).then_some(self.state.hit_flash),
        }
    }
}

impl Persistable for ForceProjector {
    fn write_state<W: Write>(&self, writer: W) -> Result<()> {
        self.state.write_state(writer)
    }

    fn read_state<R: Read>(&mut self, reader: R) -> Result<()> {
        self.state.read_state(reader)
    }
}

//! # Shield Core
//!
//! Deterministic simulation core for the force projector, a defensive block
//! that spends stored power to hold up a hexagonal force field.
//!
//! This crate contains **only** simulation logic:
//! - No rendering (draw parameters are computed, never drawn)
//! - No system randomness (chances are returned to the caller)
//! - No global registries (collaborators arrive through [`projector::TickContext`])
//!
//! ## Crate Structure
//!
//! - [`power`] - Buffered power consumer and upkeep draw
//! - [`geometry`] - Effective radius and hexagon containment
//! - [`state`] / [`breakage`] - Persisted shield state and its state machine
//! - [`absorption`] - Projectile absorption against the field
//! - [`projector`] - One block instance tying the above together
//! - [`simulation`] - A minimal host that owns projectors and proxies
//! - [`persistence`] - The fixed 17-byte save layout

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic)]

pub mod absorption;
pub mod breakage;
pub mod capability;
pub mod config;
pub mod consume;
pub mod error;
pub mod events;
pub mod geometry;
pub mod math;
pub mod persistence;
pub mod power;
pub mod projectile;
pub mod projector;
pub mod proxy;
pub mod simulation;
pub mod state;
pub mod team;

/// Re-export commonly used types
pub mod prelude {
    pub use crate::absorption::{absorb_projectiles, Absorbable, AbsorbableQuery, Absorption};
    pub use crate::breakage::{BreakCause, Transition};
    pub use crate::capability::{Drawable, Persistable, Tickable};
    pub use crate::config::{CoolantFilter, ShieldConfig, ShieldStats};
    pub use crate::consume::{BlockStorage, Consumers, Coolant, ItemCount};
    pub use crate::error::{Result, ShieldError};
    pub use crate::events::ShieldEvent;
    pub use crate::math::Vec2;
    pub use crate::power::{PowerEconomy, Supply};
    pub use crate::projectile::{Projectile, ProjectileSet};
    pub use crate::projector::{ForceProjector, ProjectorId, ProjectorTick, TickContext};
    pub use crate::proxy::{ProxyArena, ProxyHandle, ShieldDraw};
    pub use crate::simulation::{ShieldSimulation, TickEvents};
    pub use crate::state::{ShieldPhase, ShieldState};
    pub use crate::team::Team;
}

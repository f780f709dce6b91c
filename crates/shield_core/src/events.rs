//! Events emitted by projectors during a tick.
//!
//! These are fire-and-forget: the game layer maps them to effects and
//! sounds. Nothing in the core reads them back.

use serde::{Deserialize, Serialize};

use crate::breakage::BreakCause;
use crate::math::Vec2;

/// Something a projector did this tick.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ShieldEvent {
    /// The field went down.
    Broke {
        /// Block position.
        position: Vec2,
        /// Nominal radius, for sizing the break effect.
        radius: f32,
        /// Overload carries the break visual; power loss fades quietly.
        cause: BreakCause,
    },
    /// The field came back up.
    Recovered {
        /// Block position.
        position: Vec2,
    },
    /// A projectile was absorbed.
    Absorbed {
        /// Where it was caught.
        position: Vec2,
        /// Its shield damage.
        damage: f32,
    },
    /// A charge item was used.
    ItemConsumed,
}

impl ShieldEvent {
    /// Whether this event should play the shield-break effect.
    #[must_use]
    pub const fn plays_break_effect(&self) -> bool {
        matches!(
            self,
            Self::Broke {
                cause: BreakCause::Overload,
                ..
            }
        )
    }
}

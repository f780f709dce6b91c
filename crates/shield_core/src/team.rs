//! Team identifiers.
//!
//! Ownership resolution happens outside this crate; the shield only
//! compares the team of a projectile against the team of its block.

use serde::{Deserialize, Serialize};

/// Team that owns a block or fired a projectile.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct Team(pub u8);

impl Team {
    /// Unowned blocks and debris.
    pub const DERELICT: Self = Self(0);
    /// The default player team.
    pub const SHARDED: Self = Self(1);
    /// The default enemy team.
    pub const CRUX: Self = Self(2);

    /// Get the display name for this team.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self.0 {
            0 => "Derelict",
            1 => "Sharded",
            2 => "Crux",
            _ => "Unnamed",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names() {
        assert_eq!(Team::default(), Team::DERELICT);
        assert_eq!(Team::CRUX.display_name(), "Crux");
        assert_eq!(Team(9).display_name(), "Unnamed");
    }
}

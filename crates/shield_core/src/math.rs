//! Scalar and vector math for the shield simulation.
//!
//! The shield persists its state as single-precision floats, so all
//! simulation math runs on `f32`. Interpolation helpers clamp their
//! progress to `[0, 1]`, which keeps every smoothed value between its
//! start and its target.

use serde::{Deserialize, Serialize};

/// √3 rounded to single precision.
pub const SQRT_3: f32 = 1.732_050_8;

/// 2D vector in world units.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X coordinate.
    pub x: f32,
    /// Y coordinate.
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Calculate squared distance (avoids sqrt for comparisons).
    #[must_use]
    pub fn distance_squared(self, other: Self) -> f32 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        dx * dx + dy * dy
    }

    /// Euclidean distance to `other`.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        self.distance_squared(other).sqrt()
    }

    /// Whether `other` lies within `radius` of this point (inclusive).
    #[must_use]
    pub fn within(self, other: Self, radius: f32) -> bool {
        self.distance_squared(other) <= radius * radius
    }

    /// Point at `radius` from this one in direction `angle` (radians).
    #[must_use]
    pub fn offset_polar(self, angle: f32, radius: f32) -> Self {
        Self {
            x: self.x + angle.cos() * radius,
            y: self.y + angle.sin() * radius,
        }
    }
}

impl std::ops::Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

/// Linear interpolation from `from` toward `to` by `progress`.
#[must_use]
pub fn lerp(from: f32, to: f32, progress: f32) -> f32 {
    from + (to - from) * progress
}

/// Frame-rate aware interpolation.
///
/// Moves `from` toward `to` by `rate` per unit of `delta`. The combined
/// progress is clamped to `[0, 1]` so a large delta lands on the target
/// instead of passing it.
#[must_use]
pub fn lerp_delta(from: f32, to: f32, rate: f32, delta: f32) -> f32 {
    lerp(from, to, (rate * delta).clamp(0.0, 1.0))
}

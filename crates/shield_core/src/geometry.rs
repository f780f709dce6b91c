//! Field geometry.
//!
//! Pure functions: the effective radius of the field and the hexagon
//! containment test used to decide which projectiles it catches.

use std::f32::consts::PI;

use crate::config::ShieldConfig;
use crate::math::{Vec2, SQRT_3};

/// Radius of the field after heat boost and scale.
///
/// A fuller charge buffer extends coverage; the scale collapses the
/// radius toward 0 while the field is broken.
#[must_use]
pub fn effective_radius(config: &ShieldConfig, heat_level: f32, radius_scale: f32) -> f32 {
    (config.radius + heat_level * config.phase_radius_boost) * radius_scale
}

/// Whether `point` lies inside the hexagon of `half_width` around `center`.
///
/// Half-extent/slope test on the normalized offsets. Both comparisons
/// are inclusive, and the slope comparison is evaluated in double
/// precision on the `0.25·dy` and `0.5·a` terms.
#[must_use]
pub fn inside_hexagon(point: Vec2, center: Vec2, half_width: f32) -> bool {
    let dx = (point.x - center.x).abs() / half_width;
    let dy = (point.y - center.y).abs() / half_width;
    let a = 0.25 * SQRT_3;
    dy <= a && f64::from(a * dx) + 0.25 * f64::from(dy) <= 0.5 * f64::from(a)
}

/// Corners of the regular hexagon drawn for a field of `radius`.
///
/// The first corner lies on the positive x axis; the rest follow
/// counter-clockwise at 60° steps.
#[must_use]
pub fn hexagon_vertices(center: Vec2, radius: f32) -> [Vec2; 6] {
    let step = PI / 3.0;
    std::array::from_fn(|i| center.offset_polar(step * i as f32, radius))
}

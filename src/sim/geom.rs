//! Vector and overlap helpers shared by movement and collision code
//!
//! Everything here is plain `glam::Vec2` math with no simulation state.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{angle_of, normalize_angle};

/// Axis-aligned rectangle (camera bounds, world bounds)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub min: Vec2,
    pub max: Vec2,
}

impl Rect {
    pub fn new(min: Vec2, max: Vec2) -> Self {
        Self { min, max }
    }

    /// Rectangle of `size` centered on `center`
    pub fn centered(center: Vec2, size: Vec2) -> Self {
        let half = size * 0.5;
        Self {
            min: center - half,
            max: center + half,
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        (self.min + self.max) * 0.5
    }

    /// Grow (or shrink, with a negative margin) on every side
    pub fn expand(&self, margin: f32) -> Self {
        Self {
            min: self.min - Vec2::splat(margin),
            max: self.max + Vec2::splat(margin),
        }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }

    /// Clamp a point into the rectangle
    #[inline]
    pub fn clamp(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max)
    }
}

/// Unit vector from `from` toward `to`, or `fallback` when they coincide
#[inline]
pub fn direction_to(from: Vec2, to: Vec2, fallback: Vec2) -> Vec2 {
    (to - from).normalize_or(fallback)
}

/// Circle-circle overlap test (touching counts as overlapping)
#[inline]
pub fn circles_overlap(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    let r = ra + rb;
    a.distance_squared(b) <= r * r
}

/// Whether a circle at `point` (radius `radius`) touches the circular sector
/// centered at `origin`, facing `facing` (radians), spanning `half_arc` either
/// side, out to `range`.
pub fn circle_in_sector(
    origin: Vec2,
    facing: f32,
    half_arc: f32,
    range: f32,
    point: Vec2,
    radius: f32,
) -> bool {
    let offset = point - origin;
    let reach = range + radius;
    if offset.length_squared() > reach * reach {
        return false;
    }
    // A target sitting on the origin is always inside
    if offset.length_squared() <= radius * radius {
        return true;
    }
    let diff = normalize_angle(angle_of(offset) - facing).abs();
    // Widen the arc by the angle the target's radius subtends
    let slack = (radius / offset.length()).clamp(0.0, 1.0).asin();
    diff <= half_arc + slack
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    #[test]
    fn rect_contains_and_expand() {
        let r = Rect::centered(Vec2::ZERO, Vec2::new(200.0, 100.0));
        assert!(r.contains(Vec2::new(99.0, 49.0)));
        assert!(!r.contains(Vec2::new(101.0, 0.0)));
        assert!(r.expand(10.0).contains(Vec2::new(105.0, 55.0)));
        assert!((r.width() - 200.0).abs() < 1e-6);
        assert_eq!(r.center(), Vec2::ZERO);
    }

    #[test]
    fn direction_falls_back_on_zero_distance() {
        let d = direction_to(Vec2::ONE, Vec2::ONE, Vec2::X);
        assert_eq!(d, Vec2::X);
        let d = direction_to(Vec2::ZERO, Vec2::new(0.0, 5.0), Vec2::X);
        assert!((d - Vec2::Y).length() < 1e-6);
    }

    #[test]
    fn circle_overlap_is_inclusive() {
        assert!(circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.0, 0.0), 1.0));
        assert!(!circles_overlap(Vec2::ZERO, 1.0, Vec2::new(2.1, 0.0), 1.0));
    }

    #[test]
    fn sector_test_respects_facing() {
        let origin = Vec2::ZERO;
        // Facing right, 45 degrees either side, range 100
        assert!(circle_in_sector(origin, 0.0, PI / 4.0, 100.0, Vec2::new(80.0, 10.0), 5.0));
        assert!(!circle_in_sector(origin, 0.0, PI / 4.0, 100.0, Vec2::new(-80.0, 0.0), 5.0));
        assert!(!circle_in_sector(origin, 0.0, PI / 4.0, 100.0, Vec2::new(120.0, 0.0), 5.0));
        // Wraps correctly around ±π
        assert!(circle_in_sector(origin, PI, PI / 4.0, 100.0, Vec2::new(-50.0, -5.0), 5.0));
    }
}

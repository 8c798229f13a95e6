//! Analytic hit-test primitives
//!
//! Point-in-polygon and point-to-curve distance, used instead of asking a
//! rendering API whether a point lies in a filled path or stroke.

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Segments used to approximate a quadratic curve for distance queries
pub const CURVE_SEGMENTS: usize = 32;

/// A quadratic Bézier curve
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuadCurve {
    pub start: Vec2,
    pub control: Vec2,
    pub end: Vec2,
}

impl QuadCurve {
    pub fn new(start: Vec2, control: Vec2, end: Vec2) -> Self {
        Self { start, control, end }
    }

    /// Point on the curve at parameter `t` in [0, 1]
    #[inline]
    pub fn point_at(&self, t: f32) -> Vec2 {
        let u = 1.0 - t;
        self.start * (u * u) + self.control * (2.0 * u * t) + self.end * (t * t)
    }

    /// Shifted copy
    pub fn translate(&self, offset: Vec2) -> Self {
        Self {
            start: self.start + offset,
            control: self.control + offset,
            end: self.end + offset,
        }
    }

    /// Approximate distance from `p` to the curve
    pub fn distance_to(&self, p: Vec2) -> f32 {
        let mut best = f32::INFINITY;
        let mut prev = self.start;
        for i in 1..=CURVE_SEGMENTS {
            let next = self.point_at(i as f32 / CURVE_SEGMENTS as f32);
            best = best.min(distance_to_segment(p, prev, next));
            prev = next;
        }
        best
    }

    /// Whether `p` lies within a stroke of `width` drawn along the curve
    #[inline]
    pub fn stroke_contains(&self, p: Vec2, width: f32) -> bool {
        self.distance_to(p) <= width / 2.0
    }
}

/// Distance from `p` to the segment `a`-`b`
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq < 1e-8 {
        return (p - a).length(); // Degenerate segment
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    (p - (a + ab * t)).length()
}

/// Even-odd point-in-polygon test (the polygon is implicitly closed)
pub fn polygon_contains(vertices: &[Vec2], p: Vec2) -> bool {
    let n = vertices.len();
    if n < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = n - 1;
    for i in 0..n {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > p.y) != (vj.y > p.y) {
            let x_cross = vi.x + (p.y - vi.y) / (vj.y - vi.y) * (vj.x - vi.x);
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

//! Hit shapes used for boundary, obstacle and enemy hit tests.
//!
//! Every test is inclusive: a point lying exactly on an edge is inside.

use serde::{Deserialize, Serialize};

use crate::types::Vec2;

/// Tolerance for "on the edge" tests.
const EDGE_EPSILON: f64 = 1e-9;

/// A solid (or stroked) region of world space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Shape {
    /// Axis-aligned rectangle.
    Rect { min: Vec2, max: Vec2 },
    Circle { center: Vec2, radius: f64 },
    /// Closed polygon, vertices in order (either winding).
    Polygon { points: Vec<Vec2> },
    /// Open stroked line; a point within `half_width` of any segment hits it.
    Polyline { points: Vec<Vec2>, half_width: f64 },
}

impl Shape {
    pub fn rect(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self::Rect {
            min: Vec2::new(x, y),
            max: Vec2::new(x + width, y + height),
        }
    }

    pub fn circle(center: Vec2, radius: f64) -> Self {
        Self::Circle { center, radius }
    }

    /// Whether `point` intersects this shape.
    pub fn contains(&self, point: Vec2) -> bool {
        match self {
            Shape::Rect { min, max } => {
                point.x >= min.x && point.x <= max.x && point.y >= min.y && point.y <= max.y
            }
            Shape::Circle { center, radius } => point.distance_squared(*center) <= radius * radius,
            Shape::Polygon { points } => polygon_contains(points, point),
            Shape::Polyline { points, half_width } => points
                .windows(2)
                .any(|seg| distance_to_segment(point, seg[0], seg[1]) <= *half_width),
        }
    }
}

/// Even-odd test, with points on an edge counted as inside.
fn polygon_contains(points: &[Vec2], p: Vec2) -> bool {
    if points.len() < 3 {
        return false;
    }
    let mut inside = false;
    let mut j = points.len() - 1;
    for i in 0..points.len() {
        let a = points[i];
        let b = points[j];
        if distance_to_segment(p, a, b) <= EDGE_EPSILON {
            return true;
        }
        if (a.y > p.y) != (b.y > p.y) {
            let x_cross = (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x;
            if p.x < x_cross {
                inside = !inside;
            }
        }
        j = i;
    }
    inside
}

/// Shortest distance from `p` to the segment `a`-`b`.
pub fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq <= f64::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

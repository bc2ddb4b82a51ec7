// Edge geometry - Endpoints on node boundaries and arrowhead placement

use super::point::Point;
use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

/// An edge segment shrunk so it starts and ends on the node circles
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeEndpoints {
    /// Point on the parent's circle
    pub start: Point,
    /// Point on the child's circle
    pub end: Point,
    /// Angle of the vector pointing from the child back to the parent
    pub theta: f64,
}

/// Arrowhead drawn on an edge: a tip and two wings
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Arrow {
    pub tip: Point,
    pub theta: f64,
    pub wings: [Point; 2],
}

/// Angle of the vector `p2 -> p1`
///
/// Vertical segments take the explicit branch so the result is exactly
/// `±π/2` by the sign of `Δy`, including the coincident case (`-π/2`).
pub fn edge_angle(p1: Point, p2: Point) -> f64 {
    if p1.x == p2.x {
        if p2.y < p1.y { FRAC_PI_2 } else { -FRAC_PI_2 }
    } else {
        (p1.y - p2.y).atan2(p1.x - p2.x)
    }
}

/// Shrink the segment `p1 -> p2` inward by `radius` at both ends
pub fn edge_endpoints(p1: Point, p2: Point, radius: f64) -> EdgeEndpoints {
    let theta = edge_angle(p1, p2);
    let (sin, cos) = theta.sin_cos();

    EdgeEndpoints {
        start: Point::new(p1.x - radius * cos, p1.y - radius * sin),
        end: Point::new(p2.x + radius * cos, p2.y + radius * sin),
        theta,
    }
}

/// Arrowhead for the edge `p1 -> p2`
///
/// The tip sits one third of the way along the shrunk edge, measured from
/// the parent side. Wings open back toward the parent at `±45°`.
pub fn arrow_points(p1: Point, p2: Point, radius: f64, arrow_length: f64) -> Arrow {
    let shrunk = edge_endpoints(p1, p2, radius);
    let (a, b) = (shrunk.start, shrunk.end);

    let length = (b.x - a.x).hypot(b.y - a.y) / 3.0;
    let theta = edge_angle(a, b);

    let tip = Point::new(a.x - length * theta.cos(), a.y - length * theta.sin());
    let wings = [
        tip.offset_polar(arrow_length, theta + FRAC_PI_4),
        tip.offset_polar(arrow_length, theta - FRAC_PI_4),
    ];

    Arrow { tip, theta, wings }
}

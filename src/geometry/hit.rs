// Hit testing - Containment and proximity checks

use super::point::Point;

/// Inclusive containment in the axis-aligned rectangle spanned by two corners
///
/// Corner order does not matter: min/max are normalized per axis first.
pub fn point_in_rect(point: Point, corner1: Point, corner2: Point) -> bool {
    let (min_x, max_x) = (corner1.x.min(corner2.x), corner1.x.max(corner2.x));
    let (min_y, max_y) = (corner1.y.min(corner2.y), corner1.y.max(corner2.y));

    point.x >= min_x && point.x <= max_x && point.y >= min_y && point.y <= max_y
}

/// True when `point` lies within `radius` of `center` (boundary included)
pub fn circular_hit_test(point: Point, center: Point, radius: f64) -> bool {
    (center.x - point.x).hypot(center.y - point.y) <= radius
}

/// Perpendicular distance from `point` to the infinite line through `a` and `b`
///
/// Falls back to the distance to `a` when the segment is degenerate.
pub fn distance_to_line(point: Point, a: Point, b: Point) -> f64 {
    let ab = b - a;
    let length = ab.x.hypot(ab.y);

    if length < f64::EPSILON {
        return point.distance_to(a);
    }

    let ap = point - a;
    (ab.x * ap.y - ab.y * ap.x).abs() / length
}

/// Position of `point` projected onto `a -> b`, as a fraction of the segment
///
/// 0.0 is `a`, 1.0 is `b`. Returns `None` for a degenerate segment.
pub fn segment_projection(point: Point, a: Point, b: Point) -> Option<f64> {
    let ab = b - a;
    let length_sq = ab.x * ab.x + ab.y * ab.y;

    if length_sq < f64::EPSILON {
        return None;
    }

    let ap = point - a;
    Some((ap.x * ab.x + ap.y * ab.y) / length_sq)
}

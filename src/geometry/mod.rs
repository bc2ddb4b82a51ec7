// Geometry - Pure 2-D helpers for edges, arrowheads and hit testing
// Everything here is stateless and works in canvas coordinates (y grows downward)

pub mod edge;
pub mod hit;
pub mod point;

pub use edge::{Arrow, EdgeEndpoints, arrow_points, edge_angle, edge_endpoints};
pub use hit::{circular_hit_test, distance_to_line, point_in_rect, segment_projection};
pub use point::Point;

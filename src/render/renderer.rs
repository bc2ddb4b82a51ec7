// Renderer - Full redraw of the graph onto a Surface

use super::color::Color;
use super::surface::Surface;
use crate::geometry::{Point, arrow_points, edge_endpoints};
use crate::graph::{EdgeKey, Graph, Node, NodeId};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Visual constants, keyed like the persisted settings file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RenderSpecs {
    pub background: Color,
    pub width_scale: f64,
    pub height_scale: f64,
    pub menu_width: f64,

    pub radius: f64,
    pub idle_node_color: Color,
    pub selection_color: Color,
    pub selection_width: f64,
    pub play_node_color: Color,

    pub edge_width: f64,
    pub edge_color: Color,
    pub arrow_length: f64,

    pub id_color: Color,
    pub id_font_size: f64,
    pub id_font: String,
}

impl Default for RenderSpecs {
    fn default() -> Self {
        Self {
            background: Color::from_rgb(0x84, 0x84, 0x84),
            width_scale: 1.0,
            height_scale: 1.0,
            menu_width: 120.0,

            radius: 39.0,
            idle_node_color: Color::from_rgb(0xf0, 0xfd, 0x96),
            selection_color: Color::from_rgb(0x69, 0x69, 0xfa),
            selection_width: 15.0,
            play_node_color: Color::from_rgb(0xff, 0x71, 0xf1),

            edge_width: 8.5,
            edge_color: Color::BLACK,
            arrow_length: 20.0,

            id_color: Color::BLACK,
            id_font_size: 60.0,
            id_font: "Arial".to_string(),
        }
    }
}

/// Transient decoration drawn on top of the graph
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overlay {
    /// Rubber-band selection rectangle between two corners
    Selection { from: Point, to: Point },
    /// Edge being dragged out of `from` toward the pointer
    PendingEdge { from: NodeId, cursor: Point },
}

/// Draws a graph with a fixed set of specs
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    specs: RenderSpecs,
}

impl Renderer {
    pub fn new(specs: RenderSpecs) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &RenderSpecs {
        &self.specs
    }

    /// Redraw everything: edges, arrowheads, nodes, then the overlay
    ///
    /// A pair of opposite edges shares a single line but keeps both
    /// arrowheads.
    pub fn draw_graph(
        &self,
        surface: &mut dyn Surface,
        graph: &Graph,
        selected_edge: Option<EdgeKey>,
        overlay: Option<&Overlay>,
    ) {
        surface.clear(self.specs.background);

        let mut drawn: HashSet<EdgeKey> = HashSet::new();
        for key in graph.edges() {
            let (Some(parent), Some(child)) = (graph.node(key.parent), graph.node(key.child)) else {
                continue;
            };

            if !drawn.contains(&key.reversed()) {
                self.draw_edge(
                    surface,
                    parent.position,
                    child.position,
                    selected_edge == Some(key),
                );
                drawn.insert(key);
            }
            self.draw_arrow(surface, parent.position, child.position);
        }

        for (index, node) in graph.nodes().iter().enumerate() {
            self.draw_node(surface, node, index);
        }

        match overlay {
            Some(Overlay::Selection { from, to }) => self.draw_rect(surface, *from, *to),
            Some(Overlay::PendingEdge { from, cursor }) => {
                if let Some(node) = graph.node(*from) {
                    self.draw_moving_edge(surface, node.position, *cursor);
                }
            }
            None => {}
        }
    }

    fn draw_edge(&self, surface: &mut dyn Surface, from: Point, to: Point, selected: bool) {
        let ends = edge_endpoints(from, to, self.specs.radius);
        if selected {
            surface.draw_line(ends.start, ends.end, self.specs.edge_width * 1.5, Color::WHITE);
        }
        surface.draw_line(ends.start, ends.end, self.specs.edge_width, self.specs.edge_color);
    }

    fn draw_arrow(&self, surface: &mut dyn Surface, from: Point, to: Point) {
        let arrow = arrow_points(from, to, self.specs.radius, self.specs.arrow_length);
        for wing in arrow.wings {
            surface.draw_line(arrow.tip, wing, self.specs.edge_width / 2.0, self.specs.edge_color);
        }
    }

    fn draw_node(&self, surface: &mut dyn Surface, node: &Node, index: usize) {
        let specs = &self.specs;
        let center = node.position;

        if node.selected {
            surface.stroke_circle(center, specs.radius, specs.selection_width, specs.selection_color);
        }

        let fill = if node.is_playing() {
            specs.play_node_color
        } else {
            specs.idle_node_color
        };
        surface.fill_circle(center, specs.radius, fill);

        surface.draw_text(
            &index.to_string(),
            Point::new(center.x, center.y + specs.id_font_size / 3.0),
            specs.id_font_size,
            &specs.id_font,
            specs.id_color,
        );
    }

    /// Outline of the rectangle spanned by two corners
    pub fn draw_rect(&self, surface: &mut dyn Surface, corner1: Point, corner2: Point) {
        let top_left = Point::new(corner1.x.min(corner2.x), corner1.y.min(corner2.y));
        let bottom_right = Point::new(corner1.x.max(corner2.x), corner1.y.max(corner2.y));
        let top_right = Point::new(bottom_right.x, top_left.y);
        let bottom_left = Point::new(top_left.x, bottom_right.y);

        let width = self.specs.edge_width / 3.0;
        let color = self.specs.selection_color;
        for (a, b) in [
            (top_left, top_right),
            (top_right, bottom_right),
            (bottom_right, bottom_left),
            (bottom_left, top_left),
        ] {
            surface.draw_line(a, b, width, color);
        }
    }

    /// Line from a node's boundary to the pointer
    pub fn draw_moving_edge(&self, surface: &mut dyn Surface, node: Point, cursor: Point) {
        let ends = edge_endpoints(node, cursor, self.specs.radius);
        surface.draw_line(ends.start, cursor, self.specs.edge_width, self.specs.edge_color);
    }
}

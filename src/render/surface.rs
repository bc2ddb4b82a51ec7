// Surface - Minimal 2D drawing target and an in-memory recorder

use super::color::Color;
use crate::geometry::Point;

/// Drawing primitives the renderer needs from a canvas
pub trait Surface {
    /// Fill the whole surface with `color`
    fn clear(&mut self, color: Color);

    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Color);

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color);

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Color);

    /// Draw `text` centered horizontally on `position`
    fn draw_text(&mut self, text: &str, position: Point, font_size: f64, font_family: &str, color: Color);
}

/// One recorded primitive
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    Line {
        from: Point,
        to: Point,
        width: f64,
        color: Color,
    },
    FillCircle {
        center: Point,
        radius: f64,
        color: Color,
    },
    StrokeCircle {
        center: Point,
        radius: f64,
        width: f64,
        color: Color,
    },
    Text {
        text: String,
        position: Point,
        font_size: f64,
        font_family: String,
        color: Color,
    },
}

/// Surface that records draw calls instead of rasterizing them
#[derive(Debug, Default, Clone)]
pub struct DisplayList {
    commands: Vec<DrawCommand>,
}

impl DisplayList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    /// Lines only, in draw order
    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|cmd| matches!(cmd, DrawCommand::Line { .. }))
    }

    /// Text labels only, in draw order
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.commands.iter().filter_map(|cmd| match cmd {
            DrawCommand::Text { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }
}

impl Surface for DisplayList {
    fn clear(&mut self, color: Color) {
        // Everything drawn before a clear is hidden anyway
        self.commands.clear();
        self.commands.push(DrawCommand::Clear(color));
    }

    fn draw_line(&mut self, from: Point, to: Point, width: f64, color: Color) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            width,
            color,
        });
    }

    fn fill_circle(&mut self, center: Point, radius: f64, color: Color) {
        self.commands.push(DrawCommand::FillCircle {
            center,
            radius,
            color,
        });
    }

    fn stroke_circle(&mut self, center: Point, radius: f64, width: f64, color: Color) {
        self.commands.push(DrawCommand::StrokeCircle {
            center,
            radius,
            width,
            color,
        });
    }

    fn draw_text(&mut self, text: &str, position: Point, font_size: f64, font_family: &str, color: Color) {
        self.commands.push(DrawCommand::Text {
            text: text.to_string(),
            position,
            font_size,
            font_family: font_family.to_string(),
            color,
        });
    }
}

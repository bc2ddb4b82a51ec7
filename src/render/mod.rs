// Render - Stateless drawing of a graph onto any 2D surface

pub mod color;
pub mod renderer;
pub mod surface;

pub use color::Color;
pub use renderer::{Overlay, RenderSpecs, Renderer};
pub use surface::{DisplayList, DrawCommand, Surface};

// floodgraph - Library exports for the host, the demo binary and tests

pub mod audio;
pub mod cascade;
pub mod command;
pub mod controller;
pub mod error;
pub mod geometry;
pub mod graph;
pub mod messaging;
pub mod render;
pub mod settings;

// Re-export commonly used types for convenience
pub use audio::{AudioBackend, AudioHost, NodeBehavior, RecordingBackend, TracingBackend, Triggerable};
pub use cascade::{CascadeConfig, CascadePolicy, CascadeScheduler, CascadeStep};
pub use command::{CommandManager, UndoableCommand};
pub use controller::GraphController;
pub use error::{GraphError, GraphResult};
pub use geometry::Point;
pub use graph::{EdgeKey, Graph, Node, NodeId};
pub use messaging::{Notification, create_notification_channel};
pub use render::{Color, DisplayList, Renderer, Surface};
pub use settings::Settings;

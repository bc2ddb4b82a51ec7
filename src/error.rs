// Error types shared by the graph, cascade, audio and settings layers

use crate::command::CommandError;
use crate::graph::{EdgeKey, NodeId};

/// Errors raised by graph editing, cascades and configuration
///
/// All of them are local: the caller reports them and keeps running.
#[derive(Debug, thiserror::Error)]
pub enum GraphError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("Resource unavailable: {0}")]
    ResourceUnavailable(String),

    #[error("Edge {0} already exists")]
    DuplicateEdge(EdgeKey),

    #[error("Unknown node {0}")]
    UnknownNode(NodeId),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("RON error: {0}")]
    Ron(#[from] ron::error::SpannedError),

    #[error("{0}")]
    Command(#[from] CommandError),
}

impl GraphError {
    /// Whether the error still leaves the requested state in place
    ///
    /// A duplicate edge is reported but the edge exists, so nothing failed.
    pub fn is_benign(&self) -> bool {
        matches!(self, GraphError::DuplicateEdge(_))
    }
}

pub type GraphResult<T> = Result<T, GraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = GraphError::InvalidConfiguration("unknown scale type 'lydian'".into());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: unknown scale type 'lydian'"
        );

        let err = GraphError::DuplicateEdge(EdgeKey::new(NodeId(1), NodeId(2)));
        assert_eq!(err.to_string(), "Edge 1->2 already exists");
        assert!(err.is_benign());

        let err = GraphError::ResourceUnavailable("sample 'kick.wav'".into());
        assert!(!err.is_benign());
    }
}

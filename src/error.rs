//! Errors raised while building a network.

use thiserror::Error;

/// A malformed network description. The network is not built.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BuildError {
    #[error("duplicate node id {0}")]
    DuplicateNode(String),

    #[error("duplicate edge id {0}")]
    DuplicateEdge(String),

    #[error("edge {edge} references unknown node {node}")]
    UnknownNode { edge: String, node: String },

    #[error("edge {edge} has invalid lane count {lanes}")]
    InvalidLaneCount { edge: String, lanes: i32 },

    #[error("edge {edge} has invalid width {width}")]
    InvalidWidth { edge: String, width: f64 },
}

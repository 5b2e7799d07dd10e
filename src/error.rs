use thiserror::Error;

/// Errors raised while loading graphs or configuring a scorer.
///
/// The matching engine itself never fails on a [`Graph`](crate::Graph), which is
/// well-formed by construction. Malformed input (`MalformedNodeId`,
/// `NodeOutOfRange`, `DuplicateNode`, `MissingNode`, `Source`) is recoverable: the
/// batch entry point substitutes a placeholder graph. Usage errors
/// (`BatchLengthMismatch`, `ConflictingSelection`) are fatal.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SmatchError {
    #[error("malformed node id `{id}`: expected `{prefix}` followed by a node index")]
    MalformedNodeId { id: String, prefix: String },

    #[error("node `{id}` is out of range for a graph with {num_nodes} nodes")]
    NodeOutOfRange { id: String, num_nodes: usize },

    #[error("node `{0}` has more than one instance triple")]
    DuplicateNode(String),

    #[error("node `{0}` is referenced but never given a concept")]
    MissingNode(String),

    #[error("graph source failed: {0}")]
    Source(String),

    #[error("batch length mismatch: {tests} test graphs but {golds} gold graphs")]
    BatchLengthMismatch { tests: usize, golds: usize },

    #[error("at most one of just-instance, just-attribute and just-relation may be set")]
    ConflictingSelection,
}

impl SmatchError {
    /// True for errors caused by a malformed graph rather than by misuse of the API.
    pub fn is_malformed_input(&self) -> bool {
        match self {
            SmatchError::MalformedNodeId { .. }
            | SmatchError::NodeOutOfRange { .. }
            | SmatchError::DuplicateNode(_)
            | SmatchError::MissingNode(_)
            | SmatchError::Source(_) => true,
            SmatchError::BatchLengthMismatch { .. } | SmatchError::ConflictingSelection => false,
        }
    }
}

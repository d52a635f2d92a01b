//! Error types for amida-dynamism.

use amida_ladder::NodeId;
use thiserror::Error;

/// Result type for dynamism computations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while analysing a ladder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The underlying ladder rejected an operation (including `NotFixed`).
    #[error("ladder error: {0}")]
    Ladder(#[from] amida_ladder::Error),

    /// Folds start from an endpoint.
    #[error("node {0} is a rung node; folds start from an endpoint")]
    ExpectedEndpoint(NodeId),

    /// Unpredictability is only defined for rung nodes.
    #[error("node {0} is an endpoint; unpredictability needs a rung node")]
    ExpectedRung(NodeId),

    /// A probability outside `[0, 1]`, or NaN.
    #[error("probability {value} for node {node} lies outside [0, 1]")]
    ProbabilityOutOfRange { node: NodeId, value: f64 },

    /// The table has no entry for a node the traversal reached.
    #[error("probability table has no entry for node {0}")]
    MissingProbability(NodeId),

    /// The table was built for a ladder of a different size.
    #[error("probability table covers {actual} nodes but the ladder has {expected}")]
    TableSizeMismatch { expected: usize, actual: usize },
}

//! Error types for amida-ladder.

use thiserror::Error;

use crate::NodeId;

/// Result type for ladder operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Which link of a node an invariant check found broken.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkDirection {
    Horizontal,
    Vertical,
}

impl std::fmt::Display for LinkDirection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Horizontal => f.write_str("horizontal"),
            Self::Vertical => f.write_str("vertical"),
        }
    }
}

/// Errors that can occur while building or editing a ladder.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// The id does not belong to this ladder.
    #[error("unknown node {0}")]
    UnknownNode(NodeId),

    /// Fixing requires at least one endpoint.
    #[error("cannot fix a ladder without endpoint nodes")]
    NoEndpoints,

    /// Fixing requires at least one rung node.
    #[error("cannot fix a ladder without rung nodes")]
    NoRungs,

    /// Rung topology and node creation are frozen while the ladder is fixed.
    #[error("ladder is fixed; unfix it before changing rung topology")]
    Fixed,

    /// The density constant only exists while the ladder is fixed.
    #[error("ladder is not fixed")]
    NotFixed,

    /// `solo` was called twice without an `unsolo` in between.
    #[error("node {0} is already soloed")]
    AlreadySoloed(NodeId),

    /// `unsolo` was called on a node that is not detached.
    #[error("node {0} is not soloed")]
    NotSoloed(NodeId),

    /// A crossing names a lane pair beyond the ladder's width.
    #[error("crossing #{index} joins lanes {lane} and {next} but the ladder has {lanes} lanes", next = .lane.saturating_add(1))]
    CrossingOutOfRange {
        index: usize,
        lane: usize,
        lanes: usize,
    },

    /// A crossing names two lanes that are not neighbours.
    #[error("crossing #{index} joins lanes {first} and {second}, which are not adjacent")]
    NonAdjacentLanes {
        index: usize,
        first: usize,
        second: usize,
    },

    /// Lane/position lookup outside the lane tables.
    #[error("lane {lane} has no node at position {position}")]
    NoSuchPosition { lane: usize, position: usize },

    /// Live endpoint/rung counters disagree with the number of created nodes.
    #[error("counter drift: {endpoints} endpoints + {rungs} rungs != {created} nodes")]
    CounterDrift {
        endpoints: usize,
        rungs: usize,
        created: usize,
    },

    /// `x.after.before != x` for one of the two circular lists.
    #[error("{direction} link of node {node} is not mirrored by its successor")]
    BrokenLink {
        node: NodeId,
        direction: LinkDirection,
    },

    /// A lottery walk visited more nodes than the ladder holds.
    #[error("route from lane {lane} did not reach an endpoint")]
    RouteDiverged { lane: usize },
}

//! Ladder vertices.
//!
//! A node sits on two circular doubly-linked lists at once:
//! - the **horizontal** list joins rung partners
//! - the **vertical** list orders the nodes of one lane
//!
//! Links are stored as [`NodeId`]s into the owning ladder's arena. A link that
//! points back at the node itself means "nothing in that direction", so a
//! freshly created node is a self-loop on both lists.

/// Index of a node in its ladder's arena.
///
/// Ids are handed out sequentially from 0 and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct NodeId(pub usize);

impl NodeId {
    /// Create from raw index.
    #[inline]
    pub const fn new(index: usize) -> Self {
        Self(index)
    }

    /// Get the raw index value.
    #[inline]
    pub const fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for NodeId {
    fn from(value: usize) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A single vertex of the ladder graph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    pub(crate) id: NodeId,
    pub(crate) label: String,
    pub(crate) hori_before: NodeId,
    pub(crate) hori_after: NodeId,
    pub(crate) vert_before: NodeId,
    pub(crate) vert_after: NodeId,
    /// Horizontal predecessor remembered by `solo`, cleared by `unsolo`.
    pub(crate) soloed_before: Option<NodeId>,
}

impl Node {
    pub(crate) fn new(id: NodeId, label: impl Into<String>) -> Self {
        Self {
            id,
            label: label.into(),
            hori_before: id,
            hori_after: id,
            vert_before: id,
            vert_after: id,
            soloed_before: None,
        }
    }

    /// This node's id.
    #[inline]
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Caller-supplied label. Never used by any algorithm.
    pub fn label(&self) -> &str {
        &self.label
    }

    #[inline]
    pub fn horizontal_before(&self) -> NodeId {
        self.hori_before
    }

    #[inline]
    pub fn horizontal_after(&self) -> NodeId {
        self.hori_after
    }

    #[inline]
    pub fn vertical_before(&self) -> NodeId {
        self.vert_before
    }

    #[inline]
    pub fn vertical_after(&self) -> NodeId {
        self.vert_after
    }

    /// A node with no rung partner: a lane terminus.
    #[inline]
    pub fn is_endpoint(&self) -> bool {
        self.hori_before == self.id
    }

    /// Whether the node is currently detached by `solo`.
    #[inline]
    pub fn is_soloed(&self) -> bool {
        self.soloed_before.is_some()
    }
}

impl std::fmt::Display for Node {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Node({})", self.label)
    }
}

//! The ladder arena and its link algebra.
//!
//! # Counters
//!
//! The ladder keeps two live counters:
//! - `n`: nodes that are endpoints (no rung partner)
//! - `d`: nodes that are rung nodes
//!
//! While unfixed, every horizontal splice removes the touched nodes from the
//! counters, relinks, and adds them back, so `n + d == node_count()` holds
//! after every mutation. Fixing freezes both counters and caches the density
//! `r = 0.5 * d / n` that the dynamism engine normalises against.
//!
//! # Splicing
//!
//! Both circular lists use the same splice: `next(a) := b`, `next(before(b)) :=
//! next(a)`. Depending on whether `a` and `b` share a cycle this joins or splits
//! cycles, and it always keeps `next(x).prev == x` for every node.

use std::ops::{Deref, DerefMut, Index};

use tracing::{debug, error};

use crate::error::{Error, LinkDirection, Result};
use crate::node::{Node, NodeId};

/// Owns every node of one ladder graph.
#[derive(Debug, Clone, Default)]
pub struct Ladder {
    nodes: Vec<Node>,
    endpoints: usize,
    rungs: usize,
    density: Option<f64>,
}

impl Ladder {
    /// Create an empty, unfixed ladder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total nodes ever created.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Live endpoint count (`n`). Frozen while fixed.
    #[inline]
    pub fn endpoint_count(&self) -> usize {
        self.endpoints
    }

    /// Live rung node count (`d`). Frozen while fixed.
    #[inline]
    pub fn rung_count(&self) -> usize {
        self.rungs
    }

    #[inline]
    pub fn is_fixed(&self) -> bool {
        self.density.is_some()
    }

    /// The density constant `r` cached by [`Ladder::fix`].
    pub fn density(&self) -> Result<f64> {
        self.density.ok_or(Error::NotFixed)
    }

    /// Look up a node by id.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(id.0).ok_or(Error::UnknownNode(id))
    }

    /// All nodes in id order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Ids of the nodes that currently have a rung partner.
    pub fn rung_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.nodes.iter().filter(|n| !n.is_endpoint()).map(Node::id)
    }

    /// Freeze the counters and cache the density constant.
    ///
    /// Fails when the ladder has no endpoints or no rungs, since the density
    /// would be undefined or zero.
    pub fn fix(&mut self) -> Result<f64> {
        if self.endpoints == 0 {
            return Err(Error::NoEndpoints);
        }
        if self.rungs == 0 {
            return Err(Error::NoRungs);
        }
        let density = 0.5 * self.rungs as f64 / self.endpoints as f64;
        self.density = Some(density);
        debug!(
            endpoints = self.endpoints,
            rungs = self.rungs,
            density,
            "ladder fixed"
        );
        Ok(density)
    }

    /// Drop the density constant and resume live counting.
    pub fn unfix(&mut self) {
        self.density = None;
        self.recount();
        debug!(endpoints = self.endpoints, rungs = self.rungs, "ladder unfixed");
    }

    /// Create a detached endpoint node.
    pub fn add_node(&mut self, label: impl Into<String>) -> Result<NodeId> {
        self.ensure_unfixed()?;
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node::new(id, label));
        self.endpoints += 1;
        Ok(id)
    }

    /// Create one node per label and chain them into a single vertical cycle.
    pub fn add_cycle<I, S>(&mut self, labels: I) -> Result<Vec<NodeId>>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ensure_unfixed()?;
        let ids = labels
            .into_iter()
            .map(|label| self.add_node(label))
            .collect::<Result<Vec<_>>>()?;
        for pair in ids.windows(2) {
            self.splice_vertical(pair[0], pair[1]);
        }
        Ok(ids)
    }

    /// Hang a new node under `u` and another under `v`, and join them as a rung.
    pub fn insert_under(
        &mut self,
        u: NodeId,
        v: NodeId,
        label_u: impl Into<String>,
        label_v: impl Into<String>,
    ) -> Result<(NodeId, NodeId)> {
        self.node(u)?;
        self.node(v)?;
        self.ensure_unfixed()?;

        let u_under = self.add_node(label_u)?;
        let v_under = self.add_node(label_v)?;
        self.splice_vertical(u, u_under);
        self.splice_vertical(v, v_under);
        self.splice_horizontal(u_under, v_under)?;
        Ok((u_under, v_under))
    }

    /// Splice `other` into the vertical list right after `node`.
    pub fn vert_connect(&mut self, node: NodeId, other: NodeId) -> Result<()> {
        self.node(node)?;
        self.node(other)?;
        self.splice_vertical(node, other);
        Ok(())
    }

    /// Splice `other` into the horizontal list right after `node`.
    pub fn hori_connect(&mut self, node: NodeId, other: NodeId) -> Result<()> {
        self.node(node)?;
        self.node(other)?;
        self.ensure_unfixed()?;
        self.splice_horizontal(node, other)
    }

    /// Move `other`'s horizontal successor so it sits right after `node`.
    pub fn twist(&mut self, node: NodeId, other: NodeId) -> Result<()> {
        self.node(node)?;
        let after = self.node(other)?.hori_after;
        self.ensure_unfixed()?;
        self.splice_horizontal(node, after)?;
        self.splice_horizontal(after, node)
    }

    /// Detach `node` from its horizontal list, remembering its predecessor.
    ///
    /// Must be undone by [`Ladder::unsolo`] in last-in-first-out order.
    /// Prefer [`Ladder::solo_scoped`], which cannot forget the undo.
    pub fn solo(&mut self, node: NodeId) -> Result<()> {
        let current = self.node(node)?;
        if current.is_soloed() {
            return Err(Error::AlreadySoloed(node));
        }
        let (before, after) = (current.hori_before, current.hori_after);
        self.nodes[node.0].soloed_before = Some(before);
        self.splice_horizontal(before, after)
    }

    /// Reattach a node detached by [`Ladder::solo`].
    pub fn unsolo(&mut self, node: NodeId) -> Result<()> {
        let before = self.node(node)?.soloed_before.ok_or(Error::NotSoloed(node))?;
        self.nodes[node.0].soloed_before = None;
        self.splice_horizontal(before, node)
    }

    /// Solo `node` for the lifetime of the returned guard.
    ///
    /// The guard derefs to the ladder, so nested work goes through it, and it
    /// unsolos on drop, including when that work bails out with `?`.
    pub fn solo_scoped(&mut self, node: NodeId) -> Result<SoloGuard<'_>> {
        self.solo(node)?;
        Ok(SoloGuard { ladder: self, node })
    }

    /// Verify link symmetry on both lists and, while unfixed, the counters.
    pub fn check_invariants(&self) -> Result<()> {
        for node in &self.nodes {
            if self.nodes[node.hori_after.0].hori_before != node.id {
                return Err(Error::BrokenLink {
                    node: node.id,
                    direction: LinkDirection::Horizontal,
                });
            }
            if self.nodes[node.vert_after.0].vert_before != node.id {
                return Err(Error::BrokenLink {
                    node: node.id,
                    direction: LinkDirection::Vertical,
                });
            }
        }
        if !self.is_fixed() {
            self.verify_counts()?;
        }
        Ok(())
    }

    fn ensure_unfixed(&self) -> Result<()> {
        if self.is_fixed() {
            Err(Error::Fixed)
        } else {
            Ok(())
        }
    }

    fn splice_vertical(&mut self, node: NodeId, other: NodeId) {
        let after = self.nodes[node.0].vert_after;
        let before = self.nodes[other.0].vert_before;
        self.nodes[node.0].vert_after = other;
        self.nodes[other.0].vert_before = node;
        self.nodes[after.0].vert_before = before;
        self.nodes[before.0].vert_after = after;
    }

    fn splice_horizontal(&mut self, node: NodeId, other: NodeId) -> Result<()> {
        let after = self.nodes[node.0].hori_after;
        let before = self.nodes[other.0].hori_before;

        let counting = !self.is_fixed();
        let mut touched = vec![node, other, after, before];
        touched.sort_unstable();
        touched.dedup();

        if counting {
            for &id in &touched {
                self.tally(id, false);
            }
        }

        self.nodes[node.0].hori_after = other;
        self.nodes[other.0].hori_before = node;
        self.nodes[after.0].hori_before = before;
        self.nodes[before.0].hori_after = after;

        if counting {
            for &id in &touched {
                self.tally(id, true);
            }
            self.verify_counts()?;
        }
        Ok(())
    }

    fn tally(&mut self, id: NodeId, add: bool) {
        let counter = if self.nodes[id.0].is_endpoint() {
            &mut self.endpoints
        } else {
            &mut self.rungs
        };
        if add {
            *counter += 1;
        } else {
            *counter -= 1;
        }
    }

    fn verify_counts(&self) -> Result<()> {
        if self.endpoints + self.rungs != self.nodes.len() {
            return Err(Error::CounterDrift {
                endpoints: self.endpoints,
                rungs: self.rungs,
                created: self.nodes.len(),
            });
        }
        Ok(())
    }

    fn recount(&mut self) {
        self.endpoints = self.nodes.iter().filter(|n| n.is_endpoint()).count();
        self.rungs = self.nodes.len() - self.endpoints;
    }
}

impl Index<NodeId> for Ladder {
    type Output = Node;

    /// Panics on an id from another ladder; use [`Ladder::node`] to check.
    fn index(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }
}

/// Keeps one node soloed while alive and reattaches it on drop.
pub struct SoloGuard<'a> {
    ladder: &'a mut Ladder,
    node: NodeId,
}

impl SoloGuard<'_> {
    /// The node this guard holds detached.
    pub fn node(&self) -> NodeId {
        self.node
    }
}

impl Deref for SoloGuard<'_> {
    type Target = Ladder;

    fn deref(&self) -> &Ladder {
        &*self.ladder
    }
}

impl DerefMut for SoloGuard<'_> {
    fn deref_mut(&mut self) -> &mut Ladder {
        &mut *self.ladder
    }
}

impl Drop for SoloGuard<'_> {
    fn drop(&mut self) {
        if let Err(err) = self.ladder.unsolo(self.node) {
            error!(node = %self.node, %err, "failed to reattach soloed node");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    /// Two lanes, one rung: tops 0 and 1, rung nodes 2 and 3.
    fn single_rung() -> Ladder {
        let mut ladder = Ladder::new();
        let a = ladder.add_node("a").unwrap();
        let b = ladder.add_node("b").unwrap();
        ladder.insert_under(a, b, "a1", "b1").unwrap();
        ladder
    }

    #[test]
    fn add_node_counts_an_endpoint() {
        let mut ladder = Ladder::new();
        assert_eq!(ladder.add_node("x").unwrap(), NodeId(0));
        assert_eq!(ladder.add_node("y").unwrap(), NodeId(1));
        assert_eq!(ladder.endpoint_count(), 2);
        assert_eq!(ladder.rung_count(), 0);
        assert_eq!(ladder.node_count(), 2);
    }

    #[test]
    fn insert_under_forms_a_two_cycle() {
        let ladder = single_rung();
        let (u, v) = (NodeId(2), NodeId(3));

        assert_eq!(ladder[u].horizontal_after(), v);
        assert_eq!(ladder[u].horizontal_before(), v);
        assert_eq!(ladder[v].horizontal_after(), u);
        assert_eq!(ladder[NodeId(0)].vertical_after(), u);
        assert_eq!(ladder[u].vertical_after(), NodeId(0));

        assert_eq!(ladder.endpoint_count(), 2);
        assert_eq!(ladder.rung_count(), 2);
        ladder.check_invariants().unwrap();
    }

    #[test]
    fn add_cycle_links_vertically_in_order() {
        let mut ladder = Ladder::new();
        let ids = ladder.add_cycle(["t", "m", "b"]).unwrap();

        assert_eq!(ladder[ids[0]].vertical_after(), ids[1]);
        assert_eq!(ladder[ids[1]].vertical_after(), ids[2]);
        assert_eq!(ladder[ids[2]].vertical_after(), ids[0]);
        assert_eq!(ladder[ids[0]].vertical_before(), ids[2]);
        ladder.check_invariants().unwrap();
    }

    #[test]
    fn fix_requires_rungs_and_endpoints() {
        let mut ladder = Ladder::new();
        assert_eq!(ladder.fix(), Err(Error::NoEndpoints));

        ladder.add_node("lonely").unwrap();
        assert_eq!(ladder.fix(), Err(Error::NoRungs));
        assert!(!ladder.is_fixed());
    }

    #[test]
    fn fix_caches_half_density() {
        let mut ladder = single_rung();
        assert_eq!(ladder.density(), Err(Error::NotFixed));

        let r = ladder.fix().unwrap();
        assert_eq!(r, 0.5);
        assert_eq!(ladder.density(), Ok(0.5));
    }

    #[test]
    fn fixed_ladder_rejects_rung_mutation() {
        let mut ladder = single_rung();
        ladder.fix().unwrap();

        assert_eq!(ladder.hori_connect(NodeId(0), NodeId(1)), Err(Error::Fixed));
        assert_eq!(ladder.twist(NodeId(2), NodeId(3)), Err(Error::Fixed));
        assert_eq!(ladder.add_node("late"), Err(Error::Fixed));
        assert_eq!(
            ladder.insert_under(NodeId(0), NodeId(1), "x", "y"),
            Err(Error::Fixed)
        );
        assert_eq!(ladder.node_count(), 4);

        ladder.unfix();
        ladder.hori_connect(NodeId(0), NodeId(1)).unwrap();
        ladder.check_invariants().unwrap();
    }

    #[test]
    fn unknown_ids_are_rejected() {
        let mut ladder = single_rung();
        assert_eq!(ladder.node(NodeId(9)).err(), Some(Error::UnknownNode(NodeId(9))));
        assert_eq!(ladder.solo(NodeId(9)), Err(Error::UnknownNode(NodeId(9))));
        assert_eq!(
            ladder.vert_connect(NodeId(0), NodeId(42)),
            Err(Error::UnknownNode(NodeId(42)))
        );
    }

    #[test]
    fn solo_detaches_both_rung_ends() {
        let mut ladder = single_rung();
        ladder.solo(NodeId(2)).unwrap();

        assert!(ladder[NodeId(2)].is_endpoint());
        assert!(ladder[NodeId(3)].is_endpoint());
        assert!(ladder[NodeId(2)].is_soloed());
        assert_eq!(ladder.rung_count(), 0);
        assert_eq!(ladder.endpoint_count(), 4);

        ladder.unsolo(NodeId(2)).unwrap();
        assert_eq!(ladder.rung_count(), 2);
        assert_eq!(ladder[NodeId(2)].horizontal_after(), NodeId(3));
    }

    #[test]
    fn solo_is_not_reentrant() {
        let mut ladder = single_rung();
        ladder.solo(NodeId(2)).unwrap();
        assert_eq!(ladder.solo(NodeId(2)), Err(Error::AlreadySoloed(NodeId(2))));
        assert_eq!(ladder.unsolo(NodeId(3)), Err(Error::NotSoloed(NodeId(3))));
    }

    #[test]
    fn solo_keeps_counters_frozen_while_fixed() {
        let mut ladder = single_rung();
        ladder.fix().unwrap();
        ladder.solo(NodeId(3)).unwrap();
        assert_eq!(ladder.rung_count(), 2);
        ladder.unsolo(NodeId(3)).unwrap();
        ladder.check_invariants().unwrap();
    }

    #[test]
    fn guard_reattaches_on_early_return() {
        fn bail(ladder: &mut Ladder) -> Result<()> {
            let mut guard = ladder.solo_scoped(NodeId(2))?;
            assert!(guard[NodeId(2)].is_endpoint());
            guard.solo(NodeId(2))?;
            Ok(())
        }

        let mut ladder = single_rung();
        let before = ladder.nodes().to_vec();
        assert_eq!(bail(&mut ladder), Err(Error::AlreadySoloed(NodeId(2))));
        assert_eq!(ladder.nodes(), &before[..]);
    }

    #[test]
    fn twist_reorders_horizontal_neighbours() {
        // Lane 0: top 0; lane 1: top 1. Two rungs stacked: (2,3) then (4,5).
        let mut ladder = single_rung();
        ladder.insert_under(NodeId(2), NodeId(3), "a2", "b2").unwrap();
        ladder.twist(NodeId(2), NodeId(4)).unwrap();

        // 4's successor (5) now sits right after 2.
        assert_eq!(ladder[NodeId(2)].horizontal_after(), NodeId(5));
        assert_eq!(ladder.node_count(), 6);
        ladder.check_invariants().unwrap();
    }

    #[derive(Debug, Clone)]
    enum Op {
        AddNode,
        InsertUnder(usize, usize),
        HoriConnect(usize, usize),
        VertConnect(usize, usize),
        Twist(usize, usize),
        SoloRoundTrip(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        prop_oneof![
            Just(Op::AddNode),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::InsertUnder(a, b)),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::HoriConnect(a, b)),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::VertConnect(a, b)),
            (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Twist(a, b)),
            any::<usize>().prop_map(Op::SoloRoundTrip),
        ]
    }

    proptest! {
        #[test]
        fn invariants_survive_any_mutation(ops in prop::collection::vec(op(), 1..64)) {
            let mut ladder = Ladder::new();
            ladder.add_node("a").unwrap();
            ladder.add_node("b").unwrap();

            for op in ops {
                let len = ladder.node_count();
                let pick = move |i: usize| NodeId(i % len);
                match op {
                    Op::AddNode => {
                        ladder.add_node("n").unwrap();
                    }
                    Op::InsertUnder(a, b) => {
                        let (a, b) = (pick(a), pick(b));
                        ladder.insert_under(a, b, "u", "v").unwrap();
                    }
                    Op::HoriConnect(a, b) => {
                        let (a, b) = (pick(a), pick(b));
                        ladder.hori_connect(a, b).unwrap();
                    }
                    Op::VertConnect(a, b) => {
                        let (a, b) = (pick(a), pick(b));
                        ladder.vert_connect(a, b).unwrap();
                    }
                    Op::Twist(a, b) => {
                        let (a, b) = (pick(a), pick(b));
                        ladder.twist(a, b).unwrap();
                    }
                    Op::SoloRoundTrip(x) => {
                        let x = pick(x);
                        let snapshot = ladder.nodes().to_vec();
                        let counts = (ladder.endpoint_count(), ladder.rung_count());
                        ladder.solo(x).unwrap();
                        ladder.check_invariants().unwrap();
                        ladder.unsolo(x).unwrap();
                        prop_assert_eq!(ladder.nodes(), &snapshot[..]);
                        prop_assert_eq!((ladder.endpoint_count(), ladder.rung_count()), counts);
                    }
                }
                prop_assert_eq!(
                    ladder.endpoint_count() + ladder.rung_count(),
                    ladder.node_count()
                );
                prop_assert!(ladder.check_invariants().is_ok());
            }
        }
    }
}

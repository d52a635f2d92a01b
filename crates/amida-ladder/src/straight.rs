//! Canonical multi-lane ladders.
//!
//! A straight ladder has one endpoint per lane (its top) and one rung per
//! crossing event. Crossings are laid down top to bottom: each event hangs a
//! new node under the current bottom of lane `i` and of lane `i + 1`, then
//! joins the two as a rung.
//!
//! Lanes are circular vertical lists, so walking down past the last rung of a
//! lane arrives back at its top endpoint, which doubles as the lane's bottom
//! terminus.

use tracing::debug;

use crate::error::{Error, Result};
use crate::ladder::Ladder;
use crate::node::NodeId;

/// A ladder built from a lane count and an ordered crossing list.
#[derive(Debug, Clone)]
pub struct StraightLadder {
    ladder: Ladder,
    lanes: Vec<Vec<NodeId>>,
    /// Lane each node was created on, indexed by node id. Rendering hint only.
    origin_lanes: Vec<usize>,
}

impl StraightLadder {
    /// Build from crossings given as the left lane of each adjacent pair.
    ///
    /// `StraightLadder::new(3, &[0, 1])` puts a rung between lanes 0 and 1,
    /// then a lower one between lanes 1 and 2.
    pub fn new(lane_count: usize, crossings: &[usize]) -> Result<Self> {
        for (index, &lane) in crossings.iter().enumerate() {
            if lane >= lane_count.saturating_sub(1) {
                return Err(Error::CrossingOutOfRange {
                    index,
                    lane,
                    lanes: lane_count,
                });
            }
        }
        Self::build(lane_count, crossings)
    }

    /// Build from crossings given as explicit lane pairs, in either order.
    pub fn from_pairs(lane_count: usize, crossings: &[(usize, usize)]) -> Result<Self> {
        let lefts = crossings
            .iter()
            .enumerate()
            .map(|(index, &(first, second))| {
                let lane = first.min(second);
                if first.abs_diff(second) != 1 {
                    return Err(Error::NonAdjacentLanes {
                        index,
                        first,
                        second,
                    });
                }
                if lane >= lane_count.saturating_sub(1) {
                    return Err(Error::CrossingOutOfRange {
                        index,
                        lane,
                        lanes: lane_count,
                    });
                }
                Ok(lane)
            })
            .collect::<Result<Vec<_>>>()?;
        Self::build(lane_count, &lefts)
    }

    /// Callers validate every crossing before this runs.
    fn build(lane_count: usize, crossings: &[usize]) -> Result<Self> {
        let mut ladder = Ladder::new();
        let mut lanes = Vec::with_capacity(lane_count);
        let mut origin_lanes = Vec::with_capacity(lane_count + 2 * crossings.len());

        for lane in 0..lane_count {
            lanes.push(vec![ladder.add_node(lane.to_string())?]);
            origin_lanes.push(lane);
        }

        for &lane in crossings {
            let (u, v) = (bottom(&lanes[lane]), bottom(&lanes[lane + 1]));
            let depth_u = lanes[lane].len();
            let depth_v = lanes[lane + 1].len();
            let (u_under, v_under) = ladder.insert_under(
                u,
                v,
                format!("{lane}:{depth_u}"),
                format!("{}:{depth_v}", lane + 1),
            )?;
            lanes[lane].push(u_under);
            lanes[lane + 1].push(v_under);
            origin_lanes.push(lane);
            origin_lanes.push(lane + 1);
        }

        debug!(
            lanes = lane_count,
            crossings = crossings.len(),
            nodes = ladder.node_count(),
            "built straight ladder"
        );

        Ok(Self {
            ladder,
            lanes,
            origin_lanes,
        })
    }

    pub fn ladder(&self) -> &Ladder {
        &self.ladder
    }

    /// Mutable access for fixing and analysis.
    pub fn ladder_mut(&mut self) -> &mut Ladder {
        &mut self.ladder
    }

    pub fn into_ladder(self) -> Ladder {
        self.ladder
    }

    /// Shorthand for `ladder_mut().fix()`.
    pub fn fix(&mut self) -> Result<f64> {
        self.ladder.fix()
    }

    /// Shorthand for `ladder_mut().unfix()`.
    pub fn unfix(&mut self) {
        self.ladder.unfix()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    /// Top-to-bottom node sequence of one lane.
    pub fn lane(&self, lane: usize) -> Option<&[NodeId]> {
        self.lanes.get(lane).map(Vec::as_slice)
    }

    /// All lanes, left to right.
    pub fn lanes(&self) -> &[Vec<NodeId>] {
        &self.lanes
    }

    /// The node at `position` (0 = top) on `lane`.
    pub fn at(&self, lane: usize, position: usize) -> Result<NodeId> {
        self.lanes
            .get(lane)
            .and_then(|nodes| nodes.get(position))
            .copied()
            .ok_or(Error::NoSuchPosition { lane, position })
    }

    /// Lane the node was created on. Not updated by [`StraightLadder::twist`].
    pub fn origin_lane(&self, node: NodeId) -> Option<usize> {
        self.origin_lanes.get(node.index()).copied()
    }

    /// Twist two nodes of the same lane, addressed by position.
    pub fn twist(&mut self, lane: usize, first: usize, second: usize) -> Result<()> {
        let first = self.at(lane, first)?;
        let second = self.at(lane, second)?;
        self.ladder.twist(first, second)
    }

    /// Each rung once, as `(node, partner)` with the partner on a later origin lane.
    ///
    /// This is the relation a drawing needs: lane sequences give positions,
    /// and every returned pair is one horizontal stroke.
    pub fn rungs(&self) -> Vec<(NodeId, NodeId)> {
        self.lanes
            .iter()
            .flatten()
            .filter_map(|&node| {
                let current = &self.ladder[node];
                if current.is_endpoint() {
                    return None;
                }
                let partner = current.horizontal_after();
                match (self.origin_lane(node), self.origin_lane(partner)) {
                    (Some(from), Some(to)) if from < to => Some((node, partner)),
                    _ => None,
                }
            })
            .collect()
    }

    /// Play the lottery from the top of `lane` and report the lane it lands on.
    ///
    /// The walker moves down its lane and crosses every rung it meets, stopping
    /// at the first endpoint.
    pub fn destination(&self, lane: usize) -> Result<usize> {
        let mut current = self.at(lane, 0)?;
        for _ in 0..=self.ladder.node_count() {
            let below = self.ladder[current].vertical_after();
            let node = &self.ladder[below];
            if node.is_endpoint() {
                return self
                    .origin_lane(below)
                    .ok_or(Error::UnknownNode(below));
            }
            current = node.horizontal_after();
        }
        Err(Error::RouteDiverged { lane })
    }

    /// Destination of every lane, in lane order.
    pub fn permutation(&self) -> Result<Vec<usize>> {
        (0..self.lane_count()).map(|lane| self.destination(lane)).collect()
    }
}

fn bottom(lane: &[NodeId]) -> NodeId {
    // Every lane is created with its top node, so it is never empty.
    lane[lane.len() - 1]
}

//! Expected-path folds and rung unpredictability.
//!
//! A fold walks from an endpoint along its lane. At every rung it meets it
//! branches: with probability `p` the walker goes straight on, otherwise it
//! crosses to the rung partner. Each branch is evaluated on a ladder where the
//! rung just used is soloed away, so the recursion only ever sees rungs that
//! are still ahead of it.
//!
//! Every detach goes through [`Ladder::solo_scoped`]. An error anywhere in the
//! recursion unwinds through the guards and leaves the ladder exactly as it
//! was.

use amida_ladder::{Ladder, Node, NodeId};
use tracing::trace;

use crate::error::{Error, Result};
use crate::table::ProbabilityTable;

/// Which way a fold travels along the lanes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Direction {
    /// Follows vertical-after and horizontal-after links.
    Down,
    /// Follows vertical-before and horizontal-before links.
    Up,
}

impl Direction {
    #[inline]
    fn step(self, node: &Node) -> NodeId {
        match self {
            Self::Down => node.vertical_after(),
            Self::Up => node.vertical_before(),
        }
    }

    #[inline]
    fn partner(self, node: &Node) -> NodeId {
        match self {
            Self::Down => node.horizontal_after(),
            Self::Up => node.horizontal_before(),
        }
    }
}

/// Expected number of rungs met walking down from the endpoint `node`.
pub fn fold(ladder: &mut Ladder, node: NodeId, table: &ProbabilityTable) -> Result<f64> {
    fold_from_endpoint(ladder, node, table, Direction::Down)
}

/// Expected number of rungs met walking up from the endpoint `node`.
pub fn fold_invert(ladder: &mut Ladder, node: NodeId, table: &ProbabilityTable) -> Result<f64> {
    fold_from_endpoint(ladder, node, table, Direction::Up)
}

/// How strongly the rung at `node` changes expected path length.
///
/// Compares the folds on both sides of the rung with each end soloed in turn.
/// With `delta` the resulting change and `r` the ladder density, returns
/// `1 - r / (r + delta)`, which lies in `[0, 1)`.
pub fn unpredictability_once(
    ladder: &mut Ladder,
    node: NodeId,
    table: &ProbabilityTable,
) -> Result<f64> {
    let density = ladder.density()?;
    let current = ladder.node(node)?;
    if current.is_endpoint() {
        return Err(Error::ExpectedRung(node));
    }
    let partner = current.horizontal_after();

    let (above, below) = {
        let mut guard = ladder.solo_scoped(node)?;
        (
            expected_rungs(&mut guard, node, table, Direction::Up)?,
            expected_rungs(&mut guard, node, table, Direction::Down)?,
        )
    };
    let (partner_above, partner_below) = {
        let mut guard = ladder.solo_scoped(partner)?;
        (
            expected_rungs(&mut guard, partner, table, Direction::Up)?,
            expected_rungs(&mut guard, partner, table, Direction::Down)?,
        )
    };

    let delta = (above + partner_below - below - partner_above).abs();
    let value = 1.0 - density / (density + delta);
    trace!(node = %node, delta, value, "rung unpredictability");
    Ok(value)
}

fn fold_from_endpoint(
    ladder: &mut Ladder,
    node: NodeId,
    table: &ProbabilityTable,
    direction: Direction,
) -> Result<f64> {
    ladder.density()?;
    if !ladder.node(node)?.is_endpoint() {
        return Err(Error::ExpectedEndpoint(node));
    }
    expected_rungs(ladder, node, table, direction)
}

/// Recursion shared by both fold directions. `from` is an endpoint here,
/// either a real one or one made by soloing.
fn expected_rungs(
    ladder: &mut Ladder,
    from: NodeId,
    table: &ProbabilityTable,
    direction: Direction,
) -> Result<f64> {
    let next = direction.step(ladder.node(from)?);
    let rung = ladder.node(next)?;
    if rung.is_endpoint() {
        return Ok(0.0);
    }
    let partner = direction.partner(rung);
    let straight_on = table.get(next).ok_or(Error::MissingProbability(next))?;

    let straight = {
        let mut guard = ladder.solo_scoped(next)?;
        expected_rungs(&mut guard, next, table, direction)?
    };
    let crossed = {
        let mut guard = ladder.solo_scoped(partner)?;
        expected_rungs(&mut guard, partner, table, direction)?
    };

    Ok(1.0 + straight_on * straight + (1.0 - straight_on) * crossed)
}

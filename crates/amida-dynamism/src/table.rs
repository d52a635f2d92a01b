//! Per-node probability tables.
//!
//! One table is one relaxation step's probability function: the chance that a
//! walker reaching a rung node keeps going straight instead of crossing.

use amida_ladder::NodeId;

use crate::error::{Error, Result};

/// Probability every node starts from before the first relaxation.
pub const INITIAL_PROBABILITY: f64 = 0.5;

/// Dense map from node id to a probability in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct ProbabilityTable {
    values: Vec<f64>,
}

impl ProbabilityTable {
    /// The starting table: [`INITIAL_PROBABILITY`] everywhere.
    pub fn initial(len: usize) -> Self {
        Self {
            values: vec![INITIAL_PROBABILITY; len],
        }
    }

    /// `len` entries all equal to `value`.
    pub fn uniform(len: usize, value: f64) -> Result<Self> {
        check(NodeId(0), value)?;
        Ok(Self {
            values: vec![value; len],
        })
    }

    /// Wrap explicit values, indexed by node id.
    pub fn from_values(values: Vec<f64>) -> Result<Self> {
        for (index, &value) in values.iter().enumerate() {
            check(NodeId(index), value)?;
        }
        Ok(Self { values })
    }

    #[inline]
    pub fn get(&self, node: NodeId) -> Option<f64> {
        self.values.get(node.index()).copied()
    }

    pub fn set(&mut self, node: NodeId, value: f64) -> Result<()> {
        check(node, value)?;
        let slot = self
            .values
            .get_mut(node.index())
            .ok_or(Error::MissingProbability(node))?;
        *slot = value;
        Ok(())
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    /// Mean over a subset of nodes; 0 for an empty subset.
    pub fn mean_over(&self, nodes: &[NodeId]) -> f64 {
        if nodes.is_empty() {
            return 0.0;
        }
        let sum: f64 = nodes.iter().filter_map(|&node| self.get(node)).sum();
        sum / nodes.len() as f64
    }
}

fn check(node: NodeId, value: f64) -> Result<()> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::ProbabilityOutOfRange { node, value })
    }
}

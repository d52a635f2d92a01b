//! Fixed-point relaxation of rung probabilities.
//!
//! Each step feeds the current table into [`unpredictability_once`] at every
//! rung node and collects the answers into the next table. All evaluations in
//! a step read the same snapshot (Jacobi style), so the order rungs are
//! visited in never matters.
//!
//! An [`Analysis`] holds the ladder's only mutable borrow for its whole
//! lifetime. Folds solo and unsolo nodes in place, so no other reader may look
//! at the ladder while one is running.

use amida_ladder::{Ladder, NodeId};
use tracing::{debug, info};

use crate::config::{converged_at, ConvergenceConfig, TraceReport};
use crate::error::{Error, Result};
use crate::fold::{self, unpredictability_once};
use crate::table::ProbabilityTable;

/// Dynamism analysis over one fixed ladder.
#[derive(Debug)]
pub struct Analysis<'a> {
    ladder: &'a mut Ladder,
    rungs: Vec<NodeId>,
}

impl<'a> Analysis<'a> {
    /// Start an analysis. The ladder must already be fixed.
    pub fn new(ladder: &'a mut Ladder) -> Result<Self> {
        ladder.density()?;
        let rungs = ladder.rung_nodes().collect();
        Ok(Self { ladder, rungs })
    }

    pub fn ladder(&self) -> &Ladder {
        &*self.ladder
    }

    /// Rung nodes in id order, as seen when the analysis started.
    pub fn rungs(&self) -> &[NodeId] {
        &self.rungs
    }

    /// The step-0 table for this ladder.
    pub fn initial_table(&self) -> ProbabilityTable {
        ProbabilityTable::initial(self.ladder.node_count())
    }

    pub fn fold(&mut self, node: NodeId, table: &ProbabilityTable) -> Result<f64> {
        self.check_table(table)?;
        fold::fold(self.ladder, node, table)
    }

    pub fn fold_invert(&mut self, node: NodeId, table: &ProbabilityTable) -> Result<f64> {
        self.check_table(table)?;
        fold::fold_invert(self.ladder, node, table)
    }

    pub fn unpredictability_once(&mut self, node: NodeId, table: &ProbabilityTable) -> Result<f64> {
        self.check_table(table)?;
        unpredictability_once(self.ladder, node, table)
    }

    /// One synchronous step: every rung reads `table`, results go to a fresh table.
    pub fn relax(&mut self, table: &ProbabilityTable) -> Result<ProbabilityTable> {
        self.check_table(table)?;
        let mut next = table.clone();
        for &node in &self.rungs {
            let value = unpredictability_once(self.ladder, node, table)?;
            next.set(node, value)?;
        }
        Ok(next)
    }

    /// Relax `steps` times from the initial table.
    pub fn iterate(&mut self, steps: usize) -> Result<ProbabilityTable> {
        self.run(steps, |_, _| {})
    }

    /// Mean rung unpredictability at the table reached after `steps` relaxations.
    pub fn dynamism(&mut self, steps: usize) -> Result<f64> {
        let table = self.iterate(steps)?;
        let dynamism = self.mean_unpredictability(&table)?;
        info!(steps, dynamism, "computed ladder dynamism");
        Ok(dynamism)
    }

    /// Mean rung unpredictability after each of `steps` relaxations.
    pub fn dynamism_trace(&mut self, steps: usize) -> Result<Vec<f64>> {
        let mut trace = Vec::with_capacity(steps);
        self.run(steps, |_, mean| trace.push(mean))?;
        info!(steps, last = trace.last().copied(), "computed dynamism trace");
        Ok(trace)
    }

    /// Trace, final dynamism and convergence point in one pass.
    pub fn report(&mut self, config: &ConvergenceConfig) -> Result<TraceReport> {
        let mut trace = Vec::with_capacity(config.steps);
        let table = self.run(config.steps, |_, mean| trace.push(mean))?;
        let dynamism = self.mean_unpredictability(&table)?;
        let converged_at = converged_at(&trace, config.tolerance);
        info!(
            steps = config.steps,
            dynamism,
            converged_at = ?converged_at,
            "dynamism report ready"
        );
        Ok(TraceReport {
            steps: config.steps,
            trace,
            dynamism,
            converged_at,
        })
    }

    fn run<F>(&mut self, steps: usize, mut on_step: F) -> Result<ProbabilityTable>
    where
        F: FnMut(usize, f64),
    {
        let mut table = self.initial_table();
        for step in 0..steps {
            table = self.relax(&table)?;
            let mean = table.mean_over(&self.rungs);
            debug!(step, mean, "relaxation step");
            on_step(step, mean);
        }
        Ok(table)
    }

    fn mean_unpredictability(&mut self, table: &ProbabilityTable) -> Result<f64> {
        let mut sum = 0.0;
        for &node in &self.rungs {
            sum += unpredictability_once(self.ladder, node, table)?;
        }
        if self.rungs.is_empty() {
            return Ok(0.0);
        }
        Ok(sum / self.rungs.len() as f64)
    }

    fn check_table(&self, table: &ProbabilityTable) -> Result<()> {
        let expected = self.ladder.node_count();
        if table.len() != expected {
            return Err(Error::TableSizeMismatch {
                expected,
                actual: table.len(),
            });
        }
        Ok(())
    }
}

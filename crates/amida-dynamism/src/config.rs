//! Convergence settings and the report they produce.

/// How long to relax and when to call the trace settled.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ConvergenceConfig {
    /// Number of relaxation steps
    pub steps: usize,
    /// Largest step-to-step change still counted as converged
    pub tolerance: f64,
}

impl Default for ConvergenceConfig {
    fn default() -> Self {
        Self {
            steps: 20,
            tolerance: 1e-9,
        }
    }
}

/// Outcome of one relaxation run.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TraceReport {
    pub steps: usize,
    /// Mean unpredictability after each step
    pub trace: Vec<f64>,
    /// Mean unpredictability evaluated at the final table
    pub dynamism: f64,
    /// First trace index that moved by at most the tolerance
    pub converged_at: Option<usize>,
}

impl TraceReport {
    pub fn is_converged(&self) -> bool {
        self.converged_at.is_some()
    }

    /// Change between the last two trace entries.
    pub fn final_change(&self) -> Option<f64> {
        match self.trace.as_slice() {
            [.., prev, last] => Some((last - prev).abs()),
            _ => None,
        }
    }
}

/// First index `i > 0` with `|trace[i] - trace[i - 1]| <= tolerance`.
pub fn converged_at(trace: &[f64], tolerance: f64) -> Option<usize> {
    trace
        .windows(2)
        .position(|pair| (pair[1] - pair[0]).abs() <= tolerance)
        .map(|i| i + 1)
}

//! Ladder Dynamism
//!
//! How unpredictable is a ghost-leg ladder? This crate answers with a single
//! number in `[0, 1)`.
//!
//! # Folds
//!
//! A walker entering the ladder at an endpoint meets rungs one after another.
//! At each rung it goes straight with probability `p` or crosses with
//! probability `1 - p`. [`fold`] and [`fold_invert`] return the expected number
//! of rungs met going down and going up.
//!
//! # Unpredictability
//!
//! For one rung, [`unpredictability_once`] compares the folds on both sides
//! with each rung end detached in turn. The difference `delta` measures how
//! much that rung reshapes expected paths. Normalised against the ladder
//! density `r`, the result is `1 - r / (r + delta)`.
//!
//! # Relaxation
//!
//! Unpredictability is fed back in as the next step's straight-on probability
//! for every rung at once. [`Analysis::dynamism`] averages the result after a
//! fixed number of steps, and [`Analysis::dynamism_trace`] records the average
//! after every step so convergence can be inspected.
//!
//! # Usage
//!
//! ```
//! use amida_ladder::StraightLadder;
//!
//! let mut ladder = StraightLadder::new(3, &[0, 1]).unwrap();
//! ladder.fix().unwrap();
//!
//! let trace = amida_dynamism::dynamism_trace(ladder.ladder_mut(), 10).unwrap();
//! assert_eq!(trace.len(), 10);
//! assert!(trace.iter().all(|v| (0.0..1.0).contains(v)));
//! ```

mod analysis;
mod config;
mod error;
mod fold;
mod table;

use amida_ladder::Ladder;

pub use analysis::Analysis;
pub use config::{converged_at, ConvergenceConfig, TraceReport};
pub use error::{Error, Result};
pub use fold::{fold, fold_invert, unpredictability_once};
pub use table::{ProbabilityTable, INITIAL_PROBABILITY};

/// Ladder-wide mean unpredictability after `steps` relaxations.
pub fn dynamism(ladder: &mut Ladder, steps: usize) -> Result<f64> {
    Analysis::new(ladder)?.dynamism(steps)
}

/// Mean unpredictability after each of `steps` relaxations.
pub fn dynamism_trace(ladder: &mut Ladder, steps: usize) -> Result<Vec<f64>> {
    Analysis::new(ladder)?.dynamism_trace(steps)
}

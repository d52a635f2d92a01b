//! Amida command-line reports
//!
//! Builds a straight ladder from a [`RunConfig`], plays the lottery for every
//! lane, fixes the ladder and relaxes it into a dynamism report.

mod config;
mod error;

use amida_dynamism::{Analysis, TraceReport};
use amida_ladder::StraightLadder;
use serde::Serialize;
use tracing::info;

pub use config::RunConfig;
pub use error::{Error, Result};

/// Everything printed by one run.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub lanes: usize,
    pub crossings: Vec<usize>,
    /// Lane each top lands on
    pub permutation: Vec<usize>,
    pub endpoints: usize,
    pub rungs: usize,
    /// Density constant `r` frozen by fixing
    pub density: f64,
    pub report: TraceReport,
}

/// Build, fix and analyse the ladder described by `config`.
pub fn run(config: &RunConfig) -> Result<RunSummary> {
    let mut ladder = StraightLadder::new(config.lanes, &config.crossings)?;
    let permutation = ladder.permutation()?;
    let density = ladder.fix()?;
    let (endpoints, rungs) = (ladder.ladder().endpoint_count(), ladder.ladder().rung_count());

    info!(
        lanes = config.lanes,
        crossings = config.crossings.len(),
        density,
        "analysing ladder"
    );

    let report = Analysis::new(ladder.ladder_mut())?.report(&config.convergence())?;

    Ok(RunSummary {
        lanes: config.lanes,
        crossings: config.crossings.clone(),
        permutation,
        endpoints,
        rungs,
        density,
        report,
    })
}

/// Plain-text rendering of a summary.
pub fn render_text(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str("Amida Ladder Dynamism\n");
    out.push_str("=====================\n\n");
    out.push_str(&format!("  Lanes:       {}\n", summary.lanes));
    out.push_str(&format!("  Crossings:   {:?}\n", summary.crossings));
    out.push_str(&format!("  Permutation: {:?}\n", summary.permutation));
    out.push_str(&format!(
        "  Nodes:       {} endpoints, {} rung nodes (r = {:.6})\n\n",
        summary.endpoints, summary.rungs, summary.density
    ));

    out.push_str("Trace:\n");
    for (step, value) in summary.report.trace.iter().enumerate() {
        out.push_str(&format!("  step {:>3}: {:.9}\n", step + 1, value));
    }

    out.push_str(&format!("\nDynamism: {:.9}\n", summary.report.dynamism));
    match summary.report.converged_at {
        Some(step) => out.push_str(&format!("Converged at step {}\n", step + 1)),
        None => out.push_str("Not converged within tolerance\n"),
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_run_reports_staircase() {
        let summary = run(&RunConfig::default()).unwrap();
        assert_eq!(summary.permutation, vec![2, 0, 1]);
        assert_eq!((summary.endpoints, summary.rungs), (3, 4));
        assert_eq!(summary.report.trace.len(), 20);
        assert!((summary.report.dynamism - 0.6).abs() < 1e-12);
        assert_eq!(summary.report.converged_at, Some(1));
    }

    #[test]
    fn bad_ladders_surface_as_errors() {
        let out_of_range = RunConfig {
            lanes: 2,
            crossings: vec![1],
            ..RunConfig::default()
        };
        assert!(matches!(run(&out_of_range), Err(Error::Ladder(_))));

        let huge = usize::MAX.to_string();
        let config = RunConfig::from_args(["3", huge.as_str()]).unwrap();
        assert!(matches!(
            run(&config),
            Err(Error::Ladder(amida_ladder::Error::CrossingOutOfRange { index: 0, .. }))
        ));

        let no_rungs = RunConfig {
            crossings: Vec::new(),
            ..RunConfig::default()
        };
        assert!(matches!(
            run(&no_rungs),
            Err(Error::Ladder(amida_ladder::Error::NoRungs))
        ));
    }

    #[test]
    fn text_and_json_renderings() {
        let config = RunConfig {
            steps: 2,
            ..RunConfig::default()
        };
        let summary = run(&config).unwrap();

        let text = render_text(&summary);
        assert!(text.contains("Permutation: [2, 0, 1]"));
        assert!(text.contains("step   2:"));
        assert!(text.contains("Converged at step 2"));

        let json: serde_json::Value = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["lanes"], 3);
        assert_eq!(json["report"]["trace"].as_array().unwrap().len(), 2);
    }
}

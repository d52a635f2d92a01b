//! Run configuration parsed from the command line.
//!
//! ```text
//! amida [LANES] [CROSSINGS] [STEPS] [--json] [--tolerance=<f>]
//! ```
//!
//! `CROSSINGS` is a comma-separated list of left lane indices, top to bottom
//! (`0,1,0`), or `-` for none. Missing positionals fall back to the defaults.

use amida_dynamism::ConvergenceConfig;

use crate::error::{Error, Result};

/// Everything one `amida` invocation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct RunConfig {
    /// Number of lanes
    pub lanes: usize,
    /// Left lane of each crossing, top to bottom
    pub crossings: Vec<usize>,
    /// Relaxation steps
    pub steps: usize,
    /// Convergence tolerance for the report
    pub tolerance: f64,
    /// Print the report as JSON instead of text
    pub json: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        let convergence = ConvergenceConfig::default();
        Self {
            lanes: 3,
            crossings: vec![0, 1],
            steps: convergence.steps,
            tolerance: convergence.tolerance,
            json: false,
        }
    }
}

impl RunConfig {
    /// Parse arguments (without the program name).
    pub fn from_args<I, S>(args: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut config = Self::default();
        let mut position = 0;

        for arg in args {
            let arg = arg.as_ref();
            if let Some(flag) = arg.strip_prefix("--") {
                match flag.split_once('=') {
                    None if flag == "json" => config.json = true,
                    Some(("tolerance", value)) => {
                        config.tolerance = value
                            .parse()
                            .ok()
                            .filter(|t: &f64| t.is_finite() && *t >= 0.0)
                            .ok_or_else(|| invalid("tolerance", value, "a non-negative number"))?;
                    }
                    _ => return Err(Error::UnknownFlag(arg.to_string())),
                }
                continue;
            }

            match position {
                0 => {
                    config.lanes = arg
                        .parse()
                        .map_err(|_| invalid("lane count", arg, "a whole number"))?;
                }
                1 => config.crossings = parse_crossings(arg)?,
                2 => {
                    config.steps = arg
                        .parse()
                        .map_err(|_| invalid("step count", arg, "a whole number"))?;
                }
                _ => return Err(Error::UnexpectedArgument(arg.to_string())),
            }
            position += 1;
        }

        Ok(config)
    }

    pub fn convergence(&self) -> ConvergenceConfig {
        ConvergenceConfig {
            steps: self.steps,
            tolerance: self.tolerance,
        }
    }
}

fn parse_crossings(arg: &str) -> Result<Vec<usize>> {
    if arg == "-" {
        return Ok(Vec::new());
    }
    arg.split(',')
        .map(|part| {
            part.trim()
                .parse()
                .map_err(|_| invalid("crossing", part, "a lane index"))
        })
        .collect()
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> Error {
    Error::InvalidArgument {
        name,
        value: value.to_string(),
        expected,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_args_use_defaults() {
        let config = RunConfig::from_args(Vec::<String>::new()).unwrap();
        assert_eq!(config, RunConfig::default());
        assert_eq!(config.crossings, vec![0, 1]);
    }

    #[test]
    fn positionals_in_order() {
        let config = RunConfig::from_args(["4", "0,2, 1", "7"]).unwrap();
        assert_eq!(config.lanes, 4);
        assert_eq!(config.crossings, vec![0, 2, 1]);
        assert_eq!(config.steps, 7);
        assert!(!config.json);
    }

    #[test]
    fn flags_anywhere() {
        let config = RunConfig::from_args(["--json", "2", "-", "--tolerance=0.001"]).unwrap();
        assert!(config.json);
        assert_eq!(config.lanes, 2);
        assert!(config.crossings.is_empty());
        assert_eq!(config.convergence().tolerance, 0.001);
    }

    #[test]
    fn bad_input_is_reported() {
        assert!(matches!(
            RunConfig::from_args(["three"]),
            Err(Error::InvalidArgument { name: "lane count", .. })
        ));
        assert!(matches!(
            RunConfig::from_args(["3", "0,x"]),
            Err(Error::InvalidArgument { name: "crossing", .. })
        ));
        assert!(matches!(
            RunConfig::from_args(["--tolerance=-1"]),
            Err(Error::InvalidArgument { name: "tolerance", .. })
        ));
        assert!(matches!(
            RunConfig::from_args(["--verbose"]),
            Err(Error::UnknownFlag(_))
        ));
        assert!(matches!(
            RunConfig::from_args(["3", "0", "5", "extra"]),
            Err(Error::UnexpectedArgument(_))
        ));
    }
}

//! Error types for amida-cli.

use thiserror::Error;

/// Result type for CLI operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while parsing arguments or running a report.
#[derive(Debug, Error)]
pub enum Error {
    /// A positional argument or flag value did not parse.
    #[error("invalid {name} '{value}': expected {expected}")]
    InvalidArgument {
        name: &'static str,
        value: String,
        expected: &'static str,
    },

    /// A flag this tool does not know.
    #[error("unknown flag '{0}'")]
    UnknownFlag(String),

    /// More positional arguments than lanes, crossings and steps.
    #[error("unexpected argument '{0}'")]
    UnexpectedArgument(String),

    /// Building or fixing the ladder failed.
    #[error("ladder error: {0}")]
    Ladder(#[from] amida_ladder::Error),

    /// The dynamism computation failed.
    #[error("dynamism error: {0}")]
    Dynamism(#[from] amida_dynamism::Error),
}

pub mod lazy;

pub use lazy::*;

use std::{fmt, str::FromStr};

use thiserror::Error;

use crate::graph::MalformedIncumbentError;

/// Which of the incumbent's cycles is reported for elimination. Fixed for the
/// duration of one solve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SelectionPolicy {
    /// Fewest nodes; ties go to the earliest discovered cycle
    #[default]
    Shortest,
    /// Most nodes; same tie-break
    Longest,
    /// Uniformly random cycle, needs a random source
    Random,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown selection policy '{0}', expected one of: shortest, longest, random")]
pub struct ParsePolicyError(String);

impl FromStr for SelectionPolicy {
    type Err = ParsePolicyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "shortest" => Ok(SelectionPolicy::Shortest),
            "longest" => Ok(SelectionPolicy::Longest),
            "random" => Ok(SelectionPolicy::Random),
            _ => Err(ParsePolicyError(s.to_owned())),
        }
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SelectionPolicy::Shortest => "shortest",
            SelectionPolicy::Longest => "longest",
            SelectionPolicy::Random => "random",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SeparationError {
    #[error(transparent)]
    MalformedIncumbent(#[from] MalformedIncumbentError),

    /// Raised when the separator is configured, not once callbacks run
    #[error("selection policy 'random' needs a random source, construct the separator with_rng")]
    MissingRandomSource,
}

/// Errors of one incumbent-callback round. Failures of the host solver's
/// constraint injection are passed through unchanged.
#[derive(Debug, Error)]
pub enum CallbackError<E: fmt::Display> {
    #[error(transparent)]
    Separation(#[from] SeparationError),

    #[error("lazy cut rejected by the host solver: {0}")]
    Sink(E),
}

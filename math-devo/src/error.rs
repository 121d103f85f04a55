//! Error types for the DE / DE-MCMC engine.
//!
//! Only model construction and strategy-name parsing can fail. Failures of the
//! objective function itself are panics and propagate unchanged through
//! [`Model::step`](crate::Model::step).

use thiserror::Error;

/// Errors that can occur while configuring a differential evolution model.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum DevoError {
    /// Lower and upper bounds have different lengths.
    #[error("bounds mismatch: lower has {lower_len} elements, upper has {upper_len}")]
    BoundsMismatch {
        /// Length of the lower bounds slice
        lower_len: usize,
        /// Length of the upper bounds slice
        upper_len: usize,
    },

    /// A strategy name could not be parsed.
    #[error("unknown {kind} strategy: {name}")]
    UnknownStrategy {
        /// Which strategy family was being parsed ("trial" or "denial")
        kind: &'static str,
        /// The name that failed to parse
        name: String,
    },
}

/// A specialized `Result` type for DE operations.
pub type Result<T> = std::result::Result<T, DevoError>;

impl DevoError {
    /// Returns `true` if this error was raised while building a model.
    pub fn is_config_error(&self) -> bool {
        matches!(self, DevoError::BoundsMismatch { .. })
    }

    /// Returns `true` if this error comes from parsing a strategy name.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, DevoError::UnknownStrategy { .. })
    }
}

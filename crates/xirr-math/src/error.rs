//! Error types for root finding.

use std::time::Duration;

use thiserror::Error;

/// A specialized Result type for root-finding operations.
pub type MathResult<T> = Result<T, MathError>;

/// Errors that can occur while searching for a root.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum MathError {
    /// Root-finding algorithm exhausted its iteration cap.
    #[error("Convergence failed after {iterations} iterations (residual: {residual:.2e})")]
    ConvergenceFailed {
        /// Number of iterations attempted.
        iterations: u32,
        /// Final residual value.
        residual: f64,
    },

    /// Invalid bracket for root-finding.
    #[error("Invalid bracket: f({a}) = {fa:.2e} and f({b}) = {fb:.2e} have same sign")]
    InvalidBracket {
        /// Lower bound of bracket.
        a: f64,
        /// Upper bound of bracket.
        b: f64,
        /// Function value at a.
        fa: f64,
        /// Function value at b.
        fb: f64,
    },

    /// No sign change was found within the bracket search budget.
    #[error("No bracket found in [{lower}, {upper}] after {expansions} expansions")]
    BracketNotFound {
        /// Lower bound of the last interval searched.
        lower: f64,
        /// Upper bound of the last interval searched.
        upper: f64,
        /// Number of times the upper bound was widened.
        expansions: u32,
    },

    /// Division by zero or near-zero value (flat tangent).
    #[error("Division by zero or near-zero value: {value:.2e}")]
    DivisionByZero {
        /// The near-zero value.
        value: f64,
    },

    /// Iterate left the domain of the function.
    #[error("Iteration diverged at step {iteration}: estimate {value}")]
    Diverged {
        /// Iteration on which the estimate left the domain.
        iteration: u32,
        /// The offending estimate.
        value: f64,
    },

    /// Wall-clock budget exhausted before convergence.
    #[error("Timed out after {iterations} iterations ({elapsed:?})")]
    Timeout {
        /// Iterations completed before the deadline fired.
        iterations: u32,
        /// Time spent in the attempt.
        elapsed: Duration,
    },

    /// Invalid input parameter.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },
}

impl MathError {
    /// Creates a convergence failed error.
    #[must_use]
    pub fn convergence_failed(iterations: u32, residual: f64) -> Self {
        Self::ConvergenceFailed {
            iterations,
            residual,
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a divergence error.
    #[must_use]
    pub fn diverged(iteration: u32, value: f64) -> Self {
        Self::Diverged { iteration, value }
    }

    /// Returns true if the failure was caused by the deadline rather than the numerics.
    #[must_use]
    pub fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout { .. })
    }
}

//! Error types for the XIRR library.
//!
//! Only two kinds of failure ever reach a caller as an `Err`: malformed
//! input (dates, configuration) and, when explicitly requested, series
//! validation. Numeric failures are recovered by the solve orchestrator and
//! reported through [`XirrOutcome`](crate::solve::XirrOutcome).

use thiserror::Error;
use xirr_math::MathError;

/// A specialized Result type for XIRR operations.
pub type XirrResult<T> = Result<T, XirrError>;

/// Why a cash-flow series cannot have an XIRR.
///
/// Inflow and outflow are relative to the sign of the first movement:
/// an outflow shares that sign, an inflow has the opposite sign.
/// Leading zero-amount movements are skipped when finding that sign.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    /// The series has no movements at all.
    #[error("Cash-flow series is empty")]
    Empty,

    /// No movement carries a non-zero amount, so the series has no direction.
    #[error("No outflow: every movement has a zero amount")]
    NoOutflow,

    /// Every signed movement shares the sign of the first movement.
    #[error("No inflow: every movement has the same sign as the first movement")]
    NoInflow,
}

/// The main error type for XIRR operations.
#[derive(Error, Debug, Clone)]
pub enum XirrError {
    /// Error in date parsing or an invalid date.
    #[error("Invalid date: {message}")]
    InvalidDate {
        /// Description of the date error.
        message: String,
    },

    /// The series lacks an inflow or an outflow.
    #[error("Invalid cash-flow series: {0}")]
    Validation(#[from] ValidationError),

    /// Invalid input value.
    #[error("Invalid input: {reason}")]
    InvalidInput {
        /// Description of the invalid input.
        reason: String,
    },

    /// Configuration could not be parsed or failed validation.
    #[error("Configuration error: {reason}")]
    Config {
        /// Description of the configuration error.
        reason: String,
    },

    /// Numerical error from a solver.
    ///
    /// `solve` keeps these inside `XirrOutcome::Unsolved`; this variant is
    /// produced by `XirrOutcome::into_result`.
    #[error("Mathematical error: {0}")]
    Math(#[from] MathError),
}

impl XirrError {
    /// Creates an invalid date error.
    #[must_use]
    pub fn invalid_date(message: impl Into<String>) -> Self {
        Self::InvalidDate {
            message: message.into(),
        }
    }

    /// Creates an invalid input error.
    #[must_use]
    pub fn invalid_input(reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            reason: reason.into(),
        }
    }

    /// Creates a configuration error.
    #[must_use]
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = XirrError::invalid_date("2024-02-30");
        assert!(err.to_string().contains("Invalid date"));
    }

    #[test]
    fn test_validation_names_missing_side() {
        let err = XirrError::from(ValidationError::NoInflow);
        assert!(err.to_string().contains("No inflow"));

        let err = XirrError::from(ValidationError::NoOutflow);
        assert!(err.to_string().contains("No outflow"));
    }

    #[test]
    fn test_math_error_wraps() {
        let err = XirrError::from(MathError::convergence_failed(100, 1e-3));
        assert!(err.to_string().contains("100 iterations"));
    }
}

//! Result types returned by the solve orchestrator.

use serde::Serialize;
use xirr_math::MathError;

use super::SolverMethod;
use crate::error::{ValidationError, XirrError, XirrResult};

/// A successfully solved rate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct XirrSolution {
    /// Annualised rate rounded to the configured precision.
    pub rate: f64,
    /// Unrounded root returned by the solver.
    pub root: f64,
    /// Strategy that produced the root.
    pub method: SolverMethod,
    /// Iterations used by the successful attempt.
    pub iterations: u32,
    /// `NPV(root)`.
    pub residual: f64,
    /// True if the primary strategy failed and its partner succeeded.
    pub fallback_used: bool,
}

/// A solver attempt that did not produce a root.
#[derive(Debug, Clone, PartialEq)]
pub struct FailedAttempt {
    /// Strategy that was tried.
    pub method: SolverMethod,
    /// Why it stopped.
    pub error: MathError,
}

impl FailedAttempt {
    /// Returns true if the attempt ran out of wall-clock budget.
    #[must_use]
    pub fn timed_out(&self) -> bool {
        self.error.is_timeout()
    }
}

/// Outcome of an XIRR solve.
///
/// A 0% rate is `Solved` with `rate == 0.0`; failures are never encoded as
/// a number. Use [`XirrOutcome::rate_or_sentinel`] when a flat number is
/// required.
#[derive(Debug, Clone, PartialEq)]
pub enum XirrOutcome {
    /// A root was found.
    Solved(XirrSolution),
    /// The series cannot have an XIRR; no solver ran.
    Invalid(ValidationError),
    /// Every attempt failed, in the order they ran.
    Unsolved(Vec<FailedAttempt>),
}

impl XirrOutcome {
    /// Returns the rounded rate if solved.
    #[must_use]
    pub fn rate(&self) -> Option<f64> {
        self.solution().map(|s| s.rate)
    }

    /// Returns the rounded rate, or `sentinel` for any failure.
    #[must_use]
    pub fn rate_or_sentinel(&self, sentinel: f64) -> f64 {
        self.rate().unwrap_or(sentinel)
    }

    /// Returns true if a root was found.
    #[must_use]
    pub fn is_solved(&self) -> bool {
        matches!(self, XirrOutcome::Solved(_))
    }

    /// Returns the solution if solved.
    #[must_use]
    pub fn solution(&self) -> Option<&XirrSolution> {
        match self {
            XirrOutcome::Solved(solution) => Some(solution),
            _ => None,
        }
    }

    /// Converts the outcome into a `Result` for callers that propagate with `?`.
    ///
    /// # Errors
    ///
    /// `Invalid` becomes `XirrError::Validation`; `Unsolved` becomes
    /// `XirrError::Math` carrying the last attempt's error.
    pub fn into_result(self) -> XirrResult<XirrSolution> {
        match self {
            XirrOutcome::Solved(solution) => Ok(solution),
            XirrOutcome::Invalid(invalid) => Err(invalid.into()),
            XirrOutcome::Unsolved(mut attempts) => Err(attempts.pop().map_or_else(
                || XirrError::invalid_input("no solver attempted"),
                |last| last.error.into(),
            )),
        }
    }

    /// Returns the failed attempts (empty unless `Unsolved`).
    #[must_use]
    pub fn attempts(&self) -> &[FailedAttempt] {
        match self {
            XirrOutcome::Unsolved(attempts) => attempts,
            _ => &[],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn solved(rate: f64) -> XirrOutcome {
        XirrOutcome::Solved(XirrSolution {
            rate,
            root: rate,
            method: SolverMethod::Newton,
            iterations: 3,
            residual: 0.0,
            fallback_used: false,
        })
    }

    #[test]
    fn test_zero_rate_is_distinguishable() {
        let zero = solved(0.0);
        let failed = XirrOutcome::Unsolved(vec![]);

        assert_eq!(zero.rate(), Some(0.0));
        assert_eq!(failed.rate(), None);
        assert!(zero.is_solved());
        assert!(!failed.is_solved());
    }

    #[test]
    fn test_sentinel() {
        assert_eq!(solved(0.12).rate_or_sentinel(0.0), 0.12);
        assert_eq!(
            XirrOutcome::Invalid(ValidationError::NoInflow).rate_or_sentinel(-1.0),
            -1.0
        );
    }

    #[test]
    fn test_attempts() {
        let outcome = XirrOutcome::Unsolved(vec![FailedAttempt {
            method: SolverMethod::Bisection,
            error: MathError::Timeout {
                iterations: 0,
                elapsed: Duration::ZERO,
            },
        }]);

        assert_eq!(outcome.attempts().len(), 1);
        assert!(outcome.attempts()[0].timed_out());
        assert!(solved(0.1).attempts().is_empty());
    }

    #[test]
    fn test_into_result() {
        assert_eq!(solved(0.05).into_result().unwrap().rate, 0.05);

        let invalid = XirrOutcome::Invalid(ValidationError::NoOutflow).into_result();
        assert!(matches!(
            invalid,
            Err(XirrError::Validation(ValidationError::NoOutflow))
        ));

        let unsolved = XirrOutcome::Unsolved(vec![
            FailedAttempt {
                method: SolverMethod::Newton,
                error: MathError::diverged(1, -3.0),
            },
            FailedAttempt {
                method: SolverMethod::Bisection,
                error: MathError::convergence_failed(100, 1e-3),
            },
        ])
        .into_result();
        assert!(matches!(
            unsolved,
            Err(XirrError::Math(MathError::ConvergenceFailed { .. }))
        ));
    }
}

//! XIRR solve orchestration.
//!
//! [`XirrSolver::solve`] validates a series, compacts it, runs the primary
//! strategy under an iteration cap and a wall-clock deadline, and retries
//! once with the other strategy when fallback is enabled. Numeric failures
//! never escape as errors; they are collected in [`XirrOutcome::Unsolved`].

mod method;
mod outcome;

pub use method::SolverMethod;
pub use outcome::{FailedAttempt, XirrOutcome, XirrSolution};

use log::{debug, info, warn};
use rust_decimal::prelude::*;
use xirr_math::solvers::{Deadline, SolverConfig, SolverResult};
use xirr_math::{MathError, MathResult};

use crate::config::{Settings, XirrConfig, XirrOptions};
use crate::error::XirrResult;
use crate::npv::DiscountTerms;
use crate::series::CashFlowSeries;

/// Solves cash-flow series for their XIRR.
///
/// # Example
///
/// ```rust
/// use xirr_core::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let series = CashFlowSeries::from_movements([
///     CashMovement::generic(dec!(1000), Date::parse("2013-01-01").unwrap()),
///     CashMovement::generic(dec!(-1234), Date::parse("2013-03-31").unwrap()),
/// ]);
///
/// let outcome = XirrSolver::new()
///     .solve(&series, None, None, &XirrOptions::default())
///     .unwrap();
///
/// assert!((outcome.rate().unwrap() - 1.368617).abs() < 1e-5);
/// ```
#[derive(Debug, Clone, Default)]
pub struct XirrSolver {
    config: XirrConfig,
}

impl XirrSolver {
    /// Creates a solver with the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a solver with the given configuration.
    #[must_use]
    pub fn with_config(config: XirrConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &XirrConfig {
        &self.config
    }

    /// Solves `series` for its XIRR.
    ///
    /// * `guess` - starting rate; the configured default guess when `None`
    /// * `method` - strategy to use; naming one disables fallback
    /// * `options` - per-call overrides, layered over the series' own
    ///   options and then the solver configuration
    ///
    /// # Errors
    ///
    /// Returns `XirrError::Validation` for an invalid series only when
    /// `raise_exception` is in effect, and `XirrError::InvalidInput` for an
    /// unusable option. Solver failures, including those caused by a guess
    /// at or below -1, are reported as [`XirrOutcome::Unsolved`].
    pub fn solve(
        &self,
        series: &CashFlowSeries,
        guess: Option<f64>,
        method: Option<SolverMethod>,
        options: &XirrOptions,
    ) -> XirrResult<XirrOutcome> {
        let settings = options.or(series.options()).resolve(&self.config)?;

        let guess = guess.unwrap_or(self.config.default_guess);

        if let Err(invalid) = series.validate() {
            if settings.raise_exception {
                return Err(invalid.into());
            }
            debug!("Skipping XIRR for invalid series: {invalid}");
            return Ok(XirrOutcome::Invalid(invalid));
        }

        let (primary, fallback) = match method {
            Some(method) => (method, None),
            None => {
                let method = self.config.default_method;
                (method, self.config.fallback.then(|| method.other()))
            }
        };

        let compacted = series.compact();
        let terms = DiscountTerms::new(&compacted, settings.period);

        let mut failures = Vec::new();
        for (attempt, method) in std::iter::once(primary).chain(fallback).enumerate() {
            if attempt > 0 {
                info!("Falling back from {primary} to {method}");
            }

            debug!("{method} attempt from guess {guess} over {} terms", terms.len());
            match run_attempt(&terms, method, guess, &settings) {
                Ok(result) => {
                    debug!(
                        "{method} converged to {} in {} iterations",
                        result.root, result.iterations
                    );
                    return Ok(XirrOutcome::Solved(solution(
                        result,
                        method,
                        attempt > 0,
                        settings.precision,
                    )));
                }
                Err(error) => {
                    if error.is_timeout() {
                        warn!("{method} solver {error}");
                    } else {
                        debug!("{method} solver failed: {error}");
                    }
                    failures.push(FailedAttempt { method, error });
                }
            }
        }

        Ok(XirrOutcome::Unsolved(failures))
    }
}

/// Runs one strategy with a fresh deadline.
fn run_attempt(
    terms: &DiscountTerms,
    method: SolverMethod,
    guess: f64,
    settings: &Settings,
) -> MathResult<SolverResult> {
    if terms.is_empty() {
        return Err(MathError::invalid_input(
            "no movements left after compaction",
        ));
    }

    let config = SolverConfig::new(settings.tolerance, settings.iteration_limit)
        .with_lower_bound(-1.0)
        .with_deadline(Deadline::after(settings.timeout));

    method.find_root(
        |rate| terms.npv(rate),
        |rate| terms.derivative(rate),
        guess,
        &config,
    )
}

fn solution(
    result: SolverResult,
    method: SolverMethod,
    fallback_used: bool,
    precision: u32,
) -> XirrSolution {
    XirrSolution {
        rate: round_rate(result.root, precision),
        root: result.root,
        method,
        iterations: result.iterations,
        residual: result.residual,
        fallback_used,
    }
}

/// Rounds half away from zero in decimal.
fn round_rate(rate: f64, precision: u32) -> f64 {
    Decimal::from_f64(rate)
        .map(|d| d.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|d| d.to_f64())
        .unwrap_or(rate)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CashMovement, Date};
    use approx::assert_relative_eq;
    use rust_decimal_macros::dec;

    fn series_a() -> CashFlowSeries {
        CashFlowSeries::from_movements([
            CashMovement::generic(dec!(1000), Date::parse("2013-01-01").unwrap()),
            CashMovement::generic(dec!(-1234), Date::parse("2013-03-31").unwrap()),
        ])
    }

    #[test]
    fn test_round_rate() {
        assert_relative_eq!(round_rate(1.3686172, 6), 1.368617);
        assert_relative_eq!(round_rate(-0.0000004, 6), 0.0);
        assert_relative_eq!(round_rate(0.125, 2), 0.13);
    }

    #[test]
    fn test_default_solve_uses_newton() {
        let outcome = XirrSolver::new()
            .solve(&series_a(), None, None, &XirrOptions::default())
            .unwrap();
        let solution = outcome.solution().unwrap();

        assert_eq!(solution.method, SolverMethod::Newton);
        assert!(!solution.fallback_used);
        assert_relative_eq!(solution.rate, 1.368617, epsilon = 2e-6);
        assert!(solution.residual.abs() < 1e-6);
    }

    #[test]
    fn test_configured_default_method() {
        let solver =
            XirrSolver::with_config(XirrConfig::default().with_default_method(SolverMethod::Bisection));
        let outcome = solver
            .solve(&series_a(), None, None, &XirrOptions::default())
            .unwrap();

        assert_eq!(outcome.solution().unwrap().method, SolverMethod::Bisection);
    }

    #[test]
    fn test_fallback_disabled_by_config() {
        let solver = XirrSolver::with_config(XirrConfig::default().with_fallback(false));
        let outcome = solver
            .solve(&series_a(), Some(100.0), None, &XirrOptions::default())
            .unwrap();

        assert_eq!(outcome.attempts().len(), 1);
        assert_eq!(outcome.attempts()[0].method, SolverMethod::Newton);
    }

    #[test]
    fn test_guess_outside_domain_degrades_to_fallback() {
        let solver = XirrSolver::new();
        let options = XirrOptions::default();

        let outcome = solver.solve(&series_a(), Some(-1.5), None, &options).unwrap();
        let solution = outcome.solution().unwrap();
        assert_eq!(solution.method, SolverMethod::Bisection);
        assert!(solution.fallback_used);
        assert_relative_eq!(solution.rate, 1.368617, epsilon = 2e-6);

        let outcome = solver
            .solve(&series_a(), Some(f64::NAN), Some(SolverMethod::Newton), &options)
            .unwrap();
        match outcome {
            XirrOutcome::Unsolved(attempts) => {
                assert_eq!(attempts.len(), 1);
                assert!(matches!(attempts[0].error, MathError::Diverged { .. }));
            }
            other => panic!("expected Unsolved, got {other:?}"),
        }
    }

    #[test]
    fn test_series_cancelling_to_nothing_is_unsolved() {
        let date = Date::parse("2020-01-01").unwrap();
        let series = CashFlowSeries::from_movements([
            CashMovement::generic(dec!(-100), date),
            CashMovement::generic(dec!(100), date),
        ]);

        let outcome = XirrSolver::new()
            .solve(&series, None, None, &XirrOptions::default())
            .unwrap();

        assert!(matches!(outcome, XirrOutcome::Unsolved(ref attempts) if attempts.len() == 2));
    }
}

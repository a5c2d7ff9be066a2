//! Root-finding algorithms.
//!
//! This module provides the two numerical solvers used for rate solving:
//!
//! - [`newton_raphson`]: Fast quadratic convergence when derivative is available
//! - [`bisection`]: Simple and reliable bracketing method
//! - [`find_bracket`]: Sign-change search that seeds [`bisection`]
//! - [`scan_bracket`]: Grid search for a crossing between same-signed ends
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Newton-Raphson | Fastest (quadratic) | May diverge | Derivative |
//! | Bisection | Slow (linear) | Guaranteed | Bracket |
//!
//! # Bounded Work
//!
//! Every solver stops after [`SolverConfig::max_iterations`] and, when a
//! [`Deadline`] is attached, checks it once at the top of each iteration.
//! A fired deadline surfaces as [`MathError::Timeout`](crate::MathError::Timeout);
//! the partial estimate is discarded.
//!
//! # Example
//!
//! ```rust
//! use xirr_math::solvers::{newton_raphson, SolverConfig};
//!
//! // Zero coupon: 100 paid in 5 years for 62.0921 today
//! let f = |y: f64| 100.0 / (1.0 + y).powi(5) - 62.0921;
//! let df = |y: f64| -5.0 * 100.0 / (1.0 + y).powi(6);
//!
//! let result = newton_raphson(f, df, 0.08, &SolverConfig::default()).unwrap();
//! assert!((result.root - 0.10).abs() < 1e-4);
//! ```

mod bisection;
mod newton;

use std::time::{Duration, Instant};

pub use bisection::{bisection, find_bracket, scan_bracket};
pub use newton::newton_raphson;

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Derivative magnitudes below this are treated as a flat tangent.
pub const MIN_DERIVATIVE: f64 = 1e-15;

/// Default lower end of the bisection search interval for rates.
pub const DEFAULT_BRACKET_LOWER: f64 = -0.99999999;

/// Default upper end of the bisection search interval for rates.
pub const DEFAULT_BRACKET_UPPER: f64 = 9.99999999;

/// Default number of times the bracket search widens the upper bound.
pub const DEFAULT_MAX_EXPANSIONS: u32 = 16;

/// Default number of grid cells scanned when the seeded ends share a sign.
pub const DEFAULT_SCAN_SEGMENTS: u32 = 32;

/// A wall-clock budget for one solver attempt.
///
/// The budget starts counting when the deadline is created.
#[derive(Debug, Clone, Copy)]
pub struct Deadline {
    started: Instant,
    budget: Duration,
}

impl Deadline {
    /// Starts a deadline that expires `budget` from now.
    #[must_use]
    pub fn after(budget: Duration) -> Self {
        Self {
            started: Instant::now(),
            budget,
        }
    }

    /// Time elapsed since the deadline was started.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// The total budget.
    #[must_use]
    pub fn budget(&self) -> Duration {
        self.budget
    }

    /// Returns true once the budget is spent.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.elapsed() >= self.budget
    }

    /// Fails with [`MathError::Timeout`] if the budget is spent.
    pub fn check(&self, iterations: u32) -> MathResult<()> {
        let elapsed = self.elapsed();
        if elapsed >= self.budget {
            return Err(MathError::Timeout {
                iterations,
                elapsed,
            });
        }
        Ok(())
    }
}

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy)]
pub struct SolverConfig {
    /// Absolute tolerance on the function value (and, for bisection, the bracket width).
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
    /// Estimates at or below this value are outside the function's domain.
    pub lower_bound: f64,
    /// Optional wall-clock budget.
    pub deadline: Option<Deadline>,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            lower_bound: f64::NEG_INFINITY,
            deadline: None,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
            ..Self::default()
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    /// Sets the exclusive lower bound of the domain.
    #[must_use]
    pub fn with_lower_bound(mut self, lower_bound: f64) -> Self {
        self.lower_bound = lower_bound;
        self
    }

    /// Attaches a deadline.
    #[must_use]
    pub fn with_deadline(mut self, deadline: Deadline) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Checks the deadline, if any.
    pub(crate) fn check_deadline(&self, iterations: u32) -> MathResult<()> {
        match self.deadline {
            Some(deadline) => deadline.check(iterations),
            None => Ok(()),
        }
    }

    /// Returns true if `x` is usable as an estimate.
    pub(crate) fn in_domain(&self, x: f64) -> bool {
        x.is_finite() && x > self.lower_bound
    }
}

/// Trait for root-finding algorithms.
///
/// Both solvers share one signature so callers can dispatch on a tag;
/// solvers that do not need the derivative ignore it.
///
/// # Example
///
/// ```rust
/// use xirr_math::solvers::{BisectionSolver, NewtonSolver, RootFinder, SolverConfig};
///
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
/// let config = SolverConfig::default().with_tolerance(1e-10);
///
/// let newton = NewtonSolver.find_root(f, df, 1.5, &config).unwrap();
/// let bisect = BisectionSolver::default().find_root(f, df, 1.5, &config).unwrap();
/// assert!((newton.root - bisect.root).abs() < 1e-8);
/// ```
pub trait RootFinder {
    /// Finds a root of `f` starting from `initial_guess`.
    ///
    /// # Arguments
    ///
    /// * `f` - The function for which to find a root
    /// * `df` - The derivative of `f`
    /// * `initial_guess` - Starting point for the search
    /// * `config` - Solver configuration
    fn find_root<F, D>(
        &self,
        f: F,
        df: D,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Newton-Raphson solver implementation.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl RootFinder for NewtonSolver {
    fn find_root<F, D>(
        &self,
        f: F,
        df: D,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        newton_raphson(f, df, initial_guess, config)
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

/// Bisection solver implementation.
///
/// The bracket is seeded at `[min(lower, guess), max(upper, guess + 1)]`
/// and the upper end is widened up to `max_expansions` times until the
/// function changes sign. If it never does, the seeded interval is scanned
/// on a grid of `scan_segments` cells and the crossing nearest the guess
/// is bisected.
#[derive(Debug, Clone, Copy)]
pub struct BisectionSolver {
    /// Lower seed of the bracket search.
    pub lower: f64,
    /// Upper seed of the bracket search.
    pub upper: f64,
    /// Number of widenings allowed before giving up.
    pub max_expansions: u32,
    /// Grid cells for the interior scan.
    pub scan_segments: u32,
}

impl Default for BisectionSolver {
    fn default() -> Self {
        Self {
            lower: DEFAULT_BRACKET_LOWER,
            upper: DEFAULT_BRACKET_UPPER,
            max_expansions: DEFAULT_MAX_EXPANSIONS,
            scan_segments: DEFAULT_SCAN_SEGMENTS,
        }
    }
}

impl RootFinder for BisectionSolver {
    fn find_root<F, D>(
        &self,
        f: F,
        _df: D,
        initial_guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        // A guess outside the domain only widens the upper seed.
        let lower = if config.in_domain(initial_guess) {
            self.lower.min(initial_guess)
        } else {
            self.lower
        };
        let upper = self.upper.max(initial_guess + 1.0);
        let (a, b) = match find_bracket(&f, lower, upper, self.max_expansions, config) {
            Ok(bracket) => bracket,
            Err(MathError::BracketNotFound { .. }) => {
                scan_bracket(&f, lower, upper, initial_guess, self.scan_segments, config)?
            }
            Err(e) => return Err(e),
        };
        bisection(f, a, b, config)
    }

    fn name(&self) -> &'static str {
        "Bisection"
    }
}

/// Result of a root-finding iteration.
#[derive(Debug, Clone, Copy)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Final residual (function value at root).
    pub residual: f64,
}

//! The two solver strategies.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use xirr_math::solvers::{BisectionSolver, NewtonSolver, RootFinder, SolverConfig, SolverResult};
use xirr_math::MathResult;

use crate::error::XirrError;

/// Root-finding strategy used for an XIRR attempt.
///
/// Exactly two strategies exist and [`SolverMethod::other`] pairs them for
/// fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SolverMethod {
    /// Newton-Raphson on the NPV curve. Fast, but can diverge.
    #[default]
    #[serde(alias = "newton_method")]
    Newton,
    /// Bisection over a sign-change bracket. Slow, but converges once bracketed.
    Bisection,
}

impl SolverMethod {
    /// Both strategies, default first.
    pub const ALL: [SolverMethod; 2] = [SolverMethod::Newton, SolverMethod::Bisection];

    /// Returns the fallback partner of this strategy.
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            SolverMethod::Newton => SolverMethod::Bisection,
            SolverMethod::Bisection => SolverMethod::Newton,
        }
    }

    /// Returns the short lowercase name used in configuration and output.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            SolverMethod::Newton => "newton",
            SolverMethod::Bisection => "bisection",
        }
    }

    /// Runs this strategy on `f` with derivative `df`.
    pub fn find_root<F, D>(
        self,
        f: F,
        df: D,
        guess: f64,
        config: &SolverConfig,
    ) -> MathResult<SolverResult>
    where
        F: Fn(f64) -> f64,
        D: Fn(f64) -> f64,
    {
        match self {
            SolverMethod::Newton => NewtonSolver.find_root(f, df, guess, config),
            SolverMethod::Bisection => BisectionSolver::default().find_root(f, df, guess, config),
        }
    }
}

impl fmt::Display for SolverMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.name())
    }
}

impl FromStr for SolverMethod {
    type Err = XirrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace('-', "_").as_str() {
            "newton" | "newton_method" | "newton_raphson" => Ok(SolverMethod::Newton),
            "bisection" | "bisect" => Ok(SolverMethod::Bisection),
            other => Err(XirrError::invalid_input(format!(
                "Unknown solver method: {other}"
            ))),
        }
    }
}

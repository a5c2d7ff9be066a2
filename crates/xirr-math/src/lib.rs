//! # XIRR Math
//!
//! Numerical root finding for the XIRR cash-flow analytics library.
//!
//! This crate provides:
//!
//! - **Solvers**: Newton-Raphson and Bisection root finders
//! - **Bracketing**: Sign-change discovery for bracketing methods
//! - **Deadlines**: Cooperative wall-clock budgets checked once per iteration
//!
//! ## Design Philosophy
//!
//! - **Bounded Work**: Every solver honours an iteration cap and an optional deadline
//! - **Numerical Stability**: Divergence, flat tangents and NaN are reported, never iterated on
//! - **Generic**: Solvers take plain closures over `f64`

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::similar_names)]
#![allow(clippy::many_single_char_names)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]

pub mod error;
pub mod solvers;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::error::{MathError, MathResult};
    pub use crate::solvers::{
        bisection, find_bracket, newton_raphson, BisectionSolver, NewtonSolver, RootFinder,
        SolverConfig, SolverResult,
    };
}

pub use error::{MathError, MathResult};

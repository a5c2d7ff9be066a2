//! # XIRR Core
//!
//! Cash-flow series and extended internal rate of return (XIRR) solving.
//!
//! This crate provides:
//!
//! - **Types**: `Date`, `CashMovement` and `MovementCategory`
//! - **Series**: Sorted cash-flow series with validation, compaction and aggregation
//! - **NPV**: Net present value and its derivative for irregularly dated flows
//! - **Solving**: Newton-Raphson and Bisection with fallback, an iteration cap
//!   and a wall-clock deadline
//!
//! ## Design Philosophy
//!
//! - **Exact Amounts**: Amounts are `Decimal`, so same-date netting is exact
//! - **Explicit Failure**: An unsolved series is an `XirrOutcome`, never a rate of zero
//! - **Bounded Work**: Every solver attempt is capped in iterations and time
//!
//! ## Example
//!
//! ```rust
//! use xirr_core::prelude::*;
//! use rust_decimal_macros::dec;
//!
//! let series = CashFlowSeries::from_movements([
//!     CashMovement::generic(dec!(-10000), Date::parse("2014-01-01").unwrap()),
//!     CashMovement::generic(dec!(2750), Date::parse("2014-03-10").unwrap()),
//!     CashMovement::generic(dec!(4250), Date::parse("2015-10-30").unwrap()),
//!     CashMovement::generic(dec!(3250), Date::parse("2016-02-15").unwrap()),
//!     CashMovement::generic(dec!(2750), Date::parse("2017-04-01").unwrap()),
//! ]);
//!
//! let outcome = series.xirr(None, &XirrOptions::default()).unwrap();
//! assert!((outcome.rate().unwrap() - 0.158955).abs() < 1e-5);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::doc_markdown)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::return_self_not_must_use)]
#![allow(clippy::unreadable_literal)]
#![allow(clippy::uninlined_format_args)]
#![allow(clippy::float_cmp)]

pub mod config;
pub mod error;
pub mod npv;
pub mod series;
pub mod solve;
pub mod types;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::config::{XirrConfig, XirrOptions};
    pub use crate::error::{ValidationError, XirrError, XirrResult};
    pub use crate::npv::{xnpv, DiscountTerms};
    pub use crate::series::{CashFlowSeries, Direction};
    pub use crate::solve::{FailedAttempt, SolverMethod, XirrOutcome, XirrSolution, XirrSolver};
    pub use crate::types::{CashMovement, Date, MovementCategory};
}

pub use error::{ValidationError, XirrError, XirrResult};

//! Domain types for cash-flow analytics.
//!
//! - [`Date`]: Calendar date for day-offset calculations
//! - [`CashMovement`]: Signed, dated amount with an optional category
//! - [`MovementCategory`]: Capital call, distribution, valuation or generic

mod date;
mod movement;

pub use date::Date;
pub use movement::{CashMovement, MovementCategory};

//! Dated cash movement type.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::Date;
use crate::error::XirrError;

/// Category of a cash movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementCategory {
    /// Uncategorised movement
    #[default]
    Generic,
    /// Capital called from an investor
    CapitalCall,
    /// Distribution paid to an investor
    Distribution,
    /// Valuation mark (residual value treated as a terminal flow)
    Valuation,
}

impl fmt::Display for MovementCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            MovementCategory::Generic => "generic",
            MovementCategory::CapitalCall => "capital_call",
            MovementCategory::Distribution => "distribution",
            MovementCategory::Valuation => "valuation",
        };
        write!(f, "{name}")
    }
}

impl FromStr for MovementCategory {
    type Err = XirrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().replace(['-', ' '], "_").as_str() {
            "" | "generic" => Ok(MovementCategory::Generic),
            "capital_call" | "call" => Ok(MovementCategory::CapitalCall),
            "distribution" => Ok(MovementCategory::Distribution),
            "valuation" | "nav" => Ok(MovementCategory::Valuation),
            other => Err(XirrError::invalid_input(format!(
                "Unknown movement category: {other}"
            ))),
        }
    }
}

/// A single dated cash movement.
///
/// The sign of `amount` encodes direction; whether a movement counts as an
/// inflow or an outflow is decided relative to the first movement of the
/// series it belongs to.
///
/// # Example
///
/// ```rust
/// use xirr_core::types::{CashMovement, Date, MovementCategory};
/// use rust_decimal_macros::dec;
///
/// let call = CashMovement::new(
///     dec!(-1000),
///     Date::from_ymd(2013, 1, 1).unwrap(),
///     MovementCategory::CapitalCall,
/// );
/// assert_eq!(call.amount(), dec!(-1000));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CashMovement {
    /// Signed amount
    amount: Decimal,
    /// Value date
    date: Date,
    /// Category tag
    #[serde(default)]
    category: MovementCategory,
}

impl CashMovement {
    /// Creates a new cash movement.
    #[must_use]
    pub fn new(amount: Decimal, date: Date, category: MovementCategory) -> Self {
        Self {
            amount,
            date,
            category,
        }
    }

    /// Creates an uncategorised cash movement.
    #[must_use]
    pub fn generic(amount: Decimal, date: Date) -> Self {
        Self::new(amount, date, MovementCategory::Generic)
    }

    /// Returns the signed amount.
    #[must_use]
    pub fn amount(&self) -> Decimal {
        self.amount
    }

    /// Returns the value date.
    #[must_use]
    pub fn date(&self) -> Date {
        self.date
    }

    /// Returns the category.
    #[must_use]
    pub fn category(&self) -> MovementCategory {
        self.category
    }

    /// Returns true if the amount is exactly zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }
}

impl fmt::Display for CashMovement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} ({})", self.date, self.amount, self.category)
    }
}

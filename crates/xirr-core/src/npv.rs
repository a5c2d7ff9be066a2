//! Net present value of a cash-flow series at an annual rate.
//!
//! `NPV(r) = Σ amount_i / (1 + r)^(days_i / period)`
//!
//! where `days_i` counts from the series' earliest date. The derivative
//! with respect to the rate is
//!
//! `dNPV/dr = Σ amount_i * (-days_i / period) * (1 + r)^(-days_i / period - 1)`
//!
//! Rates at or below -1 are outside the domain; [`DiscountTerms`] returns
//! NaN there and [`xnpv`] rejects them.

use rust_decimal::prelude::*;

use crate::error::{XirrError, XirrResult};
use crate::series::CashFlowSeries;

/// A series flattened to `(periods from start, amount)` pairs.
///
/// Built once per solve so the solvers' inner loops touch only `f64`s.
#[derive(Debug, Clone, PartialEq)]
pub struct DiscountTerms {
    terms: Vec<(f64, f64)>,
}

impl DiscountTerms {
    /// Flattens `series` using `period` days per year.
    #[must_use]
    pub fn new(series: &CashFlowSeries, period: f64) -> Self {
        let terms = match series.min_date() {
            Some(start) => series
                .iter()
                .map(|m| {
                    let periods = start.days_between(&m.date()) as f64 / period;
                    (periods, m.amount().to_f64().unwrap_or(0.0))
                })
                .collect(),
            None => Vec::new(),
        };
        Self { terms }
    }

    /// Number of terms.
    #[must_use]
    pub fn len(&self) -> usize {
        self.terms.len()
    }

    /// Returns true if there are no terms.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    /// Net present value at `rate`.
    #[must_use]
    pub fn npv(&self, rate: f64) -> f64 {
        if rate <= -1.0 {
            return f64::NAN;
        }
        let base = 1.0 + rate;
        self.terms
            .iter()
            .map(|&(t, amount)| amount * base.powf(-t))
            .sum()
    }

    /// First derivative of the net present value with respect to `rate`.
    #[must_use]
    pub fn derivative(&self, rate: f64) -> f64 {
        if rate <= -1.0 {
            return f64::NAN;
        }
        let base = 1.0 + rate;
        self.terms
            .iter()
            .map(|&(t, amount)| -t * amount * base.powf(-t - 1.0))
            .sum()
    }
}

/// Net present value of `series` at `rate`, using `period` days per year.
///
/// # Errors
///
/// Returns `XirrError::InvalidInput` if `rate <= -1` or `period` is not positive.
///
/// # Example
///
/// ```rust
/// use xirr_core::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let series = CashFlowSeries::from_movements([
///     CashMovement::generic(dec!(-100), Date::parse("2020-01-01").unwrap()),
///     CashMovement::generic(dec!(110), Date::parse("2021-01-01").unwrap()),
/// ]);
///
/// // 2020 is a leap year: 366 days on a 366-day period is exactly one year
/// let pv = xnpv(&series, 0.10, 366.0).unwrap();
/// assert!(pv.abs() < 1e-9);
/// ```
pub fn xnpv(series: &CashFlowSeries, rate: f64, period: f64) -> XirrResult<f64> {
    if !(rate.is_finite() && rate > -1.0) {
        return Err(XirrError::invalid_input(format!(
            "Rate {rate} is outside the domain (-1, inf)"
        )));
    }
    if !(period.is_finite() && period > 0.0) {
        return Err(XirrError::invalid_input(format!(
            "Period {period} must be a positive number of days"
        )));
    }
    Ok(DiscountTerms::new(series, period).npv(rate))
}

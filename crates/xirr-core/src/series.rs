//! Date-ordered cash-flow series.
//!
//! [`CashFlowSeries`] keeps its movements sorted ascending by date at all
//! times. Derived series ([`compact`](CashFlowSeries::compact),
//! [`aggregate`](CashFlowSeries::aggregate), [`between`](CashFlowSeries::between))
//! are new, independent values.

use std::collections::BTreeMap;

use rust_decimal::prelude::*;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::config::{XirrOptions, DEFAULT_PERIOD};
use crate::error::{ValidationError, XirrResult};
use crate::solve::{SolverMethod, XirrOutcome, XirrSolver};
use crate::types::{CashMovement, Date, MovementCategory};

/// Sign of the first signed movement of a series.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// The first signed movement is positive.
    Positive,
    /// The first signed movement is negative.
    Negative,
}

impl Direction {
    fn of(amount: Decimal) -> Option<Self> {
        if amount.is_zero() {
            None
        } else if amount.is_sign_positive() {
            Some(Direction::Positive)
        } else {
            Some(Direction::Negative)
        }
    }

    /// Returns true if `amount` carries this direction's sign.
    #[must_use]
    pub fn matches(self, amount: Decimal) -> bool {
        Direction::of(amount) == Some(self)
    }

    /// Returns true if `amount` carries the opposite sign.
    #[must_use]
    pub fn opposes(self, amount: Decimal) -> bool {
        Direction::of(amount).is_some_and(|d| d != self)
    }
}

/// An ordered series of dated cash movements.
///
/// # Example
///
/// ```rust
/// use xirr_core::prelude::*;
/// use rust_decimal_macros::dec;
///
/// let mut series = CashFlowSeries::new();
/// series.push(CashMovement::generic(dec!(-1234), Date::parse("2013-03-31").unwrap()));
/// series.push(CashMovement::generic(dec!(1000), Date::parse("2013-01-01").unwrap()));
///
/// // Always sorted by date
/// assert_eq!(series.first().unwrap().amount(), dec!(1000));
/// assert!(series.is_valid());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CashFlowSeries {
    movements: Vec<CashMovement>,
    options: XirrOptions,
}

impl CashFlowSeries {
    /// Creates a new empty series.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a series from a batch of movements, sorted by date.
    #[must_use]
    pub fn from_movements(movements: impl IntoIterator<Item = CashMovement>) -> Self {
        let mut series = Self::new();
        series.extend(movements);
        series
    }

    /// Sets the day-count denominator used by this series.
    #[must_use]
    pub fn with_period(mut self, period: f64) -> Self {
        self.options.period = Some(period);
        self
    }

    /// Sets series-level solve options.
    #[must_use]
    pub fn with_options(mut self, options: XirrOptions) -> Self {
        self.options = options;
        self
    }

    /// Appends a movement, keeping the series sorted by date.
    ///
    /// Movements on the same date keep their insertion order.
    pub fn push(&mut self, movement: CashMovement) {
        self.movements.push(movement);
        self.sort();
    }

    fn sort(&mut self) {
        self.movements.sort_by_key(CashMovement::date);
    }

    /// Returns the movements as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[CashMovement] {
        &self.movements
    }

    /// Returns the number of movements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.movements.len()
    }

    /// Returns true if there are no movements.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }

    /// Returns an iterator over the movements.
    pub fn iter(&self) -> impl Iterator<Item = &CashMovement> {
        self.movements.iter()
    }

    /// Returns the earliest movement.
    #[must_use]
    pub fn first(&self) -> Option<&CashMovement> {
        self.movements.first()
    }

    /// Returns the earliest date.
    #[must_use]
    pub fn min_date(&self) -> Option<Date> {
        self.movements.first().map(CashMovement::date)
    }

    /// Returns the latest date.
    #[must_use]
    pub fn max_date(&self) -> Option<Date> {
        self.movements.last().map(CashMovement::date)
    }

    /// Returns the series-level options.
    #[must_use]
    pub fn options(&self) -> &XirrOptions {
        &self.options
    }

    /// Returns the series' day-count denominator, if one was set.
    #[must_use]
    pub fn period(&self) -> Option<f64> {
        self.options.period
    }

    // =========================================================================
    // Direction and validity
    // =========================================================================

    /// Sign of the earliest movement with a non-zero amount.
    #[must_use]
    pub fn direction(&self) -> Option<Direction> {
        self.movements.iter().find_map(|m| Direction::of(m.amount()))
    }

    /// Movements sharing the direction's sign.
    pub fn outflows(&self) -> impl Iterator<Item = &CashMovement> {
        let direction = self.direction();
        self.movements
            .iter()
            .filter(move |m| direction.is_some_and(|d| d.matches(m.amount())))
    }

    /// Movements with the sign opposite to the direction.
    pub fn inflows(&self) -> impl Iterator<Item = &CashMovement> {
        let direction = self.direction();
        self.movements
            .iter()
            .filter(move |m| direction.is_some_and(|d| d.opposes(m.amount())))
    }

    /// Checks that the series has at least one inflow and one outflow.
    ///
    /// Leading zero-amount movements are skipped when fixing the direction.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.is_empty() {
            return Err(ValidationError::Empty);
        }
        if self.outflows().next().is_none() {
            return Err(ValidationError::NoOutflow);
        }
        if self.inflows().next().is_none() {
            return Err(ValidationError::NoInflow);
        }
        Ok(())
    }

    /// Returns true if an XIRR can be sought for this series.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.validate().is_ok()
    }

    // =========================================================================
    // Derived series
    // =========================================================================

    /// Merges movements on the same date into one, summing amounts.
    ///
    /// Dates whose amounts sum to zero are dropped. The merged movement keeps
    /// the category when every contributor shares it, otherwise it is
    /// [`MovementCategory::Generic`].
    #[must_use]
    pub fn compact(&self) -> Self {
        let mut by_date: BTreeMap<Date, (Decimal, Option<MovementCategory>)> = BTreeMap::new();

        for m in &self.movements {
            by_date
                .entry(m.date())
                .and_modify(|(sum, category)| {
                    *sum += m.amount();
                    if *category != Some(m.category()) {
                        *category = None;
                    }
                })
                .or_insert((m.amount(), Some(m.category())));
        }

        let movements = by_date
            .into_iter()
            .filter(|(_, (sum, _))| !sum.is_zero())
            .map(|(date, (sum, category))| {
                CashMovement::new(sum, date, category.unwrap_or_default())
            })
            .collect();

        self.derive(movements)
    }

    /// Merges movements sharing both date and category, summing amounts.
    ///
    /// Groups whose amounts sum to zero are dropped.
    #[must_use]
    pub fn aggregate(&self) -> Self {
        let mut groups: BTreeMap<(Date, MovementCategory), Decimal> = BTreeMap::new();

        for m in &self.movements {
            *groups.entry((m.date(), m.category())).or_default() += m.amount();
        }

        let movements = groups
            .into_iter()
            .filter(|(_, sum)| !sum.is_zero())
            .map(|((date, category), sum)| CashMovement::new(sum, date, category))
            .collect();

        self.derive(movements)
    }

    /// Movements dated within `[start, end]`.
    #[must_use]
    pub fn between(&self, start: Date, end: Date) -> Self {
        let movements = self
            .movements
            .iter()
            .filter(|m| m.date() >= start && m.date() <= end)
            .copied()
            .collect();

        self.derive(movements)
    }

    fn derive(&self, movements: Vec<CashMovement>) -> Self {
        Self {
            movements,
            options: self.options,
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Net sum of all amounts.
    #[must_use]
    pub fn sum(&self) -> Decimal {
        self.movements.iter().map(CashMovement::amount).sum()
    }

    /// Multiple on invested capital: `|Σ inflows| / |Σ outflows|`.
    ///
    /// Returns `None` when there is nothing invested.
    #[must_use]
    pub fn multiple(&self) -> Option<Decimal> {
        let inflow: Decimal = self.inflows().map(CashMovement::amount).sum();
        let outflow: Decimal = self.outflows().map(CashMovement::amount).sum();
        inflow.abs().checked_div(outflow.abs())
    }

    /// Span between the first and last movement, in periods.
    #[must_use]
    pub fn periods_of_investment(&self) -> f64 {
        match (self.min_date(), self.max_date()) {
            (Some(start), Some(end)) => {
                start.days_between(&end) as f64 / self.period().unwrap_or(DEFAULT_PERIOD)
            }
            _ => 0.0,
        }
    }

    /// A cheap starting rate: the multiple annualised over the holding span.
    ///
    /// Rounded to three decimal places and kept above -1. Zero when the series
    /// spans no time or the estimate is not finite; `None` when the series is
    /// invalid.
    #[must_use]
    pub fn irr_guess(&self) -> Option<f64> {
        if !self.is_valid() {
            return None;
        }

        let periods = self.periods_of_investment();
        if periods == 0.0 {
            return Some(0.0);
        }

        let multiple = self.multiple().and_then(|m| m.to_f64())?;
        let guess = multiple.powf(1.0 / periods) - 1.0;
        if !guess.is_finite() {
            return Some(0.0);
        }

        // Rounding must not land on -1, which is outside the solvers' domain
        Some(((guess * 1000.0).round() / 1000.0).max(-0.999))
    }

    /// Solves for the XIRR with the default solver configuration.
    ///
    /// Naming a `method` disables fallback for this call.
    pub fn xirr(
        &self,
        method: Option<SolverMethod>,
        options: &XirrOptions,
    ) -> XirrResult<XirrOutcome> {
        XirrSolver::new().solve(self, None, method, options)
    }
}

impl IntoIterator for CashFlowSeries {
    type Item = CashMovement;
    type IntoIter = std::vec::IntoIter<CashMovement>;

    fn into_iter(self) -> Self::IntoIter {
        self.movements.into_iter()
    }
}

impl<'a> IntoIterator for &'a CashFlowSeries {
    type Item = &'a CashMovement;
    type IntoIter = std::slice::Iter<'a, CashMovement>;

    fn into_iter(self) -> Self::IntoIter {
        self.movements.iter()
    }
}

impl FromIterator<CashMovement> for CashFlowSeries {
    fn from_iter<I: IntoIterator<Item = CashMovement>>(iter: I) -> Self {
        Self::from_movements(iter)
    }
}

impl Extend<CashMovement> for CashFlowSeries {
    fn extend<I: IntoIterator<Item = CashMovement>>(&mut self, iter: I) {
        self.movements.extend(iter);
        self.sort();
    }
}

//! Property-based tests for series and solver invariants.
//!
//! - Two-point investments solve to an isolated root
//! - Compaction is idempotent and nets each date exactly
//! - Validity depends only on signs relative to the first movement

use proptest::prelude::*;
use rust_decimal::Decimal;
use xirr_core::prelude::*;

// =============================================================================
// GENERATORS
// =============================================================================

fn base_date() -> Date {
    Date::from_ymd(2015, 1, 1).unwrap()
}

/// Amounts in cents, so every generated value is exact in `Decimal`.
fn amount() -> impl Strategy<Value = Decimal> {
    (-500_000i64..500_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn movements(max_len: usize) -> impl Strategy<Value = Vec<CashMovement>> {
    prop::collection::vec((amount(), 0i64..60, 0usize..4), 0..max_len).prop_map(|rows| {
        let categories = [
            MovementCategory::Generic,
            MovementCategory::CapitalCall,
            MovementCategory::Distribution,
            MovementCategory::Valuation,
        ];
        rows.into_iter()
            .map(|(amount, offset, category)| {
                CashMovement::new(amount, base_date().add_days(offset), categories[category])
            })
            .collect()
    })
}

// =============================================================================
// PROPERTIES
// =============================================================================

proptest! {
    #[test]
    fn two_point_investment_solves(
        invested in 100i64..1_000_000,
        ratio in 0.5f64..3.0,
        days in 90i64..3650,
    ) {
        let returned = Decimal::from((invested as f64 * ratio).round() as i64);
        let series = CashFlowSeries::from_movements([
            CashMovement::generic(Decimal::from(-invested), base_date()),
            CashMovement::generic(returned, base_date().add_days(days)),
        ]);

        let outcome = XirrSolver::new()
            .solve(&series, None, None, &XirrOptions::default())
            .unwrap();
        let solution = outcome.solution().unwrap();

        prop_assert!(solution.root > -1.0);
        // Bisection may stop on bracket width instead of residual
        if solution.method == SolverMethod::Newton {
            let residual = xnpv(&series, solution.root, 365.0).unwrap();
            prop_assert!(residual.abs() < 1e-6, "residual {residual} at {}", solution.root);
        }

        // NPV changes sign across the root, so the root is isolated
        let below = xnpv(&series, solution.root - 1e-3, 365.0).unwrap();
        let above = xnpv(&series, solution.root + 1e-3, 365.0).unwrap();
        prop_assert!(below.signum() != above.signum());
    }

    #[test]
    fn compaction_is_idempotent(movements in movements(24)) {
        let once = CashFlowSeries::from_movements(movements).compact();
        let twice = once.compact();
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn compaction_nets_each_date(movements in movements(24)) {
        let series = CashFlowSeries::from_movements(movements);
        let compacted = series.compact();

        prop_assert_eq!(compacted.sum(), series.sum());

        let mut seen = Vec::new();
        for movement in &compacted {
            prop_assert!(!movement.is_zero());
            prop_assert!(!seen.contains(&movement.date()));
            seen.push(movement.date());

            let expected: Decimal = series
                .iter()
                .filter(|m| m.date() == movement.date())
                .map(CashMovement::amount)
                .sum();
            prop_assert_eq!(movement.amount(), expected);
        }
    }

    #[test]
    fn aggregation_nets_each_date_and_category(movements in movements(24)) {
        let series = CashFlowSeries::from_movements(movements);
        let aggregated = series.aggregate();

        prop_assert_eq!(aggregated.sum(), series.sum());
        prop_assert!(aggregated.len() >= series.compact().len());
        for movement in &aggregated {
            let expected: Decimal = series
                .iter()
                .filter(|m| m.date() == movement.date() && m.category() == movement.category())
                .map(CashMovement::amount)
                .sum();
            prop_assert_eq!(movement.amount(), expected);
        }
    }

    #[test]
    fn series_stays_sorted(movements in movements(24)) {
        let mut series = CashFlowSeries::new();
        for movement in movements {
            series.push(movement);
        }
        let dates: Vec<Date> = series.iter().map(CashMovement::date).collect();
        prop_assert!(dates.windows(2).all(|w| w[0] <= w[1]));
    }

    #[test]
    fn validity_is_sign_symmetric(movements in movements(12)) {
        let series = CashFlowSeries::from_movements(movements);
        let negated: CashFlowSeries = series
            .iter()
            .map(|m| CashMovement::new(-m.amount(), m.date(), m.category()))
            .collect();

        prop_assert_eq!(series.validate(), negated.validate());
    }
}

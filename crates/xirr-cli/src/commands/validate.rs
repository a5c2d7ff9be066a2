//! Validate command implementation.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use xirr_core::prelude::*;

use crate::cli::OutputFormat;
use crate::input::read_series;
use crate::output::{print_error, print_header, print_output, print_single, print_success, KeyValue};

/// Arguments for the validate command.
#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// CSV file of date,amount[,category] rows (stdin if omitted or "-")
    pub file: Option<PathBuf>,
}

/// Shape and validity of a series.
#[derive(Debug, Serialize)]
pub struct ValidationReport {
    pub valid: bool,
    pub reason: Option<String>,
    pub direction: Option<Direction>,
    pub movements: usize,
    pub outflows: usize,
    pub inflows: usize,
    pub first_date: Option<Date>,
    pub last_date: Option<Date>,
    pub net: String,
    pub multiple: Option<String>,
}

impl ValidationReport {
    fn new(series: &CashFlowSeries) -> Self {
        let validation = series.validate();
        Self {
            valid: validation.is_ok(),
            reason: validation.err().map(|e| e.to_string()),
            direction: series.direction(),
            movements: series.len(),
            outflows: series.outflows().count(),
            inflows: series.inflows().count(),
            first_date: series.min_date(),
            last_date: series.max_date(),
            net: series.sum().normalize().to_string(),
            multiple: series.multiple().map(|m| m.round_dp(4).normalize().to_string()),
        }
    }

    fn rows(&self) -> Vec<KeyValue> {
        let or_dash = |value: Option<String>| value.unwrap_or_else(|| "-".to_string());

        vec![
            KeyValue::new("Valid", self.valid.to_string()),
            KeyValue::new("Reason", or_dash(self.reason.clone())),
            KeyValue::new(
                "Direction",
                or_dash(self.direction.map(|d| format!("{d:?}").to_lowercase())),
            ),
            KeyValue::new("Movements", self.movements.to_string()),
            KeyValue::new("Outflows", self.outflows.to_string()),
            KeyValue::new("Inflows", self.inflows.to_string()),
            KeyValue::new("First Date", or_dash(self.first_date.map(|d| d.to_string()))),
            KeyValue::new("Last Date", or_dash(self.last_date.map(|d| d.to_string()))),
            KeyValue::new("Net", self.net.clone()),
            KeyValue::new("Multiple", or_dash(self.multiple.clone())),
        ]
    }
}

/// Execute the validate command.
pub fn execute(args: ValidateArgs, format: OutputFormat, quiet: bool) -> Result<ExitCode> {
    let series = read_series(args.file.as_deref())?;
    let report = ValidationReport::new(&series);

    match format {
        OutputFormat::Table => {
            if !quiet {
                print_header("Series Validation");
            }
            print_output(&report.rows(), format)?;
        }
        OutputFormat::Json | OutputFormat::Csv => print_single(&report, format)?,
        OutputFormat::Minimal => match &report.reason {
            None => print_success("valid"),
            Some(reason) => print_error(reason),
        },
    }

    Ok(if report.valid {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_report_counts_sides() {
        let date = |s: &str| Date::parse(s).unwrap();
        let series = CashFlowSeries::from_movements([
            CashMovement::generic(dec!(-100), date("2020-01-01")),
            CashMovement::generic(dec!(-50), date("2020-02-01")),
            CashMovement::generic(dec!(0), date("2020-03-01")),
            CashMovement::generic(dec!(200), date("2021-01-01")),
        ]);
        let report = ValidationReport::new(&series);

        assert!(report.valid);
        assert_eq!(report.direction, Some(Direction::Negative));
        assert_eq!((report.outflows, report.inflows), (2, 1));
        assert_eq!(report.net, "50");
        assert_eq!(report.rows().len(), 10);
    }

    #[test]
    fn test_report_for_one_sided_series() {
        let series = CashFlowSeries::from_movements([CashMovement::generic(
            dec!(10),
            Date::parse("2020-01-01").unwrap(),
        )]);
        let report = ValidationReport::new(&series);

        assert!(!report.valid);
        assert!(report.reason.unwrap().contains("No inflow"));
    }
}

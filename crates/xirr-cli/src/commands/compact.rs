//! Compact command implementation.
//!
//! Prints the netted series; CSV output can be fed back into `solve`.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use tabled::Tabled;
use xirr_core::prelude::*;

use crate::cli::OutputFormat;
use crate::input::read_series;
use crate::output::print_output;

/// Arguments for the compact command.
#[derive(Args, Debug)]
pub struct CompactArgs {
    /// CSV file of date,amount[,category] rows (stdin if omitted or "-")
    pub file: Option<PathBuf>,

    /// Net by date and category instead of by date alone
    #[arg(long)]
    pub aggregate: bool,

    /// Keep only movements on or after this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub from: Option<Date>,

    /// Keep only movements on or before this date (YYYY-MM-DD)
    #[arg(long, value_parser = parse_date)]
    pub to: Option<Date>,
}

fn parse_date(s: &str) -> Result<Date, String> {
    Date::parse(s).map_err(|e| e.to_string())
}

/// One output row.
#[derive(Debug, Serialize, Tabled)]
pub struct MovementRow {
    #[tabled(rename = "Date")]
    pub date: String,
    #[tabled(rename = "Amount")]
    pub amount: String,
    #[tabled(rename = "Category")]
    pub category: String,
}

impl From<&CashMovement> for MovementRow {
    fn from(movement: &CashMovement) -> Self {
        Self {
            date: movement.date().to_string(),
            amount: movement.amount().normalize().to_string(),
            category: movement.category().to_string(),
        }
    }
}

/// Execute the compact command.
pub fn execute(args: CompactArgs, format: OutputFormat) -> Result<ExitCode> {
    let mut series = read_series(args.file.as_deref())?;

    if args.from.is_some() || args.to.is_some() {
        let start = args.from.or(series.min_date());
        let end = args.to.or(series.max_date());
        if let (Some(start), Some(end)) = (start, end) {
            series = series.between(start, end);
        }
    }

    let before = series.len();
    let netted = if args.aggregate {
        series.aggregate()
    } else {
        series.compact()
    };
    log::info!("Netted {} movements into {}", before, netted.len());

    let rows: Vec<MovementRow> = netted.iter().map(MovementRow::from).collect();
    match format {
        OutputFormat::Minimal => println!("{}", rows.len()),
        _ => print_output(&rows, format)?,
    }

    Ok(ExitCode::SUCCESS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_row_formatting() {
        let movement = CashMovement::new(
            dec!(-1500.00),
            Date::parse("2020-01-31").unwrap(),
            MovementCategory::CapitalCall,
        );
        let row = MovementRow::from(&movement);

        assert_eq!(row.date, "2020-01-31");
        assert_eq!(row.amount, "-1500");
        assert_eq!(row.category, "capital_call");
    }
}

//! CSV input of cash movements.
//!
//! Expects a header row followed by `date,amount[,category]` rows. Dates are
//! `YYYY-MM-DD`; amounts are parsed exactly as decimals. Lines starting with
//! `#` are ignored.

use std::fs::File;
use std::io::{self, Read};
use std::path::Path;
use std::str::FromStr;

use csv::{ReaderBuilder, StringRecord, Trim};
use rust_decimal::Decimal;
use xirr_core::prelude::*;

use crate::error::{CliError, CliResult};

/// Reads a series from `path`, or from stdin when `path` is `None` or `-`.
pub fn read_series(path: Option<&Path>) -> CliResult<CashFlowSeries> {
    match path {
        Some(path) if path != Path::new("-") => {
            log::debug!("Reading cash flows from {}", path.display());
            parse_series(File::open(path)?)
        }
        _ => {
            log::debug!("Reading cash flows from stdin");
            parse_series(io::stdin().lock())
        }
    }
}

/// Parses CSV rows into a series.
pub fn parse_series<R: Read>(reader: R) -> CliResult<CashFlowSeries> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut movements = Vec::new();
    for record in reader.records() {
        let record = record?;
        if record.iter().all(str::is_empty) {
            continue;
        }
        movements.push(parse_record(&record)?);
    }

    // One sort for the whole file.
    let series = CashFlowSeries::from_movements(movements);
    log::info!("Read {} movements", series.len());
    Ok(series)
}

fn parse_record(record: &StringRecord) -> CliResult<CashMovement> {
    let line = record.position().map_or(0, csv::Position::line);
    let invalid = |reason: String| CliError::InvalidRecord { line, reason };

    let date = record
        .get(0)
        .ok_or_else(|| invalid("missing date".to_string()))?;
    let date = Date::parse(date).map_err(|e| invalid(e.to_string()))?;

    let amount = record
        .get(1)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| invalid("missing amount".to_string()))?;
    let amount = Decimal::from_str(amount)
        .or_else(|_| Decimal::from_scientific(amount))
        .map_err(|_| invalid(format!("cannot parse amount '{amount}'")))?;

    let category = match record.get(2) {
        Some(category) => MovementCategory::from_str(category).map_err(|e| invalid(e.to_string()))?,
        None => MovementCategory::Generic,
    };

    Ok(CashMovement::new(amount, date, category))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_rows() {
        let csv = "\
date,amount,category
2013-03-31,-1234,distribution
# opening call
2013-01-01, 1000 ,capital_call
";
        let series = parse_series(csv.as_bytes()).unwrap();

        assert_eq!(series.len(), 2);
        let first = series.first().unwrap();
        assert_eq!(first.date(), Date::from_ymd(2013, 1, 1).unwrap());
        assert_eq!(first.amount(), dec!(1000));
        assert_eq!(first.category(), MovementCategory::CapitalCall);
    }

    #[test]
    fn test_category_column_is_optional() {
        let csv = "date,amount\n2020-01-01,-1.5e3\n2021-01-01,1600.25\n";
        let series = parse_series(csv.as_bytes()).unwrap();

        assert_eq!(series.sum(), dec!(100.25));
        assert!(series
            .iter()
            .all(|m| m.category() == MovementCategory::Generic));
    }

    #[test]
    fn test_bad_amount_names_line() {
        let csv = "date,amount\n2020-01-01,-100\n2021-01-01,lots\n";
        let err = parse_series(csv.as_bytes()).unwrap_err();

        assert!(matches!(err, CliError::InvalidRecord { line: 3, .. }));
        assert!(err.to_string().contains("lots"));
    }

    #[test]
    fn test_rows_sorted_once_keeping_same_date_order() {
        let mut csv = String::from("date,amount\n");
        for day in (1..=28).rev() {
            csv.push_str(&format!("2020-02-{day:02},{day}\n"));
        }
        csv.push_str("2020-02-01,-500\n");

        let series = parse_series(csv.as_bytes()).unwrap();

        assert_eq!(series.len(), 29);
        let amounts: Vec<Decimal> = series.iter().take(3).map(CashMovement::amount).collect();
        assert_eq!(amounts, vec![dec!(1), dec!(-500), dec!(2)]);
        assert!(series
            .as_slice()
            .windows(2)
            .all(|w| w[0].date() <= w[1].date()));
    }

    #[test]
    fn test_bad_date() {
        let csv = "date,amount\n2020-02-30,-100\n";
        assert!(matches!(
            parse_series(csv.as_bytes()),
            Err(CliError::InvalidRecord { .. })
        ));
    }
}

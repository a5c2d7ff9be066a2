//! Solve command implementation.
//!
//! Reads a cash-flow series and solves it for its XIRR.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::Args;
use serde::Serialize;
use xirr_core::prelude::*;

use crate::cli::OutputFormat;
use crate::commands::load_config;
use crate::input::read_series;
use crate::output::{format_percent, print_header, print_output, print_single, print_warning, KeyValue};

/// Arguments for the solve command.
#[derive(Args, Debug)]
pub struct SolveArgs {
    /// CSV file of date,amount[,category] rows (stdin if omitted or "-")
    pub file: Option<PathBuf>,

    /// Solver to use; naming one disables fallback
    #[arg(short, long, value_parser = parse_method)]
    pub method: Option<SolverMethod>,

    /// Starting rate (e.g. 0.1 for 10%)
    #[arg(short, long, allow_negative_numbers = true, conflicts_with = "auto_guess")]
    pub guess: Option<f64>,

    /// Derive the starting rate from the series' multiple and duration
    #[arg(long)]
    pub auto_guess: bool,

    /// Days per year used to annualise day offsets
    #[arg(long)]
    pub period: Option<f64>,

    /// Iteration cap for each solver attempt
    #[arg(long)]
    pub iteration_limit: Option<u32>,

    /// Absolute tolerance on |NPV(rate)|
    #[arg(long)]
    pub tolerance: Option<f64>,

    /// Wall-clock budget for each solver attempt, in milliseconds
    #[arg(long)]
    pub timeout_ms: Option<u64>,

    /// Decimal places the rate is rounded to
    #[arg(long)]
    pub precision: Option<u32>,

    /// Fail with an error if the series has no inflow or no outflow
    #[arg(long)]
    pub strict: bool,

    /// Solver configuration file (TOML, or JSON by extension)
    #[arg(short, long, env = "XIRR_CONFIG")]
    pub config: Option<PathBuf>,
}

impl SolveArgs {
    fn options(&self) -> XirrOptions {
        XirrOptions {
            raise_exception: self.strict.then_some(true),
            iteration_limit: self.iteration_limit,
            period: self.period,
            tolerance: self.tolerance,
            timeout_ms: self.timeout_ms,
            precision: self.precision,
        }
    }
}

fn parse_method(s: &str) -> Result<SolverMethod, String> {
    s.parse().map_err(|e: XirrError| e.to_string())
}

/// Flat summary of an outcome, shared by every output format.
#[derive(Debug, Serialize)]
pub struct SolveReport {
    pub status: &'static str,
    pub rate: Option<f64>,
    pub root: Option<f64>,
    pub method: Option<SolverMethod>,
    pub iterations: Option<u32>,
    pub residual: Option<f64>,
    pub fallback_used: Option<bool>,
    pub movements: usize,
    pub reason: Option<String>,
}

impl SolveReport {
    fn new(outcome: &XirrOutcome, movements: usize) -> Self {
        let mut report = Self {
            status: "solved",
            rate: None,
            root: None,
            method: None,
            iterations: None,
            residual: None,
            fallback_used: None,
            movements,
            reason: None,
        };

        match outcome {
            XirrOutcome::Solved(solution) => {
                report.rate = Some(solution.rate);
                report.root = Some(solution.root);
                report.method = Some(solution.method);
                report.iterations = Some(solution.iterations);
                report.residual = Some(solution.residual);
                report.fallback_used = Some(solution.fallback_used);
            }
            XirrOutcome::Invalid(invalid) => {
                report.status = "invalid";
                report.reason = Some(invalid.to_string());
            }
            XirrOutcome::Unsolved(attempts) => {
                report.status = "unsolved";
                report.reason = Some(
                    attempts
                        .iter()
                        .map(|a| format!("{}: {}", a.method, a.error))
                        .collect::<Vec<_>>()
                        .join("; "),
                );
            }
        }

        report
    }

    fn rows(&self, precision: u32) -> Vec<KeyValue> {
        let mut rows = vec![KeyValue::new("Status", self.status)];

        if let Some(rate) = self.rate {
            rows.push(KeyValue::new("XIRR", format_percent(rate, precision)));
            rows.push(KeyValue::new("Rate", rate.to_string()));
        }
        if let Some(method) = self.method {
            rows.push(KeyValue::new("Method", method.to_string()));
        }
        if let Some(iterations) = self.iterations {
            rows.push(KeyValue::new("Iterations", iterations.to_string()));
        }
        if let Some(residual) = self.residual {
            rows.push(KeyValue::new("Residual", format!("{residual:.3e}")));
        }
        if let Some(fallback) = self.fallback_used {
            rows.push(KeyValue::new("Fallback", fallback.to_string()));
        }
        rows.push(KeyValue::new("Movements", self.movements.to_string()));
        if let Some(reason) = &self.reason {
            rows.push(KeyValue::new("Reason", reason.clone()));
        }

        rows
    }
}

/// Execute the solve command.
pub fn execute(args: SolveArgs, format: OutputFormat, quiet: bool) -> Result<ExitCode> {
    let config = load_config(args.config.as_deref())?;
    let series = read_series(args.file.as_deref())?;
    let options = args.options();

    let guess = if args.auto_guess {
        let guess = series.irr_guess();
        log::info!("Auto guess: {guess:?}");
        guess
    } else {
        args.guess
    };

    let precision = options.precision.unwrap_or(config.precision);
    let sentinel = config.replace_for_nil;
    let solver = XirrSolver::with_config(config);
    let outcome = solver.solve(&series, guess, args.method, &options)?;
    let report = SolveReport::new(&outcome, series.len());

    match format {
        OutputFormat::Table => {
            if !quiet {
                print_header("XIRR");
            }
            print_output(&report.rows(precision), format)?;
            if !quiet {
                if let Some(solution) = outcome.solution().filter(|s| s.fallback_used) {
                    print_warning(&format!(
                        "{} failed; solved with {}",
                        solution.method.other(),
                        solution.method
                    ));
                }
            }
        }
        OutputFormat::Json | OutputFormat::Csv => print_single(&report, format)?,
        OutputFormat::Minimal => println!("{}", outcome.rate_or_sentinel(sentinel)),
    }

    Ok(if outcome.is_solved() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

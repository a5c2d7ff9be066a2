//! XIRR CLI - Command-line interface for cash-flow return analytics.
//!
//! # Usage
//!
//! ```bash
//! # Solve a CSV of date,amount[,category] rows
//! xirr solve flows.csv
//!
//! # Force bisection and print only the rate
//! xirr solve flows.csv --method bisection --format minimal
//!
//! # Check a series before solving
//! xirr validate flows.csv
//!
//! # Net same-date movements
//! cat flows.csv | xirr compact
//! ```

use std::process::ExitCode;

use anyhow::Result;
use clap::Parser;

mod cli;
mod commands;
mod error;
mod input;
mod output;

use cli::{Cli, Commands};

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(cli.log_level()),
    )
    .init();

    let format = cli.format;

    let code = match cli.command {
        Commands::Solve(args) => commands::solve::execute(args, format, cli.quiet)?,
        Commands::Validate(args) => commands::validate::execute(args, format, cli.quiet)?,
        Commands::Compact(args) => commands::compact::execute(args, format)?,
    };

    Ok(code)
}

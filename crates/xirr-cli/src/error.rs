//! CLI error types.

use thiserror::Error;
use xirr_core::XirrError;

/// CLI error type.
#[derive(Debug, Error)]
pub enum CliError {
    /// A CSV row could not be turned into a cash movement.
    #[error("Invalid record on line {line}: {reason}")]
    InvalidRecord {
        /// 1-based line number in the input.
        line: u64,
        /// What is wrong with the row.
        reason: String,
    },

    /// Configuration file could not be read or parsed.
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV error.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Library error.
    #[error(transparent)]
    Xirr(#[from] XirrError),
}

/// CLI result type.
pub type CliResult<T> = Result<T, CliError>;

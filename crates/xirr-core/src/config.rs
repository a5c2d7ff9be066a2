//! Solver configuration and per-call options.
//!
//! [`XirrConfig`] holds the library-wide defaults and can be loaded from TOML
//! or JSON. [`XirrOptions`] carries optional per-call (or per-series)
//! overrides; unset fields fall through to the next layer:
//! call options, then series options, then configuration.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{XirrError, XirrResult};
use crate::solve::SolverMethod;

// =============================================================================
// DEFAULTS
// =============================================================================

/// Default absolute tolerance on `|NPV(rate)|`.
pub const DEFAULT_TOLERANCE: f64 = 1e-6;

/// Default day-count denominator used to annualise day offsets.
pub const DEFAULT_PERIOD: f64 = 365.0;

/// Default iteration cap for each solver attempt.
pub const DEFAULT_ITERATION_LIMIT: u32 = 100;

/// Default wall-clock budget for each solver attempt, in milliseconds.
pub const DEFAULT_TIMEOUT_MS: u64 = 2500;

/// Default number of decimal places a solved rate is rounded to.
pub const DEFAULT_PRECISION: u32 = 6;

/// Default starting rate.
pub const DEFAULT_GUESS: f64 = 0.08;

fn default_tolerance() -> f64 {
    DEFAULT_TOLERANCE
}

fn default_period() -> f64 {
    DEFAULT_PERIOD
}

fn default_iteration_limit() -> u32 {
    DEFAULT_ITERATION_LIMIT
}

fn default_timeout_ms() -> u64 {
    DEFAULT_TIMEOUT_MS
}

fn default_fallback() -> bool {
    true
}

fn default_precision() -> u32 {
    DEFAULT_PRECISION
}

fn default_guess() -> f64 {
    DEFAULT_GUESS
}

// =============================================================================
// XIRR CONFIGURATION
// =============================================================================

/// Library-wide solver configuration.
///
/// Every field has a serde default, so an empty document yields
/// [`XirrConfig::default`].
///
/// # Example
///
/// ```rust
/// use xirr_core::config::XirrConfig;
/// use xirr_core::solve::SolverMethod;
///
/// let config = XirrConfig::from_toml_str(r#"
///     default_method = "bisection"
///     iteration_limit = 200
/// "#).unwrap();
///
/// assert_eq!(config.default_method, SolverMethod::Bisection);
/// assert_eq!(config.iteration_limit, 200);
/// assert!(config.fallback);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XirrConfig {
    /// Absolute tolerance on `|NPV(rate)|` (and on the bisection bracket width).
    #[serde(default = "default_tolerance")]
    pub tolerance: f64,

    /// Day-count denominator for annualisation.
    #[serde(default = "default_period")]
    pub period: f64,

    /// Iteration cap for each solver attempt.
    #[serde(default = "default_iteration_limit")]
    pub iteration_limit: u32,

    /// Wall-clock budget for each solver attempt, in milliseconds.
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Whether a failed default-method attempt is retried with the other method.
    #[serde(default = "default_fallback")]
    pub fallback: bool,

    /// Solver used when the caller does not name one.
    #[serde(default)]
    pub default_method: SolverMethod,

    /// Whether an invalid series is returned as an error instead of an outcome.
    #[serde(default)]
    pub raise_exception: bool,

    /// Decimal places a solved rate is rounded to.
    #[serde(default = "default_precision")]
    pub precision: u32,

    /// Starting rate when the caller gives none.
    #[serde(default = "default_guess")]
    pub default_guess: f64,

    /// Value reported by [`XirrOutcome::rate_or_sentinel`](crate::solve::XirrOutcome::rate_or_sentinel)
    /// callers that want a number for every outcome.
    #[serde(default)]
    pub replace_for_nil: f64,
}

impl Default for XirrConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            period: DEFAULT_PERIOD,
            iteration_limit: DEFAULT_ITERATION_LIMIT,
            timeout_ms: DEFAULT_TIMEOUT_MS,
            fallback: true,
            default_method: SolverMethod::default(),
            raise_exception: false,
            precision: DEFAULT_PRECISION,
            default_guess: DEFAULT_GUESS,
            replace_for_nil: 0.0,
        }
    }
}

impl XirrConfig {
    /// Parses and validates a TOML document.
    pub fn from_toml_str(s: &str) -> XirrResult<Self> {
        let config: Self = toml::from_str(s).map_err(|e| XirrError::config(e.to_string()))?;
        config.validated()
    }

    /// Parses and validates a JSON document.
    pub fn from_json_str(s: &str) -> XirrResult<Self> {
        let config: Self = serde_json::from_str(s).map_err(|e| XirrError::config(e.to_string()))?;
        config.validated()
    }

    /// Returns the per-attempt wall-clock budget.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Sets the per-attempt wall-clock budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX);
        self
    }

    /// Sets the default solver method.
    #[must_use]
    pub fn with_default_method(mut self, method: SolverMethod) -> Self {
        self.default_method = method;
        self
    }

    /// Enables or disables fallback to the other solver.
    #[must_use]
    pub fn with_fallback(mut self, fallback: bool) -> Self {
        self.fallback = fallback;
        self
    }

    /// Returns every rule the configuration breaks.
    #[must_use]
    pub fn validate(&self) -> Vec<ConfigIssue> {
        let mut issues = Vec::new();

        if !(self.tolerance > 0.0 && self.tolerance <= 1e-2) {
            issues.push(ConfigIssue::new(
                "tolerance",
                "Tolerance must be between 0 and 1e-2",
            ));
        }

        if let Some(message) = check_period(self.period) {
            issues.push(ConfigIssue::new("period", message));
        }

        if self.iteration_limit == 0 || self.iteration_limit > 10_000 {
            issues.push(ConfigIssue::new(
                "iteration_limit",
                "Iteration limit must be between 1 and 10000",
            ));
        }

        if self.precision > 15 {
            issues.push(ConfigIssue::new(
                "precision",
                format!("Precision {} exceeds maximum of 15", self.precision),
            ));
        }

        if !(self.default_guess.is_finite() && self.default_guess > -1.0) {
            issues.push(ConfigIssue::new(
                "default_guess",
                "Default guess must be a finite rate above -1",
            ));
        }

        if !self.replace_for_nil.is_finite() {
            issues.push(ConfigIssue::new(
                "replace_for_nil",
                "Replacement value must be finite",
            ));
        }

        issues
    }

    fn validated(self) -> XirrResult<Self> {
        let issues = self.validate();
        if issues.is_empty() {
            return Ok(self);
        }
        let joined = issues
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        Err(XirrError::config(joined))
    }
}

fn check_period(period: f64) -> Option<&'static str> {
    if period.is_finite() && period > 0.0 {
        None
    } else {
        Some("Period must be a positive number of days")
    }
}

/// A single configuration rule violation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConfigIssue {
    /// Field that failed validation.
    pub field: String,
    /// What is wrong with it.
    pub message: String,
}

impl ConfigIssue {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl fmt::Display for ConfigIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

// =============================================================================
// PER-CALL OPTIONS
// =============================================================================

/// Optional overrides for a single solve or for every solve on a series.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct XirrOptions {
    /// Return an error instead of an outcome when the series is invalid.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raise_exception: Option<bool>,
    /// Iteration cap for each solver attempt.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iteration_limit: Option<u32>,
    /// Day-count denominator.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub period: Option<f64>,
    /// Absolute tolerance on `|NPV(rate)|`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tolerance: Option<f64>,
    /// Wall-clock budget for each solver attempt, in milliseconds.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timeout_ms: Option<u64>,
    /// Decimal places a solved rate is rounded to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision: Option<u32>,
}

impl XirrOptions {
    /// Creates empty options (everything inherited).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the invalid-series policy.
    #[must_use]
    pub fn with_raise_exception(mut self, raise: bool) -> Self {
        self.raise_exception = Some(raise);
        self
    }

    /// Sets the iteration cap.
    #[must_use]
    pub fn with_iteration_limit(mut self, limit: u32) -> Self {
        self.iteration_limit = Some(limit);
        self
    }

    /// Sets the day-count denominator.
    #[must_use]
    pub fn with_period(mut self, period: f64) -> Self {
        self.period = Some(period);
        self
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = Some(tolerance);
        self
    }

    /// Sets the wall-clock budget.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    /// Sets the rounding precision.
    #[must_use]
    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = Some(precision);
        self
    }

    /// Fills every unset field from `fallback`.
    #[must_use]
    pub fn or(self, fallback: &XirrOptions) -> Self {
        Self {
            raise_exception: self.raise_exception.or(fallback.raise_exception),
            iteration_limit: self.iteration_limit.or(fallback.iteration_limit),
            period: self.period.or(fallback.period),
            tolerance: self.tolerance.or(fallback.tolerance),
            timeout_ms: self.timeout_ms.or(fallback.timeout_ms),
            precision: self.precision.or(fallback.precision),
        }
    }

    /// Resolves every field against `config`, rejecting unusable values.
    pub(crate) fn resolve(&self, config: &XirrConfig) -> XirrResult<Settings> {
        let settings = Settings {
            raise_exception: self.raise_exception.unwrap_or(config.raise_exception),
            iteration_limit: self.iteration_limit.unwrap_or(config.iteration_limit),
            period: self.period.unwrap_or(config.period),
            tolerance: self.tolerance.unwrap_or(config.tolerance),
            timeout: Duration::from_millis(self.timeout_ms.unwrap_or(config.timeout_ms)),
            precision: self.precision.unwrap_or(config.precision),
        };

        if let Some(message) = check_period(settings.period) {
            return Err(XirrError::invalid_input(message));
        }
        if !(settings.tolerance.is_finite() && settings.tolerance > 0.0) {
            return Err(XirrError::invalid_input("Tolerance must be positive"));
        }
        if settings.iteration_limit == 0 {
            return Err(XirrError::invalid_input("Iteration limit must be at least 1"));
        }

        Ok(settings)
    }
}

/// Fully resolved options for one solve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Settings {
    pub raise_exception: bool,
    pub iteration_limit: u32,
    pub period: f64,
    pub tolerance: f64,
    pub timeout: Duration,
    pub precision: u32,
}

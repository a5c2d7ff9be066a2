//! Newton-Raphson root-finding algorithm.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult, MIN_DERIVATIVE};

/// Newton-Raphson root-finding algorithm.
///
/// Uses the iteration:
/// `x_{n+1} = x_n - f(x_n) / f'(x_n)`
///
/// This method has quadratic convergence near the root but requires
/// the derivative of the function.
///
/// Success means `|f(x)| < tolerance`; a small step alone is not accepted.
/// The iteration stops with an error as soon as the tangent is flat, the
/// estimate leaves the domain (non-finite or at/below
/// [`SolverConfig::lower_bound`]), the deadline fires, or the iteration cap
/// is reached.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `df` - The derivative of the function
/// * `initial_guess` - Starting point for the iteration
/// * `config` - Solver configuration
///
/// # Returns
///
/// The root and iteration statistics, or an error if convergence fails.
///
/// # Example
///
/// ```rust
/// use xirr_math::solvers::{newton_raphson, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
/// let df = |x: f64| 2.0 * x;
///
/// let config = SolverConfig::default().with_tolerance(1e-12);
/// let result = newton_raphson(f, df, 1.5, &config).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn newton_raphson<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    if !config.in_domain(initial_guess) {
        return Err(MathError::diverged(0, initial_guess));
    }

    let mut x = initial_guess;

    for iteration in 0..config.max_iterations {
        config.check_deadline(iteration)?;

        let fx = f(x);
        if fx.is_nan() {
            return Err(MathError::diverged(iteration, x));
        }

        // Check for convergence
        if fx.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        let dfx = df(x);

        // Flat or undefined tangent
        if !dfx.is_finite() || dfx.abs() < MIN_DERIVATIVE {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        x -= fx / dfx;
        log::trace!("newton step {}: x = {}, f = {:.3e}", iteration + 1, x, fx);

        if !config.in_domain(x) {
            return Err(MathError::diverged(iteration + 1, x));
        }
    }

    Err(MathError::convergence_failed(
        config.max_iterations,
        f(x).abs(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solvers::Deadline;
    use approx::assert_relative_eq;
    use std::time::Duration;

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;
        let config = SolverConfig::default().with_tolerance(1e-12);

        let result = newton_raphson(f, df, 1.5, &config).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
        assert!(result.iterations < 10);
    }

    #[test]
    fn test_cube_root() {
        // Find cube root of 27 (should be 3)
        let f = |x: f64| x * x * x - 27.0;
        let df = |x: f64| 3.0 * x * x;
        let config = SolverConfig::default().with_tolerance(1e-10);

        let result = newton_raphson(f, df, 2.0, &config).unwrap();

        assert_relative_eq!(result.root, 3.0, epsilon = 1e-10);
    }

    #[test]
    fn test_root_at_guess_takes_no_steps() {
        let f = |x: f64| x - 0.25;
        let df = |_x: f64| 1.0;

        let result = newton_raphson(f, df, 0.25, &SolverConfig::default()).unwrap();

        assert_eq!(result.iterations, 0);
        assert_relative_eq!(result.root, 0.25);
    }

    #[test]
    fn test_zero_derivative_error() {
        // x^3 - 1 has a flat tangent at 0
        let f = |x: f64| x * x * x - 1.0;
        let df = |x: f64| 3.0 * x * x;

        let result = newton_raphson(f, df, 0.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_constant_function_is_flat() {
        let f = |_x: f64| 5.0;
        let df = |_x: f64| 0.0;

        let result = newton_raphson(f, df, 0.1, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::DivisionByZero { .. })));
    }

    #[test]
    fn test_step_below_lower_bound_diverges() {
        // Root near 1.37; the tangent at 100 is so shallow the step lands near -520.
        let t = 89.0 / 365.0;
        let f = |x: f64| 1000.0 - 1234.0 * (1.0 + x).powf(-t);
        let df = |x: f64| 1234.0 * t * (1.0 + x).powf(-t - 1.0);
        let config = SolverConfig::default().with_lower_bound(-1.0);

        let result = newton_raphson(f, df, 100.0, &config);

        assert!(matches!(result, Err(MathError::Diverged { .. })));
    }

    #[test]
    fn test_guess_outside_domain() {
        let f = |x: f64| x;
        let df = |_x: f64| 1.0;
        let config = SolverConfig::default().with_lower_bound(-1.0);

        let result = newton_raphson(f, df, -1.0, &config);

        assert!(matches!(
            result,
            Err(MathError::Diverged { iteration: 0, .. })
        ));
    }

    #[test]
    fn test_iteration_cap() {
        // Converges, but not in a single step
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;
        let config = SolverConfig::new(1e-12, 1);

        let result = newton_raphson(f, df, 10.0, &config);

        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 1, .. })
        ));
    }

    #[test]
    fn test_deadline() {
        let f = |x: f64| x * x - 2.0;
        let df = |x: f64| 2.0 * x;
        let config = SolverConfig::default().with_deadline(Deadline::after(Duration::ZERO));

        let result = newton_raphson(f, df, 1.5, &config);

        assert!(matches!(
            result,
            Err(MathError::Timeout { iterations: 0, .. })
        ));
    }
}

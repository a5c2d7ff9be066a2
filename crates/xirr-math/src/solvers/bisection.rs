//! Bisection root-finding algorithm and bracket discovery.

use crate::error::{MathError, MathResult};
use crate::solvers::{SolverConfig, SolverResult};

/// Bisection root-finding algorithm.
///
/// A simple and reliable bracketing method that works by repeatedly
/// halving the interval and selecting the subinterval containing the root.
///
/// Requires: `f(a) * f(b) <= 0` (opposite signs at endpoints)
///
/// Terminates successfully once `|f(mid)| < tolerance` or the bracket is
/// narrower than the tolerance.
///
/// # Arguments
///
/// * `f` - The function for which to find a root
/// * `a` - Lower bound of the bracket
/// * `b` - Upper bound of the bracket
/// * `config` - Solver configuration
///
/// # Returns
///
/// The root and iteration statistics, or an error if the bracket is invalid.
///
/// # Example
///
/// ```rust
/// use xirr_math::solvers::{bisection, SolverConfig};
///
/// // Find root of x^2 - 2 (i.e., sqrt(2))
/// let f = |x: f64| x * x - 2.0;
///
/// let config = SolverConfig::default().with_tolerance(1e-12);
/// let result = bisection(f, 1.0, 2.0, &config).unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-10);
/// ```
pub fn bisection<F>(f: F, a: f64, b: f64, config: &SolverConfig) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let mut lo = a.min(b);
    let mut hi = a.max(b);

    let mut f_lo = f(lo);
    let f_hi = f(hi);

    // Check that root is bracketed
    if f_lo.is_nan() || f_hi.is_nan() || f_lo * f_hi > 0.0 {
        return Err(MathError::InvalidBracket {
            a: lo,
            b: hi,
            fa: f_lo,
            fb: f_hi,
        });
    }

    // Handle case where endpoint is the root
    if f_lo.abs() < config.tolerance {
        return Ok(SolverResult {
            root: lo,
            iterations: 0,
            residual: f_lo,
        });
    }
    if f_hi.abs() < config.tolerance {
        return Ok(SolverResult {
            root: hi,
            iterations: 0,
            residual: f_hi,
        });
    }

    for iteration in 0..config.max_iterations {
        config.check_deadline(iteration)?;

        let mid = (lo + hi) / 2.0;
        let f_mid = f(mid);

        if f_mid.abs() < config.tolerance || (hi - lo) < config.tolerance {
            return Ok(SolverResult {
                root: mid,
                iterations: iteration + 1,
                residual: f_mid,
            });
        }

        // Replace the end that shares the midpoint's sign
        if f_mid.is_sign_positive() == f_lo.is_sign_positive() {
            lo = mid;
            f_lo = f_mid;
        } else {
            hi = mid;
        }
    }

    let mid = (lo + hi) / 2.0;
    Err(MathError::convergence_failed(
        config.max_iterations,
        f(mid).abs(),
    ))
}

/// Searches for an interval on which `f` changes sign.
///
/// Starts from `[lower, upper]` and, while both ends share a sign, moves the
/// upper end outward by the current width, at most `max_expansions` times.
/// A NaN at the lower end (typically overflow next to a pole) pulls that end
/// toward `upper` first: ten times further from [`SolverConfig::lower_bound`]
/// per step when the bound is finite, halfway otherwise. A NaN that survives
/// the pull-in, or appears at the upper end, ends the search.
///
/// # Example
///
/// ```rust
/// use xirr_math::solvers::{find_bracket, SolverConfig};
///
/// let f = |x: f64| x - 50.0;
/// let (a, b) = find_bracket(f, 0.0, 10.0, 8, &SolverConfig::default()).unwrap();
/// assert!(f(a) * f(b) <= 0.0);
/// ```
pub fn find_bracket<F>(
    f: F,
    lower: f64,
    upper: f64,
    max_expansions: u32,
    config: &SolverConfig,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    config.check_deadline(0)?;

    let (lo, f_lo) = pull_in_lower(&f, lower.min(upper), lower.max(upper), max_expansions, config);
    let mut hi = lower.max(upper);
    let mut f_hi = f(hi);

    for expansion in 0..=max_expansions {
        if f_lo.is_nan() || f_hi.is_nan() {
            break;
        }
        if changes_sign(f_lo, f_hi) {
            return Ok((lo, hi));
        }
        if expansion == max_expansions {
            break;
        }

        config.check_deadline(0)?;
        hi += hi - lo;
        f_hi = f(hi);
        log::trace!("bracket expansion {}: [{}, {}]", expansion + 1, lo, hi);
    }

    Err(MathError::BracketNotFound {
        lower: lo,
        upper: hi,
        expansions: max_expansions,
    })
}

/// Scans `[lower, upper]` on an even grid for a sign change.
///
/// Used when both ends of a bracket share a sign but the function crosses
/// zero an even number of times in between. Grid points where `f` is not
/// finite are skipped and never paired. Among the sign-changing cells the
/// one whose midpoint lies closest to `anchor` wins.
///
/// # Example
///
/// ```rust
/// use xirr_math::solvers::{scan_bracket, SolverConfig};
///
/// // Positive at both ends, roots at 1 and 3.
/// let f = |x: f64| (x - 1.0) * (x - 3.0);
/// let (a, b) = scan_bracket(f, -2.0, 6.0, 0.0, 16, &SolverConfig::default()).unwrap();
/// assert!(a <= 1.0 && 1.0 <= b);
/// ```
pub fn scan_bracket<F>(
    f: F,
    lower: f64,
    upper: f64,
    anchor: f64,
    segments: u32,
    config: &SolverConfig,
) -> MathResult<(f64, f64)>
where
    F: Fn(f64) -> f64,
{
    let lo = lower.min(upper);
    let hi = lower.max(upper);
    let segments = segments.max(1);
    let step = (hi - lo) / f64::from(segments);

    let mut best: Option<(f64, f64)> = None;
    let mut previous: Option<(f64, f64)> = None;

    for k in 0..=segments {
        config.check_deadline(0)?;

        let x = if k == segments { hi } else { lo + step * f64::from(k) };
        let fx = f(x);
        if !fx.is_finite() {
            previous = None;
            continue;
        }

        if let Some((a, fa)) = previous {
            if changes_sign(fa, fx) {
                let distance = |(left, right): (f64, f64)| ((left + right) / 2.0 - anchor).abs();
                if !best.is_some_and(|cell| distance(cell) <= distance((a, x))) {
                    best = Some((a, x));
                }
            }
        }
        previous = Some((x, fx));
    }

    best.ok_or(MathError::BracketNotFound {
        lower: lo,
        upper: hi,
        expansions: 0,
    })
}

/// Moves a NaN-valued lower end toward `hi` until `f` is defined there.
fn pull_in_lower<F>(f: &F, lo: f64, hi: f64, max_steps: u32, config: &SolverConfig) -> (f64, f64)
where
    F: Fn(f64) -> f64,
{
    let mut lo = lo;
    let mut f_lo = f(lo);

    for _ in 0..max_steps {
        if !f_lo.is_nan() {
            break;
        }
        let next = if config.lower_bound.is_finite() && lo > config.lower_bound {
            config.lower_bound + (lo - config.lower_bound) * 10.0
        } else {
            lo + (hi - lo) / 2.0
        };
        if next >= hi {
            break;
        }
        log::trace!("bracket pull-in: {} -> {}", lo, next);
        lo = next;
        f_lo = f(lo);
    }

    (lo, f_lo)
}

fn changes_sign(a: f64, b: f64) -> bool {
    a == 0.0 || b == 0.0 || a.is_sign_positive() != b.is_sign_positive()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn tight() -> SolverConfig {
        SolverConfig::default().with_tolerance(1e-12)
    }

    #[test]
    fn test_sqrt_2() {
        let f = |x: f64| x * x - 2.0;

        let result = bisection(f, 1.0, 2.0, &tight()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_reversed_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Reversed bracket should still work
        let result = bisection(f, 2.0, 1.0, &tight()).unwrap();

        assert_relative_eq!(result.root, std::f64::consts::SQRT_2, epsilon = 1e-10);
    }

    #[test]
    fn test_invalid_bracket() {
        let f = |x: f64| x * x - 2.0;

        // Both endpoints have same sign
        let result = bisection(f, 2.0, 3.0, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::InvalidBracket { .. })));
    }

    #[test]
    fn test_root_at_endpoint() {
        let f = |x: f64| x - 1.0;

        let result = bisection(f, 0.0, 1.0, &SolverConfig::default()).unwrap();

        assert_relative_eq!(result.root, 1.0, epsilon = 1e-10);
        assert_eq!(result.iterations, 0);
    }

    #[test]
    fn test_negative_root() {
        let f = |x: f64| x + 1.0;

        let result = bisection(f, -2.0, 0.0, &tight()).unwrap();

        assert_relative_eq!(result.root, -1.0, epsilon = 1e-10);
    }

    #[test]
    fn test_width_stops_iteration() {
        // Steep function: the residual never drops below tolerance before the bracket does.
        let f = |x: f64| 1e9 * (x - 0.3);
        let config = SolverConfig::default().with_tolerance(1e-6);

        let result = bisection(f, 0.0, 1.0, &config).unwrap();

        assert!((result.root - 0.3).abs() < 1e-6);
        assert!(result.iterations <= 21);
    }

    #[test]
    fn test_iteration_cap() {
        let f = |x: f64| x * x - 2.0;
        let config = SolverConfig::new(1e-12, 3);

        let result = bisection(f, 1.0, 2.0, &config);

        assert!(matches!(
            result,
            Err(MathError::ConvergenceFailed { iterations: 3, .. })
        ));
    }

    #[test]
    fn test_find_bracket_immediate() {
        let f = |x: f64| x - 1.0;

        let bracket = find_bracket(f, 0.0, 2.0, 4, &SolverConfig::default()).unwrap();

        assert_eq!(bracket, (0.0, 2.0));
    }

    #[test]
    fn test_find_bracket_expands_upper() {
        let f = |x: f64| x - 50.0;

        let (a, b) = find_bracket(f, 0.0, 10.0, 8, &SolverConfig::default()).unwrap();

        assert_relative_eq!(a, 0.0);
        assert!(b >= 50.0);
        assert!(f(a) * f(b) <= 0.0);
    }

    #[test]
    fn test_find_bracket_exhausts_budget() {
        let f = |x: f64| x * x + 1.0;

        let result = find_bracket(f, -1.0, 1.0, 4, &SolverConfig::default());

        assert!(matches!(
            result,
            Err(MathError::BracketNotFound { expansions: 4, .. })
        ));
    }

    #[test]
    fn test_find_bracket_nan() {
        let f = |x: f64| if x > 5.0 { f64::NAN } else { 1.0 };

        let result = find_bracket(f, 0.0, 1.0, 8, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::BracketNotFound { .. })));
    }

    #[test]
    fn test_find_bracket_pulls_in_undefined_lower_end() {
        // Undefined below 1e-3 above the pole at -1, positive up to 0.5.
        let f = |x: f64| if x < -0.999 { f64::NAN } else { 0.5 - x };
        let config = SolverConfig::default().with_lower_bound(-1.0);

        let (a, b) = find_bracket(f, -0.99999999, 2.0, 16, &config).unwrap();

        assert!(a >= -0.999 && a < 0.5);
        assert_relative_eq!(b, 2.0);
    }

    #[test]
    fn test_find_bracket_pull_in_without_bound_halves() {
        let f = |x: f64| if x < 0.0 { f64::NAN } else { x - 3.0 };

        let (a, b) = find_bracket(f, -8.0, 8.0, 4, &SolverConfig::default()).unwrap();

        assert_relative_eq!(a, 0.0);
        assert_relative_eq!(b, 8.0);
    }

    #[test]
    fn test_scan_bracket_prefers_cell_near_anchor() {
        let f = |x: f64| (x - 1.0) * (x - 3.0);

        let (a, b) = scan_bracket(f, -2.0, 6.0, 3.2, 16, &SolverConfig::default()).unwrap();

        assert!(a <= 3.0 && 3.0 <= b);
        assert!(b - a <= 0.5 + 1e-12);
    }

    #[test]
    fn test_scan_bracket_skips_undefined_points() {
        let f = |x: f64| if x < 0.3 { f64::NAN } else { x - 0.7 };

        let (a, b) = scan_bracket(f, 0.0, 1.0, 0.0, 10, &SolverConfig::default()).unwrap();

        assert!(a >= 0.3 && a <= 0.7 && 0.7 <= b);
    }

    #[test]
    fn test_scan_bracket_without_crossing() {
        let f = |x: f64| x * x + 1.0;

        let result = scan_bracket(f, -1.0, 1.0, 0.0, 8, &SolverConfig::default());

        assert!(matches!(result, Err(MathError::BracketNotFound { .. })));
    }
}

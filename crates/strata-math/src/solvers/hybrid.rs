//! Newton-Raphson with a Brent fallback.

use crate::error::{MathError, MathResult};
use crate::solvers::newton::central_difference;
use crate::solvers::{brent, SolverConfig, SolverResult};

/// Newton iterations allowed before falling back to Brent.
const NEWTON_BUDGET: u32 = 20;

/// Hybrid root-finding algorithm.
///
/// Starts with Newton-Raphson and gives up on it as soon as the iteration
/// diverges, hits a flat derivative, leaves `bounds` or produces a non-finite
/// value. Brent then runs on `bounds`.
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{hybrid, SolverConfig};
///
/// let f = |x: f64| x * x * x - x - 2.0;
/// let df = |x: f64| 3.0 * x * x - 1.0;
///
/// let result = hybrid(f, df, 1.5, Some((1.0, 2.0)), &SolverConfig::default()).unwrap();
/// assert!((f(result.root)).abs() < 1e-10);
/// ```
pub fn hybrid<F, DF>(
    f: F,
    df: DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    match guarded_newton(&f, &df, initial_guess, bounds, config) {
        Ok(result) => Ok(result),
        Err(newton_error) => match bounds {
            Some((a, b)) => brent(&f, a, b, config),
            None => Err(newton_error),
        },
    }
}

/// Hybrid solver with a numerical derivative.
pub fn hybrid_numerical<F>(
    f: F,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
{
    let df = |x: f64| central_difference(&f, x);
    hybrid(&f, df, initial_guess, bounds, config)
}

fn guarded_newton<F, DF>(
    f: &F,
    df: &DF,
    initial_guess: f64,
    bounds: Option<(f64, f64)>,
    config: &SolverConfig,
) -> MathResult<SolverResult>
where
    F: Fn(f64) -> f64,
    DF: Fn(f64) -> f64,
{
    const MAX_DIVERGENCE: u32 = 3;

    let inside = |x: f64| {
        bounds.map_or(true, |(a, b)| x >= a.min(b) && x <= a.max(b))
    };

    let mut x = initial_guess;
    let mut prev_residual = f64::MAX;
    let mut divergence_count = 0;
    let budget = config.max_iterations.min(NEWTON_BUDGET);

    for iteration in 0..budget {
        let fx = f(x);
        if !fx.is_finite() {
            return Err(MathError::invalid_input("Newton produced a non-finite residual"));
        }
        let residual = fx.abs();
        if residual < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration,
                residual: fx,
            });
        }

        if residual > prev_residual * 2.0 {
            divergence_count += 1;
            if divergence_count >= MAX_DIVERGENCE {
                return Err(MathError::invalid_input("Newton-Raphson diverging"));
            }
        } else {
            divergence_count = 0;
        }
        prev_residual = residual;

        let dfx = df(x);
        if !(dfx.abs() >= 1e-15) {
            return Err(MathError::DivisionByZero { value: dfx });
        }

        let step = fx / dfx;
        x -= step;
        if !x.is_finite() || !inside(x) {
            return Err(MathError::invalid_input("Newton left the bracket"));
        }

        if step.abs() < config.tolerance {
            return Ok(SolverResult {
                root: x,
                iterations: iteration + 1,
                residual: f(x),
            });
        }
    }

    Err(MathError::convergence_failed(budget, f(x).abs()))
}

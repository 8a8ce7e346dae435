//! Root-finding algorithms.
//!
//! - [`brent`]: bracketing method combining bisection, secant and inverse
//!   quadratic steps; converges whenever the bracket is valid
//! - [`newton_raphson`]: quadratic convergence near the root, needs a derivative
//! - [`hybrid`]: Newton-Raphson with a Brent fallback
//!
//! The bootstrapper does not call these directly. It receives an
//! `Arc<dyn RootSolver>` and goes through [`solve_with_expansion`], which
//! widens the bracket once when the first attempt fails.
//!
//! # Choosing a Solver
//!
//! | Solver | Speed | Reliability | Requires |
//! |--------|-------|-------------|----------|
//! | Brent | Fast (superlinear) | Guaranteed | Bracket |
//! | Newton-Raphson | Fastest (quadratic) | May diverge | Guess |
//! | Hybrid | Fast | Guaranteed with a bracket | Guess and bracket |

mod brent;
mod hybrid;
mod newton;

pub use brent::brent;
pub use hybrid::{hybrid, hybrid_numerical};
pub use newton::{newton_raphson, newton_raphson_numerical};

use std::fmt;

use crate::error::{MathError, MathResult};

/// Default tolerance for root-finding algorithms.
pub const DEFAULT_TOLERANCE: f64 = 1e-12;

/// Default maximum iterations for root-finding algorithms.
pub const DEFAULT_MAX_ITERATIONS: u32 = 100;

/// Bracket widening attempts made by [`solve_with_expansion`].
const MAX_EXPANSIONS: u32 = 50;

/// Configuration for root-finding algorithms.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverConfig {
    /// Tolerance on the root.
    pub tolerance: f64,
    /// Maximum number of iterations.
    pub max_iterations: u32,
}

impl Default for SolverConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            max_iterations: DEFAULT_MAX_ITERATIONS,
        }
    }
}

impl SolverConfig {
    /// Creates a new solver configuration.
    #[must_use]
    pub fn new(tolerance: f64, max_iterations: u32) -> Self {
        Self {
            tolerance,
            max_iterations,
        }
    }

    /// Sets the tolerance.
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Sets the maximum iterations.
    #[must_use]
    pub fn with_max_iterations(mut self, max_iterations: u32) -> Self {
        self.max_iterations = max_iterations;
        self
    }
}

/// Result of a root-finding run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverResult {
    /// The root found.
    pub root: f64,
    /// Number of iterations used.
    pub iterations: u32,
    /// Function value at the root.
    pub residual: f64,
}

/// A swappable root-finding strategy.
///
/// Object safe: the objective is passed as `&dyn Fn`, so curve builders can
/// hold an `Arc<dyn RootSolver>` chosen at run time.
///
/// # Example
///
/// ```rust
/// use strata_math::solvers::{BrentSolver, RootSolver, SolverConfig};
///
/// let solver: Box<dyn RootSolver> = Box::new(BrentSolver);
/// let result = solver
///     .solve(&|x| x * x - 2.0, 1.5, (1.0, 2.0), &SolverConfig::default())
///     .unwrap();
/// assert!((result.root - std::f64::consts::SQRT_2).abs() < 1e-11);
/// ```
pub trait RootSolver: Send + Sync + fmt::Debug {
    /// Finds a root of `f`, starting from `guess` and/or within `bracket`.
    fn solve(
        &self,
        f: &dyn Fn(f64) -> f64,
        guess: f64,
        bracket: (f64, f64),
        config: &SolverConfig,
    ) -> MathResult<SolverResult>;

    /// Returns the name of the solver.
    fn name(&self) -> &'static str;
}

/// Brent's method on the supplied bracket; the guess is ignored.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrentSolver;

impl RootSolver for BrentSolver {
    fn solve(
        &self,
        f: &dyn Fn(f64) -> f64,
        _guess: f64,
        bracket: (f64, f64),
        config: &SolverConfig,
    ) -> MathResult<SolverResult> {
        brent(f, bracket.0, bracket.1, config)
    }

    fn name(&self) -> &'static str {
        "Brent"
    }
}

/// Newton-Raphson from the guess with a central-difference derivative.
#[derive(Debug, Clone, Copy, Default)]
pub struct NewtonSolver;

impl RootSolver for NewtonSolver {
    fn solve(
        &self,
        f: &dyn Fn(f64) -> f64,
        guess: f64,
        _bracket: (f64, f64),
        config: &SolverConfig,
    ) -> MathResult<SolverResult> {
        newton_raphson_numerical(f, guess, config)
    }

    fn name(&self) -> &'static str {
        "Newton-Raphson"
    }
}

/// Newton-Raphson first, Brent on the bracket if Newton fails.
#[derive(Debug, Clone, Copy, Default)]
pub struct HybridSolver;

impl RootSolver for HybridSolver {
    fn solve(
        &self,
        f: &dyn Fn(f64) -> f64,
        guess: f64,
        bracket: (f64, f64),
        config: &SolverConfig,
    ) -> MathResult<SolverResult> {
        hybrid_numerical(f, guess, Some(bracket), config)
    }

    fn name(&self) -> &'static str {
        "Hybrid Newton-Brent"
    }
}

/// Widens `bracket` geometrically until `f` changes sign across it.
///
/// The side with the smaller residual moves outwards. `floor`, when given,
/// is never crossed; once the lower end sits on it only the upper end moves.
pub fn expand_bracket(
    f: &dyn Fn(f64) -> f64,
    bracket: (f64, f64),
    floor: Option<f64>,
    max_steps: u32,
) -> Option<(f64, f64)> {
    const GROWTH: f64 = 1.6;

    let (mut lo, mut hi) = if bracket.0 <= bracket.1 {
        bracket
    } else {
        (bracket.1, bracket.0)
    };
    if let Some(floor) = floor {
        lo = lo.max(floor);
    }
    let mut f_lo = f(lo);
    let mut f_hi = f(hi);

    for _ in 0..max_steps {
        if f_lo.is_finite() && f_hi.is_finite() && f_lo * f_hi <= 0.0 {
            return Some((lo, hi));
        }
        let width = (hi - lo).max(1e-8);
        let at_floor = floor.is_some_and(|fl| lo <= fl);
        let move_lower = !at_floor && (!f_lo.is_finite() || f_lo.abs() < f_hi.abs());
        if move_lower {
            lo -= GROWTH * width;
            if let Some(floor) = floor {
                lo = lo.max(floor);
            }
            f_lo = f(lo);
        } else {
            hi += GROWTH * width;
            f_hi = f(hi);
        }
    }
    None
}

/// Runs `solver`; on failure widens the bracket and tries once more.
pub fn solve_with_expansion(
    solver: &dyn RootSolver,
    f: &dyn Fn(f64) -> f64,
    guess: f64,
    bracket: (f64, f64),
    floor: Option<f64>,
    config: &SolverConfig,
) -> MathResult<SolverResult> {
    match solver.solve(f, guess, bracket, config) {
        Ok(result) if result.root.is_finite() => Ok(result),
        first => {
            let Some(wider) = expand_bracket(f, bracket, floor, MAX_EXPANSIONS) else {
                return match first {
                    Err(e) => Err(e),
                    Ok(result) => Err(MathError::convergence_failed(
                        config.max_iterations,
                        result.residual,
                    )),
                };
            };
            let guess = 0.5 * (wider.0 + wider.1);
            let result = solver.solve(f, guess, wider, config)?;
            if result.root.is_finite() {
                Ok(result)
            } else {
                Err(MathError::convergence_failed(config.max_iterations, result.residual))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::sync::Arc;

    #[test]
    fn test_solvers_are_interchangeable() {
        let solvers: Vec<Arc<dyn RootSolver>> =
            vec![Arc::new(BrentSolver), Arc::new(NewtonSolver), Arc::new(HybridSolver)];
        let f = |x: f64| (-x * 2.0).exp() - 0.9;
        let expected = -(0.9_f64).ln() / 2.0;
        for solver in solvers {
            let result = solver
                .solve(&f, 0.01, (0.0, 1.0), &SolverConfig::default())
                .unwrap();
            assert_relative_eq!(result.root, expected, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_expand_bracket_finds_sign_change() {
        let f = |x: f64| x - 7.5;
        let (lo, hi) = expand_bracket(&f, (0.0, 1.0), None, 50).unwrap();
        assert!(f(lo) * f(hi) <= 0.0);
    }

    #[test]
    fn test_expand_bracket_respects_floor() {
        let f = |x: f64| x.ln() + 30.0;
        let (lo, hi) = expand_bracket(&f, (0.5, 1.0), Some(1e-14), 100).unwrap();
        assert!(lo >= 1e-14);
        assert!(f(lo) <= 0.0 && f(hi) >= 0.0);
    }

    #[test]
    fn test_solve_with_expansion_recovers_bad_bracket() {
        let f = |x: f64| x * x * x - 1000.0;
        let result = solve_with_expansion(
            &BrentSolver,
            &f,
            1.0,
            (0.0, 1.0),
            None,
            &SolverConfig::default(),
        )
        .unwrap();
        assert_relative_eq!(result.root, 10.0, epsilon = 1e-9);
    }
}

//! Log-linear interpolation.
//!
//! Interpolates the logarithm of values. Applied to discount factors this is
//! the classic piecewise-flat forward curve.

use super::{
    check_range, cumulative, segment, validate_nodes, validate_positive, Interpolator,
};
use crate::error::MathResult;

/// Log-linear interpolation: `y(x) = y_i · exp(k_i (x - x_i))` on each segment.
///
/// # Example
///
/// ```rust
/// use strata_math::interpolation::{Interpolator, LogLinearInterpolator};
///
/// let times = vec![0.0, 1.0, 2.0];
/// let dfs = vec![1.0, 0.97, 0.94];
///
/// let interp = LogLinearInterpolator::new(times, dfs).unwrap();
/// let df = interp.interpolate(0.5).unwrap();
/// assert!((df - 0.97_f64.sqrt()).abs() < 1e-15);
/// ```
#[derive(Debug, Clone)]
pub struct LogLinearInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    /// Log-slope of each segment.
    rates: Vec<f64>,
    integrals: Vec<f64>,
}

impl LogLinearInterpolator {
    /// Creates a log-linear interpolator; every `y` must be positive.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        validate_positive(&ys)?;

        let rates: Vec<f64> = xs
            .windows(2)
            .zip(ys.windows(2))
            .map(|(x, y)| (y[1] / y[0]).ln() / (x[1] - x[0]))
            .collect();
        let integrals = cumulative((0..rates.len()).map(|i| {
            segment_integral(ys[i], rates[i], xs[i + 1] - xs[i])
        }));

        Ok(Self {
            xs,
            ys,
            rates,
            integrals,
        })
    }
}

/// `∫_0^dx y0·exp(k s) ds`
fn segment_integral(y0: f64, k: f64, dx: f64) -> f64 {
    if (k * dx).abs() < 1e-10 {
        y0 * dx * (1.0 + 0.5 * k * dx)
    } else {
        y0 * (k * dx).exp_m1() / k
    }
}

impl Interpolator for LogLinearInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        Ok(self.ys[i] * (self.rates[i] * (x - self.xs[i])).exp())
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        let i = segment(&self.xs, x);
        Ok(self.rates[i] * self.interpolate(x)?)
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        Ok(self.integrals[i] + segment_integral(self.ys[i], self.rates[i], x - self.xs[i]))
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

//! Piecewise-constant interpolation.
//!
//! The two variants differ in which node owns a segment:
//! backward-flat takes the value of the node on the right of the segment,
//! forward-flat the value of the node on the left.

use super::{check_range, cumulative, segment, validate_nodes, Interpolator};
use crate::error::MathResult;

/// `y(x) = y_{i+1}` for `x` in `(x_i, x_{i+1}]`, `y(x_0) = y_0`.
#[derive(Debug, Clone)]
pub struct BackwardFlatInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    integrals: Vec<f64>,
}

impl BackwardFlatInterpolator {
    /// Creates a backward-flat interpolator.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        let integrals = cumulative(
            xs.windows(2)
                .zip(ys.iter().skip(1))
                .map(|(x, y)| (x[1] - x[0]) * y),
        );
        Ok(Self { xs, ys, integrals })
    }
}

impl Interpolator for BackwardFlatInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        if x == self.xs[i] {
            Ok(self.ys[i])
        } else {
            Ok(self.ys[i + 1])
        }
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        Ok(0.0)
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        Ok(self.integrals[i] + (x - self.xs[i]) * self.ys[i + 1])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}

/// `y(x) = y_i` for `x` in `[x_i, x_{i+1})`, `y(x_n) = y_n`.
#[derive(Debug, Clone)]
pub struct ForwardFlatInterpolator {
    xs: Vec<f64>,
    ys: Vec<f64>,
    integrals: Vec<f64>,
}

impl ForwardFlatInterpolator {
    /// Creates a forward-flat interpolator.
    pub fn new(xs: Vec<f64>, ys: Vec<f64>) -> MathResult<Self> {
        validate_nodes(&xs, &ys)?;
        let integrals = cumulative(
            xs.windows(2)
                .zip(ys.iter())
                .map(|(x, y)| (x[1] - x[0]) * y),
        );
        Ok(Self { xs, ys, integrals })
    }
}

impl Interpolator for ForwardFlatInterpolator {
    fn interpolate(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let last = self.xs.len() - 1;
        if x == self.xs[last] {
            return Ok(self.ys[last]);
        }
        Ok(self.ys[segment(&self.xs, x)])
    }

    fn derivative(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        Ok(0.0)
    }

    fn primitive(&self, x: f64) -> MathResult<f64> {
        check_range(&self.xs, x)?;
        let i = segment(&self.xs, x);
        Ok(self.integrals[i] + (x - self.xs[i]) * self.ys[i])
    }

    fn min_x(&self) -> f64 {
        self.xs[0]
    }

    fn max_x(&self) -> f64 {
        self.xs[self.xs.len() - 1]
    }
}
